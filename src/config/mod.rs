//! Configuration for wikilaunch.
//!
//! ## config.kdl - generation defaults (safe to sync across machines)
//!
//! Located at (first match wins):
//! - `--config <path>` / `WKL_CONFIG`
//! - `~/.config/wikilaunch/config.kdl`
//!
//! Contains `platform`, `provider`, `model`, `custom-model`,
//! `excluded-dirs`, `excluded-files`, `language` and `view-mode`.
//!
//! ## Secrets
//!
//! The access token is never stored in config.kdl. It comes from `--token`
//! or `WKL_ACCESS_TOKEN`.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ACCESS_TOKEN_ENV, CONFIG_PATH_ENV, ConfigOverrides, LoadedConfig, Resolved, ResolvedConfig,
    ValueSource, config_path, default_config_path, load_config, mask_token, resolve_config,
    resolve_config_with_env,
};
pub use schema::{LaunchConfig, SUPPORTED_LANGUAGES, is_supported_language};
