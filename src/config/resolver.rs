//! Precedence resolution for generation options.
//!
//! ## Option Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. config.kdl (`--config`, `WKL_CONFIG`, or `~/.config/wikilaunch/config.kdl`)
//! 3. Built-in defaults
//!
//! ## Token Precedence (highest to lowest)
//!
//! 1. `--token` CLI flag
//! 2. `WKL_ACCESS_TOKEN` environment variable
//!
//! Tokens are never read from config.kdl; a token found there only produces
//! a warning.

use crate::config::schema::{LaunchConfig, has_token_in_config};
use crate::models::{ConfigurationBundle, DEFAULT_LANGUAGE, Platform, ViewMode};
use crate::{Error, Result};
use kdl::KdlDocument;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the access token.
pub const ACCESS_TOKEN_ENV: &str = "WKL_ACCESS_TOKEN";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "WKL_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from a config file
    ConfigFile(String),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// A config file as loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Path the config was read from, if a file existed.
    pub path: Option<PathBuf>,
    pub config: LaunchConfig,
    /// Problems that do not stop resolution.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    fn source(&self) -> ValueSource {
        match self.path {
            Some(ref path) => ValueSource::ConfigFile(path.display().to_string()),
            None => ValueSource::Default,
        }
    }
}

/// Default config location: `<config_dir>/wikilaunch/config.kdl`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wikilaunch").join("config.kdl"))
}

/// Pick the config file: an explicit path wins over the default location.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Load config.kdl. A missing file is an empty config.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let Some(path) = path else {
        return Ok(LoadedConfig::default());
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(LoadedConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    let config = LaunchConfig::from_kdl(&doc).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let mut warnings = Vec::new();
    if has_token_in_config(&doc) {
        warnings.push(format!(
            "Access token in {} is ignored. Set {} or pass --token instead.",
            path.display(),
            ACCESS_TOKEN_ENV
        ));
    }

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(LoadedConfig {
        path: Some(path.to_path_buf()),
        config,
        warnings,
    })
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub platform: Option<Platform>,
    pub access_token: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub custom_model: Option<String>,
    pub excluded_dirs: Option<String>,
    pub excluded_files: Option<String>,
    pub language: Option<String>,
    pub view_mode: Option<ViewMode>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = Some(mode);
        self
    }
}

/// Fully resolved options with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub platform: Resolved<Platform>,
    pub access_token: Option<Resolved<String>>,
    pub provider: Resolved<String>,
    pub model: Resolved<String>,
    pub custom_model: Option<Resolved<String>>,
    pub excluded_dirs: Option<Resolved<String>>,
    pub excluded_files: Option<Resolved<String>>,
    pub language: Resolved<String>,
    pub view_mode: Resolved<ViewMode>,
    pub warnings: Vec<String>,
}

impl ResolvedConfig {
    /// Get the masked token for display purposes.
    pub fn masked_token(&self) -> Option<String> {
        self.access_token.as_ref().map(|r| mask_token(&r.value))
    }

    /// The bundle the request builder consumes.
    pub fn to_bundle(&self) -> ConfigurationBundle {
        let custom_model = self.custom_model.as_ref().map(|r| r.value.clone());
        ConfigurationBundle {
            platform: self.platform.value,
            access_token: self.access_token.as_ref().map(|r| r.value.clone()),
            provider: self.provider.value.clone(),
            model: self.model.value.clone(),
            is_custom_model: custom_model.is_some(),
            custom_model,
            excluded_dirs: self.excluded_dirs.as_ref().map(|r| r.value.clone()),
            excluded_files: self.excluded_files.as_ref().map(|r| r.value.clone()),
            language: self.language.value.clone(),
            view_mode: self.view_mode.value,
        }
    }
}

/// Show the first and last 4 characters of a token.
///
/// Tokens of 4 characters or fewer are fully hidden.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else if chars.len() <= 12 {
        let head: String = chars.iter().take(4).collect();
        format!("{}...", head)
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Resolve options using the process environment for the token.
pub fn resolve_config(loaded: &LoadedConfig, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(loaded, overrides, |name| std::env::var(name).ok())
}

/// Resolve options with an explicit environment lookup.
///
/// Precedence per field: CLI flag > config file > default. The token comes
/// from the CLI flag or the environment only.
pub fn resolve_config_with_env<F>(
    loaded: &LoadedConfig,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = &loaded.config;
    let file_source = loaded.source();

    let pick = |cli: &Option<String>, from_file: &Option<String>| -> Option<Resolved<String>> {
        if let Some(value) = cli {
            Some(Resolved::new(value.clone(), ValueSource::CliFlag))
        } else {
            from_file
                .as_ref()
                .map(|value| Resolved::new(value.clone(), file_source.clone()))
        }
    };

    let language = pick(&overrides.language, &file.language)
        .unwrap_or_else(|| Resolved::new(DEFAULT_LANGUAGE.to_string(), ValueSource::Default));
    if !crate::config::is_supported_language(&language.value) {
        return Err(Error::Config(format!(
            "unsupported language \"{}\" (from {})",
            language.value, language.source
        )));
    }

    let platform = match (overrides.platform, file.platform) {
        (Some(p), _) => Resolved::new(p, ValueSource::CliFlag),
        (None, Some(p)) => Resolved::new(p, file_source.clone()),
        (None, None) => Resolved::new(Platform::default(), ValueSource::Default),
    };

    let view_mode = match (overrides.view_mode, file.view_mode) {
        (Some(m), _) => Resolved::new(m, ValueSource::CliFlag),
        (None, Some(m)) => Resolved::new(m, file_source.clone()),
        (None, None) => Resolved::new(ViewMode::default(), ValueSource::Default),
    };

    let access_token = match overrides.access_token {
        Some(ref token) => Some(Resolved::new(token.clone(), ValueSource::CliFlag)),
        None => env(ACCESS_TOKEN_ENV)
            .filter(|token| !token.is_empty())
            .map(|token| Resolved::new(token, ValueSource::EnvVar(ACCESS_TOKEN_ENV.to_string()))),
    };

    let empty_default = || Resolved::new(String::new(), ValueSource::Default);

    Ok(ResolvedConfig {
        platform,
        access_token,
        provider: pick(&overrides.provider, &file.provider).unwrap_or_else(empty_default),
        model: pick(&overrides.model, &file.model).unwrap_or_else(empty_default),
        custom_model: pick(&overrides.custom_model, &file.custom_model),
        excluded_dirs: pick(&overrides.excluded_dirs, &file.excluded_dirs),
        excluded_files: pick(&overrides.excluded_files, &file.excluded_files),
        language,
        view_mode,
        warnings: loaded.warnings.clone(),
    })
}
