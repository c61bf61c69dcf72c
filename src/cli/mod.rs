//! CLI argument definitions for wikilaunch.

use crate::config::ConfigOverrides;
use crate::models::{Platform, ViewMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("WKL_GIT_COMMIT"),
    " ",
    env!("WKL_BUILD_TIMESTAMP"),
    ")"
);

/// wikilaunch - turn a repository reference into a wiki-generation request.
///
/// Accepts `owner/repo`, a GitHub/GitLab/BitBucket URL, or a local folder path.
#[derive(Parser, Debug)]
#[command(name = "wkl")]
#[command(author, version, long_version = LONG_VERSION, about = "Resolve repository references into wiki-generation requests", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Read generation defaults from <path> instead of the user config dir.
    /// Can also be set via WKL_CONFIG environment variable.
    #[arg(long = "config", global = true, env = "WKL_CONFIG")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a repository reference and show its owner, repo and source
    Resolve {
        /// Repository reference (e.g., octocat/Hello-World, https://gitlab.com/g/p, /path/to/folder)
        reference: String,
    },

    /// Build the wiki navigation request for a repository reference
    ///
    /// Options not given on the command line fall back to config.kdl,
    /// then to built-in defaults.
    Build {
        /// Repository reference (e.g., octocat/Hello-World, https://gitlab.com/g/p, /path/to/folder)
        reference: String,

        #[command(flatten)]
        options: BuildOptions,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Generation options accepted by `wkl build`.
#[derive(Args, Debug, Default)]
pub struct BuildOptions {
    /// Hosting platform for remote repositories
    #[arg(long, value_parser = ["github", "gitlab", "bitbucket"])]
    pub platform: Option<String>,

    /// Access token for private repositories (falls back to WKL_ACCESS_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Model provider identifier
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Custom model name (implies a custom model is selected)
    #[arg(long)]
    pub custom_model: Option<String>,

    /// Directories to exclude, newline or comma separated
    #[arg(long)]
    pub excluded_dirs: Option<String>,

    /// Files to exclude, newline or comma separated
    #[arg(long)]
    pub excluded_files: Option<String>,

    /// Wiki language code (e.g., en, ja, zh-tw)
    #[arg(long)]
    pub language: Option<String>,

    /// Generate a concise wiki instead of a comprehensive one
    #[arg(long, conflicts_with = "comprehensive")]
    pub concise: bool,

    /// Generate a comprehensive wiki (the default)
    #[arg(long)]
    pub comprehensive: bool,
}

impl BuildOptions {
    /// Convert flags into resolver overrides. Unset flags stay `None`.
    pub fn to_overrides(&self) -> ConfigOverrides {
        let view_mode = if self.concise {
            Some(ViewMode::Concise)
        } else if self.comprehensive {
            Some(ViewMode::Comprehensive)
        } else {
            None
        };

        ConfigOverrides {
            platform: self.platform.as_deref().and_then(Platform::parse),
            access_token: self.token.clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            custom_model: self.custom_model.clone(),
            excluded_dirs: self.excluded_dirs.clone(),
            excluded_files: self.excluded_files.clone(),
            language: self.language.clone(),
            view_mode,
        }
    }
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved options and where each value came from
    Show {
        #[command(flatten)]
        options: BuildOptions,
    },

    /// Print the config file location
    Path,

    /// Write a starter config.kdl with the built-in defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // This will panic if the CLI is misconfigured
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_options_to_overrides() {
        let cli = Cli::try_parse_from([
            "wkl",
            "build",
            "octocat/Hello-World",
            "--platform",
            "gitlab",
            "--model",
            "m",
            "--concise",
        ])
        .unwrap();

        let Commands::Build { reference, options } = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(reference, "octocat/Hello-World");

        let overrides = options.to_overrides();
        assert_eq!(overrides.platform, Some(Platform::Gitlab));
        assert_eq!(overrides.model.as_deref(), Some("m"));
        assert_eq!(overrides.view_mode, Some(ViewMode::Concise));
        assert!(overrides.language.is_none());
    }

    #[test]
    fn test_unset_view_mode_is_none() {
        let cli = Cli::try_parse_from(["wkl", "build", "a/b"]).unwrap();
        let Commands::Build { options, .. } = cli.command else {
            panic!("expected build command");
        };
        assert!(options.to_overrides().view_mode.is_none());
    }

    #[test]
    fn test_concise_conflicts_with_comprehensive() {
        let result = Cli::try_parse_from(["wkl", "build", "a/b", "--concise", "--comprehensive"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let result = Cli::try_parse_from(["wkl", "build", "a/b", "--platform", "gitea"]);
        assert!(result.is_err());
    }
}
