//! Command implementations for the wkl CLI.
//!
//! Each command returns a result type implementing [`CommandResult`], which
//! the binary prints as JSON (default) or human-readable text:
//! - `resolve` - classify a reference and show its locator
//! - `build` - run the form flow and show the navigation target
//! - `config` - inspect or initialize config.kdl

use crate::config::{LaunchConfig, Resolved, ResolvedConfig, default_config_path, mask_token};
use crate::messages::{MessageCatalog, MessageLookup};
use crate::models::{Platform, RepositoryLocator, ViewMode};
use crate::request::{NavigationRequest, PARAM_TOKEN};
use crate::resolver::{classify, resolve};
use crate::session::{ConfirmOutcome, RecordingNavigator, SubmitOutcome, WikiForm};
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_or_error<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

// ============================================================================
// resolve
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ResolveResult {
    pub shape: String,
    #[serde(flatten)]
    pub locator: RepositoryLocator,
}

impl CommandResult for ResolveResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let t = MessageCatalog::english();
        let mut lines = vec![
            format!("{}: {}", t.message("output.owner", &[]), self.locator.owner()),
            format!("{}: {}", t.message("output.repository", &[]), self.locator.repo()),
            format!(
                "{}: {} ({})",
                t.message("output.source", &[]),
                self.locator.source_kind(),
                self.shape
            ),
        ];
        if let Some(path) = self.locator.full_path() {
            lines.push(format!("{}: {}", t.message("output.fullPath", &[]), path));
        }
        if let Some(path) = self.locator.local_path() {
            lines.push(format!("{}: {}", t.message("output.localPath", &[]), path));
        }
        lines.join("\n")
    }
}

/// Resolve a reference without building a request.
pub fn resolve_reference(reference: &str) -> Result<ResolveResult> {
    let locator = resolve(reference)?;
    Ok(ResolveResult {
        shape: classify(reference).to_string(),
        locator,
    })
}

// ============================================================================
// build
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BuildResult {
    pub locator: RepositoryLocator,
    pub path: String,
    pub query: String,
    pub target: String,
    pub params: Vec<(String, String)>,
    #[serde(skip)]
    request: NavigationRequest,
}

impl BuildResult {
    pub fn request(&self) -> &NavigationRequest {
        &self.request
    }

    /// The request with the token masked, for display.
    fn redacted(&self) -> NavigationRequest {
        let mut request = self.request.clone();
        for (key, value) in request.query.iter_mut() {
            if key == PARAM_TOKEN {
                *value = mask_token(value);
            }
        }
        request
    }
}

impl CommandResult for BuildResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let t = MessageCatalog::english();
        let redacted = self.redacted();
        let target = redacted.target();

        let mut lines = vec![
            t.message("output.navigatingTo", &[("target", &target)]),
            String::new(),
            format!("{}:", t.message("output.parameters", &[])),
        ];
        for (key, value) in &redacted.query {
            lines.push(format!("  {} = {}", key, value));
        }
        lines.join("\n")
    }
}

/// Run the full form flow for `reference` with the resolved options.
///
/// Submits the reference, confirms the options dialog with the bundle built
/// from `config`, and captures the single navigation that results.
pub fn build_wiki_request(reference: &str, config: &ResolvedConfig) -> Result<BuildResult> {
    let mut form = WikiForm::with_input(reference);

    if let SubmitOutcome::Rejected(err) = form.submit() {
        return Err(Error::InvalidReferenceFormat(err));
    }

    let mut navigator = RecordingNavigator::new();
    let request = match form.confirm(&config.to_bundle(), &mut navigator) {
        ConfirmOutcome::Navigated(request) => request,
        ConfirmOutcome::Rejected(err) => return Err(Error::InvalidReferenceFormat(err)),
        ConfirmOutcome::Ignored => {
            return Err(Error::Other("form did not accept the submission".to_string()));
        }
    };

    let locator = form
        .locator()
        .cloned()
        .ok_or_else(|| Error::Other("form navigated without a locator".to_string()))?;

    Ok(BuildResult {
        locator,
        path: request.path.clone(),
        query: request.query_string(),
        target: request.target(),
        params: request.query.clone(),
        request,
    })
}

// ============================================================================
// config
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub path: Option<String>,
    pub entries: Vec<ConfigEntry>,
    pub warnings: Vec<String>,
}

impl CommandResult for ConfigShowResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match self.path {
            Some(ref path) => lines.push(format!("Config file: {}", path)),
            None => lines.push("Config file: (none)".to_string()),
        }
        for entry in &self.entries {
            match (&entry.value, &entry.source) {
                (Some(value), Some(source)) => {
                    lines.push(format!("  {} = {} [{}]", entry.key, value, source))
                }
                _ => lines.push(format!("  {} (unset)", entry.key)),
            }
        }
        for warning in &self.warnings {
            lines.push(format!("Warning: {}", warning));
        }
        lines.join("\n")
    }
}

fn entry<T: ToString>(key: &str, value: Option<&Resolved<T>>) -> ConfigEntry {
    ConfigEntry {
        key: key.to_string(),
        value: value.map(|r| r.value.to_string()),
        source: value.map(|r| r.source.to_string()),
    }
}

/// Show every resolved option and where it came from.
pub fn config_show(config: &ResolvedConfig, path: Option<&Path>) -> ConfigShowResult {
    let token = config
        .access_token
        .as_ref()
        .map(|r| Resolved::new(mask_token(&r.value), r.source.clone()));

    ConfigShowResult {
        path: path.map(|p| p.display().to_string()),
        entries: vec![
            entry("platform", Some(&config.platform)),
            entry("access-token", token.as_ref()),
            entry("provider", Some(&config.provider)),
            entry("model", Some(&config.model)),
            entry("custom-model", config.custom_model.as_ref()),
            entry("excluded-dirs", config.excluded_dirs.as_ref()),
            entry("excluded-files", config.excluded_files.as_ref()),
            entry("language", Some(&config.language)),
            entry("view-mode", Some(&config.view_mode)),
        ],
        warnings: config.warnings.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigPathResult {
    pub path: Option<String>,
    pub exists: bool,
}

impl CommandResult for ConfigPathResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        match self.path {
            Some(ref path) if self.exists => path.clone(),
            Some(ref path) => format!("{} (not created)", path),
            None => "No config directory available".to_string(),
        }
    }
}

/// Report which config file would be read.
pub fn config_path_info(path: Option<&Path>) -> ConfigPathResult {
    ConfigPathResult {
        path: path.map(|p| p.display().to_string()),
        exists: path.is_some_and(Path::exists),
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigInitResult {
    pub path: String,
    pub content: String,
}

impl CommandResult for ConfigInitResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("Wrote {}\n\n{}", self.path, self.content.trim_end())
    }
}

/// Write a starter config.kdl holding the built-in defaults.
pub fn config_init(path: Option<&Path>, force: bool) -> Result<ConfigInitResult> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()
            .ok_or_else(|| Error::Config("no config directory available".to_string()))?,
    };

    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let starter = LaunchConfig {
        platform: Some(Platform::default()),
        language: Some(crate::models::DEFAULT_LANGUAGE.to_string()),
        view_mode: Some(ViewMode::default()),
        ..Default::default()
    };
    let mut doc = starter.to_kdl();
    doc.autoformat();
    let content = doc.to_string();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &content)?;
    tracing::info!(path = %path.display(), "wrote config file");

    Ok(ConfigInitResult {
        path: path.display().to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, LoadedConfig, resolve_config_with_env};
    use tempfile::TempDir;

    fn resolved(overrides: ConfigOverrides) -> ResolvedConfig {
        resolve_config_with_env(&LoadedConfig::default(), &overrides, |_| None).unwrap()
    }

    #[test]
    fn test_resolve_reference_json() {
        let result = resolve_reference("octocat/Hello-World").unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();

        assert_eq!(json["shape"], "generic");
        assert_eq!(json["owner"], "octocat");
        assert_eq!(json["repo"], "Hello-World");
        assert_eq!(json["source_kind"], "git");
        assert_eq!(json["full_path"], "octocat/Hello-World");
    }

    #[test]
    fn test_resolve_reference_invalid() {
        let err = resolve_reference("not a path or url").unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceFormat(_)));
        assert!(err.to_string().starts_with("Invalid repository format."));
    }

    #[test]
    fn test_resolve_reference_human() {
        let human = resolve_reference("/home/user/myproj").unwrap().to_human();
        assert!(human.contains("Owner: local"));
        assert!(human.contains("Repository: myproj"));
        assert!(human.contains("Local path: /home/user/myproj"));
    }

    #[test]
    fn test_build_wiki_request() {
        let config = resolved(ConfigOverrides {
            provider: Some("p".to_string()),
            model: Some("m".to_string()),
            ..Default::default()
        });
        let result = build_wiki_request("octocat/Hello-World", &config).unwrap();

        assert_eq!(result.path, "/octocat/Hello-World");
        assert_eq!(
            result.target,
            "/octocat/Hello-World?type=github&repo_url=octocat%2FHello-World&provider=p&model=m&language=en&comprehensive=true"
        );
        assert_eq!(result.request().get("type"), Some("github"));
    }

    #[test]
    fn test_build_wiki_request_invalid() {
        let config = resolved(ConfigOverrides::new());
        let err = build_wiki_request("nope", &config).unwrap_err();
        assert!(matches!(err, Error::InvalidReferenceFormat(_)));
    }

    #[test]
    fn test_build_human_masks_token() {
        let config = resolved(ConfigOverrides::new().with_access_token("ghp_abcdefghijklmnop"));
        let result = build_wiki_request("foo/bar", &config).unwrap();

        let human = result.to_human();
        assert!(human.contains("token = ghp_...mnop"));
        assert!(!human.contains("ghp_abcdefghijklmnop"));
        assert!(result.target.contains("token=ghp_abcdefghijklmnop"));
    }

    #[test]
    fn test_config_show_masks_token_and_reports_sources() {
        let config = resolved(
            ConfigOverrides::new()
                .with_access_token("ghp_abcdefghijklmnop")
                .with_model("gpt-4o"),
        );
        let result = config_show(&config, None);
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();

        let entries = json["entries"].as_array().unwrap();
        let find = |key: &str| entries.iter().find(|e| e["key"] == key).unwrap().clone();
        assert_eq!(find("access-token")["value"], "ghp_...mnop");
        assert_eq!(find("model")["source"], "cli");
        assert_eq!(find("language")["source"], "default");
        assert!(find("custom-model")["value"].is_null());
    }

    #[test]
    fn test_config_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.kdl");

        let result = config_init(Some(&path), false).unwrap();
        assert!(path.exists());
        assert!(result.content.contains("platform"));
        assert!(result.content.contains("github"));

        let loaded = crate::config::load_config(Some(&path)).unwrap();
        assert_eq!(loaded.config.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.kdl");
        fs::write(&path, "model \"keep\"\n").unwrap();

        let err = config_init(Some(&path), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(config_init(Some(&path), true).is_ok());
    }
}
