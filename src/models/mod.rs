//! Core data models for wikilaunch.
//!
//! This module defines the types that flow between the resolver, the
//! request builder and the submission state machine:
//! - `RepositoryLocator` - canonical identity of a resolved reference
//! - `ConfigurationBundle` - user-chosen generation options
//! - `Platform`, `SourceKind`, `ViewMode` - closed vocabularies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner used for every locator that points at a filesystem path.
pub const LOCAL_OWNER: &str = "local";

/// Repository name used when a filesystem path has no usable final segment.
pub const DEFAULT_LOCAL_REPO: &str = "local-repo";

/// Where a resolved reference lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A remote repository on any git host.
    Git,
    /// A directory on the local filesystem.
    Local,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Git => "git",
            SourceKind::Local => "local",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote host family selected in the options dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Github,
    Gitlab,
    Bitbucket,
}

impl Platform {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Some(Platform::Github),
            "gitlab" => Some(Platform::Gitlab),
            "bitbucket" => Some(Platform::Bitbucket),
            _ => None,
        }
    }

    /// Wire name used in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Gitlab => "gitlab",
            Platform::Bitbucket => "bitbucket",
        }
    }

    pub fn all() -> &'static [Platform] {
        &[Platform::Github, Platform::Gitlab, Platform::Bitbucket]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Platform::parse(s).ok_or_else(|| format!("Unknown platform: {}", s))
    }
}

/// Wiki generation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Full wiki with every section (default)
    #[default]
    Comprehensive,
    /// Shorter wiki with fewer pages
    Concise,
}

impl ViewMode {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "comprehensive" => Some(ViewMode::Comprehensive),
            "concise" => Some(ViewMode::Concise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Comprehensive => "comprehensive",
            ViewMode::Concise => "concise",
        }
    }

    pub fn is_comprehensive(&self) -> bool {
        matches!(self, ViewMode::Comprehensive)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical identity of a repository reference.
///
/// Only the resolver constructs locators, so every value observed outside
/// this crate satisfies the invariants: `owner` and `repo` are non-empty,
/// and exactly one of `full_path` / `local_path` is set, matching
/// `source_kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLocator {
    owner: String,
    repo: String,
    source_kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_path: Option<String>,
    /// Raw input exactly as the user typed it.
    reference: String,
}

impl RepositoryLocator {
    pub(crate) fn remote(
        owner: String,
        repo: String,
        full_path: String,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            repo,
            source_kind: SourceKind::Git,
            full_path: Some(full_path),
            local_path: None,
            reference: reference.into(),
        }
    }

    pub(crate) fn local(repo: String, local_path: String, reference: impl Into<String>) -> Self {
        Self {
            owner: LOCAL_OWNER.to_string(),
            repo,
            source_kind: SourceKind::Local,
            full_path: None,
            local_path: Some(local_path),
            reference: reference.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn is_local(&self) -> bool {
        self.source_kind == SourceKind::Local
    }

    /// Owner/repo-bearing path of a remote reference, `.git` stripped.
    pub fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    /// Filesystem path of a local reference.
    pub fn local_path(&self) -> Option<&str> {
        self.local_path.as_deref()
    }

    /// The untrimmed input this locator was resolved from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// `owner/repo`, the slug used in the navigation path.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.owner, self.repo, self.source_kind)
    }
}

/// Generation options collected by the options dialog.
///
/// The core only reads this; nothing here is validated beyond what the
/// request builder's omit-if-empty rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBundle {
    /// Ignored for local sources.
    pub platform: Platform,
    pub access_token: Option<String>,
    pub provider: String,
    pub model: String,
    pub is_custom_model: bool,
    /// Only meaningful when `is_custom_model` is set.
    pub custom_model: Option<String>,
    /// Delimiter-separated, passed through verbatim.
    pub excluded_dirs: Option<String>,
    /// Delimiter-separated, passed through verbatim.
    pub excluded_files: Option<String>,
    pub language: String,
    pub view_mode: ViewMode,
}

/// Language used when nothing else selects one.
pub const DEFAULT_LANGUAGE: &str = "en";

impl Default for ConfigurationBundle {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            access_token: None,
            provider: String::new(),
            model: String::new(),
            is_custom_model: false,
            custom_model: None,
            excluded_dirs: None,
            excluded_files: None,
            language: DEFAULT_LANGUAGE.to_string(),
            view_mode: ViewMode::default(),
        }
    }
}

impl ConfigurationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Select a custom model id; sets `is_custom_model`.
    pub fn with_custom_model(mut self, model: impl Into<String>) -> Self {
        self.is_custom_model = true;
        self.custom_model = Some(model.into());
        self
    }

    pub fn with_excluded_dirs(mut self, dirs: impl Into<String>) -> Self {
        self.excluded_dirs = Some(dirs.into());
        self
    }

    pub fn with_excluded_files(mut self, files: impl Into<String>) -> Self {
        self.excluded_files = Some(files.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// The custom model id, if one is selected and non-empty.
    pub fn effective_custom_model(&self) -> Option<&str> {
        if !self.is_custom_model {
            return None;
        }
        self.custom_model.as_deref().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("github"), Some(Platform::Github));
        assert_eq!(Platform::parse("GitLab"), Some(Platform::Gitlab));
        assert_eq!(Platform::parse(" bitbucket "), Some(Platform::Bitbucket));
        assert_eq!(Platform::parse("gitea"), None);
    }

    #[test]
    fn test_platform_from_str_error() {
        let err = "sourcehut".parse::<Platform>().unwrap_err();
        assert!(err.contains("Unknown platform"));
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Bitbucket).unwrap();
        assert_eq!(json, "\"bitbucket\"");
    }

    #[test]
    fn test_view_mode() {
        assert!(ViewMode::default().is_comprehensive());
        assert!(!ViewMode::Concise.is_comprehensive());
        assert_eq!(ViewMode::parse("CONCISE"), Some(ViewMode::Concise));
        assert_eq!(ViewMode::parse("brief"), None);
    }

    #[test]
    fn test_remote_locator_fields() {
        let locator = RepositoryLocator::remote(
            "foo".to_string(),
            "bar".to_string(),
            "foo/bar".to_string(),
            "https://github.com/foo/bar.git",
        );
        assert_eq!(locator.source_kind(), SourceKind::Git);
        assert_eq!(locator.full_path(), Some("foo/bar"));
        assert_eq!(locator.local_path(), None);
        assert_eq!(locator.slug(), "foo/bar");
    }

    #[test]
    fn test_local_locator_fields() {
        let locator = RepositoryLocator::local(
            "myproj".to_string(),
            "/home/user/myproj".to_string(),
            "/home/user/myproj",
        );
        assert!(locator.is_local());
        assert_eq!(locator.owner(), LOCAL_OWNER);
        assert_eq!(locator.full_path(), None);
        assert_eq!(locator.local_path(), Some("/home/user/myproj"));
    }

    #[test]
    fn test_locator_json_omits_absent_paths() {
        let locator = RepositoryLocator::local(
            "myproj".to_string(),
            "/home/user/myproj".to_string(),
            "/home/user/myproj",
        );
        let json = serde_json::to_value(&locator).unwrap();
        assert_eq!(json["source_kind"], "local");
        assert!(json.get("full_path").is_none());
    }

    #[test]
    fn test_bundle_defaults() {
        let bundle = ConfigurationBundle::default();
        assert_eq!(bundle.platform, Platform::Github);
        assert_eq!(bundle.language, "en");
        assert!(bundle.view_mode.is_comprehensive());
        assert!(!bundle.is_custom_model);
    }

    #[test]
    fn test_effective_custom_model() {
        let bundle = ConfigurationBundle::new().with_custom_model("ft-1");
        assert_eq!(bundle.effective_custom_model(), Some("ft-1"));

        let mut unchecked = bundle.clone();
        unchecked.is_custom_model = false;
        assert_eq!(unchecked.effective_custom_model(), None);

        let empty = ConfigurationBundle::new().with_custom_model("");
        assert_eq!(empty.effective_custom_model(), None);
    }
}
