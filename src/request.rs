//! Navigation request construction.
//!
//! Combines a resolved [`RepositoryLocator`] with a [`ConfigurationBundle`]
//! into the path and query handed to the wiki-generation route. Parameters
//! are kept in insertion order so identical inputs always serialize to
//! byte-identical query strings.

use crate::models::{ConfigurationBundle, RepositoryLocator};
use serde::Serialize;
use url::form_urlencoded;

pub const PARAM_TOKEN: &str = "token";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_LOCAL_PATH: &str = "local_path";
pub const PARAM_REPO_URL: &str = "repo_url";
pub const PARAM_PROVIDER: &str = "provider";
pub const PARAM_MODEL: &str = "model";
pub const PARAM_CUSTOM_MODEL: &str = "custom_model";
pub const PARAM_EXCLUDED_DIRS: &str = "excluded_dirs";
pub const PARAM_EXCLUDED_FILES: &str = "excluded_files";
pub const PARAM_LANGUAGE: &str = "language";
pub const PARAM_COMPREHENSIVE: &str = "comprehensive";

/// `type` value for filesystem sources.
const LOCAL_TYPE: &str = "local";

/// A built navigation target: `/{owner}/{repo}` plus ordered parameters.
///
/// Parameter values are stored unencoded; [`NavigationRequest::query_string`]
/// percent-encodes each one exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl NavigationRequest {
    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Encoded query, `?`-prefixed, or empty when there are no parameters.
    pub fn query_string(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            serializer.append_pair(key, value);
        }
        format!("?{}", serializer.finish())
    }

    /// Full navigation target: path followed by the query string.
    pub fn target(&self) -> String {
        format!("{}{}", self.path, self.query_string())
    }
}

impl std::fmt::Display for NavigationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.target())
    }
}

/// Assembles a [`NavigationRequest`] from a locator and configuration.
pub struct RequestBuilder<'a> {
    locator: &'a RepositoryLocator,
    config: &'a ConfigurationBundle,
    query: Vec<(String, String)>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(locator: &'a RepositoryLocator, config: &'a ConfigurationBundle) -> Self {
        Self {
            locator,
            config,
            query: Vec::new(),
        }
    }

    pub fn build(mut self) -> NavigationRequest {
        let locator = self.locator;
        let config = self.config;

        self.push_non_empty(PARAM_TOKEN, config.access_token.as_deref());

        let source_type = if locator.is_local() {
            LOCAL_TYPE
        } else {
            config.platform.as_str()
        };
        self.push(PARAM_TYPE, source_type);

        // Exactly one of local_path / repo_url.
        match locator.local_path() {
            Some(path) => self.push(PARAM_LOCAL_PATH, path),
            None => self.push(PARAM_REPO_URL, locator.reference()),
        }

        self.push(PARAM_PROVIDER, &config.provider);
        self.push(PARAM_MODEL, &config.model);
        self.push_non_empty(PARAM_CUSTOM_MODEL, config.effective_custom_model());
        self.push_non_empty(PARAM_EXCLUDED_DIRS, config.excluded_dirs.as_deref());
        self.push_non_empty(PARAM_EXCLUDED_FILES, config.excluded_files.as_deref());
        self.push(PARAM_LANGUAGE, &config.language);

        let comprehensive = if config.view_mode.is_comprehensive() {
            "true"
        } else {
            "false"
        };
        self.push(PARAM_COMPREHENSIVE, comprehensive);

        NavigationRequest {
            path: format!("/{}/{}", locator.owner(), locator.repo()),
            query: self.query,
        }
    }

    fn push(&mut self, key: &str, value: &str) {
        self.query.push((key.to_string(), value.to_string()));
    }

    fn push_non_empty(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }
}

/// Shorthand for `RequestBuilder::new(locator, config).build()`.
pub fn build_request(
    locator: &RepositoryLocator,
    config: &ConfigurationBundle,
) -> NavigationRequest {
    RequestBuilder::new(locator, config).build()
}
