//! KDL schema for config.kdl.
//!
//! This module provides:
//! - `LaunchConfig`, the Rust view of config.kdl
//! - Conversion to/from KDL documents
//! - Validation of enumerated values and language codes
//! - Detection of access tokens placed in the config file by mistake

use crate::models::{Platform, ViewMode};
use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Language codes the wiki generator can write in.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "ja", "zh", "zh-tw", "es", "kr", "vi", "pt-br", "fr", "ru",
];

/// Config nodes that look like credentials. Tokens are never read from
/// config.kdl.
const TOKEN_NODES: &[&str] = &["access-token", "token"];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Generation defaults stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// platform "gitlab"
/// provider "openai"
/// model "gpt-4o"
/// custom-model "my-finetune"
/// excluded-dirs "node_modules,dist"
/// excluded-files "*.lock"
/// language "ja"
/// view-mode "concise"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub platform: Option<Platform>,
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Selecting a custom model implies `is_custom_model`.
    pub custom_model: Option<String>,
    pub excluded_dirs: Option<String>,
    pub excluded_files: Option<String>,
    pub language: Option<String>,
    pub view_mode: Option<ViewMode>,
}

impl LaunchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref language) = self.language {
            if !is_supported_language(language) {
                return Err(format!(
                    "language must be one of {}, got {}",
                    SUPPORTED_LANGUAGES.join(", "),
                    language
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes are ignored; unknown `platform` or `view-mode` values
    /// are errors.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self> {
        let mut config = Self::new();

        if let Some(s) = string_node(doc, "platform") {
            config.platform = Some(
                Platform::parse(&s)
                    .ok_or_else(|| Error::Config(format!("unknown platform \"{}\"", s)))?,
            );
        }

        if let Some(s) = string_node(doc, "view-mode") {
            config.view_mode = Some(
                ViewMode::parse(&s)
                    .ok_or_else(|| Error::Config(format!("unknown view-mode \"{}\"", s)))?,
            );
        }

        config.provider = string_node(doc, "provider");
        config.model = string_node(doc, "model");
        config.custom_model = string_node(doc, "custom-model");
        config.excluded_dirs = string_node(doc, "excluded-dirs");
        config.excluded_files = string_node(doc, "excluded-files");
        config.language = string_node(doc, "language");

        Ok(config)
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        let platform = self.platform.map(|p| p.as_str().to_string());
        let view_mode = self.view_mode.map(|m| m.as_str().to_string());
        let nodes = [
            ("platform", &platform),
            ("provider", &self.provider),
            ("model", &self.model),
            ("custom-model", &self.custom_model),
            ("excluded-dirs", &self.excluded_dirs),
            ("excluded-files", &self.excluded_files),
            ("language", &self.language),
            ("view-mode", &view_mode),
        ];

        for (name, value) in nodes {
            if let Some(value) = value {
                let mut node = KdlNode::new(name);
                node.push(KdlEntry::new(KdlValue::String(value.clone())));
                doc.nodes_mut().push(node);
            }
        }

        doc
    }
}

fn string_node(doc: &KdlDocument, name: &str) -> Option<String> {
    let node = doc.get(name)?;
    let entry = node.entries().first()?;
    entry.value().as_string().map(|s| s.to_string())
}

/// Check if a KDL document carries an access token.
pub fn has_token_in_config(doc: &KdlDocument) -> bool {
    TOKEN_NODES.iter().any(|name| doc.get(name).is_some())
}
