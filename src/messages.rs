//! Display-string lookup.
//!
//! The core never owns translations; it receives a [`MessageLookup`] and asks
//! it for strings by dotted key. A miss always yields the key itself.
//!
//! [`MessageCatalog`] is the stock implementation: a nested JSON object
//! walked one key segment at a time, with `{name}` placeholders substituted
//! from the supplied parameters.

use crate::{Error, Result};
use serde_json::Value;

/// Resolves a dotted key (plus substitution parameters) to a display string.
pub trait MessageLookup {
    fn message(&self, key: &str, params: &[(&str, &str)]) -> String;
}

impl<F> MessageLookup for F
where
    F: Fn(&str, &[(&str, &str)]) -> String,
{
    fn message(&self, key: &str, params: &[(&str, &str)]) -> String {
        self(key, params)
    }
}

/// Nested message catalog backed by a JSON object.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    root: Value,
}

impl MessageCatalog {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        if !root.is_object() {
            return Err(Error::InvalidInput(
                "message catalog must be a JSON object".to_string(),
            ));
        }
        Ok(Self::new(root))
    }

    /// Built-in English strings for every key this crate asks for.
    pub fn english() -> Self {
        Self::new(serde_json::json!({
            "common": {
                "appName": "wikilaunch",
                "generateWiki": "Generate Wiki",
                "processing": "Processing...",
            },
            "form": {
                "repoPlaceholder": "owner/repo, GitHub/GitLab/BitBucket URL, or local folder path",
            },
            "output": {
                "owner": "Owner",
                "repository": "Repository",
                "source": "Source",
                "fullPath": "Full path",
                "localPath": "Local path",
                "target": "Target",
                "parameters": "Parameters",
                "navigatingTo": "Navigating to {target}",
            },
        }))
    }
}

impl MessageLookup for MessageCatalog {
    fn message(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut value = &self.root;
        for segment in key.split('.') {
            match value.get(segment) {
                Some(next) => value = next,
                None => return key.to_string(),
            }
        }

        match value.as_str() {
            Some(template) => params.iter().fold(template.to_string(), |acc, (name, v)| {
                acc.replacen(&format!("{{{}}}", name), v, 1)
            }),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_lookup() {
        let catalog = MessageCatalog::english();
        assert_eq!(catalog.message("common.processing", &[]), "Processing...");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let catalog = MessageCatalog::english();
        assert_eq!(catalog.message("common.nope", &[]), "common.nope");
        assert_eq!(catalog.message("x.y.z", &[]), "x.y.z");
    }

    #[test]
    fn test_non_string_leaf_falls_back_to_key() {
        let catalog = MessageCatalog::english();
        assert_eq!(catalog.message("common", &[]), "common");
    }

    #[test]
    fn test_parameter_substitution() {
        let catalog = MessageCatalog::english();
        assert_eq!(
            catalog.message("output.navigatingTo", &[("target", "/a/b")]),
            "Navigating to /a/b"
        );
    }

    #[test]
    fn test_substitution_replaces_first_occurrence_only() {
        let catalog = MessageCatalog::from_json(r#"{"t": "{x} and {x}"}"#).unwrap();
        assert_eq!(catalog.message("t", &[("x", "1")]), "1 and {x}");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(MessageCatalog::from_json("[1, 2]").is_err());
        assert!(MessageCatalog::from_json("not json").is_err());
    }

    #[test]
    fn test_function_lookup() {
        fn upper(key: &str, _: &[(&str, &str)]) -> String {
            key.to_uppercase()
        }
        assert_eq!(upper.message("common.processing", &[]), "COMMON.PROCESSING");
    }
}
