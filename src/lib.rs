//! wikilaunch - turn a repository reference into a wiki-generation request.
//!
//! This library provides the core functionality for the `wkl` CLI tool:
//! resolving loosely formatted repository references, building the
//! navigation request for the wiki route, and guarding against duplicate
//! submission.

pub mod cli;
pub mod commands;
pub mod config;
pub mod messages;
pub mod models;
pub mod request;
pub mod resolver;
pub mod session;

pub use models::{ConfigurationBundle, Platform, RepositoryLocator, SourceKind, ViewMode};
pub use request::{NavigationRequest, RequestBuilder, build_request};
pub use resolver::{INVALID_REFERENCE_FORMAT, ReferenceShape, ResolveError, classify, resolve};
pub use session::{ConfirmOutcome, FormState, Navigator, SubmitOutcome, WikiForm};

/// Library-level error type for wikilaunch operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{}", resolver::INVALID_REFERENCE_FORMAT)]
    InvalidReferenceFormat(#[from] ResolveError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for wikilaunch operations.
pub type Result<T> = std::result::Result<T, Error>;
