//! Repository reference resolution.
//!
//! A raw reference is classified into exactly one [`ReferenceShape`], tried in
//! a fixed priority order (first match wins, nothing is retried):
//!
//! 1. **Windows** absolute path, e.g. `C:\code\project`
//! 2. **Unix** absolute path, e.g. `/home/user/project`
//! 3. **Generic** `[scheme://][host/]owner/repo[.git][/]`, e.g.
//!    `https://gitlab.com/group/project.git` or `octocat/Hello-World`
//! 4. **Unrecognized** - anything else
//!
//! Filesystem forms are tested first because a bare path can also satisfy the
//! generic pattern. The generic form is host-agnostic; which host family a
//! remote reference belongs to is decided later by the selected platform.

use crate::models::{DEFAULT_LOCAL_REPO, RepositoryLocator};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// User-facing message for any reference that fails to resolve.
///
/// Deliberately fixed and not routed through message lookup.
pub const INVALID_REFERENCE_FORMAT: &str = r#"Invalid repository format. Use "owner/repo", GitHub/GitLab/BitBucket URL, or a local folder path like "/path/to/folder" or "C:\path\to\folder"."#;

static WINDOWS_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[a-zA-Z]:\\(?:[^\\/:*?"<>|\r\n]+\\)*[^\\/:*?"<>|\r\n]*$"#)
        .expect("windows path pattern is valid")
});

static GENERIC_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?[^/]+(?:/[^/]+)+/?$").expect("remote pattern is valid")
});

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The input matches none of the accepted shapes.
    #[error("Unsupported repository reference format: {0}")]
    UnsupportedFormat(String),

    /// A remote reference has fewer than two path segments after the host.
    #[error("Remote reference needs an owner and a repository: {0}")]
    TooFewSegments(String),

    /// Owner or repository is blank after normalization.
    #[error("Owner or repository is empty: {0}")]
    EmptyOwnerOrRepo(String),
}

impl ResolveError {
    /// The fixed message shown to the user, whatever the cause.
    pub fn user_message(&self) -> &'static str {
        INVALID_REFERENCE_FORMAT
    }
}

/// Classification of a trimmed reference, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceShape {
    Windows,
    Unix,
    Generic,
    Unrecognized,
}

impl ReferenceShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceShape::Windows => "windows",
            ReferenceShape::Unix => "unix",
            ReferenceShape::Generic => "generic",
            ReferenceShape::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for ReferenceShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a reference without extracting anything from it.
pub fn classify(input: &str) -> ReferenceShape {
    let input = input.trim();
    if WINDOWS_PATH.is_match(input) {
        ReferenceShape::Windows
    } else if input.starts_with('/') {
        ReferenceShape::Unix
    } else if GENERIC_REMOTE.is_match(input) {
        ReferenceShape::Generic
    } else {
        ReferenceShape::Unrecognized
    }
}

/// Resolve a raw reference into a [`RepositoryLocator`].
///
/// Never panics and never returns a partially populated locator; every
/// input maps to either a complete locator or a [`ResolveError`].
pub fn resolve(input: &str) -> Result<RepositoryLocator, ResolveError> {
    let trimmed = input.trim();

    match classify(trimmed) {
        ReferenceShape::Windows => {
            let repo = last_segment(trimmed.rsplit('\\'));
            Ok(RepositoryLocator::local(repo, trimmed.to_string(), input))
        }
        ReferenceShape::Unix => {
            let repo = last_segment(trimmed.split('/').filter(|s| !s.is_empty()).rev());
            Ok(RepositoryLocator::local(repo, trimmed.to_string(), input))
        }
        ReferenceShape::Generic => resolve_remote(trimmed, input),
        ReferenceShape::Unrecognized => {
            tracing::debug!(input = trimmed, "unsupported repository reference format");
            Err(ResolveError::UnsupportedFormat(trimmed.to_string()))
        }
    }
}

/// Repository name from a reversed segment iterator: the final segment,
/// trimmed and without `.git`, or the local-repo default when that is empty.
fn last_segment<'a>(mut segments: impl Iterator<Item = &'a str>) -> String {
    let segment = segments.next().unwrap_or_default().trim();
    let name = segment.strip_suffix(".git").unwrap_or(segment).trim();
    if name.is_empty() {
        DEFAULT_LOCAL_REPO.to_string()
    } else {
        name.to_string()
    }
}

fn resolve_remote(trimmed: &str, raw: &str) -> Result<RepositoryLocator, ResolveError> {
    let full_path = remote_path(trimmed)
        .ok_or_else(|| ResolveError::TooFewSegments(trimmed.to_string()))?;

    let segments: Vec<&str> = full_path.split('/').collect();
    let [.., owner, repo] = segments.as_slice() else {
        return Err(ResolveError::TooFewSegments(trimmed.to_string()));
    };

    let owner = owner.trim();
    let repo = repo.trim();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() {
        return Err(ResolveError::EmptyOwnerOrRepo(trimmed.to_string()));
    }

    Ok(RepositoryLocator::remote(
        owner.to_string(),
        repo.to_string(),
        full_path.clone(),
        raw,
    ))
}

/// Everything after the host, with a trailing slash and `.git` removed.
///
/// With a scheme the first segment is always the host. Without one it is
/// only treated as a host when it looks like one, so the bare `owner/repo`
/// shorthand keeps both segments.
fn remote_path(input: &str) -> Option<String> {
    let (rest, has_scheme) = strip_scheme(input);
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    let path = match rest.split_once('/') {
        Some((head, tail)) if has_scheme || looks_like_host(head) => tail,
        Some(_) => rest,
        None => return None,
    };
    let path = path.strip_suffix(".git").unwrap_or(path);
    Some(path.to_string())
}

fn strip_scheme(input: &str) -> (&str, bool) {
    for scheme in SCHEMES {
        if let Some(prefix) = input.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return (&input[scheme.len()..], true);
            }
        }
    }
    (input, false)
}

fn looks_like_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment.eq_ignore_ascii_case("localhost")
}
