//! Common test utilities for wikilaunch integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's `~/.config/wikilaunch/config.kdl` or an ambient access token.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with its own config directory.
///
/// The `wkl()` method returns a `Command` that points `WKL_CONFIG` into the
/// temp directory and clears `WKL_ACCESS_TOKEN`, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment whose config.kdl holds `content`.
    pub fn with_config(content: &str) -> Self {
        let env = Self::new();
        env.write_config(content);
        env
    }

    /// Get a Command for the wkl binary with an isolated config file.
    pub fn wkl(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_wkl"));
        cmd.env("WKL_CONFIG", self.config_path());
        cmd.env_remove("WKL_ACCESS_TOKEN");
        cmd.env_remove("WKL_LOG");
        cmd
    }

    /// Path of the config file (may not exist yet).
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn dir(&self) -> &Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("stdout is valid JSON")
}
