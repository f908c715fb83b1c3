//! # findreplace CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and runs the compiled `findreplace` binary through
//! `assert_cmd`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// # Get findreplace Command (`findreplace_cmd`)
///
/// Builds an `assert_cmd::Command` for the compiled `findreplace` binary with
/// the environment isolated from the developer's machine: no user config
/// directory, no `RUST_LOG`, no colours.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn findreplace_cmd() -> Command {
    let mut cmd = Command::cargo_bin("findreplace").expect("Failed to find findreplace binary for testing");
    cmd.env("HOME", "/nonexistent-findreplace-home")
        .env("XDG_CONFIG_HOME", "/nonexistent-findreplace-home/.config")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("FINDREPLACE_CONFIG")
        .env_remove("FINDREPLACE_ENCODING");
    cmd
}

/// Same as `findreplace_cmd`, running with `dir` as the working directory.
pub fn findreplace_in(dir: &Path) -> Command {
    let mut cmd = findreplace_cmd();
    cmd.current_dir(dir);
    cmd
}

/// Creates a temporary tree. Paths ending in `/` become directories,
/// everything else a file with the given content.
pub fn tree(layout: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (path, content) in layout {
        let full = dir.path().join(path);
        if path.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, content).unwrap();
        }
    }
    dir
}

pub fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
}
