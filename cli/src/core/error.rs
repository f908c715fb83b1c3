//! # findreplace Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout findreplace. Every
//! failure a run can hit maps onto one variant, and every variant is fatal:
//! nothing is retried and nothing is downgraded to a warning.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `FindReplaceError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration and pattern compilation errors (raised before any file is touched)
//! - Directory listing errors
//! - Rename collisions and failed moves
//! - Each step of the content rewrite (read, temp write, permission copy, delete, finalize)
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! return Err(FindReplaceError::RenameCollision { from, to })?;
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if e.downcast_ref::<FindReplaceError>().map_or(false, |fe| {
//!         matches!(fe, FindReplaceError::PermissionPreservation { .. })
//!     }) => { /* original is still intact */ }
//!     other => other?,
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the findreplace application.
#[derive(Error, Debug)]
pub enum FindReplaceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Unable to list file(s) in '{}': {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot rename '{}' to '{}': destination already exists", from.display(), to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    #[error("Cannot rename '{}' to '{name}': not a plain file name", from.display())]
    InvalidName { from: PathBuf, name: String },

    #[error("Failed to rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file at '{}': {source}", path.display())]
    ContentRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write replacement contents for '{}': {source}", path.display())]
    ContentWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to apply access bits at '{}': {source}", path.display())]
    PermissionPreservation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete file at '{}' (replacement left at '{}'): {source}", path.display(), temp.display())]
    DeleteOriginal {
        path: PathBuf,
        temp: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename temp file at '{}' to '{}': {source}", temp.display(), target.display())]
    FinalizeRename {
        temp: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
