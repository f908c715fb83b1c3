//! # findreplace Filesystem Operations (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module groups everything that touches the filesystem during a run.
//!
//! ## Architecture
//!
//! - **`entry`**: `FileSystemEntry`, a path plus its cached kind.
//! - **`filter`**: Exclusion patterns and file-mask checks.
//! - **`rename`**: Regex rename of an entry's base name, refusing to overwrite.
//! - **`rewrite`**: Content replacement through a sibling temporary file.
//! - **`walk`**: The traversal engine that drives the other three over a work queue.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::walk;
//! use crate::core::reporter::TracingReporter;
//!
//! let stats = walk::run(&request, &mut TracingReporter)?;
//! ```
//!

/// `FileSystemEntry` and `EntryKind`.
pub mod entry;
/// Exclusion and inclusion checks on entry names.
pub mod filter;
/// Renaming of files and directories.
pub mod rename;
/// Atomic replacement of file contents.
pub mod rewrite;
/// The work-queue traversal engine.
pub mod walk;
