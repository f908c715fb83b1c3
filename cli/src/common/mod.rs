//! # findreplace Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers. Command-specific logic
//! lives in `commands::`, infrastructure (config, errors, reporting) in `core::`.
//!
//! - **`fs`**: The traversal engine and the filesystem operations it performs.
//!
pub mod fs;
