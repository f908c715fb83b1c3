//! # findreplace Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the findreplace CLI. Each module
//! defines a `clap` arguments struct and a `handle_*` function that `main.rs`
//! dispatches to.
//!
//! ## Commands
//!
//! - `run`: Apply a find & replace to a directory tree
//! - `init`: Write a starter `.findreplace.toml`
//!

/// Writes a starter project configuration file.
pub mod init;
/// Runs the find & replace traversal.
pub mod run;
