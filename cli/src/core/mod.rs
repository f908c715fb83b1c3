//! # findreplace Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that the
//! traversal engine and the command handlers build on.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading (user + project TOML), layering and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `reporter`: The capability through which renames and rewrites are reported
//! - `request`: The compiled, immutable `TraversalRequest` for one run
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{FindReplaceError, Result}; // For error handling
//! use crate::core::request::TraversalRequest; // For building a run
//! ```
//!
pub mod config;
pub mod error;
pub mod reporter;
pub mod request;
