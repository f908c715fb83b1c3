//! # findreplace Run Reporter
//!
//! File: cli/src/core/reporter.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The traversal engine never logs renames or rewrites through ambient global
//! state. Instead it receives a `Reporter` and calls it once per completed
//! filesystem change. The command layer passes a `TracingReporter`, which turns
//! each event into a `tracing` line; tests pass a recording reporter and assert
//! on the exact sequence of events.
//!
use std::path::Path;
use tracing::{debug, info};

/// Receives one notification per completed filesystem change during a run.
pub trait Reporter {
    /// Called after `old_name` has been moved to `new_name` within the same parent.
    fn renamed(&mut self, old_name: &str, new_name: &str);

    /// Called after the contents of `path` have been replaced.
    fn rewritten(&mut self, path: &Path);
}

/// Reporter backed by the `tracing` subscriber configured in `main`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn renamed(&mut self, old_name: &str, new_name: &str) {
        info!("Renaming `{}` to `{}`", old_name, new_name);
    }

    fn rewritten(&mut self, path: &Path) {
        debug!("Rewrote contents of {}", path.display());
    }
}

/// Test double that keeps every event in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub renames: Vec<(String, String)>,
    pub rewrites: Vec<std::path::PathBuf>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn renamed(&mut self, old_name: &str, new_name: &str) {
        self.renames.push((old_name.to_string(), new_name.to_string()));
    }

    fn rewritten(&mut self, path: &Path) {
        self.rewrites.push(path.to_path_buf());
    }
}
