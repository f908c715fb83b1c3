//! # findreplace Traversal Request
//!
//! File: cli/src/core/request.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A `TraversalRequest` is the immutable, fully validated input of one run.
//! It is compiled from resolved `RunSettings` (see `core::config`): the find
//! pattern and every exclusion pattern are compiled to `regex::Regex`, and the
//! encoding label is resolved to an `encoding_rs::Encoding`. Once built, the
//! request is only ever borrowed.
//!
//! The find pattern, the replacement template and the replace-all flag travel
//! together as a `Substitution`, because names and contents are transformed
//! by exactly the same rule.
//!
use crate::core::config::RunSettings;
use crate::core::error::{FindReplaceError, Result};
use encoding_rs::Encoding;
use regex::Regex;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::debug;

/// A compiled find pattern plus its replacement template.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub find: Regex,
    /// Replacement template; `$1` / `${name}` refer to capture groups.
    pub replacement: String,
    pub replace_all: bool,
}

impl Substitution {
    /// Applies the substitution to `text`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched, so callers can compare
    /// the result with the input without allocating.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.replace_all {
            self.find.replace_all(text, self.replacement.as_str())
        } else {
            self.find.replace(text, self.replacement.as_str())
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find.is_match(text)
    }
}

/// Immutable configuration for a single traversal.
#[derive(Debug, Clone)]
pub struct TraversalRequest {
    pub base_dir: PathBuf,
    pub recursive: bool,
    pub substitution: Substitution,
    /// Literal file-name suffixes. Empty means every file qualifies.
    pub file_masks: Vec<String>,
    /// Unanchored patterns; a match anywhere in a name excludes the entry.
    pub exclusions: Vec<Regex>,
    pub process_file_contents: bool,
    pub process_filenames: bool,
    pub process_directory_names: bool,
    pub encoding: &'static Encoding,
}

impl TraversalRequest {
    /// Compiles resolved settings into a request.
    ///
    /// # Errors
    ///
    /// Returns `FindReplaceError::InvalidPattern` for the first pattern that
    /// does not compile and `FindReplaceError::UnknownEncoding` for an
    /// unrecognised charset label.
    pub fn compile(settings: &RunSettings) -> Result<Self> {
        let find = compile_pattern(&settings.find)?;
        let exclusions = settings
            .exclusions
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<Result<Vec<_>>>()?;
        let encoding = resolve_encoding(&settings.encoding)?;

        debug!(
            "Compiled request: find={:?}, {} exclusion(s), {} mask(s), encoding={}",
            settings.find,
            exclusions.len(),
            settings.file_masks.len(),
            encoding.name()
        );

        Ok(Self {
            base_dir: settings.base_dir.clone(),
            recursive: settings.recursive,
            substitution: Substitution {
                find,
                replacement: settings.replacement.clone(),
                replace_all: settings.replace_all,
            },
            file_masks: settings.file_masks.clone(),
            exclusions,
            process_file_contents: settings.process_file_contents,
            process_filenames: settings.process_filenames,
            process_directory_names: settings.process_directory_names,
            encoding,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| {
        FindReplaceError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
        .into()
    })
}

/// Resolves a WHATWG charset label such as `UTF-8`, `latin1` or `Shift_JIS`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| FindReplaceError::UnknownEncoding(label.to_string()).into())
}
