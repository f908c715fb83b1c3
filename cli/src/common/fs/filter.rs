//! # findreplace Entry Filters
//!
//! File: cli/src/common/fs/filter.rs
//! Author: Christi Mahu
//!
//! Exclusion patterns are searched anywhere in a name (`\.bak$` must anchor
//! itself), while file masks are plain suffix comparisons. Callers check
//! exclusion first; an excluded entry is never renamed or rewritten.
//!
use regex::Regex;

/// `true` if any exclusion pattern matches somewhere in `name`.
pub fn is_excluded(name: &str, exclusions: &[Regex]) -> bool {
    exclusions.iter().any(|pattern| pattern.is_match(name))
}

/// `true` if no masks are configured or `name` ends with one of them.
pub fn should_process(name: &str, file_masks: &[String]) -> bool {
    file_masks.is_empty() || file_masks.iter().any(|mask| name.ends_with(mask.as_str()))
}
