//! # findreplace Renamer
//!
//! File: cli/src/common/fs/rename.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Applies the run's `Substitution` to an entry's base name (never to its
//! parent path) and moves the entry to the new name inside the same parent.
//!
//! - An unchanged name performs no filesystem operation.
//! - A new name that is empty, `.`, `..` or contains a path separator is a
//!   `FindReplaceError::InvalidName`; entries never leave their parent.
//! - An existing destination is a `FindReplaceError::RenameCollision`; the
//!   existing entry is never overwritten.
//! - Each completed move is reported through the `Reporter`.
//!
//! Names that are not valid Unicode cannot be matched against the find
//! pattern without loss, so they are left alone.
//!
use crate::common::fs::entry::FileSystemEntry;
use crate::core::error::{FindReplaceError, Result};
use crate::core::reporter::Reporter;
use crate::core::request::Substitution;
use std::fs;
use tracing::{debug, trace};

/// Result of a rename attempt. Both variants carry the entry downstream code must use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Unchanged(FileSystemEntry),
    Renamed(FileSystemEntry),
}

impl RenameOutcome {
    pub fn is_renamed(&self) -> bool {
        matches!(self, RenameOutcome::Renamed(_))
    }

    pub fn into_entry(self) -> FileSystemEntry {
        match self {
            RenameOutcome::Unchanged(entry) | RenameOutcome::Renamed(entry) => entry,
        }
    }
}

/// Renames `entry` according to `substitution`.
///
/// # Errors
///
/// - `FindReplaceError::InvalidName` if the new name is not a single path component.
/// - `FindReplaceError::RenameCollision` if the new name is already taken.
/// - `FindReplaceError::Rename` if the move itself fails.
pub fn rename_entry(
    entry: FileSystemEntry,
    substitution: &Substitution,
    reporter: &mut impl Reporter,
) -> Result<RenameOutcome> {
    let (old_name, new_name) = match entry.name() {
        Some(name) => (name.to_string(), substitution.apply(name).into_owned()),
        None => {
            debug!(
                "Skipping rename of non-UTF-8 name: {}",
                entry.path.display()
            );
            return Ok(RenameOutcome::Unchanged(entry));
        }
    };
    if new_name == old_name {
        trace!("Name unchanged: {}", old_name);
        return Ok(RenameOutcome::Unchanged(entry));
    }

    if !is_plain_name(&new_name) {
        return Err(FindReplaceError::InvalidName {
            from: entry.path.clone(),
            name: new_name,
        }
        .into());
    }

    let target = entry.path.with_file_name(&new_name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(FindReplaceError::RenameCollision {
            from: entry.path.clone(),
            to: target,
        }
        .into());
    }

    fs::rename(&entry.path, &target).map_err(|source| FindReplaceError::Rename {
        from: entry.path.clone(),
        to: target.clone(),
        source,
    })?;
    reporter.renamed(&old_name, &new_name);

    Ok(RenameOutcome::Renamed(entry.moved_to(target)))
}

/// True when `name` names an entry inside the current parent and nothing else.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.chars().any(std::path::is_separator)
}
