//! # findreplace Content Rewriter
//!
//! File: cli/src/common/fs/rewrite.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Replaces the contents of a single file without ever leaving the original
//! path holding a partially written file.
//!
//! ## Workflow
//!
//! 1. **Read & decode:** The whole file is read and decoded with the configured
//!    `encoding_rs::Encoding` (no BOM sniffing; malformed sequences become U+FFFD).
//! 2. **Match check:** If the find pattern does not match, the function returns
//!    immediately and the file stays byte-for-byte identical.
//! 3. **Stage:** The substituted text is encoded and written to a new temporary
//!    file created in the same directory (`tempfile::Builder::tempfile_in`), so the
//!    final move never crosses filesystems. The temporary file is persisted as
//!    soon as it is created.
//! 4. **Preserve permissions:** On Unix the original's permission bits are
//!    copied onto the staged file. This produces a `PreservedPermissions` token.
//! 5. **Swap:** Only with that token in hand is the original deleted and the
//!    staged file moved onto its path.
//!
//! Every step has its own `FindReplaceError` variant. When a step after staging
//! fails, the staged file is deliberately left on disk next to the original.
//!
use crate::core::error::{FindReplaceError, Result};
use crate::core::request::Substitution;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

const TEMP_PREFIX: &str = ".findreplace";
const TEMP_SUFFIX: &str = ".tmp";

/// A fully written replacement file sitting next to its original.
#[derive(Debug)]
pub struct StagedReplacement {
    path: PathBuf,
}

impl StagedReplacement {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Proof that the staged file carries the original's permission bits.
/// Only `preserve_permissions` can construct it.
#[must_use]
#[derive(Debug)]
pub struct PreservedPermissions {
    _private: (),
}

/// Rewrites `path` in place if `substitution` matches its contents.
///
/// Returns `Ok(true)` when the file was rewritten and `Ok(false)` when the
/// pattern did not match and nothing was touched.
pub fn rewrite_contents(
    path: &Path,
    substitution: &Substitution,
    encoding: &'static Encoding,
) -> Result<bool> {
    let bytes = fs::read(path).map_err(|source| FindReplaceError::ContentRead {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, malformed) = encoding.decode_without_bom_handling(&bytes);

    if !substitution.is_match(&text) {
        trace!("No match in {}", path.display());
        return Ok(false);
    }
    if malformed {
        warn!(
            "{} is not valid {}; malformed sequences will be written as U+FFFD",
            path.display(),
            encoding.name()
        );
    }

    let replaced = substitution.apply(&text);
    let (encoded, unmappable) = encode_text(&replaced, encoding);
    if unmappable {
        warn!(
            "Replacement text in {} has characters not representable in {}; they were written as numeric character references",
            path.display(),
            encoding.name()
        );
    }

    let staged = stage_replacement(path, &encoded)?;
    let preserved = preserve_permissions(path, &staged)?;
    swap_into_place(staged, path, preserved)?;
    Ok(true)
}

/// Encodes `text` back into `encoding`.
///
/// `encoding_rs` only encodes to its output encodings and maps UTF-16 to
/// UTF-8, so UTF-16 is encoded here to keep the file in its original form.
/// The flag reports unmappable characters.
fn encode_text<'a>(text: &'a str, encoding: &'static Encoding) -> (Cow<'a, [u8]>, bool) {
    if encoding == UTF_16LE {
        let bytes = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        (Cow::Owned(bytes), false)
    } else if encoding == UTF_16BE {
        let bytes = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        (Cow::Owned(bytes), false)
    } else {
        let (bytes, _, unmappable) = encoding.encode(text);
        (bytes, unmappable)
    }
}

/// Writes `contents` to a new temporary file in `original`'s directory.
pub fn stage_replacement(original: &Path, contents: &[u8]) -> Result<StagedReplacement> {
    let parent = match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_failed = |source: io::Error| FindReplaceError::ContentWrite {
        path: original.to_path_buf(),
        source,
    };

    let (mut file, path) = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)
        .map_err(write_failed)?
        .keep()
        .map_err(|err| write_failed(err.error))?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(write_failed)?;

    trace!("Staged replacement for {} at {}", original.display(), path.display());
    Ok(StagedReplacement { path })
}

/// Copies `original`'s permission bits onto the staged file.
#[cfg(unix)]
pub fn preserve_permissions(
    original: &Path,
    staged: &StagedReplacement,
) -> Result<PreservedPermissions> {
    let failed = |source: io::Error| FindReplaceError::PermissionPreservation {
        path: original.to_path_buf(),
        source,
    };
    let permissions = fs::metadata(original).map_err(failed)?.permissions();
    fs::set_permissions(&staged.path, permissions).map_err(failed)?;
    Ok(PreservedPermissions { _private: () })
}

/// No POSIX permission model to carry over.
#[cfg(not(unix))]
pub fn preserve_permissions(
    _original: &Path,
    _staged: &StagedReplacement,
) -> Result<PreservedPermissions> {
    Ok(PreservedPermissions { _private: () })
}

/// Deletes `original` and moves the staged file onto its path.
pub fn swap_into_place(
    staged: StagedReplacement,
    original: &Path,
    _preserved: PreservedPermissions,
) -> Result<()> {
    fs::remove_file(original).map_err(|source| FindReplaceError::DeleteOriginal {
        path: original.to_path_buf(),
        temp: staged.path.clone(),
        source,
    })?;
    finalize(staged, original)
}

/// Moves the staged file onto `target`. On failure the staged file stays put.
fn finalize(staged: StagedReplacement, target: &Path) -> Result<()> {
    fs::rename(&staged.path, target).map_err(|source| FindReplaceError::FinalizeRename {
        temp: staged.path.clone(),
        target: target.to_path_buf(),
        source,
    })?;
    Ok(())
}
