//! # findreplace Filesystem Entries
//!
//! File: cli/src/common/fs/entry.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A `FileSystemEntry` is a path plus the kind it had when it was listed.
//! The kind is cached because the entry's path may stop existing the moment it
//! is renamed; after a rename the renamer hands back a fresh entry for the new
//! path and the old one is dropped.
//!
//! A symbolic link to a regular file is a `File`. A symbolic link to a
//! directory is a `DirectoryLink`: its own name can be renamed like any
//! directory, but the traversal never descends through it, so a link back to
//! an ancestor cannot make the walk revisit entries. Anything else, including
//! broken links and special files, is `EntryKind::Other` and is skipped.
//!
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    DirectoryLink,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl FileSystemEntry {
    /// Stats `path` without following links, then resolves links one step.
    pub fn classify(path: PathBuf) -> Self {
        let kind = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => match fs::metadata(&path) {
                Ok(target) if target.is_dir() => EntryKind::DirectoryLink,
                Ok(target) if target.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            },
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        };
        Self { path, kind }
    }

    /// The base name, if it is valid Unicode.
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The base name for filtering; invalid Unicode is replaced lossily.
    pub fn display_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed(""))
    }

    /// The same entry relocated to `path`.
    pub fn moved_to(&self, path: PathBuf) -> Self {
        Self {
            path,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        let sub = dir.path().join("sub");
        fs::write(&file, "x").unwrap();
        fs::create_dir(&sub).unwrap();

        assert_eq!(FileSystemEntry::classify(file).kind, EntryKind::File);
        assert_eq!(FileSystemEntry::classify(sub).kind, EntryKind::Directory);
        assert_eq!(
            FileSystemEntry::classify(dir.path().join("missing")).kind,
            EntryKind::Other
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_other() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();
        assert_eq!(FileSystemEntry::classify(link).kind, EntryKind::Other);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let file_link = dir.path().join("file_link");
        let dir_link = dir.path().join("dir_link");
        std::os::unix::fs::symlink(&file, &file_link).unwrap();
        std::os::unix::fs::symlink(dir.path(), &dir_link).unwrap();

        assert_eq!(FileSystemEntry::classify(file_link).kind, EntryKind::File);
        assert_eq!(
            FileSystemEntry::classify(dir_link).kind,
            EntryKind::DirectoryLink
        );
    }

    #[test]
    fn test_names() {
        let entry = FileSystemEntry {
            path: PathBuf::from("some/dir/file.rs"),
            kind: EntryKind::File,
        };
        assert_eq!(entry.name(), Some("file.rs"));
        assert_eq!(entry.display_name(), "file.rs");
    }
}
