//! # findreplace Traversal Engine
//!
//! File: cli/src/common/fs/walk.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Walks the base directory and applies a `TraversalRequest` to every entry.
//! The tree is renamed while it is being walked, so the walk is not a plain
//! recursive descent: it drains a flat `WorkQueue`.
//!
//! ## Architecture
//!
//! - The queue is seeded with the base directory's immediate children.
//! - Each entry is removed from the queue *before* it is processed, so no
//!   entry is ever visited twice, even after a rename.
//! - A directory is renamed first (when directory names are processed and it
//!   is not excluded). Its children are then listed from the *new* path and
//!   inserted at the front of the queue in name order, ahead of the
//!   directory's remaining siblings. The result is a pre-order walk.
//! - A link to a directory is treated like a directory for renaming but is
//!   never descended.
//! - A regular file goes through the per-file pipeline: exclusion check, mask
//!   check, content rewrite, then rename.
//! - Anything else (broken links, sockets, devices) is skipped.
//!
//! The first error aborts the run; entries processed before it keep their changes.
//!
use crate::common::fs::entry::{EntryKind, FileSystemEntry};
use crate::common::fs::{filter, rename, rewrite};
use crate::core::error::{FindReplaceError, Result};
use crate::core::reporter::Reporter;
use crate::core::request::TraversalRequest;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Counts of the changes a completed run made.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub files_rewritten: usize,
    pub entries_renamed: usize,
}

/// Pending entries, front first. The cursor is always the front.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: VecDeque<FileSystemEntry>,
}

impl WorkQueue {
    pub fn new(entries: Vec<FileSystemEntry>) -> Self {
        Self {
            pending: entries.into(),
        }
    }

    /// Removes and returns the entry at the cursor.
    pub fn pop_next(&mut self) -> Option<FileSystemEntry> {
        self.pending.pop_front()
    }

    /// Inserts `children` at the cursor, keeping their order, ahead of
    /// everything already queued.
    pub fn insert_at_cursor(&mut self, children: Vec<FileSystemEntry>) {
        for child in children.into_iter().rev() {
            self.pending.push_front(child);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Runs `request` against its base directory.
///
/// # Errors
///
/// Fails on the first listing, rename or rewrite error. See `FindReplaceError`.
pub fn run(request: &TraversalRequest, reporter: &mut impl Reporter) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let mut queue = WorkQueue::new(list_children(&request.base_dir)?);
    debug!(
        "Starting traversal of {} with {} top-level entries",
        request.base_dir.display(),
        queue.len()
    );

    while let Some(entry) = queue.pop_next() {
        match entry.kind {
            EntryKind::Directory => {
                let dir = process_directory(request, entry, reporter, &mut stats)?;
                if request.recursive {
                    queue.insert_at_cursor(list_children(&dir.path)?);
                }
            }
            EntryKind::DirectoryLink => {
                let link = process_directory(request, entry, reporter, &mut stats)?;
                debug!("Not descending into directory link {}", link.path.display());
            }
            EntryKind::File => process_file(request, entry, reporter, &mut stats)?,
            EntryKind::Other => trace!("Skipping {}", entry.path.display()),
        }
    }

    Ok(stats)
}

/// Lists the immediate children of `dir`, sorted by file name.
pub fn list_children(dir: &Path) -> Result<Vec<FileSystemEntry>> {
    let listing_failed = |source: io::Error| FindReplaceError::Listing {
        path: dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(dir).map_err(listing_failed)?;
    if !meta.is_dir() {
        return Err(listing_failed(io::Error::new(
            io::ErrorKind::Other,
            "not a directory",
        ))
        .into());
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|item| {
            item.map(|child| FileSystemEntry::classify(child.into_path()))
                .map_err(|err| anyhow::Error::from(listing_failed(err.into())))
        })
        .collect()
}

fn process_directory(
    request: &TraversalRequest,
    entry: FileSystemEntry,
    reporter: &mut impl Reporter,
    stats: &mut RunStats,
) -> Result<FileSystemEntry> {
    if !request.process_directory_names {
        return Ok(entry);
    }
    if filter::is_excluded(&entry.display_name(), &request.exclusions) {
        debug!("Excluded directory: {}", entry.path.display());
        return Ok(entry);
    }

    let outcome = rename::rename_entry(entry, &request.substitution, reporter)?;
    if outcome.is_renamed() {
        stats.entries_renamed += 1;
    }
    Ok(outcome.into_entry())
}

fn process_file(
    request: &TraversalRequest,
    entry: FileSystemEntry,
    reporter: &mut impl Reporter,
    stats: &mut RunStats,
) -> Result<()> {
    if !is_eligible(request, &entry) {
        return Ok(());
    }

    if request.process_file_contents
        && rewrite::rewrite_contents(&entry.path, &request.substitution, request.encoding)?
    {
        stats.files_rewritten += 1;
        reporter.rewritten(&entry.path);
    }

    if request.process_filenames
        && rename::rename_entry(entry, &request.substitution, reporter)?.is_renamed()
    {
        stats.entries_renamed += 1;
    }

    Ok(())
}

/// Exclusion first, then file masks.
fn is_eligible(request: &TraversalRequest, entry: &FileSystemEntry) -> bool {
    let name = entry.display_name();
    if filter::is_excluded(&name, &request.exclusions) {
        debug!("Excluded file: {}", entry.path.display());
        return false;
    }
    if !filter::should_process(&name, &request.file_masks) {
        trace!("No file mask matches {}", entry.path.display());
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RunSettings;
    use crate::core::reporter::RecordingReporter;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn settings(base: &Path, find: &str, replace: &str) -> RunSettings {
        RunSettings {
            base_dir: base.to_path_buf(),
            find: find.to_string(),
            replacement: replace.to_string(),
            ..RunSettings::default()
        }
    }

    fn run_settings(settings: RunSettings) -> Result<(RunStats, RecordingReporter)> {
        let request = TraversalRequest::compile(&settings)?;
        let mut reporter = RecordingReporter::default();
        let stats = run(&request, &mut reporter)?;
        Ok((stats, reporter))
    }

    /// Builds `<tmp>/<path>` files (paths ending in `/` become directories).
    fn tree(layout: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (path, content) in layout {
            let full = dir.path().join(path);
            if path.ends_with('/') {
                fs::create_dir_all(&full).unwrap();
            } else {
                fs::create_dir_all(full.parent().unwrap()).unwrap();
                fs::write(&full, content).unwrap();
            }
        }
        dir
    }

    fn entry(path: &str) -> FileSystemEntry {
        FileSystemEntry {
            path: PathBuf::from(path),
            kind: EntryKind::File,
        }
    }

    #[test]
    fn test_queue_inserts_children_ahead_of_siblings() {
        let mut queue = WorkQueue::new(vec![entry("a"), entry("b"), entry("c")]);
        assert_eq!(queue.pop_next(), Some(entry("a")));
        queue.insert_at_cursor(vec![entry("a/1"), entry("a/2")]);

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_next())
            .map(|e| e.path)
            .collect();
        assert_eq!(
            order,
            vec!["a/1", "a/2", "b", "c"]
                .into_iter()
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_list_children_sorted() -> Result<()> {
        let dir = tree(&[("b.txt", ""), ("a.txt", ""), ("c/", "")]);
        let names: Vec<_> = list_children(dir.path())?
            .into_iter()
            .map(|e| e.name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
        Ok(())
    }

    #[test]
    fn test_list_children_errors() {
        let dir = tree(&[("file.txt", "")]);
        for path in [dir.path().join("missing"), dir.path().join("file.txt")] {
            let err = list_children(&path).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<FindReplaceError>(),
                Some(FindReplaceError::Listing { .. })
            ));
        }
    }

    #[test]
    fn test_content_replace_all() -> Result<()> {
        let dir = tree(&[("foo.txt", "hello foo")]);
        let (stats, _) = run_settings(RunSettings {
            process_file_contents: true,
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert_eq!(fs::read_to_string(dir.path().join("foo.txt"))?, "hello bar");
        assert_eq!(stats.files_rewritten, 1);
        assert_eq!(stats.entries_renamed, 0); // Filename processing off
        Ok(())
    }

    #[test]
    fn test_directory_renamed_before_descent() -> Result<()> {
        let dir = tree(&[("oldname/oldname_file.txt", "x")]);
        let (stats, reporter) = run_settings(RunSettings {
            recursive: true,
            process_filenames: true,
            process_directory_names: true,
            ..settings(dir.path(), "old", "new")
        })?;

        assert!(dir.path().join("newname/newname_file.txt").is_file());
        assert!(!dir.path().join("oldname").exists());
        assert_eq!(stats.entries_renamed, 2);
        assert_eq!(
            reporter.renames,
            vec![
                ("oldname".to_string(), "newname".to_string()),
                ("oldname_file.txt".to_string(), "newname_file.txt".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_excluded_file_untouched() -> Result<()> {
        let dir = tree(&[("data.bak", "foo"), ("data.txt", "foo")]);
        run_settings(RunSettings {
            process_file_contents: true,
            process_filenames: true,
            exclusions: vec![r"\.bak$".into()],
            ..settings(dir.path(), "data|foo", "x")
        })?;

        assert_eq!(fs::read_to_string(dir.path().join("data.bak"))?, "foo");
        assert_eq!(fs::read_to_string(dir.path().join("x.txt"))?, "x");
        Ok(())
    }

    #[test]
    fn test_excluded_directory_not_renamed_but_descended() -> Result<()> {
        let dir = tree(&[("foo_keep/foo.txt", "foo")]);
        run_settings(RunSettings {
            recursive: true,
            process_file_contents: true,
            process_directory_names: true,
            exclusions: vec!["keep".into()],
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert_eq!(
            fs::read_to_string(dir.path().join("foo_keep/foo.txt"))?,
            "bar"
        );
        Ok(())
    }

    #[test]
    fn test_file_masks() -> Result<()> {
        let dir = tree(&[("A.java", "foo"), ("B.txt", "foo")]);
        run_settings(RunSettings {
            process_file_contents: true,
            file_masks: vec![".java".into()],
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert_eq!(fs::read_to_string(dir.path().join("A.java"))?, "bar");
        assert_eq!(fs::read_to_string(dir.path().join("B.txt"))?, "foo");
        Ok(())
    }

    #[test]
    fn test_masks_do_not_gate_directories() -> Result<()> {
        let dir = tree(&[("foo_dir/", "")]);
        run_settings(RunSettings {
            process_directory_names: true,
            file_masks: vec![".java".into()],
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert!(dir.path().join("bar_dir").is_dir());
        Ok(())
    }

    #[test]
    fn test_replace_first_only() -> Result<()> {
        let dir = tree(&[("f.txt", "foo foo foo")]);
        run_settings(RunSettings {
            process_file_contents: true,
            replace_all: false,
            ..settings(dir.path(), "foo", "X")
        })?;

        assert_eq!(fs::read_to_string(dir.path().join("f.txt"))?, "X foo foo");
        Ok(())
    }

    #[test]
    fn test_non_recursive_skips_grandchildren() -> Result<()> {
        let dir = tree(&[("foo.txt", "foo"), ("sub/foo.txt", "foo")]);
        run_settings(RunSettings {
            process_file_contents: true,
            process_filenames: true,
            process_directory_names: true,
            ..settings(dir.path(), "foo|sub", "zap")
        })?;

        // Immediate children are processed, including the directory name.
        assert_eq!(fs::read_to_string(dir.path().join("zap.txt"))?, "zap");
        assert!(dir.path().join("zap").is_dir());
        // The grandchild is untouched.
        assert_eq!(fs::read_to_string(dir.path().join("zap/foo.txt"))?, "foo");
        Ok(())
    }

    #[test]
    fn test_second_run_is_noop() -> Result<()> {
        let dir = tree(&[("a/foo.txt", "foo foo"), ("foo.md", "foo")]);
        let settings = RunSettings {
            recursive: true,
            process_file_contents: true,
            process_filenames: true,
            process_directory_names: true,
            ..settings(dir.path(), "foo", "bar")
        };

        let (first, _) = run_settings(settings.clone())?;
        let (second, reporter) = run_settings(settings)?;

        assert_eq!(first.files_rewritten, 2);
        assert_eq!(second, RunStats::default());
        assert!(reporter.renames.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("a/bar.txt"))?, "bar bar");
        Ok(())
    }

    #[test]
    fn test_content_then_rename_order() -> Result<()> {
        let dir = tree(&[("foo.txt", "foo")]);
        let (_, reporter) = run_settings(RunSettings {
            process_file_contents: true,
            process_filenames: true,
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert_eq!(reporter.rewrites, vec![dir.path().join("foo.txt")]);
        assert_eq!(fs::read_to_string(dir.path().join("bar.txt"))?, "bar");
        Ok(())
    }

    #[test]
    fn test_rename_collision_aborts_run() {
        let dir = tree(&[("a_old.txt", ""), ("a_new.txt", ""), ("z_old.txt", "")]);
        let result = run_settings(RunSettings {
            process_filenames: true,
            ..settings(dir.path(), "old", "new")
        });

        assert!(result.is_err());
        // `a_new.txt` sorts first and is unchanged; `a_old.txt` collides and the run stops.
        assert!(dir.path().join("a_old.txt").exists());
        assert!(dir.path().join("z_old.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_skipped() -> Result<()> {
        let dir = tree(&[("foo.txt", "foo")]);
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("foo_link"))?;

        run_settings(RunSettings {
            process_file_contents: true,
            process_filenames: true,
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert!(fs::symlink_metadata(dir.path().join("foo_link")).is_ok());
        assert!(dir.path().join("bar.txt").is_file());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_link_to_ancestor_visits_each_file_once() -> Result<()> {
        let dir = tree(&[("a.txt", "x"), ("sub/b.txt", "x")]);
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop"))?;

        let (stats, _) = run_settings(RunSettings {
            recursive: true,
            process_file_contents: true,
            ..settings(dir.path(), "x", "xy")
        })?;

        assert_eq!(stats.files_rewritten, 2);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt"))?, "xy");
        assert_eq!(fs::read_to_string(dir.path().join("sub/b.txt"))?, "xy");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_link_renamed_not_descended() -> Result<()> {
        let dir = tree(&[("target/foo.txt", "foo")]);
        std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("foo_link"))?;

        let (stats, _) = run_settings(RunSettings {
            recursive: true,
            process_file_contents: true,
            process_directory_names: true,
            ..settings(dir.path(), "foo", "bar")
        })?;

        assert!(fs::symlink_metadata(dir.path().join("bar_link"))?
            .file_type()
            .is_symlink());
        // Reached once through the real directory, not again through the link.
        assert_eq!(stats.files_rewritten, 1);
        assert_eq!(fs::read_to_string(dir.path().join("target/foo.txt"))?, "bar");
        Ok(())
    }

    #[test]
    fn test_missing_base_dir_is_listing_error() {
        let dir = tempdir().unwrap();
        let result = run_settings(settings(&dir.path().join("nope"), "x", "y"));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FindReplaceError>(),
            Some(FindReplaceError::Listing { .. })
        ));
    }
}
