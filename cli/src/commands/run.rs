//! # findreplace Run Handler
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the `findreplace run` subcommand, which applies a
//! regex find & replace to file contents, file names and/or directory names
//! under a base directory.
//!
//! ## Architecture
//!
//! The implementation follows these steps:
//!
//! 1. Parse command-line arguments using `clap` into `RunArgs`.
//! 2. Load the user and project configuration files (`core::config::load_config`).
//! 3. Overlay the command-line values on top of the file configuration.
//! 4. If `skip` is set, log and return without touching anything.
//! 5. Resolve defaults, validate the settings and compile a `TraversalRequest`.
//! 6. Hand the request to the traversal engine (`common::fs::walk::run`) with a
//!    `TracingReporter`, which logs every rename at `info` level.
//! 7. Print a one-line summary on success. The first failure aborts the run and
//!    is returned unchanged.
//!
//! ## Usage
//!
//! ```bash
//! # Rewrite contents of every .java and .xml file, recursively
//! findreplace run ./src --find 'com\.acme' --replace 'org.globex' \
//!     --recursive --contents --file-mask .java,.xml
//!
//! # Rename files and directories, first occurrence only, skipping backups
//! findreplace run -f old -r new -R --filenames --dirnames --replace-first -x '\.bak$'
//!
//! # Everything from .findreplace.toml
//! findreplace -v run
//! ```
//!
use crate::{
    common::fs::walk,
    core::{
        config::{self, RunConfig},
        error::Result,
        reporter::TracingReporter,
        request::TraversalRequest,
    },
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Run Arguments (`RunArgs`)
///
/// Every option is optional on the command line; values that are not given
/// fall back to `.findreplace.toml`, then to the user config, then to defaults.
#[derive(Parser, Debug, Default)]
#[command(
    about = "Find & replace in file contents, file names and directory names",
    long_about = "Walks BASE_DIR and replaces matches of the find regex.\n\
                  Nothing is processed unless at least one of --contents, --filenames\n\
                  or --dirnames is given (or set in the configuration).\n\n\
                  Each rename is logged as \"Renaming `old` to `new`\" at info level,\n\
                  which is hidden by default. Pass -v to see it."
)]
pub struct RunArgs {
    /// Directory to start in. Defaults to `run.base_dir`, then the current directory.
    pub base_dir: Option<PathBuf>,

    /// Regular expression to find.
    #[arg(short, long, allow_hyphen_values = true)]
    pub find: Option<String>,

    /// Replacement text; `$1` or `${name}` insert capture groups. Defaults to empty.
    #[arg(short, long, allow_hyphen_values = true)]
    pub replace: Option<String>,

    /// Descend into subdirectories.
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Only process files whose names end with one of these suffixes (comma separated).
    #[arg(short = 'm', long = "file-mask", value_delimiter = ',')]
    pub file_masks: Vec<String>,

    /// Skip entries whose names match any of these regexes (comma separated).
    #[arg(short = 'x', long = "exclusions", value_delimiter = ',')]
    pub exclusions: Vec<String>,

    /// Replace inside file contents.
    #[arg(long)]
    pub contents: bool,

    /// Rename matching files.
    #[arg(long)]
    pub filenames: bool,

    /// Rename matching directories.
    #[arg(long)]
    pub dirnames: bool,

    /// Replace only the first match in each name or file.
    #[arg(long)]
    pub replace_first: bool,

    /// Charset used to read and write file contents (e.g. UTF-8, ISO-8859-1).
    #[arg(long, env = "FINDREPLACE_ENCODING")]
    pub encoding: Option<String>,

    /// Do nothing and exit successfully.
    #[arg(long)]
    pub skip: bool,

    /// Configuration file to use instead of the discovered `.findreplace.toml`.
    #[arg(long, env = "FINDREPLACE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// The command-line layer of the configuration. Flags that were not passed
    /// stay `None` so they do not mask file values.
    pub fn to_overrides(&self) -> RunConfig {
        RunConfig {
            base_dir: self
                .base_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            recursive: self.recursive.then_some(true),
            find: self.find.clone(),
            replace: self.replace.clone(),
            file_masks: (!self.file_masks.is_empty()).then(|| self.file_masks.clone()),
            exclusions: (!self.exclusions.is_empty()).then(|| self.exclusions.clone()),
            process_file_contents: self.contents.then_some(true),
            process_filenames: self.filenames.then_some(true),
            process_directory_names: self.dirnames.then_some(true),
            replace_all: self.replace_first.then_some(false),
            encoding: self.encoding.clone(),
            skip: self.skip.then_some(true),
        }
    }
}

/// # Handle Run Command (`handle_run`)
///
/// ## Returns
///
/// * `Ok(())` when the traversal completed, or when the run is skipped.
/// * `Err` for configuration problems (raised before any file is touched) or
///   for the first filesystem failure during the traversal.
pub fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command...");
    debug!("Run arguments: {:?}", args);

    let file_config = config::load_config(args.config.as_deref())?;
    let run_config = file_config.run.overlay(args.to_overrides());

    if run_config.is_skipped() {
        info!("Skipping find & replace (skip is set).");
        println!("Skipped.");
        return Ok(());
    }

    let settings = run_config.resolve()?;
    config::validate_settings(&settings)?;
    let request = TraversalRequest::compile(&settings)?;

    let stats = walk::run(&request, &mut TracingReporter)?;

    info!(
        "Finished {}: {} file(s) rewritten, {} entries renamed",
        settings.base_dir.display(),
        stats.files_rewritten,
        stats.entries_renamed
    );
    println!(
        "Rewrote {} file(s) and renamed {} entries under {}",
        stats.files_rewritten,
        stats.entries_renamed,
        settings.base_dir.display()
    );
    Ok(())
}
