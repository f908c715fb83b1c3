//! # findreplace Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for findreplace, handling
//! loading, merging, expansion and validation of run settings. A run is
//! described by three layers, in order of precedence:
//!
//! 1. Command-line flags (`findreplace run ...`)
//! 2. Project-specific `.findreplace.toml` in the current directory or its
//!    ancestors (or an explicit `--config <PATH>`)
//! 3. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/findreplace/config.toml`)
//!
//! Every field of `RunConfig` is optional so that layers can be overlaid with
//! `Option::or`. Once merged, `RunConfig::resolve` applies defaults and
//! produces a `RunSettings`, and `validate_settings` checks it before any file
//! is touched.
//!
//! ## Examples
//!
//! ```toml
//! [run]
//! base_dir = "~/src/my-project"
//! recursive = true
//! find = "acme_(\\w+)"
//! replace = "globex_$1"
//! file_masks = [".rs", ".toml"]
//! exclusions = ["^target$", "\\.bak$"]
//! process_file_contents = true
//! process_filenames = true
//! ```
//!
use crate::core::error::{FindReplaceError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
}

/// One (possibly partial) layer of run settings.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Directory to start in (can use ~). Defaults to the current directory.
    pub base_dir: Option<String>,
    pub recursive: Option<bool>,
    /// Regular expression to find. Required unless the run is skipped.
    pub find: Option<String>,
    /// Replacement template. Absent means the empty string.
    pub replace: Option<String>,
    /// Literal file-name suffixes, e.g. `[".java", ".xml"]`.
    pub file_masks: Option<Vec<String>>,
    /// Regular expressions matched anywhere in an entry's name.
    pub exclusions: Option<Vec<String>>,
    pub process_file_contents: Option<bool>,
    pub process_filenames: Option<bool>,
    pub process_directory_names: Option<bool>,
    /// `false` replaces only the first occurrence per name/file.
    pub replace_all: Option<bool>,
    /// WHATWG charset label used to decode and encode file contents.
    pub encoding: Option<String>,
    /// Turns the whole run into a no-op.
    pub skip: Option<bool>,
}

impl RunConfig {
    /// Returns a layer where every value set in `over` replaces the value in `self`.
    pub fn overlay(self, over: RunConfig) -> RunConfig {
        RunConfig {
            base_dir: over.base_dir.or(self.base_dir),
            recursive: over.recursive.or(self.recursive),
            find: over.find.or(self.find),
            replace: over.replace.or(self.replace),
            file_masks: over.file_masks.or(self.file_masks),
            exclusions: over.exclusions.or(self.exclusions),
            process_file_contents: over.process_file_contents.or(self.process_file_contents),
            process_filenames: over.process_filenames.or(self.process_filenames),
            process_directory_names: over
                .process_directory_names
                .or(self.process_directory_names),
            replace_all: over.replace_all.or(self.replace_all),
            encoding: over.encoding.or(self.encoding),
            skip: over.skip.or(self.skip),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skip.unwrap_or(false)
    }

    /// Applies defaults and produces fully resolved settings.
    ///
    /// # Errors
    ///
    /// Returns `FindReplaceError::Config` when no find pattern was configured.
    pub fn resolve(self) -> Result<RunSettings> {
        let defaults = RunSettings::default();
        let find = match self.find {
            Some(find) if !find.is_empty() => find,
            _ => {
                return Err(anyhow!(FindReplaceError::Config(
                    "A find pattern is required (`--find` or `run.find`).".to_string()
                )))
            }
        };
        Ok(RunSettings {
            base_dir: self
                .base_dir
                .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()))
                .unwrap_or(defaults.base_dir),
            recursive: self.recursive.unwrap_or(defaults.recursive),
            find,
            replacement: self.replace.unwrap_or_default(),
            file_masks: clean_list(self.file_masks.unwrap_or_default()),
            exclusions: clean_list(self.exclusions.unwrap_or_default()),
            process_file_contents: self
                .process_file_contents
                .unwrap_or(defaults.process_file_contents),
            process_filenames: self.process_filenames.unwrap_or(defaults.process_filenames),
            process_directory_names: self
                .process_directory_names
                .unwrap_or(defaults.process_directory_names),
            replace_all: self.replace_all.unwrap_or(defaults.replace_all),
            encoding: self.encoding.unwrap_or(defaults.encoding),
        })
    }
}

/// Fully resolved settings for one run, before pattern compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub base_dir: PathBuf,
    pub recursive: bool,
    pub find: String,
    pub replacement: String,
    pub file_masks: Vec<String>,
    pub exclusions: Vec<String>,
    pub process_file_contents: bool,
    pub process_filenames: bool,
    pub process_directory_names: bool,
    pub replace_all: bool,
    pub encoding: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            recursive: false,
            find: String::new(),
            replacement: String::new(),
            file_masks: Vec::new(),
            exclusions: Vec::new(),
            process_file_contents: false,
            process_filenames: false,
            process_directory_names: false,
            replace_all: true,
            encoding: "UTF-8".to_string(),
        }
    }
}

/// Drops empty entries left behind by `a,,b` style lists. Whitespace is
/// significant in masks and exclusions, so entries are kept verbatim.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|item| !item.is_empty()).collect()
}

pub const PROJECT_CONFIG_FILENAME: &str = ".findreplace.toml";

/// Loads and merges the user config with the project config.
///
/// When `explicit` is given it replaces project config discovery; a missing
/// explicit file is an error, a missing discovered file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            load_project_config(&current_dir)?
        }
    };
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    debug!("Merged file configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "FindReplace", "findreplace") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file ({}) found in {} or ancestors.",
            PROJECT_CONFIG_FILENAME,
            start.display()
        );
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for
/// `.findreplace.toml`. The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let project_config = dir.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    match project {
        Some(project) => Config {
            run: user.run.overlay(project.run),
        },
        None => user,
    }
}

/// Checks resolved settings before the traversal starts.
pub fn validate_settings(settings: &RunSettings) -> Result<()> {
    debug!("Validating run settings...");
    if !settings.base_dir.exists() {
        return Err(anyhow!(FindReplaceError::Config(format!(
            "Base directory '{}' does not exist.",
            settings.base_dir.display()
        ))));
    }
    if !settings.base_dir.is_dir() {
        return Err(anyhow!(FindReplaceError::Config(format!(
            "Base directory '{}' exists but is not a directory.",
            settings.base_dir.display()
        ))));
    }
    if !settings.process_file_contents
        && !settings.process_filenames
        && !settings.process_directory_names
    {
        warn!("No processing enabled (contents, filenames, directory names); nothing will change.");
    }
    for mask in &settings.file_masks {
        if mask.contains(['/', '\\']) {
            return Err(anyhow!(FindReplaceError::Config(format!(
                "File mask '{}' must be a name suffix, not a path.",
                mask
            ))));
        }
    }
    Ok(())
}
