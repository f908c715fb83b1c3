//! # findreplace Init Handler
//!
//! File: cli/src/commands/init.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `findreplace init`, which writes a commented starter
//! `.findreplace.toml` so a project can keep its find & replace settings under
//! version control. An existing file is only replaced with `--force`.
//!
//! ```bash
//! findreplace init            # ./.findreplace.toml
//! findreplace init tools/ --force
//! ```
//!
use crate::core::{
    config::PROJECT_CONFIG_FILENAME,
    error::{FindReplaceError, Result},
};
use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Template written by `findreplace init`. Every value shown is the default
/// unless noted; `find` must be set before `findreplace run` will do anything.
pub const STARTER_CONFIG: &str = r#"# findreplace project configuration.
# Command-line flags override these values.

[run]
# Regular expression to find (required).
# find = "com\\.acme\\.(\\w+)"

# Replacement text. `$1` / `${name}` insert capture groups. Empty if unset.
# replace = "org.globex.$1"

# Directory to start in, relative to where findreplace is run.
# base_dir = "."

recursive = false
process_file_contents = false
process_filenames = false
process_directory_names = false

# Replace every match (true) or only the first match in each name/file (false).
replace_all = true

# Only files ending with one of these suffixes are processed. Empty = all files.
# file_masks = [".java", ".xml"]

# Entries whose name matches any of these regexes are left alone.
# exclusions = ["\\.bak$", "^target$", "^\\.git$"]

encoding = "UTF-8"
skip = false
"#;

#[derive(Parser, Debug)]
#[command(about = "Write a starter .findreplace.toml")]
pub struct InitArgs {
    /// Directory to write the file into.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: InitArgs) -> Result<()> {
    info!("Handling init command (dir: {})", args.dir.display());

    if !args.dir.is_dir() {
        bail!(FindReplaceError::Config(format!(
            "'{}' is not a directory.",
            args.dir.display()
        )));
    }
    let target = args.dir.join(PROJECT_CONFIG_FILENAME);
    if target.exists() && !args.force {
        bail!(FindReplaceError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            target.display()
        )));
    }

    fs::write(&target, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("Wrote {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{load_config_from_path, Config};
    use tempfile::tempdir;

    #[test]
    fn test_starter_config_parses() {
        let config: Config = toml::from_str(STARTER_CONFIG).expect("starter config must parse");
        assert_eq!(config.run.find, None);
        assert_eq!(config.run.replace_all, Some(true));
        assert_eq!(config.run.encoding.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_init_writes_and_refuses_overwrite() -> Result<()> {
        let dir = tempdir()?;
        let args = || InitArgs {
            dir: dir.path().to_path_buf(),
            force: false,
        };

        handle_init(args())?;
        let written = dir.path().join(PROJECT_CONFIG_FILENAME);
        assert_eq!(load_config_from_path(&written)?.run.skip, Some(false));

        fs::write(&written, "[run]\nfind = \"mine\"\n")?;
        let err = handle_init(args()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(fs::read_to_string(&written)?.contains("mine"));

        handle_init(InitArgs {
            force: true,
            ..args()
        })?;
        assert_eq!(fs::read_to_string(&written)?, STARTER_CONFIG);
        Ok(())
    }
}
