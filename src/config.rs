//! Settings store. A `.neartest.toml` discovered next to the project (by
//! the same ancestor walk that finds project roots) supplies per-project
//! defaults; CLI flags override it. All keys are optional.
//!
//! ```toml
//! convention = "django"
//! test_command = "test"
//! test_module = "manage.py"
//! virtualenv = "myenv"
//! terminal = "konsole"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ancestors::find_boundary;
use crate::error::NeartestError;
use crate::types::Convention;

/// Settings file name, discovered by walking ancestors of the source file.
pub const SETTINGS_FILE: &str = ".neartest.toml";

/// On-disk shape. Convention arrives as a string and is validated after
/// deserialization so a typo is a reported configuration error, not a
/// silently ignored key.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    convention: Option<String>,
    project_root: Option<PathBuf>,
    test_command: Option<String>,
    test_command_options: Option<String>,
    test_module: Option<String>,
    virtualenv: Option<String>,
    terminal: Option<String>,
}

/// Validated settings, merged from file and CLI.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    pub convention: Option<Convention>,
    /// Overrides project-root discovery for the run command.
    pub project_root: Option<PathBuf>,
    /// Test sub-command passed to the entry-point script (django `test`,
    /// setup-tool `test -q`).
    pub test_command: Option<String>,
    /// Extra options appended to the base command.
    pub test_command_options: Option<String>,
    /// Entry-point module (`manage.py`, `setup.py`; none for nose).
    pub test_module: Option<String>,
    /// Named virtualenvwrapper environment to activate first.
    pub virtualenv: Option<String>,
    /// Preferred terminal executable, bypassing detection.
    pub terminal: Option<String>,
}

impl Settings {
    /// Load settings for `source_file`: an explicit `--config` path, or
    /// the nearest `.neartest.toml` above the file. No file is fine.
    pub fn load(explicit: Option<&Path>, source_file: &Path) -> Result<Self, NeartestError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => source_file
                .parent()
                .and_then(|dir| find_boundary(&[SETTINGS_FILE], dir))
                .map(|dir| dir.join(SETTINGS_FILE)),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, NeartestError> {
        let raw = fs::read_to_string(path).map_err(|source| NeartestError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawSettings =
            toml::from_str(&raw).map_err(|e| NeartestError::Config {
                reason: format!("{}: {e}", path.display()),
            })?;
        Ok(Self {
            convention: raw.convention.as_deref().map(str::parse).transpose()?,
            project_root: raw.project_root,
            test_command: raw.test_command,
            test_command_options: raw.test_command_options,
            test_module: raw.test_module,
            virtualenv: raw.virtualenv,
            terminal: raw.terminal,
        })
    }
}
