//! Command construction and launch: convention-specific base invocation,
//! optional virtualenv activation prefix, the terminal wire format, and
//! the fire-and-forget shell spawn.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::NeartestError;
use crate::package;
use crate::types::Convention;

impl Convention {
    /// Default test sub-command for the entry-point script.
    fn default_test_command(self) -> &'static str {
        match self {
            Self::Django => "test",
            Self::Nose => "",
            Self::SetupTool => "test -q",
        }
    }

    /// Default entry-point module. Nose has its own runner binary.
    fn default_test_module(self) -> Option<&'static str> {
        match self {
            Self::Django => Some("manage.py"),
            Self::SetupTool => Some("setup.py"),
            Self::Nose => None,
        }
    }
}

/// The base runner invocation for `file` under `convention`, before any
/// identifier is appended. `None` when the project root is needed but
/// cannot be found — a silent no-op, like every other missing input.
#[must_use]
pub fn base_command(convention: Convention, settings: &Settings, file: &Path) -> Option<String> {
    let sub_command = settings
        .test_command
        .clone()
        .unwrap_or_else(|| convention.default_test_command().to_string());

    let module = match &settings.test_module {
        Some(m) => Some(m.clone()),
        None => convention.default_test_module().map(String::from),
    };

    // Nose runs from its own binary: no entry-point script to locate,
    // and the sub-command setting does not apply to it.
    let Some(module) = module else {
        return Some("nosetests".to_string());
    };

    let root = match &settings.project_root {
        Some(root) => root.clone(),
        None => package::project_root(file)?,
    };

    let script: PathBuf = root.join(module);
    Some(trimmed(
        &format!("python {}", script.display()),
        &sub_command,
    ))
}

fn trimmed(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{head} {tail}")
    }
}

/// Apply extra options and the virtualenv activation prefix.
#[must_use]
pub fn full_command(base: &str, settings: &Settings) -> String {
    let mut cmd = match &settings.test_command_options {
        Some(options) if !options.is_empty() => format!("{base} {options}"),
        _ => base.to_string(),
    };
    if let Some(env) = &settings.virtualenv {
        cmd = format!("venvwrapper && workon {env} && {cmd}");
    }
    cmd
}

/// The literal wire format handed to the terminal launcher:
/// `"<terminal>" "<base_command> <identifier>"`. The identifier may be
/// empty (setup-tool); the trailing space is part of the shape.
#[must_use]
pub fn compose(terminal: &str, base_command: &str, identifier: &str) -> String {
    format!("\"{terminal}\" \"{base_command} {identifier}\"")
}

/// Spawn `command` through the shell, returning combined stdout/stderr
/// once the process completes or detaches. The test runner's results are
/// never parsed; this output is surfaced verbatim and forgotten.
pub fn spawn(command: &str) -> Result<String, NeartestError> {
    let output = std::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| NeartestError::IoError {
            path: PathBuf::from("sh"),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("setup.py"), "").unwrap();
        fs::create_dir_all(tmp.path().join("app")).unwrap();
        fs::write(tmp.path().join("app/tests.py"), "").unwrap();
        tmp
    }

    #[test]
    fn django_base_command_uses_manage_py() {
        let tmp = project();
        let file = tmp.path().join("app/tests.py");
        let cmd = base_command(Convention::Django, &Settings::default(), &file).unwrap();
        assert_eq!(
            cmd,
            format!("python {} test", tmp.path().join("manage.py").display())
        );
    }

    #[test]
    fn setup_tool_base_command() {
        let tmp = project();
        let file = tmp.path().join("app/tests.py");
        let cmd = base_command(Convention::SetupTool, &Settings::default(), &file).unwrap();
        assert_eq!(
            cmd,
            format!("python {} test -q", tmp.path().join("setup.py").display())
        );
    }

    #[test]
    fn nose_ignores_the_sub_command_setting() {
        let settings = Settings {
            test_command: Some("test".into()),
            ..Settings::default()
        };
        let tmp = tempfile::tempdir().unwrap();
        let cmd = base_command(Convention::Nose, &settings, &tmp.path().join("tests.py"));
        assert_eq!(cmd.as_deref(), Some("nosetests"));
    }

    #[test]
    fn nose_base_command_needs_no_root() {
        let tmp = tempfile::tempdir().unwrap();
        // No setup.py or settings.py anywhere
        let cmd = base_command(
            Convention::Nose,
            &Settings::default(),
            &tmp.path().join("tests.py"),
        );
        assert_eq!(cmd.as_deref(), Some("nosetests"));
    }

    #[test]
    fn missing_project_root_is_a_silent_none() {
        let tmp = tempfile::tempdir().unwrap();
        let cmd = base_command(
            Convention::Django,
            &Settings::default(),
            &tmp.path().join("tests.py"),
        );
        assert_eq!(cmd, None);
    }

    #[test]
    fn settings_override_module_and_command() {
        let tmp = project();
        let settings = Settings {
            test_module: Some("run.py".into()),
            test_command: Some("check".into()),
            ..Settings::default()
        };
        let cmd = base_command(Convention::Django, &settings, &tmp.path().join("app/tests.py"))
            .unwrap();
        assert_eq!(
            cmd,
            format!("python {} check", tmp.path().join("run.py").display())
        );
    }

    #[test]
    fn virtualenv_prefix_and_options() {
        let settings = Settings {
            virtualenv: Some("venv".into()),
            test_command_options: Some("--failfast".into()),
            ..Settings::default()
        };
        assert_eq!(
            full_command("python manage.py test", &settings),
            "venvwrapper && workon venv && python manage.py test --failfast"
        );
    }

    #[test]
    fn wire_format_shape() {
        assert_eq!(
            compose("xterm", "python manage.py test", "app.T.test_x"),
            "\"xterm\" \"python manage.py test app.T.test_x\""
        );
        // Empty identifier keeps the trailing space
        assert_eq!(
            compose("xterm", "python setup.py test -q", ""),
            "\"xterm\" \"python setup.py test -q \""
        );
    }

    #[test]
    fn spawn_captures_combined_output() {
        let out = spawn("echo out; echo err 1>&2").unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
    }
}
