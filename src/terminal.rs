//! Terminal emulator selection. The default is OS-dependent and computed
//! at most once per process: macOS gets a bundled launcher script next to
//! the executable; elsewhere the running session manager is probed once
//! to pick a terminal, falling back to xterm. An explicit override is
//! returned as-is and never cached.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Selects the terminal used to launch test runs. Hold one per process;
/// the detected default is memoized in the `OnceLock`.
#[derive(Debug, Default)]
pub struct TerminalSelector {
    default: OnceLock<String>,
}

impl TerminalSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The terminal to use. `preferred` (a settings or CLI value) always
    /// wins and bypasses the cache; otherwise the process-wide default is
    /// computed on first use.
    pub fn get(&self, preferred: Option<&str>) -> String {
        if let Some(terminal) = preferred {
            return resolve_preferred(terminal);
        }
        self.default.get_or_init(detect_default).clone()
    }
}

/// A bare executable name may refer to a launcher script shipped next to
/// our own binary; prefer that when it exists.
fn resolve_preferred(terminal: &str) -> String {
    let path = Path::new(terminal);
    if path.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
        return terminal.to_string();
    }
    if let Some(bundled) = bundled_launcher(terminal) {
        return bundled.display().to_string();
    }
    terminal.to_string()
}

/// Path of `name` in the directory holding the running executable, made
/// executable, when present.
fn bundled_launcher(name: &str) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.join(name);
    if !candidate.exists() {
        return None;
    }
    ensure_executable(&candidate);
    Some(candidate)
}

#[cfg(unix)]
fn ensure_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = std::fs::metadata(path) {
        let mut perms = meta.permissions();
        if perms.mode() & 0o111 == 0 {
            perms.set_mode(0o755);
            let _ = std::fs::set_permissions(path, perms);
        }
    }
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) {}

#[cfg(target_os = "macos")]
fn detect_default() -> String {
    // The bundled wrapper drives Terminal.app via osascript.
    bundled_launcher("Terminal.sh")
        .map_or_else(|| "Terminal.sh".into(), |p| p.display().to_string())
}

#[cfg(not(target_os = "macos"))]
fn detect_default() -> String {
    match probe_session_manager().as_deref() {
        Some("gnome-session") => "gnome-terminal".into(),
        Some("xfce4-session") => "terminal".into(),
        Some("ksmserver") => "konsole".into(),
        _ => "xterm".into(),
    }
}

/// First known session-manager process reported by `ps`, if any. Run
/// once per process; desktop sessions do not change under us.
#[cfg(not(target_os = "macos"))]
fn probe_session_manager() -> Option<String> {
    const SESSION_MANAGERS: &[&str] = &["gnome-session", "ksmserver", "xfce4-session"];

    let output = std::process::Command::new("ps")
        .args(["-eo", "comm"])
        .output()
        .ok()?;
    let comm = String::from_utf8_lossy(&output.stdout);
    comm.lines()
        .map(str::trim)
        .find(|line| SESSION_MANAGERS.contains(line))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_terminal_wins() {
        let selector = TerminalSelector::new();
        assert_eq!(
            selector.get(Some("/usr/bin/kitty")),
            "/usr/bin/kitty".to_string()
        );
    }

    #[test]
    fn preferred_is_never_cached() {
        let selector = TerminalSelector::new();
        let first = selector.get(None);
        // An override after the default was computed still takes effect.
        assert_eq!(selector.get(Some("/opt/alacritty")), "/opt/alacritty");
        // And the cached default is unchanged.
        assert_eq!(selector.get(None), first);
    }

    #[test]
    fn default_is_stable_within_a_process() {
        let selector = TerminalSelector::new();
        assert_eq!(selector.get(None), selector.get(None));
    }
}
