//! Upward directory walk locating the nearest ancestor that contains a
//! marker file or directory (`setup.py`, `models.py`, …). Marker presence
//! is how project and package boundaries are discovered — no manifest is
//! ever parsed.

use std::path::{Path, PathBuf};

/// Find the nearest directory, starting at `start` and walking upward,
/// that contains any name in `markers` (file or directory).
///
/// Returns `None` when no ancestor up to the filesystem root matches.
/// That is an ordinary outcome, not an error. Termination is bounded by
/// path depth: `Path::parent()` returning `None` is the root predicate,
/// so the walk is portable across root conventions.
#[must_use]
pub fn find_boundary(markers: &[&str], start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if markers.iter().any(|m| dir.join(m).exists()) {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
