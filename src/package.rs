//! Package-identifier derivation. Each convention has its own idea of
//! where a test file's package starts: django wants the app directory
//! (marked by `models.py` or a `models/` package), nose and setup-tool
//! want the path relative to the project root (marked by `setup.py` or
//! `settings.py`), rendered as a dotted module path.

use std::path::{Path, PathBuf};

use crate::ancestors::find_boundary;

/// Marker names signalling a Django app directory.
pub const DJANGO_APP_MARKERS: &[&str] = &["models.py", "models"];

/// Marker names signalling a project root.
pub const PROJECT_ROOT_MARKERS: &[&str] = &["setup.py", "settings.py"];

/// Name of the Django app containing `file`: the nearest ancestor with a
/// models module, identified by its own directory name.
#[must_use]
pub fn django_app(file: &Path) -> Option<String> {
    let app_dir = find_boundary(DJANGO_APP_MARKERS, file.parent()?)?;
    app_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Best guess at the project root for `file`.
#[must_use]
pub fn project_root(file: &Path) -> Option<PathBuf> {
    find_boundary(PROJECT_ROOT_MARKERS, file.parent()?)
}

/// Dotted package path of `file`'s directory relative to `root`, e.g.
/// `root/app/api/tests.py` → `app.api`. A file directly at the root has
/// no package (`None`); the identifier formatter supplies the test
/// module segment itself.
#[must_use]
pub fn module_package(file: &Path, root: &Path) -> Option<String> {
    let rel = file.parent()?.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("."))
}
