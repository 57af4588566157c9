#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions, // Rust naming conventions
    clippy::missing_errors_doc,      // error conditions documented on the error type
    clippy::must_use_candidate,
)]

pub mod ancestors;
pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
mod ident;
pub mod package;
pub mod scope;
pub mod terminal;
pub mod types;

use std::fs;
use std::path::Path;

use config::Settings;
use error::NeartestError;
use terminal::TerminalSelector;
use types::{Convention, Granularity, ResolvedScope, ResolvedTest, SourceLocation, TEST_PREFIX};

/// Read a source file, wrapping the failure with its path.
pub fn read_source(path: &Path) -> Result<String, NeartestError> {
    fs::read_to_string(path).map_err(|source| NeartestError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the test at `location` into a runner identifier.
///
/// Returns `Ok(None)` — silently, by design — when there is no function
/// above the cursor, the nearest one is not a `test_` function, or no
/// package boundary exists for the convention. A file that does not
/// parse is a hard [`NeartestError::ParseError`].
pub fn locate(
    location: &SourceLocation,
    convention: Convention,
    granularity: Granularity,
    settings: &Settings,
) -> Result<Option<ResolvedTest>, NeartestError> {
    let source = read_source(&location.path)?;
    let tree = scope::parse(&source, &location.path)?;

    // Editor surface: nearest function definition at or above the cursor.
    let entities = cursor::function_entities(&tree, &source);
    let Some(entity) = cursor::nearest_function(&entities, location.offset) else {
        return Ok(None);
    };
    if !entity.name.starts_with(TEST_PREFIX) {
        // Not a test — "no test here", not an error.
        return Ok(None);
    }
    let function = entity.name.clone();

    let scope = ResolvedScope {
        class: scope::enclosing_class(&tree, &source, &function),
        function,
    };

    let Some(package) = package_identifier(convention, &location.path, settings) else {
        return Ok(None);
    };

    let identifier = convention.format_identifier(
        &package,
        scope.class.as_deref(),
        &scope.function,
        granularity,
    );

    Ok(Some(ResolvedTest {
        identifier,
        package,
        class: scope.class,
        function: scope.function,
    }))
}

/// Convention-specific package derivation (django app name vs dotted
/// module path under the project root).
fn package_identifier(
    convention: Convention,
    file: &Path,
    settings: &Settings,
) -> Option<String> {
    match convention {
        Convention::Django => package::django_app(file),
        Convention::Nose => package::module_package(file, &resolved_root(settings, file)?),
        // Setup-tool runners never address into the suite, so only the
        // boundary must exist; a file directly at the project root still
        // resolves, with no package segment.
        Convention::SetupTool => {
            let root = resolved_root(settings, file)?;
            Some(package::module_package(file, &root).unwrap_or_default())
        }
    }
}

/// Project root from settings, falling back to marker discovery.
fn resolved_root(settings: &Settings, file: &Path) -> Option<std::path::PathBuf> {
    match &settings.project_root {
        Some(root) => Some(root.clone()),
        None => package::project_root(file),
    }
}

/// A resolved test plus the terminal-ready command that runs it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TestRun {
    #[serde(flatten)]
    pub test: ResolvedTest,
    pub command: String,
}

/// The whole chain: locate the test, build the runner invocation, wrap
/// it for the selected terminal. `terminal` is the per-invocation
/// override; it beats both settings and the cached default.
pub fn prepare(
    location: &SourceLocation,
    convention: Convention,
    granularity: Granularity,
    settings: &Settings,
    selector: &TerminalSelector,
    terminal: Option<&str>,
) -> Result<Option<TestRun>, NeartestError> {
    let Some(test) = locate(location, convention, granularity, settings)? else {
        return Ok(None);
    };

    let Some(base) = command::base_command(convention, settings, &location.path) else {
        return Ok(None);
    };
    let full = command::full_command(&base, settings);

    let preferred = terminal.or(settings.terminal.as_deref());
    let terminal = selector.get(preferred);

    let command = command::compose(&terminal, &full, &test.identifier);
    Ok(Some(TestRun { test, command }))
}
