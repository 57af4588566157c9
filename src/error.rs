use std::path::PathBuf;

/// Exit code for a malformed invocation (no file, no cursor position).
/// Distinct from every error variant so scripts can tell "bad invocation"
/// from "unparseable file"; 64 is BSD's EX_USAGE.
pub const EXIT_USAGE: i32 = 64;

/// Every error neartest can produce. "No test here" is not an error —
/// resolution yields `None` and the caller stays silent.
#[derive(Debug)]
pub enum NeartestError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The active file is not syntactically valid Python. Fatal to the
    /// request; reported, never papered over with a partial result.
    ParseError {
        path: PathBuf,
        reason: String,
    },
    /// Bad configuration — unknown convention, unreadable settings file.
    /// Surfaced distinctly from "no test here" so users can fix it.
    Config {
        reason: String,
    },
}

impl std::fmt::Display for NeartestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            Self::ParseError { path, reason } => {
                write!(f, "parse error in {}: {reason}", path.display())
            }
            Self::Config { reason } => {
                write!(f, "configuration error: {reason}")
            }
        }
    }
}

impl std::error::Error for NeartestError {}

impl NeartestError {
    /// Process exit code for the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::IoError { .. } => 2,
            Self::ParseError { .. } => 3,
            Self::Config { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn usage_code_collides_with_no_error_variant() {
        let errors = [
            NeartestError::IoError {
                path: PathBuf::from("x.py"),
                source: std::io::Error::other("gone"),
            },
            NeartestError::ParseError {
                path: PathBuf::from("x.py"),
                reason: "invalid syntax".into(),
            },
            NeartestError::Config {
                reason: "unknown convention".into(),
            },
        ];
        for e in &errors {
            assert_ne!(e.exit_code(), EXIT_USAGE);
        }
    }
}
