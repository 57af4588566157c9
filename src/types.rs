use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::NeartestError;

/// Functions must carry this prefix to count as tests.
pub const TEST_PREFIX: &str = "test_";

/// A cursor position: file path plus byte offset. Built once per invocation.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub offset: usize,
}

impl SourceLocation {
    #[must_use]
    pub fn new(path: PathBuf, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Build a location from a 1-based line and 1-based column by reading
    /// the file. Out-of-range positions clamp into the buffer.
    pub fn at_line(path: PathBuf, line: usize, col: usize) -> Result<Self, NeartestError> {
        let source = crate::read_source(&path)?;
        let offset = byte_offset(&source, line, col);
        Ok(Self { path, offset })
    }
}

/// Byte offset of (1-based line, 1-based column), clamped into the buffer.
fn byte_offset(source: &str, line: usize, col: usize) -> usize {
    let line = line.max(1) - 1;
    let col = col.max(1) - 1;
    let mut remaining = line;
    let mut pos = 0;
    for (i, b) in source.bytes().enumerate() {
        if remaining == 0 {
            break;
        }
        if b == b'\n' {
            remaining -= 1;
            pos = i + 1;
        }
    }
    if remaining > 0 {
        return source.len();
    }
    // Clamp the column to the current line.
    let line_end = source[pos..].find('\n').map_or(source.len(), |n| pos + n);
    (pos + col).min(line_end)
}

/// How much of the suite a run addresses. Narrows monotonically:
/// suite ⊇ class ⊇ method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Method,
    Class,
    Suite,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Method => write!(f, "method"),
            Self::Class => write!(f, "class"),
            Self::Suite => write!(f, "suite"),
        }
    }
}

/// A test framework's identifier syntax and base invocation. Carried
/// through the type system so unknown names are rejected once, at the
/// configuration boundary, instead of silently formatting nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    Django,
    Nose,
    SetupTool,
}

impl FromStr for Convention {
    type Err = NeartestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "django" => Ok(Self::Django),
            "nose" => Ok(Self::Nose),
            // "setup.py" is the name the original plugin settings used
            "setup-tool" | "setup.py" => Ok(Self::SetupTool),
            other => Err(NeartestError::Config {
                reason: format!(
                    "unknown convention \"{other}\" (expected django, nose, or setup-tool)"
                ),
            }),
        }
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Django => write!(f, "django"),
            Self::Nose => write!(f, "nose"),
            Self::SetupTool => write!(f, "setup-tool"),
        }
    }
}

/// Output of the scope resolver: the function that was searched for and
/// its lexically enclosing class, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub class: Option<String>,
    pub function: String,
}

/// A fully resolved test target. `identifier` may be empty — setup-tool
/// runners only execute whole suites and take no identifier suffix.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTest {
    pub identifier: String,
    pub package: String,
    pub class: Option<String>,
    pub function: String,
}
