//! Runner-specific identifier formatting. Each convention owns the full
//! join: django dots everything, nose separates the module path from the
//! in-module path with `:` and addresses the `tests` module inside the
//! package, setup-tool runners take no identifier at all — they only run
//! whole suites, so every granularity maps to the empty string.

use crate::types::{Convention, Granularity};

impl Convention {
    /// Format (package, class, function) for the requested granularity.
    /// A missing class simply drops that segment — nose in particular
    /// addresses module-level test functions as `pkg.tests:fn`.
    #[must_use]
    pub fn format_identifier(
        self,
        package: &str,
        class: Option<&str>,
        function: &str,
        granularity: Granularity,
    ) -> String {
        match self {
            Self::Django => {
                let mut parts = vec![package];
                if granularity != Granularity::Suite {
                    parts.extend(class);
                }
                if granularity == Granularity::Method {
                    parts.push(function);
                }
                parts.join(".")
            }
            Self::Nose => {
                let module = format!("{package}.tests");
                match granularity {
                    Granularity::Suite => module,
                    Granularity::Class => match class {
                        Some(c) => format!("{module}:{c}"),
                        None => module,
                    },
                    Granularity::Method => match class {
                        Some(c) => format!("{module}:{c}.{function}"),
                        None => format!("{module}:{function}"),
                    },
                }
            }
            Self::SetupTool => String::new(),
        }
    }
}
