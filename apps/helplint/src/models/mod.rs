//! Shared data models for lint output and the package index.

pub mod index;

use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
/// How serious a finding is. Only `Error` affects the exit status.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honor width/alignment so the reporter can pad with `{:<7}`.
        f.pad(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// A single lint finding with severity and a 1-based location.
///
/// Findings about the index itself carry the index file (relative to the
/// document root) and position `1:1`.
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: &'static str,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        rule: &'static str,
        file: impl Into<String>,
        (line, column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity,
            rule,
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub files: usize,
}

impl Summary {
    /// Count severities across `issues`; `files` is the number of files scanned.
    pub fn tally(issues: &[Diagnostic], files: usize) -> Self {
        let mut summary = Summary {
            files,
            ..Summary::default()
        };
        for is in issues {
            match is.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }
        summary
    }
}

#[derive(Serialize, Debug, Clone)]
/// Lint results container for one target.
pub struct LintResult {
    /// `package` or `single`.
    pub scope: String,
    pub package: String,
    /// Files requested by the target, in scan order.
    pub files: Vec<String>,
    pub issues: Vec<Diagnostic>,
    pub summary: Summary,
}
