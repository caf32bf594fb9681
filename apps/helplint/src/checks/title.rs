//! Each file's header title must match the title declared in the index.

use super::{HelpDocument, LintContext, Rule};
use crate::models::{Diagnostic, Severity};
use crate::parse::parse_header;

const NAME: &str = "title";

#[derive(Default)]
pub struct TitleRule {
    issues: Vec<Diagnostic>,
}

impl TitleRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for TitleRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn scan(&mut self, doc: &HelpDocument, cx: &LintContext<'_>) {
        let Some(header) = parse_header(doc.first_line()) else {
            self.issues.push(Diagnostic::new(
                Severity::Error,
                NAME,
                doc.file.as_str(),
                (1, 1),
                format!("File '{}' does not have a help header", doc.file),
            ));
            return;
        };
        let Some(declared) = cx.index.title_of(&doc.file) else {
            return;
        };
        if declared != header.title {
            self.issues.push(Diagnostic::new(
                Severity::Warning,
                NAME,
                doc.file.as_str(),
                (1, 1),
                format!(
                    "Title in file header for '{}' does not match the index",
                    doc.file
                ),
            ));
        }
    }

    fn finalize(&mut self, _cx: &LintContext<'_>) -> Vec<Diagnostic> {
        std::mem::take(&mut self.issues)
    }
}
