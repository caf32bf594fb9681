//! The files declared in the index must match the help files on disk.

use super::{LintContext, Rule};
use crate::models::{Diagnostic, Severity};
use std::collections::BTreeSet;

const NAME: &str = "missing-source";

/// File name pattern of help sources under a document root.
pub const HELP_FILE_GLOB: &str = "*.txt";

#[derive(Default)]
pub struct MissingSourceRule;

impl MissingSourceRule {
    pub fn new() -> Self {
        MissingSourceRule
    }
}

impl Rule for MissingSourceRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn finalize(&mut self, cx: &LintContext<'_>) -> Vec<Diagnostic> {
        let ix = cx.index;
        let prefix = format!("{}/", ix.doc_root);
        let on_disk: BTreeSet<String> = cx
            .source
            .list_resources(&ix.doc_root, HELP_FILE_GLOB)
            .into_iter()
            .filter_map(|r| r.strip_prefix(&prefix).map(str::to_string))
            .collect();

        let mut out = Vec::new();
        for file in on_disk.iter().filter(|f| !ix.has_file(f)) {
            out.push(cx.index_issue(
                Severity::Warning,
                NAME,
                format!(
                    "Help file '{}' is in {}/ but missing from the index",
                    file, ix.doc_root
                ),
            ));
        }
        for file in ix.files().filter(|f| !on_disk.contains(&f.path)) {
            out.push(cx.index_issue(
                Severity::Error,
                NAME,
                format!(
                    "Help file '{}' is in the index but not in {}/",
                    file.path, ix.doc_root
                ),
            ));
        }
        out
    }
}
