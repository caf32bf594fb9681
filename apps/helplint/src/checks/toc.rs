//! Every indexed file should be reachable from the table of contents.

use super::{LintContext, Rule};
use crate::models::index::Toc;
use crate::models::{Diagnostic, Severity};
use std::collections::HashSet;

const NAME: &str = "toc";

#[derive(Default)]
pub struct TocRule;

impl TocRule {
    pub fn new() -> Self {
        TocRule
    }
}

/// Files of every node reachable from the TOC roots, depth first.
/// A node reached a second time is not expanded again.
pub fn toc_files(toc: &Toc) -> HashSet<&str> {
    let mut files = HashSet::new();
    let mut visited = vec![false; toc.len()];
    let mut stack: Vec<usize> = toc.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(node) = toc.node(id) else {
            continue;
        };
        if std::mem::replace(&mut visited[id], true) {
            continue;
        }
        files.insert(node.file.as_str());
        stack.extend(node.children.iter().rev().copied());
    }
    files
}

impl Rule for TocRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn finalize(&mut self, cx: &LintContext<'_>) -> Vec<Diagnostic> {
        let reached = toc_files(cx.index.toc());
        cx.index
            .files()
            .filter(|f| !reached.contains(f.path.as_str()))
            .map(|f| {
                cx.index_issue(
                    Severity::Warning,
                    NAME,
                    format!(
                        "Help file '{}' is not represented in the table of contents",
                        f.path
                    ),
                )
            })
            .collect()
    }
}
