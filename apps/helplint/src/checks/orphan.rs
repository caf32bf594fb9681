//! Every indexed file should be linked from some other file of its package.
//!
//! Reachability starts at the root help file and grows with every
//! same-package link seen during the scan; the verdict is only known once
//! all files have been scanned.

use super::{HelpDocument, LintContext, PackageRef, Rule, ROOT_HELP_FILE};
use crate::models::{Diagnostic, Severity};
use crate::parse::parse_link_body;
use std::collections::HashSet;

const NAME: &str = "orphan";

pub struct OrphanRule {
    linked: HashSet<String>,
}

impl Default for OrphanRule {
    fn default() -> Self {
        OrphanRule {
            linked: HashSet::from([ROOT_HELP_FILE.to_string()]),
        }
    }
}

impl OrphanRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for OrphanRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn scan(&mut self, doc: &HelpDocument, cx: &LintContext<'_>) {
        for span in &doc.links {
            let link = parse_link_body(&span.body);
            let Some(topic) = link.topic.as_deref() else {
                continue;
            };
            match cx.resolve_package(link.package.as_deref()) {
                PackageRef::Local | PackageRef::File(_) => {}
                PackageRef::Foreign(_) | PackageRef::Unknown(_) => continue,
            }
            let Some(entry) = cx.index.lookup(topic) else {
                continue;
            };
            if entry.file != doc.file {
                self.linked.insert(entry.file.clone());
            }
        }
    }

    fn finalize(&mut self, cx: &LintContext<'_>) -> Vec<Diagnostic> {
        cx.index
            .files()
            .filter(|f| !self.linked.contains(&f.path))
            .map(|f| {
                cx.index_issue(
                    Severity::Warning,
                    NAME,
                    format!(
                        "Help file '{}' is not linked to from any other file in this package",
                        f.path
                    ),
                )
            })
            .collect()
    }
}
