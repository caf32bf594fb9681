//! Anchors must name topics the index assigns to the file they appear in.

use super::{has_hard_space, HelpDocument, LintContext, Rule, NO_TOPIC};
use crate::models::{Diagnostic, Severity};
use crate::parse::parse_anchor_body;
use std::collections::HashSet;

const NAME: &str = "anchor";

#[derive(Default)]
pub struct AnchorRule {
    issues: Vec<Diagnostic>,
}

impl AnchorRule {
    pub fn new() -> Self {
        Self::default()
    }
}

/// First problem with an anchor topic, checked in priority order.
fn validate(
    cx: &LintContext<'_>,
    seen: &HashSet<String>,
    topic: &str,
    file: &str,
) -> Option<(Severity, String)> {
    if has_hard_space(topic) {
        return Some((
            Severity::Error,
            format!("Topic '{}' contains nonbreaking spaces or tabs", topic),
        ));
    }
    if topic.contains("  ") {
        return Some((
            Severity::Error,
            format!("Topic '{}' contains consecutive whitespace characters", topic),
        ));
    }
    if topic.starts_with('_') {
        if topic == NO_TOPIC {
            return None;
        }
        return Some((
            Severity::Warning,
            format!("The topic '{}' is reserved for internal use", topic),
        ));
    }
    let Some(entry) = cx.index.lookup(topic) else {
        return Some((
            Severity::Warning,
            format!("Topic '{}' was not found in the help index", topic),
        ));
    };
    if entry.file != file {
        return Some((
            Severity::Error,
            format!(
                "The topic '{}' is defined in another file ('{}')",
                topic, entry.file
            ),
        ));
    }
    if seen.contains(topic) || seen.contains(&entry.topic) {
        return Some((
            Severity::Error,
            format!("The topic '{}' already appears in this file", topic),
        ));
    }
    None
}

impl Rule for AnchorRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn scan(&mut self, doc: &HelpDocument, cx: &LintContext<'_>) {
        let file = doc.file.as_str();
        // The file name is an implicit topic of the file itself.
        let mut seen: HashSet<String> = HashSet::from([file.to_string()]);
        let mut present: HashSet<String> = seen.clone();

        for span in &doc.anchors {
            let anchor = parse_anchor_body(&span.body);
            match validate(cx, &seen, &anchor.topic, file) {
                Some((severity, message)) => {
                    self.issues.push(Diagnostic::new(
                        severity,
                        NAME,
                        file,
                        doc.position(span.offset),
                        message,
                    ));
                }
                None if !anchor.topic.starts_with('_') => {
                    // Aliases count for the canonical topic they name.
                    if let Some(entry) = cx.index.lookup(&anchor.topic) {
                        present.insert(entry.topic.clone());
                    }
                    present.insert(anchor.topic.clone());
                }
                None => {}
            }
            // An alias and its canonical topic are the same anchor.
            if let Some(entry) = cx.index.lookup(&anchor.topic) {
                seen.insert(entry.topic.clone());
            }
            seen.insert(anchor.topic);
        }

        for topic in cx.index.topics_for_file(file) {
            if !present.contains(&topic.topic) {
                self.issues.push(cx.index_issue(
                    Severity::Warning,
                    NAME,
                    format!(
                        "Topic '{}' appears in the index but not in '{}'",
                        topic.topic, file
                    ),
                ));
            }
        }
    }

    fn finalize(&mut self, _cx: &LintContext<'_>) -> Vec<Diagnostic> {
        std::mem::take(&mut self.issues)
    }
}
