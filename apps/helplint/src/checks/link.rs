//! Links must be well formed and point at topics that exist.

use super::{has_hard_space, HelpDocument, LintContext, PackageRef, Rule};
use crate::models::{Diagnostic, Severity};
use crate::parse::{parse_link_body, ParsedLink};

const NAME: &str = "link";

#[derive(Default)]
pub struct LinkRule {
    issues: Vec<Diagnostic>,
}

impl LinkRule {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate(cx: &LintContext<'_>, link: &ParsedLink, body: &str) -> Option<(Severity, String)> {
    let Some(topic) = link.topic.as_deref() else {
        return Some((
            Severity::Error,
            format!("Malformed link; not enough ':' characters ('{}')", body),
        ));
    };
    if has_hard_space(topic) {
        return Some((
            Severity::Error,
            format!("Link '{}' contains nonbreaking spaces or tabs", topic),
        ));
    }

    let target = cx.resolve_package(link.package.as_deref());
    let Some(pkg) = cx.package_for(&target) else {
        return Some((
            Severity::Error,
            format!(
                "Link references a topic in a non-existent package ('{}')",
                link.package.as_deref().unwrap_or_default()
            ),
        ));
    };
    let Some(entry) = pkg.lookup(topic) else {
        return Some((
            Severity::Warning,
            format!("Link references unknown topic '{}'", topic),
        ));
    };
    if !cx.source.exists(&pkg.resource_path(&entry.file)) {
        return Some((
            Severity::Warning,
            format!(
                "Link references a non-existent package file ('{}')",
                entry.file
            ),
        ));
    }
    if let PackageRef::File(file) = target {
        if entry.file != file {
            return Some((
                Severity::Warning,
                format!(
                    "Link names file '{}' but topic '{}' is defined in '{}'",
                    file, topic, entry.file
                ),
            ));
        }
    }
    None
}

impl Rule for LinkRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn scan(&mut self, doc: &HelpDocument, cx: &LintContext<'_>) {
        for span in &doc.links {
            let link = parse_link_body(&span.body);
            if let Some((severity, message)) = validate(cx, &link, &span.body) {
                self.issues.push(Diagnostic::new(
                    severity,
                    NAME,
                    doc.file.as_str(),
                    doc.position(span.offset),
                    message,
                ));
            }
        }
    }

    fn finalize(&mut self, _cx: &LintContext<'_>) -> Vec<Diagnostic> {
        std::mem::take(&mut self.issues)
    }
}
