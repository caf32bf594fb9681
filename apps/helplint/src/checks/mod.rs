//! Consistency rules run by the lint orchestrator.
//!
//! Every rule sees each scanned document through `scan` and reports through
//! `finalize`, which runs once after the last document. Rules keep their own
//! diagnostics and never look at each other's state.

mod anchor;
mod link;
mod missing_source;
mod orphan;
mod title;
mod toc;

pub use anchor::AnchorRule;
pub use link::LinkRule;
pub use missing_source::MissingSourceRule;
pub use orphan::OrphanRule;
pub use title::TitleRule;
pub use toc::TocRule;

use crate::markup::{LineIndex, MarkupScanner, MarkupSpan};
use crate::models::index::PackageIndex;
use crate::models::{Diagnostic, Severity};
use crate::source::FileSource;
use crate::store::Catalog;

/// Topic id that anchors may use to opt out of indexing.
pub const NO_TOPIC: &str = "_none";
/// Help file every package is entered through.
pub const ROOT_HELP_FILE: &str = "index.txt";

pub trait Rule {
    fn name(&self) -> &'static str;

    fn scan(&mut self, _doc: &HelpDocument, _cx: &LintContext<'_>) {}

    fn finalize(&mut self, cx: &LintContext<'_>) -> Vec<Diagnostic>;
}

/// A help file's text with its markup already located.
#[derive(Debug, Clone)]
pub struct HelpDocument {
    /// Path relative to the document root, as declared in the index.
    pub file: String,
    pub text: String,
    pub anchors: Vec<MarkupSpan>,
    pub links: Vec<MarkupSpan>,
    lines: LineIndex,
}

impl HelpDocument {
    pub fn new(file: &str, text: String, scanner: &dyn MarkupScanner) -> Self {
        HelpDocument {
            file: file.to_string(),
            anchors: scanner.find_anchors(&text),
            links: scanner.find_links(&text),
            lines: LineIndex::new(&text),
            text,
        }
    }

    pub fn position(&self, offset: usize) -> (usize, usize) {
        self.lines.position(&self.text, offset)
    }

    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }
}

/// What a link's package qualifier refers to.
#[derive(Debug)]
pub enum PackageRef<'a> {
    /// No qualifier, or the linking package's own name.
    Local,
    /// Qualifier is a file of the linking package rather than a package.
    File(&'a str),
    Foreign(&'a PackageIndex),
    Unknown(&'a str),
}

/// Shared, read-only inputs of one lint run.
pub struct LintContext<'a> {
    pub index: &'a PackageIndex,
    pub catalog: &'a Catalog,
    pub source: &'a dyn FileSource,
}

impl<'a> LintContext<'a> {
    pub fn new(index: &'a PackageIndex, catalog: &'a Catalog, source: &'a dyn FileSource) -> Self {
        LintContext {
            index,
            catalog,
            source,
        }
    }

    /// Diagnostic attributed to the index file at `1:1`.
    pub fn index_issue(&self, severity: Severity, rule: &'static str, message: String) -> Diagnostic {
        Diagnostic::new(severity, rule, self.index.index_file(), (1, 1), message)
    }

    pub fn resolve_package<'q>(&self, qualifier: Option<&'q str>) -> PackageRef<'q>
    where
        'a: 'q,
    {
        let Some(name) = qualifier else {
            return PackageRef::Local;
        };
        if name == self.index.package {
            return PackageRef::Local;
        }
        if let Some(pkg) = self.catalog.get(name) {
            return PackageRef::Foreign(pkg.as_ref());
        }
        if self.index.has_file(name) {
            return PackageRef::File(name);
        }
        PackageRef::Unknown(name)
    }

    /// The index a resolved reference points into, if any.
    pub fn package_for<'r>(&self, pkg: &PackageRef<'r>) -> Option<&'r PackageIndex>
    where
        'a: 'r,
    {
        match pkg {
            PackageRef::Local | PackageRef::File(_) => Some(self.index),
            PackageRef::Foreign(ix) => Some(*ix),
            PackageRef::Unknown(_) => None,
        }
    }
}

fn has_hard_space(topic: &str) -> bool {
    topic.contains('\u{00a0}') || topic.contains('\t')
}
