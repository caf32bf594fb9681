//! Lint runner: selects rules for a target, feeds them every obtainable
//! file, and merges their findings.
//!
//! Reading files and locating markup happens in parallel; rules then see
//! the documents one at a time in target order, so output is deterministic.

use crate::checks::{
    AnchorRule, HelpDocument, LinkRule, LintContext, MissingSourceRule, OrphanRule, Rule,
    TitleRule, TocRule,
};
use crate::markup::MarkupScanner;
use crate::models::{Diagnostic, LintResult, Summary};
use crate::source::FileSource;
use crate::store::{Catalog, IndexStore};
use crate::target::{resolve_target, LintTarget, TargetKind};
use rayon::prelude::*;

/// Rules that apply to a target of `kind`, in reporting order.
///
/// File-scoped rules always run; rules that reason about the package as a
/// whole only run for package targets.
pub fn rules_for(kind: TargetKind) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(AnchorRule::new()), Box::new(LinkRule::new())];
    if kind == TargetKind::WholePackage {
        rules.push(Box::new(MissingSourceRule::new()));
        rules.push(Box::new(TitleRule::new()));
        rules.push(Box::new(TocRule::new()));
        rules.push(Box::new(OrphanRule::new()));
    }
    rules
}

/// Read and scan the target files. Unreadable files are logged and left out.
fn load_documents(
    target: &LintTarget,
    source: &dyn FileSource,
    scanner: &dyn MarkupScanner,
) -> Vec<HelpDocument> {
    let ix = target.index.as_ref();
    let loaded: Vec<Option<HelpDocument>> = target
        .files
        .par_iter()
        .map(|file| {
            source
                .get_content(&ix.resource_path(file))
                .map(|text| HelpDocument::new(file, text, scanner))
        })
        .collect();
    target
        .files
        .iter()
        .zip(loaded)
        .filter_map(|(file, doc)| {
            if doc.is_none() {
                tracing::warn!(file = %file, package = %ix.package, "unable to lint file; content not available");
            }
            doc
        })
        .collect()
}

/// Run every applicable rule over `target`.
///
/// Returns the merged diagnostics (rule order, then emission order) and the
/// number of files that were actually scanned.
pub fn lint_target(
    target: &LintTarget,
    catalog: &Catalog,
    source: &dyn FileSource,
    scanner: &dyn MarkupScanner,
) -> (Vec<Diagnostic>, usize) {
    let ix = target.index.as_ref();
    let cx = LintContext::new(ix, catalog, source);
    let mut rules = rules_for(target.kind);
    let docs = load_documents(target, source, scanner);

    for doc in &docs {
        for rule in rules.iter_mut() {
            rule.scan(doc, &cx);
        }
    }

    let mut issues = Vec::new();
    for rule in rules.iter_mut() {
        let found = rule.finalize(&cx);
        tracing::debug!(rule = rule.name(), issues = found.len(), "rule finished");
        issues.extend(found);
    }
    (issues, docs.len())
}

pub fn lint(
    target: &LintTarget,
    catalog: &Catalog,
    source: &dyn FileSource,
    scanner: &dyn MarkupScanner,
) -> Vec<Diagnostic> {
    lint_target(target, catalog, source, scanner).0
}

/// Resolve `resource` against the store and lint it.
///
/// `None` means the resource is not inside any known document root; callers
/// treat that as nothing to do.
pub fn run_lint(resource: &str, store: &IndexStore, scanner: &dyn MarkupScanner) -> Option<LintResult> {
    let catalog = store.snapshot();
    let target = resolve_target(resource, &catalog)?;
    tracing::debug!(
        package = %target.index.package,
        scope = target.kind.as_str(),
        files = target.files.len(),
        "linting"
    );
    let (issues, scanned) = lint_target(&target, &catalog, store.source(), scanner);
    let summary = Summary::tally(&issues, scanned);
    Some(LintResult {
        scope: target.kind.as_str().to_string(),
        package: target.index.package.clone(),
        files: target.files.clone(),
        issues,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::HelpMarkup;
    use crate::models::index::PackageIndex;
    use crate::models::Severity;
    use crate::source::MemorySource;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn index() -> PackageIndex {
        PackageIndex::builder("Docs", "Docs/help")
            .file("index.txt", "Index")
            .file("other.txt", "Other")
            .topic("sec1", "other.txt")
            .build()
    }

    fn catalog(ix: &PackageIndex) -> Catalog {
        Arc::new(BTreeMap::from([(ix.package.clone(), Arc::new(ix.clone()))]))
    }

    #[test]
    fn test_rule_selection_by_scope() {
        let names = |k| rules_for(k).iter().map(|r| r.name()).collect::<Vec<_>>();
        assert_eq!(names(TargetKind::SingleFile), vec!["anchor", "link"]);
        assert_eq!(
            names(TargetKind::WholePackage),
            vec!["anchor", "link", "missing-source", "title", "toc", "orphan"]
        );
    }

    #[test]
    fn test_unreadable_file_is_skipped_but_still_reported_missing() {
        let ix = index();
        let src = MemorySource::new().with(
            "Docs/help/index.txt",
            "%hyperhelp title=\"Index\" date=\"2024-01-01\"\n|sec1|",
        );
        let target = LintTarget::whole_package(Arc::new(ix.clone()));
        let (issues, scanned) = lint_target(&target, &catalog(&ix), &src, &HelpMarkup);
        assert_eq!(scanned, 1);
        assert!(issues
            .iter()
            .any(|d| d.rule == "missing-source" && d.severity == Severity::Error && d.message.contains("'other.txt'")));
        assert!(issues.iter().all(|d| d.file != "other.txt"));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let ix = index();
        let src = MemorySource::new()
            .with("Docs/help/index.txt", "no header |missing| *sec1*")
            .with("Docs/help/other.txt", "*sec1* *sec1* |Nope:x:y|");
        let target = LintTarget::whole_package(Arc::new(ix.clone()));
        let cat = catalog(&ix);
        let first = lint(&target, &cat, &src, &HelpMarkup);
        let second = lint(&target, &cat, &src, &HelpMarkup);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    mod on_disk {
        use super::*;
        use crate::output::{jump_targets, render_report};
        use crate::source::DiskSource;
        use std::fs;
        use std::path::Path;
        use tempfile::tempdir;

        const INDEX: &str = r#"{
  "package": "Docs",
  "description": "Docs help",
  "doc_root": "help/",
  "help_files": {
    "index.txt": ["Index", {"topic": "start", "caption": "Start"}],
    "other.txt": ["Other", {"topic": "sec1", "caption": "Section"}]
  },
  "help_contents": ["index.txt"]
}"#;

        fn write(root: &Path, rel: &str, text: &str) {
            let p = root.join(rel);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, text).unwrap();
        }

        fn package(root: &Path, other: &str) {
            write(root, "Docs/help/hyperhelp.json", INDEX);
            write(
                root,
                "Docs/help/index.txt",
                "%hyperhelp title=\"Index\" date=\"2024-01-01\"\n\n*start*\nSee |other.txt:sec1:Section|.\n",
            );
            write(root, "Docs/help/other.txt", other);
        }

        fn store(root: &Path) -> IndexStore {
            IndexStore::open(Arc::new(DiskSource::new(root)), "hyperhelp.json")
        }

        #[test]
        fn test_linked_package_only_misses_toc_entry() {
            let dir = tempdir().unwrap();
            package(dir.path(), "%hyperhelp title=\"Other\" date=\"2024-01-01\"\n\n*sec1*\n");
            let res = run_lint("Docs/help", &store(dir.path()), &HelpMarkup).unwrap();
            assert_eq!(res.scope, "package");
            assert_eq!(res.summary.files, 2);
            assert_eq!(res.issues.len(), 1, "{:?}", res.issues);
            let d = &res.issues[0];
            assert_eq!(d.rule, "toc");
            assert_eq!(d.severity, Severity::Warning);
            assert_eq!(d.file, "hyperhelp.json");
            assert!(d.message.contains("'other.txt'"));
        }

        #[test]
        fn test_duplicate_anchor_reported_once_in_report() {
            let dir = tempdir().unwrap();
            package(
                dir.path(),
                "%hyperhelp title=\"Other\" date=\"2024-01-01\"\n*sec1*\n*sec1*\n",
            );
            let res = run_lint("Docs/help/other.txt", &store(dir.path()), &HelpMarkup).unwrap();
            assert_eq!(res.scope, "single");
            assert_eq!(res.issues.len(), 1);
            assert_eq!(res.summary.errors, 1);

            let report = render_report(&res);
            assert!(report.starts_with("Linting other.txt in help package: Docs\n"));
            assert!(report.ends_with("0 warnings, 1 error"));
            let jumps = jump_targets(&report);
            assert_eq!(jumps.len(), 1);
            assert_eq!(jumps[0].file, "other.txt");
            assert_eq!((jumps[0].line, jumps[0].column), (3, 1));
            assert!(jumps[0].message.contains("already appears in this file"));
        }

        #[test]
        fn test_declared_file_missing_on_disk() {
            let dir = tempdir().unwrap();
            write(
                dir.path(),
                "Docs/help/hyperhelp.json",
                r#"{"package": "Docs", "doc_root": "help/", "help_files": {"missing.txt": ["Missing"]}, "help_contents": ["missing.txt"]}"#,
            );
            let st = store(dir.path());
            let res = run_lint("Docs/help/hyperhelp.json", &st, &HelpMarkup).unwrap();
            let missing: Vec<Diagnostic> = res
                .issues
                .iter()
                .filter(|d| d.rule == "missing-source")
                .cloned()
                .collect();
            let summary = Summary::tally(&missing, 0);
            assert_eq!((summary.warnings, summary.errors), (0, 1));
            assert_eq!(missing[0].file, "hyperhelp.json");
            assert_eq!(res.summary.files, 0);
        }

        #[test]
        fn test_path_outside_packages_has_no_target() {
            let dir = tempdir().unwrap();
            package(dir.path(), "");
            assert!(run_lint("Elsewhere/help/a.txt", &store(dir.path()), &HelpMarkup).is_none());
        }
    }
}
