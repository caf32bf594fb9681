//! Report rendering for lint results.
//!
//! Supports `human` (default) and `json` outputs. The human report is a
//! contract with "jump to issue" integrations: file header lines must match
//! `FILE_REGEX` and issue lines must match `ISSUE_REGEX`. Colors, when on,
//! only wrap the severity word and the summary line.

use crate::models::{Diagnostic, LintResult, Severity};
use crate::store::Catalog;
use owo_colors::OwoColorize;
use regex::Regex;
use serde_json::{json, Value as JsonVal};
use std::sync::LazyLock;

/// Matches a file header line; capture 1 is the file.
pub const FILE_REGEX: &str = r"^([^:]+):$";
/// Matches an issue line; captures are line, column and message.
pub const ISSUE_REGEX: &str = r"^.*?@ (\d+):(\d+)\s+(.*)$";

static FILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(FILE_REGEX).unwrap());
static ISSUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ISSUE_REGEX).unwrap());

fn use_colors(output: &str) -> bool {
    use std::io::IsTerminal;
    output != "json" && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Group issues by file, keeping the order in which files first appear.
pub fn group_by_file(issues: &[Diagnostic]) -> Vec<(&str, Vec<&Diagnostic>)> {
    let mut groups: Vec<(&str, Vec<&Diagnostic>)> = Vec::new();
    for is in issues {
        match groups.iter_mut().find(|(file, _)| *file == is.file) {
            Some((_, list)) => list.push(is),
            None => groups.push((is.file.as_str(), vec![is])),
        }
    }
    groups
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

/// `"<n> warning(s), <m> error(s)"` for the given issues.
pub fn summary_line(res: &LintResult) -> String {
    format!(
        "{}, {}",
        plural(res.summary.warnings, "warning"),
        plural(res.summary.errors, "error")
    )
}

fn title_line(res: &LintResult) -> String {
    match (res.scope.as_str(), res.files.first()) {
        ("single", Some(file)) => format!("Linting {} in help package: {}", file, res.package),
        _ => format!("Linting help package: {}", res.package),
    }
}

fn render_lines(res: &LintResult, color: bool) -> Vec<String> {
    let mut out = vec![title_line(res), String::new()];
    for (file, issues) in group_by_file(&res.issues) {
        out.push(format!("{}:", file));
        for is in issues {
            let sev = format!("{:<7}", is.severity);
            let sev = if color {
                match is.severity {
                    Severity::Error => sev.red().bold().to_string(),
                    Severity::Warning => sev.yellow().bold().to_string(),
                    Severity::Info => sev.blue().bold().to_string(),
                }
            } else {
                sev
            };
            let pos = format!("{}:{}", is.line, is.column);
            out.push(format!("    {} @ {:<7} {}", sev, pos, is.message));
        }
        out.push(String::new());
    }
    let summary = summary_line(res);
    out.push(if color {
        summary.bold().to_string()
    } else {
        summary
    });
    out
}

/// Render the plain-text report.
pub fn render_report(res: &LintResult) -> String {
    render_lines(res, false).join("\n")
}

/// A location recovered from a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTarget {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Read a rendered report back the way an editor integration does, using
/// only `FILE_REGEX` and `ISSUE_REGEX`.
pub fn jump_targets(report: &str) -> Vec<JumpTarget> {
    let mut current: Option<String> = None;
    let mut out = Vec::new();
    for line in report.lines() {
        if let Some(c) = FILE_RE.captures(line) {
            current = Some(c[1].to_string());
            continue;
        }
        let (Some(file), Some(c)) = (current.as_ref(), ISSUE_RE.captures(line)) else {
            continue;
        };
        let (Ok(l), Ok(col)) = (c[1].parse::<usize>(), c[2].parse::<usize>()) else {
            continue;
        };
        out.push(JumpTarget {
            file: file.clone(),
            line: l,
            column: col,
            message: c[3].to_string(),
        });
    }
    out
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintResult) -> JsonVal {
    serde_json::to_value(res).unwrap_or(JsonVal::Null)
}

/// Print lint results in the requested format.
pub fn print_lint(res: &LintResult, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(res)).unwrap_or_default()
        ),
        _ => {
            for line in render_lines(res, use_colors(output)) {
                println!("{}", line);
            }
        }
    }
}

/// Compose the package listing as JSON, one object per package.
pub fn compose_packages_json(catalog: &Catalog) -> JsonVal {
    JsonVal::Array(
        catalog
            .values()
            .map(|ix| {
                json!({
                    "package": ix.package,
                    "description": ix.description,
                    "doc_root": ix.doc_root,
                    "index": ix.index_location,
                    "files": ix.file_count(),
                })
            })
            .collect(),
    )
}

/// Print the loaded packages in the requested format.
pub fn print_packages(catalog: &Catalog, output: &str) {
    if output == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&compose_packages_json(catalog)).unwrap_or_default()
        );
        return;
    }
    let color = use_colors(output);
    for ix in catalog.values() {
        let name = if color {
            ix.package.bold().to_string()
        } else {
            ix.package.clone()
        };
        println!("{} ({}, {})", name, ix.doc_root, plural(ix.file_count(), "file"));
    }
    println!("{}", plural(catalog.len(), "package"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Summary;

    fn result(scope: &str, issues: Vec<Diagnostic>) -> LintResult {
        let summary = Summary::tally(&issues, 2);
        LintResult {
            scope: scope.into(),
            package: "Docs".into(),
            files: vec!["index.txt".into(), "other.txt".into()],
            issues,
            summary,
        }
    }

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new(Severity::Error, "anchor", "other.txt", (3, 1), "The topic 'sec1' already appears in this file"),
            Diagnostic::new(Severity::Warning, "toc", "hyperhelp.json", (1, 1), "Help file 'other.txt' is not represented in the table of contents"),
            Diagnostic::new(Severity::Warning, "link", "other.txt", (12, 40), "Link references unknown topic 'x'"),
        ]
    }

    #[test]
    fn test_render_package_report() {
        let text = render_report(&result("package", sample()));
        let expected = "\
Linting help package: Docs

other.txt:
    error   @ 3:1     The topic 'sec1' already appears in this file
    warning @ 12:40   Link references unknown topic 'x'

hyperhelp.json:
    warning @ 1:1     Help file 'other.txt' is not represented in the table of contents

2 warnings, 1 error";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_single_file_title_and_empty_summary() {
        let mut res = result("single", Vec::new());
        res.files = vec!["other.txt".into()];
        let text = render_report(&res);
        assert_eq!(text, "Linting other.txt in help package: Docs\n\n0 warnings, 0 errors");
    }

    #[test]
    fn test_report_lines_match_jump_regexes() {
        let targets = jump_targets(&render_report(&result("package", sample())));
        assert_eq!(targets.len(), 3);
        assert_eq!(
            targets[1],
            JumpTarget {
                file: "other.txt".into(),
                line: 12,
                column: 40,
                message: "Link references unknown topic 'x'".into(),
            }
        );
        assert_eq!(targets[2].file, "hyperhelp.json");
    }

    #[test]
    fn test_compose_lint_json_shape() {
        let out = compose_lint_json(&result("package", sample()));
        assert_eq!(out["summary"]["warnings"], 2);
        assert_eq!(out["issues"][0]["severity"], "error");
        assert_eq!(out["issues"][0]["rule"], "anchor");
        assert_eq!(out["issues"][2]["column"], 40);
    }

    #[test]
    fn test_compose_packages_json() {
        use crate::models::index::PackageIndex;
        use std::collections::BTreeMap;
        use std::sync::Arc;

        let ix = PackageIndex::builder("Docs", "Docs/help")
            .description("Docs help")
            .file("index.txt", "Index")
            .build();
        let cat: Catalog = Arc::new(BTreeMap::from([("Docs".to_string(), Arc::new(ix))]));
        let out = compose_packages_json(&cat);
        assert_eq!(out[0]["package"], "Docs");
        assert_eq!(out[0]["doc_root"], "Docs/help");
        assert_eq!(out[0]["index"], "Docs/help/hyperhelp.json");
        assert_eq!(out[0]["files"], 1);
    }
}
