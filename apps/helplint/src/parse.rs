//! Stateless text grammars for help headers, anchor bodies and link bodies.
//!
//! None of these validate topics against an index; they only segment text.
//! Failures are returned as `None` values and turned into diagnostics by the
//! rules.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Sigil every help file header line starts with.
pub const HEADER_SIGIL: &str = "%hyperhelp";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^{}((?:\s+[A-Za-z_][A-Za-z0-9_]*="[^"]*")*)\s*$"#,
        regex::escape(HEADER_SIGIL)
    ))
    .unwrap()
});
static HEADER_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)="([^"]*)""#).unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub title: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnchor {
    pub topic: String,
    pub display_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// `None` for links into the linking file's own package.
    pub package: Option<String>,
    /// `None` when the body cannot be segmented.
    pub topic: Option<String>,
    pub display_text: String,
}

/// Parse the first line of a help file.
///
/// The line must be the sigil followed only by `key="value"` pairs, with
/// `title` and a valid `date` present. Other keys are ignored.
pub fn parse_header(first_line: &str) -> Option<ParsedHeader> {
    let line = first_line.trim_end_matches(['\r', '\n']);
    let caps = HEADER_RE.captures(line)?;
    let pairs: HashMap<&str, &str> = HEADER_PAIR_RE
        .captures_iter(caps.get(1).map_or("", |m| m.as_str()))
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect();
    let title = pairs.get("title")?;
    let date = pairs.get("date")?;
    if !is_iso_date(date) {
        return None;
    }
    Some(ParsedHeader {
        title: title.to_string(),
        date: date.to_string(),
    })
}

fn is_iso_date(s: &str) -> bool {
    let Some(c) = DATE_RE.captures(s) else {
        return false;
    };
    let month: u32 = c[2].parse().unwrap_or(0);
    let day: u32 = c[3].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Split an anchor body into topic and display text on the first `:`.
pub fn parse_anchor_body(body: &str) -> ParsedAnchor {
    match body.split_once(':') {
        Some((topic, text)) => ParsedAnchor {
            topic: topic.to_string(),
            display_text: text.to_string(),
        },
        None => ParsedAnchor {
            topic: body.to_string(),
            display_text: String::new(),
        },
    }
}

/// Split a link body of the form `[package:]topic[:text]`.
///
/// Two segments are always `topic:text` in the current package; three or
/// more take the first as package and keep any further `:` in the text.
pub fn parse_link_body(body: &str) -> ParsedLink {
    let parts: Vec<&str> = body.splitn(3, ':').collect();
    let (package, topic, text) = match parts.as_slice() {
        [topic] => (None, *topic, ""),
        [topic, text] => (None, *topic, *text),
        [pkg, topic, text] => ((!pkg.is_empty()).then_some(*pkg), *topic, *text),
        _ => (None, "", ""),
    };
    ParsedLink {
        package: package.map(str::to_string),
        topic: (!topic.is_empty()).then(|| topic.to_string()),
        display_text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parses_title_and_date() {
        let h = parse_header(r#"%hyperhelp title="Index file for Docs" date="2024-03-09""#).unwrap();
        assert_eq!(h.title, "Index file for Docs");
        assert_eq!(h.date, "2024-03-09");
        // extra keys and a trailing newline are fine
        let h = parse_header("%hyperhelp date=\"2020-01-31\" extra=\"x\" title=\"T\"\n").unwrap();
        assert_eq!(h.title, "T");
    }

    #[test]
    fn test_header_must_start_with_sigil() {
        let line = format!("{} title=\"T\" date=\"2024-01-01\"", HEADER_SIGIL);
        assert_eq!(parse_header(&line).map(|h| h.title), Some("T".to_string()));
        assert!(parse_header(&format!(" {}", line)).is_none());
        assert!(parse_header("%hyperhelpx title=\"T\" date=\"2024-01-01\"").is_none());
    }

    #[test]
    fn test_header_rejects_bad_lines() {
        assert!(parse_header("Just some text").is_none());
        assert!(parse_header(r#"%hyperhelp title="T""#).is_none());
        assert!(parse_header(r#"%hyperhelp date="2020-01-01""#).is_none());
        assert!(parse_header(r#"%hyperhelp title="T" date="2020-13-01""#).is_none());
        assert!(parse_header(r#"%hyperhelp title="T" date="yesterday""#).is_none());
        assert!(parse_header(r#"%hyperhelp title="T" date="2020-01-01" junk"#).is_none());
        assert!(parse_header(r#"%hyperhelpx title="T" date="2020-01-01""#).is_none());
    }

    #[test]
    fn test_anchor_body() {
        assert_eq!(
            parse_anchor_body("sec1:Section One"),
            ParsedAnchor {
                topic: "sec1".into(),
                display_text: "Section One".into()
            }
        );
        let a = parse_anchor_body("sec1");
        assert_eq!(a.topic, "sec1");
        assert_eq!(a.display_text, "");
        // whitespace is preserved for the rules to judge
        assert_eq!(parse_anchor_body("two  spaces").topic, "two  spaces");
    }

    #[test]
    fn test_link_body_segments() {
        let l = parse_link_body("pkgA:topicB:hello");
        assert_eq!(l.package.as_deref(), Some("pkgA"));
        assert_eq!(l.topic.as_deref(), Some("topicB"));
        assert_eq!(l.display_text, "hello");

        let l = parse_link_body("topicB");
        assert_eq!(l.package, None);
        assert_eq!(l.topic.as_deref(), Some("topicB"));
        assert_eq!(l.display_text, "");

        let l = parse_link_body("topicB:Some text");
        assert_eq!(l.package, None);
        assert_eq!(l.topic.as_deref(), Some("topicB"));
        assert_eq!(l.display_text, "Some text");

        let l = parse_link_body("pkg:topic:text: with colon");
        assert_eq!(l.display_text, "text: with colon");
    }

    #[test]
    fn test_link_body_malformed() {
        assert_eq!(parse_link_body("").topic, None);
        assert_eq!(parse_link_body(":text").topic, None);
        assert_eq!(parse_link_body("pkg::text").topic, None);
        let l = parse_link_body(":topic:text");
        assert_eq!(l.package, None);
        assert_eq!(l.topic.as_deref(), Some("topic"));
    }
}
