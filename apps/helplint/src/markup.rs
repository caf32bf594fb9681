//! Locating anchor and link markup in help text.
//!
//! A `MarkupScanner` only finds spans and their raw bodies; the bodies are
//! segmented by `crate::parse`. `HelpMarkup` implements the default help
//! syntax:
//!
//! - anchors: `*topic*`, `*topic:text*`, hidden anchors `*|topic|*`
//! - links: `|topic|`, `|topic:text|`, `|pkg:topic:text|`

use regex::Regex;
use std::sync::LazyLock;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\|?)([^*|\n]+)(\|?)\*").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|([^|\n]+)\|").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
/// One markup occurrence: byte offset of its opening delimiter plus body.
pub struct MarkupSpan {
    pub offset: usize,
    pub body: String,
}

pub trait MarkupScanner: Sync {
    fn find_anchors(&self, text: &str) -> Vec<MarkupSpan>;
    fn find_links(&self, text: &str) -> Vec<MarkupSpan>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HelpMarkup;

impl MarkupScanner for HelpMarkup {
    fn find_anchors(&self, text: &str) -> Vec<MarkupSpan> {
        ANCHOR_RE
            .captures_iter(text)
            .filter(|c| c[1].len() == c[3].len())
            .filter_map(|c| {
                let whole = c.get(0)?;
                Some(MarkupSpan {
                    offset: whole.start(),
                    body: c[2].to_string(),
                })
            })
            .collect()
    }

    fn find_links(&self, text: &str) -> Vec<MarkupSpan> {
        let bytes = text.as_bytes();
        LINK_RE
            .captures_iter(text)
            .filter_map(|c| {
                let whole = c.get(0)?;
                // `*|topic|*` is a hidden anchor, not a link.
                let after = bytes.get(whole.end()).copied();
                let before = whole.start().checked_sub(1).map(|i| bytes[i]);
                if before == Some(b'*') && after == Some(b'*') {
                    return None;
                }
                Some(MarkupSpan {
                    offset: whole.start(),
                    body: c[1].to_string(),
                })
            })
            .collect()
    }
}

/// Maps byte offsets to 1-based line/column pairs. Columns count chars.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { starts }
    }

    pub fn position(&self, text: &str, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.starts[line];
        let end = offset.min(text.len());
        let column = text.get(start..end).map_or(end - start, |s| s.chars().count());
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_anchors_and_links() {
        let text = "See |intro| and *sec1:Section* here.\n*|hidden|* |Other:topic:text|";
        let anchors = HelpMarkup.find_anchors(text);
        let bodies: Vec<_> = anchors.iter().map(|a| a.body.as_str()).collect();
        assert_eq!(bodies, vec!["sec1:Section", "hidden"]);

        let links = HelpMarkup.find_links(text);
        let bodies: Vec<_> = links.iter().map(|l| l.body.as_str()).collect();
        assert_eq!(bodies, vec!["intro", "Other:topic:text"]);
        assert_eq!(links[0].offset, 4);
    }

    #[test]
    fn test_unbalanced_hidden_anchor_is_ignored() {
        assert!(HelpMarkup.find_anchors("*|half*").is_empty());
    }

    #[test]
    fn test_line_index_positions() {
        let text = "first\nsé *a*\nthird";
        let ix = LineIndex::new(text);
        assert_eq!(ix.position(text, 0), (1, 1));
        let off = text.find('*').unwrap();
        // 'é' is two bytes but one column
        assert_eq!(ix.position(text, off), (2, 4));
        assert_eq!(ix.position(text, text.find("third").unwrap()), (3, 1));
    }
}
