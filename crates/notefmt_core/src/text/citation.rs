//! Citation-line parsing and note reformatting.
//!
//! # Responsibility
//! - Recognize a clipped `["Title", Author, Publication](url)` first line.
//! - Rebuild the note head as a linked heading plus author/publication lines.
//! - Locate the first markdown link in a note.
//!
//! # Invariants
//! - Citation matching is anchored to the whole line.
//! - A first line that does not match leaves the document untouched.

use crate::config::TagPlacement;
use crate::formatter::NoteFormatter;

/// Default citation pattern. Anchors are added when compiled.
pub const DEFAULT_CITATION_PATTERN: &str =
    r#"\["(?P<title>.*?)", (?P<author>.*?), (?P<publication>.*?)\]\((?P<url>.*?)\)"#;
/// Default generic markdown link pattern. Label and URL stay on one line.
pub const DEFAULT_LINK_PATTERN: &str = r"\[(?P<label>[^\]\n]*)\]\((?P<url>[^)\n]+)\)";
/// Default marker line written after a reformatted citation.
pub const DEFAULT_TAG_MARKER: &str = "#ref/article";

/// Fields captured from one citation line, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub author: String,
    pub publication: String,
    pub url: String,
}

impl Citation {
    /// Renders `# [title](url)`.
    pub fn heading(&self) -> String {
        format!("# [{}]({})", self.title, self.url)
    }
}

/// Splits text at the first `\n`.
///
/// Returns the first line and the remainder. The remainder is empty when the
/// text has no line break.
pub fn split_first_line(text: &str) -> (&str, &str) {
    text.split_once('\n').unwrap_or((text, ""))
}

pub(crate) fn render_citation_note(
    citation: &Citation,
    tag_marker: &str,
    placement: TagPlacement,
    rest: &str,
) -> String {
    let heading = citation.heading();
    let parts: [&str; 5] = match placement {
        TagPlacement::AfterPublication => [
            &heading,
            &citation.author,
            &citation.publication,
            tag_marker,
            rest,
        ],
        TagPlacement::Top => [
            tag_marker,
            &heading,
            &citation.author,
            &citation.publication,
            rest,
        ],
    };
    parts.join("\n")
}

/// Parses one line with the default citation pattern.
pub fn parse_citation_line(line: &str) -> Option<Citation> {
    NoteFormatter::shared().parse_citation_line(line)
}

/// Reformats a citation note using the default pattern and tag marker.
pub fn reformat_citation_note(text: &str) -> String {
    NoteFormatter::shared().reformat_citation_note(text)
}

/// Returns the URL of the first markdown link in `text`.
pub fn find_first_link(text: &str) -> Option<String> {
    NoteFormatter::shared().find_first_link(text)
}

#[cfg(test)]
mod tests {
    use super::{find_first_link, parse_citation_line, reformat_citation_note, split_first_line};

    const HEDONIC: &str = "[\"Hedonic Audit\", Venkatesh Rao, ribbonfarm](https://www.ribbonfarm.com/2018/07/13/hedonic-audit/)";

    #[test]
    fn parse_captures_all_four_fields() {
        let citation = parse_citation_line(HEDONIC).expect("citation should parse");
        assert_eq!(citation.title, "Hedonic Audit");
        assert_eq!(citation.author, "Venkatesh Rao");
        assert_eq!(citation.publication, "ribbonfarm");
        assert_eq!(
            citation.url,
            "https://www.ribbonfarm.com/2018/07/13/hedonic-audit/"
        );
    }

    #[test]
    fn parse_is_anchored_to_the_whole_line() {
        assert!(parse_citation_line(&format!("prefix {HEDONIC}")).is_none());
        assert!(parse_citation_line(&format!("{HEDONIC} suffix")).is_none());
    }

    #[test]
    fn split_first_line_handles_missing_break() {
        assert_eq!(split_first_line("one"), ("one", ""));
        assert_eq!(split_first_line("one\ntwo\nthree"), ("one", "two\nthree"));
    }

    #[test]
    fn reformat_is_noop_without_citation() {
        assert_eq!(reformat_citation_note("hello\nworld"), "hello\nworld");
    }

    #[test]
    fn find_first_link_returns_none_without_links() {
        assert_eq!(find_first_link("no links here"), None);
    }
}
