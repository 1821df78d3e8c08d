//! Whitespace and punctuation normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// CRLF mode lets `$` stop before `\r\n` so the carriage return survives.
static TRAILING_SPACES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mR) +$").expect("valid trailing spaces regex"));

const SMART_SINGLE_QUOTES: [char; 2] = ['\u{2018}', '\u{2019}'];
const SMART_DOUBLE_QUOTES: [char; 2] = ['\u{201C}', '\u{201D}'];

/// Removes runs of spaces that end a line, on every line.
///
/// Tabs and trailing blank lines are left alone. Idempotent.
pub fn trim_trailing_whitespace(text: &str) -> String {
    TRAILING_SPACES_RE.replace_all(text, "").into_owned()
}

/// Replaces curly quotes with their plain ASCII counterparts.
pub fn make_punctuation_dumb(text: &str) -> String {
    text.replace(SMART_SINGLE_QUOTES, "'")
        .replace(SMART_DOUBLE_QUOTES, "\"")
}

/// Dumb punctuation first, then trailing-space trim.
pub fn standardize_text(text: &str) -> String {
    trim_trailing_whitespace(&make_punctuation_dumb(text))
}

#[cfg(test)]
mod tests {
    use super::{make_punctuation_dumb, standardize_text, trim_trailing_whitespace};

    #[test]
    fn trim_removes_spaces_per_line_and_keeps_tabs() {
        assert_eq!(trim_trailing_whitespace("a  \nb\t\nc   "), "a\nb\t\nc");
    }

    #[test]
    fn trim_keeps_trailing_blank_lines() {
        assert_eq!(trim_trailing_whitespace("a \n\n\n"), "a\n\n\n");
        assert_eq!(trim_trailing_whitespace("   \n"), "\n");
    }

    #[test]
    fn trim_keeps_carriage_return_of_crlf_lines() {
        assert_eq!(trim_trailing_whitespace("a  \r\nb \r\n"), "a\r\nb\r\n");
    }

    #[test]
    fn trim_leaves_inner_and_leading_spaces() {
        assert_eq!(trim_trailing_whitespace("  a  b  "), "  a  b");
    }

    #[test]
    fn dumb_quotes_replace_all_four_curly_forms() {
        let source = "\u{2018}single\u{2019} and \u{201C}double\u{201D}";
        assert_eq!(make_punctuation_dumb(source), "'single' and \"double\"");
    }

    #[test]
    fn dumb_quotes_preserve_plain_quotes_and_other_characters() {
        let source = "it's \"fine\" \u{00AB}guillemets\u{00BB} \u{2014}";
        assert_eq!(make_punctuation_dumb(source), source);
    }

    #[test]
    fn standardize_trims_after_quote_replacement() {
        assert_eq!(standardize_text("\u{201C}quoted\u{201D}   \nnext "), "\"quoted\"\nnext");
    }
}
