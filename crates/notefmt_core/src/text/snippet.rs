//! Small insertion snippets.

/// Wraps pasted text as a blockquote followed by a horizontal rule.
pub fn format_blockquote(clipboard: &str) -> String {
    format!("> {clipboard}\n\n---\n")
}
