//! Frontmatter tag relocation.
//!
//! # Responsibility
//! - Detect a leading `---` fenced metadata block.
//! - Remove its `tags`/`tag` field and render those tags inline in the body.
//!
//! # Invariants
//! - Tag values are supplied by the caller; YAML is never parsed here.
//! - Documents without a tag field are returned unchanged.

use std::collections::HashSet;

const FRONTMATTER_FENCE: &str = "---";
const TAG_KEYS: &[&str] = &["tags", "tag"];

/// Leading metadata block split from the note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Lines between the fences, without line breaks.
    pub header: Vec<&'a str>,
    /// Everything after the closing fence line.
    pub body: &'a str,
    /// Terminator of the opening fence line: `"\r\n"` or `"\n"`.
    pub line_ending: &'a str,
}

/// Splits a leading frontmatter block from `text`.
///
/// Returns `None` when the first line is not a fence or the block is never
/// closed.
pub fn split_frontmatter(text: &str) -> Option<Frontmatter<'_>> {
    let mut lines = text.split_inclusive('\n');
    let opening = lines.next()?;
    if strip_line_break(opening) != FRONTMATTER_FENCE {
        return None;
    }

    let line_ending = if opening.ends_with("\r\n") { "\r\n" } else { "\n" };
    let mut offset = opening.len();
    let mut header = Vec::new();
    for line in lines {
        offset += line.len();
        let content = strip_line_break(line);
        if content == FRONTMATTER_FENCE {
            return Some(Frontmatter {
                header,
                body: &text[offset..],
                line_ending,
            });
        }
        header.push(content);
    }
    None
}

/// Moves the frontmatter tag field into an inline `#tag` line.
///
/// The inline line becomes the first body line. A header left with no
/// content is dropped together with its fences. Rebuilt lines reuse the
/// opening fence's line ending.
pub fn inline_frontmatter_tags(text: &str, tags: &[String]) -> String {
    let Some(frontmatter) = split_frontmatter(text) else {
        return text.to_string();
    };
    let Some(kept) = remove_tag_field(&frontmatter.header) else {
        return text.to_string();
    };
    let Some(inline) = render_inline_tags(tags) else {
        return text.to_string();
    };

    let eol = frontmatter.line_ending;
    let mut output = String::with_capacity(text.len() + inline.len());
    if kept.iter().any(|line| !line.trim().is_empty()) {
        output.push_str(FRONTMATTER_FENCE);
        output.push_str(eol);
        for line in &kept {
            output.push_str(line);
            output.push_str(eol);
        }
        output.push_str(FRONTMATTER_FENCE);
        output.push_str(eol);
    }
    output.push_str(&inline);
    output.push_str(eol);
    output.push_str(frontmatter.body);
    output
}

/// Renders tags as a space-separated `#tag` line.
///
/// Leading `#` and surrounding whitespace are stripped, inner whitespace
/// becomes `-`, and duplicates keep their first position. Returns `None` when
/// nothing is left to render.
pub fn render_inline_tags(tags: &[String]) -> Option<String> {
    let mut seen = HashSet::new();
    let rendered = tags
        .iter()
        .map(|tag| {
            tag.trim()
                .trim_start_matches('#')
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        })
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>();

    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(" "))
    }
}

fn remove_tag_field<'a>(header: &[&'a str]) -> Option<Vec<&'a str>> {
    let start = header.iter().position(|line| is_tag_key(line))?;
    let end = header[start + 1..]
        .iter()
        .position(|line| !is_continuation(line))
        .map_or(header.len(), |len| start + 1 + len);

    let mut kept = header[..start].to_vec();
    kept.extend_from_slice(&header[end..]);
    Some(kept)
}

fn is_tag_key(line: &str) -> bool {
    if line.starts_with(char::is_whitespace) {
        return false;
    }
    line.split_once(':')
        .is_some_and(|(key, _)| TAG_KEYS.contains(&key.trim()))
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) || line.starts_with('-')
}

fn strip_line_break(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::{render_inline_tags, split_frontmatter};

    #[test]
    fn split_requires_opening_fence_on_first_line() {
        assert!(split_frontmatter("body\n---\nx\n---\n").is_none());
    }

    #[test]
    fn split_requires_closing_fence() {
        assert!(split_frontmatter("---\ntitle: x\nbody").is_none());
    }

    #[test]
    fn split_returns_header_lines_and_body() {
        let frontmatter = split_frontmatter("---\r\ntitle: x\r\n---\r\nbody").expect("frontmatter");
        assert_eq!(frontmatter.header, vec!["title: x"]);
        assert_eq!(frontmatter.body, "body");
        assert_eq!(frontmatter.line_ending, "\r\n");
    }

    #[test]
    fn render_normalizes_and_dedupes_in_order() {
        let tags = vec![
            " #work ".to_string(),
            "ref/article".to_string(),
            "work".to_string(),
            "   ".to_string(),
            "two words".to_string(),
        ];
        assert_eq!(
            render_inline_tags(&tags).as_deref(),
            Some("#work #ref/article #two-words")
        );
    }

    #[test]
    fn render_returns_none_for_blank_input() {
        assert_eq!(render_inline_tags(&["#".to_string()]), None);
    }
}
