//! Configured citation/link formatter.
//!
//! # Responsibility
//! - Compile configured patterns once and validate their named groups.
//! - Provide citation parsing, note reformatting, link lookup and URL building.
//!
//! # Invariants
//! - A constructed formatter is immutable; patterns never change after `new`.
//! - The citation pattern always matches whole lines (`^(?:..)$`).

use crate::config::{FormatterConfig, TagPlacement, URL_PLACEHOLDER};
use crate::editor::Cursor;
use crate::text::citation::{render_citation_note, split_first_line, Citation};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CITATION_GROUPS: &[&str] = &["title", "author", "publication", "url"];
const LINK_GROUPS: &[&str] = &["url"];

static SHARED_FORMATTER: Lazy<NoteFormatter> = Lazy::new(|| {
    NoteFormatter::new(&FormatterConfig::default()).expect("default formatter config is valid")
});

/// Formatter construction error.
#[derive(Debug)]
pub enum FormatterError {
    /// A configured regex failed to compile.
    InvalidPattern {
        name: &'static str,
        source: regex::Error,
    },
    /// A configured regex lacks a required named group.
    MissingCaptureGroup {
        name: &'static str,
        group: &'static str,
    },
    /// Lookup template has no `{url}` placeholder.
    MissingUrlPlaceholder(String),
}

impl Display for FormatterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { name, source } => {
                write!(f, "invalid {name} pattern: {source}")
            }
            Self::MissingCaptureGroup { name, group } => {
                write!(f, "{name} pattern is missing named group `{group}`")
            }
            Self::MissingUrlPlaceholder(template) => {
                write!(f, "lookup template `{template}` has no `{URL_PLACEHOLDER}` placeholder")
            }
        }
    }
}

impl Error for FormatterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Citation reformatter and link finder built from `FormatterConfig`.
#[derive(Debug, Clone)]
pub struct NoteFormatter {
    citation_re: Regex,
    link_re: Regex,
    tag_marker: String,
    tag_placement: TagPlacement,
    lookup_url_template: String,
}

impl NoteFormatter {
    /// Compiles and validates a formatter from config.
    ///
    /// # Errors
    /// - Returns an error when a pattern does not compile.
    /// - Returns an error when a pattern lacks a required named group.
    /// - Returns an error when the lookup template has no `{url}`.
    pub fn new(config: &FormatterConfig) -> Result<Self, FormatterError> {
        let anchored = format!("^(?:{})$", config.citation_pattern);
        let citation_re = compile("citation", &anchored, CITATION_GROUPS)?;
        let link_re = compile("link", &config.link_pattern, LINK_GROUPS)?;
        if !config.lookup_url_template.contains(URL_PLACEHOLDER) {
            return Err(FormatterError::MissingUrlPlaceholder(
                config.lookup_url_template.clone(),
            ));
        }

        Ok(Self {
            citation_re,
            link_re,
            tag_marker: config.tag_marker.clone(),
            tag_placement: config.tag_placement,
            lookup_url_template: config.lookup_url_template.clone(),
        })
    }

    /// Process-wide formatter built from default config.
    pub fn shared() -> &'static NoteFormatter {
        &SHARED_FORMATTER
    }

    /// Parses one line as a citation.
    ///
    /// One trailing `\r` is ignored so CRLF documents match.
    pub fn parse_citation_line(&self, line: &str) -> Option<Citation> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let caps = self.citation_re.captures(line)?;
        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Some(Citation {
            title: field("title"),
            author: field("author"),
            publication: field("publication"),
            url: field("url"),
        })
    }

    /// Rewrites a note whose first line is a citation.
    ///
    /// Returns `text` unchanged when the first line does not match.
    pub fn reformat_citation_note(&self, text: &str) -> String {
        let (first_line, rest) = split_first_line(text);
        match self.parse_citation_line(first_line) {
            Some(citation) => {
                render_citation_note(&citation, &self.tag_marker, self.tag_placement, rest)
            }
            None => text.to_string(),
        }
    }

    /// Returns the URL of the first link in `text`.
    ///
    /// Image embeds (`![alt](path)`) are not links.
    pub fn find_first_link(&self, text: &str) -> Option<String> {
        self.links(text)
            .next()
            .and_then(|caps| caps.name("url").map(|m| m.as_str().to_string()))
    }

    /// Returns the link under `cursor`, falling back to the first link.
    pub fn link_at_cursor(&self, text: &str, cursor: Cursor) -> Option<String> {
        let cursor = cursor.clamp_to(text);
        let offset = cursor.to_byte_offset(text);
        self.links(text)
            .find(|caps| {
                caps.get(0)
                    .is_some_and(|whole| whole.start() <= offset && offset <= whole.end())
            })
            .and_then(|caps| caps.name("url").map(|m| m.as_str().to_string()))
            .or_else(|| self.find_first_link(text))
    }

    /// Substitutes `url` into the lookup template verbatim.
    pub fn lookup_url(&self, url: &str) -> String {
        self.lookup_url_template.replace(URL_PLACEHOLDER, url)
    }

    pub fn tag_marker(&self) -> &str {
        &self.tag_marker
    }

    fn links<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 't {
        self.link_re.captures_iter(text).filter(move |caps| {
            caps.get(0)
                .is_some_and(|whole| !text[..whole.start()].ends_with('!'))
        })
    }
}

fn compile(
    name: &'static str,
    pattern: &str,
    groups: &[&'static str],
) -> Result<Regex, FormatterError> {
    let regex =
        Regex::new(pattern).map_err(|source| FormatterError::InvalidPattern { name, source })?;
    for &group in groups {
        if !regex.capture_names().flatten().any(|found| found == group) {
            return Err(FormatterError::MissingCaptureGroup { name, group });
        }
    }
    Ok(regex)
}
