//! Configuration model and JSON loading.
//!
//! # Responsibility
//! - Hold the adjustable constants: patterns, tag marker, lookup template.
//! - Load a partial JSON file on top of built-in defaults.
//!
//! # Invariants
//! - Every field has a default; an empty `{}` file is a valid config.
//! - Unknown keys are rejected so typos surface early.

use crate::logging::default_log_level;
use crate::text::citation::{DEFAULT_CITATION_PATTERN, DEFAULT_LINK_PATTERN, DEFAULT_TAG_MARKER};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default lookup target: a desktop search tool queried by URL.
pub const DEFAULT_LOOKUP_URL_TEMPLATE: &str = "x-devonthink://search?query=url:{url}";
/// Placeholder replaced by the link URL in lookup templates.
pub const URL_PLACEHOLDER: &str = "{url}";

/// Where the tag marker goes in a reformatted citation note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPlacement {
    /// Marker line follows the publication line.
    #[default]
    AfterPublication,
    /// Marker precedes the heading, e.g. a YAML frontmatter block.
    Top,
}

/// Adjustable constants for `NoteFormatter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    /// Citation regex with `title|author|publication|url` named groups.
    pub citation_pattern: String,
    /// Link regex with a `url` named group.
    pub link_pattern: String,
    /// Literal text inserted as the tag marker; may span lines.
    pub tag_marker: String,
    pub tag_placement: TagPlacement,
    /// URL template containing `{url}`.
    pub lookup_url_template: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            citation_pattern: DEFAULT_CITATION_PATTERN.to_string(),
            link_pattern: DEFAULT_LINK_PATTERN.to_string(),
            tag_marker: DEFAULT_TAG_MARKER.to_string(),
            tag_placement: TagPlacement::default(),
            lookup_url_template: DEFAULT_LOOKUP_URL_TEMPLATE.to_string(),
        }
    }
}

/// Logging bootstrap options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub formatter: FormatterConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses config from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Config loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config content is not valid for `AppConfig`.
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, TagPlacement, DEFAULT_LOOKUP_URL_TEMPLATE};

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::from_json_str("{}").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.formatter.tag_marker, "#ref/article");
        assert_eq!(
            config.formatter.lookup_url_template,
            DEFAULT_LOOKUP_URL_TEMPLATE
        );
    }

    #[test]
    fn partial_formatter_section_keeps_other_defaults() {
        let config = AppConfig::from_json_str(
            r##"{"formatter": {"tag_marker": "#refnote", "tag_placement": "top"}}"##,
        )
        .expect("partial config should parse");
        assert_eq!(config.formatter.tag_marker, "#refnote");
        assert_eq!(config.formatter.tag_placement, TagPlacement::Top);
        assert_eq!(
            config.formatter.link_pattern,
            AppConfig::default().formatter.link_pattern
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_json_str(r#"{"formater": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
