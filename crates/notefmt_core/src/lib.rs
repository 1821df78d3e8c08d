//! Core text transforms for notefmt.
//! This crate owns every note-rewriting rule; hosts only move text in and out.

pub mod command;
pub mod config;
pub mod editor;
pub mod formatter;
pub mod logging;
pub mod text;

pub use command::{
    parse_command_id, run_command, supported_command_ids, CommandContext, CommandError,
    CommandId, CommandOutcome,
};
pub use config::{AppConfig, ConfigError, FormatterConfig, LoggingConfig, TagPlacement};
pub use editor::{BufferEditor, Cursor, Editor};
pub use formatter::{FormatterError, NoteFormatter};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use text::citation::{
    find_first_link, parse_citation_line, reformat_citation_note, Citation,
};
pub use text::frontmatter::{
    inline_frontmatter_tags, render_inline_tags, split_frontmatter, Frontmatter,
};
pub use text::normalize::{make_punctuation_dumb, standardize_text, trim_trailing_whitespace};
pub use text::snippet::format_blockquote;

/// Minimal health-check API for host wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
