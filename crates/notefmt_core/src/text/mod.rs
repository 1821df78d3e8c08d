//! Pure note-text transforms.
//!
//! # Responsibility
//! - Normalize whitespace and typographic punctuation.
//! - Parse and reformat clipped citation lines.
//! - Move frontmatter tags into the note body.
//!
//! # Invariants
//! - Every function is total over `&str` and performs no I/O.
//! - "No match" is an explicit `None` or unchanged text, never a panic.

pub mod citation;
pub mod frontmatter;
pub mod normalize;
pub mod snippet;
