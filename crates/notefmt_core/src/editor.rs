//! Host editor contract and in-memory buffer.
//!
//! # Responsibility
//! - Define the narrow buffer/cursor interface commands run against.
//! - Provide `BufferEditor` for CLI and test hosts.
//!
//! # Invariants
//! - Cursor restoration is best effort: positions are clamped, not remapped.
//! - `ch` counts Unicode scalar values within a line, excluding `\r`.

/// Zero-based `(line, ch)` position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub line: usize,
    pub ch: usize,
}

impl Cursor {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    /// Clamps the position to the last line and that line's length.
    pub fn clamp_to(self, text: &str) -> Self {
        let last_line = text.split('\n').count().saturating_sub(1);
        let line = self.line.min(last_line);
        let line_len = text
            .split('\n')
            .nth(line)
            .map_or(0, |content| content.trim_end_matches('\r').chars().count());
        Self {
            line,
            ch: self.ch.min(line_len),
        }
    }

    /// Byte offset of a clamped cursor in `text`.
    pub fn to_byte_offset(self, text: &str) -> usize {
        let mut offset = 0;
        for (index, content) in text.split('\n').enumerate() {
            if index == self.line {
                let column = content
                    .char_indices()
                    .nth(self.ch)
                    .map_or(content.len(), |(byte, _)| byte);
                return offset + column;
            }
            offset += content.len() + 1;
        }
        text.len()
    }

    /// Cursor at a byte offset. `offset` must be a char boundary.
    pub fn from_byte_offset(text: &str, offset: usize) -> Self {
        let before = &text[..offset.min(text.len())];
        let line_start = before.rfind('\n').map_or(0, |index| index + 1);
        Self {
            line: before.matches('\n').count(),
            ch: before[line_start..].chars().count(),
        }
    }
}

/// Host document buffer seen by commands.
pub trait Editor {
    /// Full document text.
    fn value(&self) -> &str;
    /// Replaces the full document text.
    fn set_value(&mut self, text: String);
    fn cursor(&self) -> Cursor;
    fn set_cursor(&mut self, cursor: Cursor);
    /// Replaces the current selection (or inserts at the cursor).
    fn replace_selection(&mut self, replacement: &str);
}

/// In-memory editor with an optional selection anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferEditor {
    text: String,
    head: Cursor,
    anchor: Option<Cursor>,
}

impl BufferEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            head: Cursor::default(),
            anchor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.set_cursor(cursor);
        self
    }

    /// Selects from `anchor` to `head`; both are clamped.
    pub fn select(&mut self, anchor: Cursor, head: Cursor) {
        self.anchor = Some(anchor.clamp_to(&self.text));
        self.head = head.clamp_to(&self.text);
    }

    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        self.anchor.map(|anchor| (anchor, self.head))
    }
}

impl Editor for BufferEditor {
    fn value(&self) -> &str {
        &self.text
    }

    fn set_value(&mut self, text: String) {
        self.text = text;
        self.head = self.head.clamp_to(&self.text);
        self.anchor = None;
    }

    fn cursor(&self) -> Cursor {
        self.head
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.head = cursor.clamp_to(&self.text);
        self.anchor = None;
    }

    fn replace_selection(&mut self, replacement: &str) {
        let head = self.head.to_byte_offset(&self.text);
        let anchor = self
            .anchor
            .map_or(head, |anchor| anchor.to_byte_offset(&self.text));
        let (start, end) = if anchor <= head {
            (anchor, head)
        } else {
            (head, anchor)
        };

        self.text.replace_range(start..end, replacement);
        self.head = Cursor::from_byte_offset(&self.text, start + replacement.len());
        self.anchor = None;
    }
}
