//! Editor command table and dispatch.
//!
//! # Responsibility
//! - Map stable command ids to the pure text transforms.
//! - Apply results through the `Editor` contract and restore the cursor.
//!
//! # Invariants
//! - A transform that yields identical text never writes the buffer.
//! - "No match" is `CommandOutcome::Unchanged`, not an error.
//! - Logs carry command metadata only, never document content.

use crate::editor::Editor;
use crate::formatter::NoteFormatter;
use crate::text::frontmatter::inline_frontmatter_tags;
use crate::text::normalize::{make_punctuation_dumb, standardize_text, trim_trailing_whitespace};
use crate::text::snippet::format_blockquote;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Command id for pasting clipboard text as a blockquote.
pub const COMMAND_PASTE_AS_BLOCKQUOTE: &str = "paste-as-blockquote";
/// Command id for trailing-space trimming.
pub const COMMAND_TRIM_TRAILING_WHITESPACE: &str = "trim-trailing-whitespace";
/// Command id for curly-quote replacement.
pub const COMMAND_REPLACE_SMART_PUNCTUATION: &str = "replace-smart-punctuation";
/// Command id for punctuation plus whitespace cleanup.
pub const COMMAND_STANDARDIZE_TEXT: &str = "standardize-text";
/// Command id for citation first-line reformatting.
pub const COMMAND_REFORMAT_CITATION_LINE: &str = "reformat-citation-line";
/// Command id for moving frontmatter tags inline.
pub const COMMAND_STANDARDIZE_FRONTMATTER: &str = "standardize-frontmatter";
/// Command id for building an external lookup URL.
pub const COMMAND_FIND_IN_SEARCH_TOOL: &str = "find-in-search-tool";

const SUPPORTED_COMMAND_IDS: &[&str] = &[
    COMMAND_PASTE_AS_BLOCKQUOTE,
    COMMAND_TRIM_TRAILING_WHITESPACE,
    COMMAND_REPLACE_SMART_PUNCTUATION,
    COMMAND_STANDARDIZE_TEXT,
    COMMAND_REFORMAT_CITATION_LINE,
    COMMAND_STANDARDIZE_FRONTMATTER,
    COMMAND_FIND_IN_SEARCH_TOOL,
];

/// Returns every registered command id.
pub fn supported_command_ids() -> &'static [&'static str] {
    SUPPORTED_COMMAND_IDS
}

/// Registered editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    PasteAsBlockquote,
    TrimTrailingWhitespace,
    MakePunctuationDumb,
    StandardizeText,
    ReformatCitationLine,
    StandardizeFrontmatter,
    FindInSearchTool,
}

impl CommandId {
    /// Every command in registration order.
    pub const ALL: [CommandId; 7] = [
        Self::PasteAsBlockquote,
        Self::TrimTrailingWhitespace,
        Self::MakePunctuationDumb,
        Self::StandardizeText,
        Self::ReformatCitationLine,
        Self::StandardizeFrontmatter,
        Self::FindInSearchTool,
    ];

    /// Stable string id used by hosts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PasteAsBlockquote => COMMAND_PASTE_AS_BLOCKQUOTE,
            Self::TrimTrailingWhitespace => COMMAND_TRIM_TRAILING_WHITESPACE,
            Self::MakePunctuationDumb => COMMAND_REPLACE_SMART_PUNCTUATION,
            Self::StandardizeText => COMMAND_STANDARDIZE_TEXT,
            Self::ReformatCitationLine => COMMAND_REFORMAT_CITATION_LINE,
            Self::StandardizeFrontmatter => COMMAND_STANDARDIZE_FRONTMATTER,
            Self::FindInSearchTool => COMMAND_FIND_IN_SEARCH_TOOL,
        }
    }

    /// User-facing command palette name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PasteAsBlockquote => "Paste as Blockquote",
            Self::TrimTrailingWhitespace => "Trim Trailing Whitespace",
            Self::MakePunctuationDumb => "Make Punctuation Dumb",
            Self::StandardizeText => "Standardize Text",
            Self::ReformatCitationLine => "Reformat Citation Line",
            Self::StandardizeFrontmatter => "Standardize Frontmatter",
            Self::FindInSearchTool => "Find in Search Tool",
        }
    }
}

/// Parses one command id string.
pub fn parse_command_id(value: &str) -> Result<CommandId, CommandError> {
    match value.trim() {
        "" => Err(CommandError::EmptyCommandId),
        COMMAND_PASTE_AS_BLOCKQUOTE => Ok(CommandId::PasteAsBlockquote),
        COMMAND_TRIM_TRAILING_WHITESPACE => Ok(CommandId::TrimTrailingWhitespace),
        COMMAND_REPLACE_SMART_PUNCTUATION => Ok(CommandId::MakePunctuationDumb),
        COMMAND_STANDARDIZE_TEXT => Ok(CommandId::StandardizeText),
        COMMAND_REFORMAT_CITATION_LINE => Ok(CommandId::ReformatCitationLine),
        COMMAND_STANDARDIZE_FRONTMATTER => Ok(CommandId::StandardizeFrontmatter),
        COMMAND_FIND_IN_SEARCH_TOOL => Ok(CommandId::FindInSearchTool),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Host capabilities a command may need besides the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// Clipboard text for paste commands.
    pub clipboard: Option<String>,
    /// Frontmatter tags from the host metadata cache.
    pub tags: Vec<String>,
}

/// Result of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The buffer was rewritten.
    Applied,
    /// Nothing matched; the buffer is untouched.
    Unchanged,
    /// The host should open this URL.
    OpenUrl(String),
}

impl CommandOutcome {
    fn status(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::OpenUrl(_) => "open_url",
        }
    }
}

/// Command dispatch error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    EmptyCommandId,
    UnknownCommand(String),
    /// Paste requested without clipboard text.
    MissingClipboard,
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCommandId => write!(f, "command id cannot be empty"),
            Self::UnknownCommand(value) => write!(
                f,
                "unknown command `{value}`; expected one of {}",
                SUPPORTED_COMMAND_IDS.join("|")
            ),
            Self::MissingClipboard => write!(f, "clipboard text is required"),
        }
    }
}

impl Error for CommandError {}

/// Runs one command against the editor.
pub fn run_command<E: Editor + ?Sized>(
    formatter: &NoteFormatter,
    editor: &mut E,
    command: CommandId,
    context: &CommandContext,
) -> Result<CommandOutcome, CommandError> {
    let outcome = match command {
        CommandId::PasteAsBlockquote => {
            let Some(clipboard) = context.clipboard.as_deref() else {
                warn!(
                    "event=command_run module=command command={} status=error reason=missing_clipboard",
                    command.as_str()
                );
                return Err(CommandError::MissingClipboard);
            };
            editor.replace_selection(&format_blockquote(clipboard));
            CommandOutcome::Applied
        }
        CommandId::TrimTrailingWhitespace => rewrite_buffer(editor, trim_trailing_whitespace),
        CommandId::MakePunctuationDumb => rewrite_buffer(editor, make_punctuation_dumb),
        CommandId::StandardizeText => rewrite_buffer(editor, standardize_text),
        CommandId::ReformatCitationLine => {
            rewrite_buffer(editor, |text| formatter.reformat_citation_note(text))
        }
        CommandId::StandardizeFrontmatter => {
            rewrite_buffer(editor, |text| inline_frontmatter_tags(text, &context.tags))
        }
        CommandId::FindInSearchTool => {
            match formatter.link_at_cursor(editor.value(), editor.cursor()) {
                Some(url) => CommandOutcome::OpenUrl(formatter.lookup_url(&url)),
                None => CommandOutcome::Unchanged,
            }
        }
    };

    info!(
        "event=command_run module=command command={} status={} chars={}",
        command.as_str(),
        outcome.status(),
        editor.value().chars().count()
    );
    Ok(outcome)
}

fn rewrite_buffer<E, F>(editor: &mut E, transform: F) -> CommandOutcome
where
    E: Editor + ?Sized,
    F: FnOnce(&str) -> String,
{
    let cursor = editor.cursor();
    let updated = transform(editor.value());
    if updated == editor.value() {
        return CommandOutcome::Unchanged;
    }
    editor.set_value(updated);
    editor.set_cursor(cursor);
    CommandOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::{parse_command_id, supported_command_ids, CommandError, CommandId};

    #[test]
    fn every_supported_id_parses_back_to_itself() {
        for id in supported_command_ids() {
            let parsed = parse_command_id(id).expect("supported id should parse");
            assert_eq!(parsed.as_str(), *id);
        }
    }

    #[test]
    fn all_commands_match_supported_ids() {
        let ids: Vec<&str> = CommandId::ALL.iter().map(|command| command.as_str()).collect();
        assert_eq!(ids, supported_command_ids());
    }

    #[test]
    fn parse_rejects_empty_and_unknown_ids() {
        assert_eq!(parse_command_id("  "), Err(CommandError::EmptyCommandId));
        assert!(matches!(
            parse_command_id("paste-as-html"),
            Err(CommandError::UnknownCommand(_))
        ));
        assert_eq!(
            parse_command_id(" trim-trailing-whitespace "),
            Ok(CommandId::TrimTrailingWhitespace)
        );
    }
}
