//! `notefmt` command-line host.
//!
//! # Responsibility
//! - Stand in for an editor host: files/stdin are the buffer, stdout is the
//!   URL opener, YAML frontmatter is the tag metadata cache.
//! - Keep all rewriting rules in `notefmt_core`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use notefmt_core::{
    init_logging, run_command, split_frontmatter, AppConfig, BufferEditor, CommandContext,
    CommandId, CommandOutcome, Cursor, Editor, NoteFormatter,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notefmt", author, version, about = "Editor-note text transforms", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct DocumentArgs {
    /// Note file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the result back to the input file
    #[arg(long, requires = "input")]
    in_place: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove trailing spaces from every line
    Trim(DocumentArgs),
    /// Replace curly quotes with plain quotes
    DumbQuotes(DocumentArgs),
    /// Dumb quotes, then trim trailing spaces
    Standardize(DocumentArgs),
    /// Reformat a citation first line into heading, author and publication
    ReformatCitation(DocumentArgs),
    /// Move frontmatter tags into an inline #tag line
    InlineTags {
        #[command(flatten)]
        document: DocumentArgs,
        /// Tag to inline; read from frontmatter when omitted
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Wrap input text as a blockquote with a trailing rule
    Blockquote(DocumentArgs),
    /// Print the lookup URL for the link under the cursor or the first link
    Lookup {
        #[command(flatten)]
        document: DocumentArgs,
        #[arg(long, default_value_t = 0)]
        line: usize,
        #[arg(long, default_value_t = 0)]
        ch: usize,
    },
    /// List editor command ids
    Commands,
    /// Print core linkage probe
    Ping,
}

/// Tag field as hosts store it: a YAML list or a comma/space separated string.
#[derive(Debug, Default, Deserialize)]
struct FrontmatterTags {
    #[serde(default, alias = "tag")]
    tags: Option<Value>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(cli, stdin.lock(), stdout.lock())
}

fn run(cli: Cli, mut stdin: impl Read, mut stdout: impl Write) -> Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let wants_logging =
        cli.log_level.is_some() || cli.log_dir.is_some() || config.logging.log_dir.is_some();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.logging.log_dir = Some(dir);
    }
    if wants_logging {
        init_logging(&config.logging)?;
    }

    let formatter = NoteFormatter::new(&config.formatter).context("invalid formatter config")?;

    let (command, document, context, cursor) = match cli.command {
        Command::Commands => {
            for command in CommandId::ALL {
                writeln!(stdout, "{}\t{}", command.as_str(), command.display_name())?;
            }
            return Ok(());
        }
        Command::Ping => {
            writeln!(
                stdout,
                "notefmt_core ping={} version={}",
                notefmt_core::ping(),
                notefmt_core::core_version()
            )?;
            return Ok(());
        }
        Command::Trim(document) => (CommandId::TrimTrailingWhitespace, document, None, None),
        Command::DumbQuotes(document) => (CommandId::MakePunctuationDumb, document, None, None),
        Command::Standardize(document) => (CommandId::StandardizeText, document, None, None),
        Command::ReformatCitation(document) => {
            (CommandId::ReformatCitationLine, document, None, None)
        }
        Command::InlineTags { document, tags } => (
            CommandId::StandardizeFrontmatter,
            document,
            Some(tags),
            None,
        ),
        Command::Blockquote(document) => (CommandId::PasteAsBlockquote, document, None, None),
        Command::Lookup { document, line, ch } => (
            CommandId::FindInSearchTool,
            document,
            None,
            Some(Cursor::new(line, ch)),
        ),
    };

    let text = read_document(&document, &mut stdin)?;
    let (mut editor, context) = match command {
        CommandId::PasteAsBlockquote => {
            let clipboard = text
                .strip_suffix('\n')
                .map(|value| value.strip_suffix('\r').unwrap_or(value))
                .unwrap_or(&text)
                .to_string();
            (
                BufferEditor::new(String::new()),
                CommandContext {
                    clipboard: Some(clipboard),
                    ..CommandContext::default()
                },
            )
        }
        _ => {
            let tags = match context {
                Some(tags) if !tags.is_empty() => tags,
                Some(_) => read_frontmatter_tags(&text)?,
                None => Vec::new(),
            };
            let editor = BufferEditor::new(text).with_cursor(cursor.unwrap_or_default());
            (
                editor,
                CommandContext {
                    tags,
                    ..CommandContext::default()
                },
            )
        }
    };

    let outcome = run_command(&formatter, &mut editor, command, &context)?;
    debug!(
        "event=cli_command module=cli command={} outcome={:?}",
        command.as_str(),
        outcome
    );

    match outcome {
        CommandOutcome::OpenUrl(url) => writeln!(stdout, "{url}")?,
        CommandOutcome::Unchanged if command == CommandId::FindInSearchTool => {
            bail!("no link found in document")
        }
        CommandOutcome::Unchanged if document.in_place => {}
        _ => write_document(&document, editor.value(), &mut stdout)?,
    }
    Ok(())
}

fn read_document(document: &DocumentArgs, stdin: &mut impl Read) -> Result<String> {
    match document.input.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_document(document: &DocumentArgs, text: &str, stdout: &mut impl Write) -> Result<()> {
    match document.input.as_deref() {
        Some(path) if document.in_place => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        _ => {
            stdout.write_all(text.as_bytes())?;
            Ok(())
        }
    }
}

/// Reads `tags`/`tag` from the leading YAML block.
fn read_frontmatter_tags(text: &str) -> Result<Vec<String>> {
    let Some(frontmatter) = split_frontmatter(text) else {
        return Ok(Vec::new());
    };
    let yaml = frontmatter.header.join("\n");
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: FrontmatterTags =
        serde_yaml::from_str(&yaml).context("failed to parse frontmatter YAML")?;
    Ok(match parsed.tags {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_tag).collect(),
        Some(Value::String(value)) => value
            .split([',', ' '])
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| tag.trim().to_string())
            .collect(),
        Some(value) => scalar_tag(&value).into_iter().collect(),
        None => Vec::new(),
    })
}

/// String, number and bool scalars become tags; nested values are skipped.
fn scalar_tag(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{read_frontmatter_tags, run, Cli};
    use clap::Parser;

    fn run_args(args: &[&str], stdin: &str) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut stdout = Vec::new();
        run(cli, stdin.as_bytes(), &mut stdout)?;
        Ok(String::from_utf8(stdout)?)
    }

    #[test]
    fn trim_reads_stdin_and_writes_stdout() {
        let output = run_args(&["notefmt", "trim"], "a  \nb\t\nc   ").unwrap();
        assert_eq!(output, "a\nb\t\nc");
    }

    #[test]
    fn unchanged_documents_are_echoed() {
        let output = run_args(&["notefmt", "reformat-citation"], "hello\nworld").unwrap();
        assert_eq!(output, "hello\nworld");
    }

    #[test]
    fn blockquote_strips_one_trailing_newline_from_input() {
        let output = run_args(&["notefmt", "blockquote"], "quoted\n").unwrap();
        assert_eq!(output, "> quoted\n\n---\n");
    }

    #[test]
    fn lookup_prints_url_and_fails_without_links() {
        let output = run_args(&["notefmt", "lookup"], "see [x](http://example.com)").unwrap();
        assert_eq!(output, "x-devonthink://search?query=url:http://example.com\n");
        assert!(run_args(&["notefmt", "lookup"], "nothing").is_err());
    }

    #[test]
    fn inline_tags_falls_back_to_frontmatter_yaml() {
        let output = run_args(
            &["notefmt", "inline-tags"],
            "---\ntitle: x\ntags:\n  - work\n  - ref/article\n---\nbody",
        )
        .unwrap();
        assert_eq!(output, "---\ntitle: x\n---\n#work #ref/article\nbody");
    }

    #[test]
    fn inline_tags_accepts_numeric_yaml_tags() {
        let output = run_args(&["notefmt", "inline-tags"], "---\ntags: [2024, work]\n---\nbody")
            .unwrap();
        assert_eq!(output, "#2024 #work\nbody");

        let tags = read_frontmatter_tags("---\ntag: 7\n---\n").unwrap();
        assert_eq!(tags, vec!["7"]);
    }

    #[test]
    fn in_place_rewrites_the_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "\u{201C}hi\u{201D}  \n").unwrap();
        let path_arg = path.to_str().unwrap();

        let output = run_args(
            &["notefmt", "standardize", "--input", path_arg, "--in-place"],
            "",
        )
        .unwrap();
        assert!(output.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"hi\"\n");
    }

    #[test]
    fn in_place_requires_input() {
        assert!(Cli::try_parse_from(["notefmt", "trim", "--in-place"]).is_err());
    }

    #[test]
    fn frontmatter_tag_string_is_split() {
        let tags = read_frontmatter_tags("---\ntag: a, b c\n---\n").unwrap();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert!(read_frontmatter_tags("no frontmatter").unwrap().is_empty());
    }

    #[test]
    fn commands_lists_every_id() {
        let output = run_args(&["notefmt", "commands"], "").unwrap();
        assert_eq!(output.lines().count(), notefmt_core::supported_command_ids().len());
        assert!(output.contains("reformat-citation-line\tReformat Citation Line"));
    }
}
