//! commentts — documentation comments, accessors and constructors for
//! TypeScript sources.
//!
//! Each run loads one file, resolves the caret (and selection), executes one
//! command and applies its single edit: printed to stdout (`--emit`) or
//! written back with `--in-place`.

mod commands;
mod config;
mod document;
mod emit;
mod syntax;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use commands::DocumentRequest;
use commentts_syntax::{Config, GenerationMode, Position};
use document::{Edit, Selection, TextDocument};
use emit::Emitter;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "commentts",
    about = "Generate doc comments, accessors and constructors for TypeScript"
)]
struct Cli {
    /// Configuration file. Defaults to .comment-ts.toml next to the input,
    /// then in the current directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert or regenerate the doc comment of the declaration at the caret
    Document(DocumentArgs),
    /// Generate getters for private fields
    Getter(AccessorArgs),
    /// Generate setters for private fields
    Setter(AccessorArgs),
    /// Generate getters and setters for private fields
    Accessors(AccessorArgs),
    /// Generate a DTO constructor from readonly fields
    Constructor(ConstructorArgs),
    /// List fields eligible for accessor generation as JSON
    Classes(ClassesArgs),
    /// Print the syntax nodes from the root down to the caret
    Trace(TraceArgs),
}

#[derive(Args)]
struct Target {
    /// TypeScript source file
    file: PathBuf,

    /// Caret line (1-based)
    #[arg(short, long)]
    line: usize,
}

impl Target {
    fn caret(&self, column: usize) -> Position {
        Position::new(self.line.saturating_sub(1), column.saturating_sub(1))
    }
}

#[derive(Args)]
struct Output {
    /// Output: document (edited file), snippet (inserted text), json (edit)
    #[arg(long, default_value = "document")]
    emit: String,

    /// Rewrite the file instead of printing
    #[arg(short = 'i', long)]
    in_place: bool,
}

#[derive(Args)]
struct DocumentArgs {
    /// TypeScript source file
    file: PathBuf,

    /// Caret line (1-based). Defaults to the first selected line.
    #[arg(short, long, required_unless_present = "selection")]
    line: Option<usize>,

    /// Caret column (1-based)
    #[arg(short, long, default_value_t = 1)]
    column: usize,

    /// Selected lines, e.g. 3:7 (1-based, inclusive)
    #[arg(long, value_parser = parse_line_range)]
    selection: Option<LineRange>,

    /// Replace the `/** */` trigger line above the declaration
    #[arg(long)]
    completion: bool,

    #[command(flatten)]
    flags: DocFlags,

    #[command(flatten)]
    output: Output,
}

#[derive(Args)]
struct AccessorArgs {
    #[command(flatten)]
    target: Target,

    /// Field to generate for (storage or public name). Defaults to every
    /// eligible field of the class at the caret.
    #[arg(long)]
    field: Option<String>,

    #[command(flatten)]
    scan: ScanFlags,

    #[command(flatten)]
    output: Output,
}

#[derive(Args)]
struct ConstructorArgs {
    #[command(flatten)]
    target: Target,

    #[command(flatten)]
    scan: ScanFlags,

    #[command(flatten)]
    output: Output,
}

#[derive(Args)]
struct ClassesArgs {
    #[command(flatten)]
    target: Target,

    /// Which accessors the list is for: getter, setter, both
    #[arg(long, default_value = "both", value_parser = parse_mode)]
    mode: GenerationMode,

    #[command(flatten)]
    scan: ScanFlags,
}

#[derive(Args)]
struct TraceArgs {
    #[command(flatten)]
    target: Target,

    /// Caret column (1-based)
    #[arg(short, long, default_value_t = 1)]
    column: usize,
}

/// Overrides for documentation options. Unset flags keep the file's value.
#[derive(Args)]
struct DocFlags {
    /// Leave descriptions as empty cursor stops
    #[arg(long)]
    no_parse_names: bool,

    /// Prefix descriptions with @description
    #[arg(long)]
    description_tag: bool,

    /// Emit @author with this name
    #[arg(long)]
    author: Option<String>,

    /// Regenerate a selected comment, keeping its authored text
    #[arg(long)]
    replace_comments: bool,

    /// Emit a `// TODO: comment <name>` reminder
    #[arg(long)]
    todo: bool,

    /// Framework prefix skipped before the verb; empty disables
    #[arg(long)]
    ignore_prefix: Option<String>,
}

impl DocFlags {
    fn apply(&self, config: &mut Config) {
        if self.no_parse_names {
            config.parse_names = false;
        }
        if self.description_tag {
            config.include_description_tag = true;
        }
        if let Some(author) = &self.author {
            config.include_author_tag = true;
            config.author_name = author.clone();
        }
        if self.replace_comments {
            config.replace_comments = true;
        }
        if self.todo {
            config.todo_comments = true;
        }
        if let Some(prefix) = &self.ignore_prefix {
            config.ignore_prefix = Some(prefix.clone()).filter(|p| !p.is_empty());
        }
    }
}

/// Overrides for class scanning options.
#[derive(Args)]
struct ScanFlags {
    /// Only consider fields of the class at the caret
    #[arg(long)]
    scoped: bool,

    /// Keep fields that already have accessors
    #[arg(long)]
    no_filter: bool,

    /// getX()/setX() methods instead of get/set accessors
    #[arg(long)]
    classic: bool,
}

impl ScanFlags {
    fn apply(&self, config: &mut Config) {
        if self.scoped {
            config.scoped = true;
        }
        if self.no_filter {
            config.filter = false;
        }
        if self.classic {
            config.classic = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRange {
    first: usize,
    last: usize,
}

impl LineRange {
    fn contains(&self, line: usize) -> bool {
        self.first <= line && line <= self.last
    }
}

fn parse_line_range(s: &str) -> std::result::Result<LineRange, String> {
    let (first, last) = s.split_once(':').unwrap_or((s, s));
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid line number: {}", v))
    };
    let range = LineRange {
        first: parse(first)?,
        last: parse(last)?,
    };
    if range.first == 0 || range.last < range.first {
        return Err(format!("invalid line range: {}", s));
    }
    Ok(range)
}

fn parse_mode(s: &str) -> std::result::Result<GenerationMode, String> {
    match s {
        "getter" => Ok(GenerationMode::Getter),
        "setter" => Ok(GenerationMode::Setter),
        "both" => Ok(GenerationMode::Both),
        _ => Err(format!("unknown mode: {}. Use getter, setter, or both", s)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<commentts_syntax::Error>() {
                Some(failure) => eprintln!("warning: {}", failure),
                None => tracing::error!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Document(args) => document(cli, args),
        Command::Getter(args) => accessors(cli, args, GenerationMode::Getter, commands::GETTER),
        Command::Setter(args) => accessors(cli, args, GenerationMode::Setter, commands::SETTER),
        Command::Accessors(args) => accessors(cli, args, GenerationMode::Both, commands::ACCESSORS),
        Command::Constructor(args) => constructor(cli, args),
        Command::Classes(args) => classes(cli, args),
        Command::Trace(args) => trace(args),
    }
}

fn document(cli: &Cli, args: &DocumentArgs) -> Result<()> {
    let emitter = emit::create_emitter(&args.output.emit)?;
    let caret = document_caret(args.line, args.column, args.selection)?;
    let doc = open(commands::DOCUMENT, &args.file)?;
    let mut config = config::load(cli.config.as_deref(), &args.file)?;
    args.flags.apply(&mut config);

    let selection = match args.selection {
        Some(range) => {
            let last = range.last - 1;
            Selection {
                start: Position::new(range.first - 1, 0),
                end: Position::new(last, doc.line_text(last).chars().count()),
            }
        }
        None => Selection::caret(caret),
    };
    let doc = doc.with_selection(selection);
    let syntax = syntax::create_syntax(&args.file, doc.text())?;

    let request = DocumentRequest {
        caret,
        for_completion: args.completion,
        style: emitter.comment_style(),
    };
    let edit = commands::document_this(&doc, syntax.as_ref(), &config, &request)?;
    finish(&args.file, &doc, &edit, &args.output, emitter.as_ref())
}

/// Caret for `document`: `--line`/`--column`, which must fall inside the
/// selection when one is given, else the start of the selection.
fn document_caret(line: Option<usize>, column: usize, selection: Option<LineRange>) -> Result<Position> {
    match (line, selection) {
        (Some(line), Some(range)) if !range.contains(line) => bail!(
            "caret line {} is outside the selection {}:{}",
            line,
            range.first,
            range.last
        ),
        (Some(line), _) => Ok(Position::new(line.saturating_sub(1), column.saturating_sub(1))),
        (None, Some(range)) => Ok(Position::new(range.first - 1, 0)),
        (None, None) => bail!("either --line or --selection is required"),
    }
}

fn accessors(cli: &Cli, args: &AccessorArgs, mode: GenerationMode, name: &str) -> Result<()> {
    let emitter = emit::create_emitter(&args.output.emit)?;
    let doc = open(name, &args.target.file)?;
    let mut config = config::load(cli.config.as_deref(), &args.target.file)?;
    args.scan.apply(&mut config);

    let edit = commands::generate_accessors(
        &doc,
        &config,
        args.target.caret(1),
        mode,
        args.field.as_deref(),
        name,
    )?;
    finish(&args.target.file, &doc, &edit, &args.output, emitter.as_ref())
}

fn constructor(cli: &Cli, args: &ConstructorArgs) -> Result<()> {
    let emitter = emit::create_emitter(&args.output.emit)?;
    let doc = open(commands::CONSTRUCTOR, &args.target.file)?;
    let mut config = config::load(cli.config.as_deref(), &args.target.file)?;
    args.scan.apply(&mut config);

    let edit = commands::generate_constructor(&doc, &config, args.target.caret(1))?;
    finish(&args.target.file, &doc, &edit, &args.output, emitter.as_ref())
}

fn classes(cli: &Cli, args: &ClassesArgs) -> Result<()> {
    let doc = open(commands::CLASSES, &args.target.file)?;
    let mut config = config::load(cli.config.as_deref(), &args.target.file)?;
    args.scan.apply(&mut config);

    let items = commands::list_fields(&doc, &config, args.target.caret(1), args.mode);
    let json = serde_json::to_string_pretty(&items).context("failed to serialize fields")?;
    println!("{}", json);
    Ok(())
}

fn trace(args: &TraceArgs) -> Result<()> {
    let doc = open(commands::TRACE, &args.target.file)?;
    let syntax = syntax::create_syntax(&args.target.file, doc.text())?;
    let offset = doc.offset_of(args.target.caret(args.column));
    print!("{}", syntax.trace(offset));
    Ok(())
}

/// Check the file type, then read the document.
fn open(command: &str, path: &Path) -> Result<TextDocument> {
    if !syntax::is_supported(path) {
        return Err(commentts_syntax::Error::file_type(command).into());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(TextDocument::new(text))
}

/// Write the edited document back or print the emitted form.
fn finish(
    path: &Path,
    doc: &TextDocument,
    edit: &Edit,
    output: &Output,
    emitter: &dyn Emitter,
) -> Result<()> {
    if output.in_place {
        fs::write(path, doc.apply(edit))
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("rewrote {}", path.display());
    } else {
        print!("{}", emitter.emit(doc, edit)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_ranges() {
        assert_eq!(parse_line_range("3:7"), Ok(LineRange { first: 3, last: 7 }));
        assert_eq!(parse_line_range("4"), Ok(LineRange { first: 4, last: 4 }));
        assert!(parse_line_range("0:2").is_err());
        assert!(parse_line_range("5:2").is_err());
        assert!(parse_line_range("a:b").is_err());
    }

    #[test]
    fn document_caret_follows_line_or_selection() {
        let range = Some(LineRange { first: 3, last: 7 });
        assert_eq!(document_caret(Some(5), 4, range).unwrap(), Position::new(4, 3));
        assert_eq!(document_caret(None, 4, range).unwrap(), Position::new(2, 0));
        assert_eq!(document_caret(Some(2), 1, None).unwrap(), Position::new(1, 0));
        assert!(document_caret(Some(9), 1, range).is_err());
        assert!(document_caret(None, 1, None).is_err());
    }

    #[test]
    fn modes() {
        assert_eq!(parse_mode("setter"), Ok(GenerationMode::Setter));
        assert!(parse_mode("constructor").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = Config::default();
        let flags = DocFlags {
            no_parse_names: true,
            description_tag: false,
            author: Some("Ada".into()),
            replace_comments: false,
            todo: true,
            ignore_prefix: Some(String::new()),
        };
        flags.apply(&mut config);
        assert!(!config.parse_names);
        assert!(config.include_author_tag);
        assert_eq!(config.author_name, "Ada");
        assert!(config.todo_comments);
        assert_eq!(config.ignore_prefix, None);
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
