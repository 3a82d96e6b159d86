//! Command handlers. Each one reads the document and caret and returns a
//! single `Edit`, or a library error naming the command.

use crate::document::{Edit, Selection, TextDocument};
use crate::syntax::SyntaxService;
use commentts_syntax::codegen::{self, PickItem};
use commentts_syntax::scanner::enclosing_class;
use commentts_syntax::{
    harvest, phrase, ClassRecord, ClassScanner, CommentStyle, Config, Error, GenerationMode,
    LineScanner, ParsedField, Position, Result, TagMap,
};
use regex::Regex;
use std::sync::LazyLock;

pub const DOCUMENT: &str = "Comment...";
pub const GETTER: &str = "Generate Getter";
pub const SETTER: &str = "Generate Setter";
pub const ACCESSORS: &str = "Generate Getter and Setter";
pub const CONSTRUCTOR: &str = "Generate Constructor";
pub const CLASSES: &str = "List Fields";
pub const TRACE: &str = "Trace Typescript Syntax Node";

/// Text before the caret that offers documentation completion.
static RE_TRIGGER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*$|/\*\*\s*$|^\s*/\*\*+\s*$").unwrap());

/// Closing `*/` left after the caret by an auto-closed block.
static RE_TRIGGER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\**/\s*$").unwrap());

/// Whether `prefix`, the text left of the caret, should offer to document
/// the declaration below.
pub fn is_completion_trigger(prefix: &str) -> bool {
    RE_TRIGGER_PREFIX.is_match(prefix)
}

/// A whole line that is nothing but a typed completion trigger.
fn is_trigger_line(line: &str) -> bool {
    match line.find("/**") {
        Some(open) => {
            let (prefix, rest) = line.split_at(open + 3);
            is_completion_trigger(prefix) && (rest.trim().is_empty() || RE_TRIGGER_SUFFIX.is_match(rest))
        }
        None => line.trim().is_empty(),
    }
}

/// Options for one documentation request.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRequest {
    pub caret: Position,
    /// Replace the trigger line above the declaration.
    pub for_completion: bool,
    pub style: CommentStyle,
}

/// Insert or regenerate the doc comment for the declaration at the caret.
pub fn document_this(
    doc: &TextDocument,
    syntax: &dyn SyntaxService,
    config: &Config,
    request: &DocumentRequest,
) -> Result<Edit> {
    let selection = doc.selection();
    let replacing = config.replace_comments && selection_is_comment(doc, selection);
    let tags = if config.replace_comments {
        selected_tags(doc, selection)
    } else {
        TagMap::new()
    };

    let node = syntax
        .node_at(doc.offset_of(request.caret))
        .ok_or_else(|| Error::no_documentation(DOCUMENT))?;
    let body = phrase::document(&node, &tags, config, DOCUMENT)?;
    let comment = body.to_comment(request.style);

    let line = doc.position_of(node.span.start).line;
    let indent = doc.indentation(line);
    let text = indent_lines(&comment, indent, doc.eol());
    tracing::debug!("documenting {:?} {:?} at line {}", node.kind, node.name, line + 1);

    let edit = if replacing {
        let end = Position::new(selection.end.line + 1, 0);
        Edit::replace(Position::new(selection.start.line, 0), end, text)
    } else if request.for_completion && line > 0 && is_trigger_line(doc.line_text(line - 1)) {
        Edit::replace(Position::new(line - 1, 0), Position::new(line, 0), text)
    } else {
        Edit::insert(Position::new(line, 0), text)
    };
    Ok(edit)
}

/// Getters and/or setters for one named field, or for every eligible field
/// of the class around the caret.
pub fn generate_accessors(
    doc: &TextDocument,
    config: &Config,
    caret: Position,
    mode: GenerationMode,
    field: Option<&str>,
    command: &str,
) -> Result<Edit> {
    let classes = scan(doc, config, caret, mode);
    let fields: Vec<ParsedField> = match field {
        Some(name) => {
            let class = enclosing_class(&classes, caret).and_then(|c| c.name.as_deref());
            let found = codegen::find_field(&classes, name, class).ok_or_else(|| {
                Error::no_code(command, format!("for field '{}'", name))
            })?;
            vec![found.clone()]
        }
        None => {
            let class = enclosing_class(&classes, caret)
                .ok_or_else(|| Error::no_code(command, "outside of a class"))?;
            class.vars.clone()
        }
    };
    if fields.is_empty() {
        return Err(Error::no_code(command, "because no field needs one"));
    }

    let code = codegen::render_accessors(&fields, mode, config.classic);
    Ok(Edit::insert(
        Position::new(caret.line, 0),
        code.replace('\n', doc.eol()),
    ))
}

/// DTO constructor for the class around the caret.
pub fn generate_constructor(doc: &TextDocument, config: &Config, caret: Position) -> Result<Edit> {
    let classes = scan(doc, config, caret, GenerationMode::Constructor);
    let class = enclosing_class(&classes, caret)
        .ok_or_else(|| Error::no_code(CONSTRUCTOR, "outside of a class"))?;
    let code = codegen::render_constructor(class);
    Ok(Edit::insert(
        Position::new(caret.line, 0),
        code.replace('\n', doc.eol()),
    ))
}

/// Eligible fields of every class, as a pick list.
pub fn list_fields(
    doc: &TextDocument,
    config: &Config,
    caret: Position,
    mode: GenerationMode,
) -> Vec<PickItem> {
    codegen::pick_items(&scan(doc, config, caret, mode))
}

fn scan(doc: &TextDocument, config: &Config, caret: Position, mode: GenerationMode) -> Vec<ClassRecord> {
    let scanner = LineScanner::new(config.scan_options());
    scanner.scan_classes(&doc.lines(), caret, mode)
}

/// The selection spans a whole `/* ... */` block.
fn selection_is_comment(doc: &TextDocument, selection: Selection) -> bool {
    if selection.is_empty() {
        return false;
    }
    doc.line_text(selection.start.line).trim_start().starts_with("/*")
        && doc.line_text(selection.end.line).trim_end().ends_with("*/")
}

fn selected_tags(doc: &TextDocument, selection: Selection) -> TagMap {
    harvest((selection.start.line..=selection.end.line).map(|i| doc.line_text(i)))
}

fn indent_lines(text: &str, indent: &str, eol: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(indent);
        out.push_str(line);
        out.push_str(eol);
    }
    out
}
