//! Phrase generator: declaration to documentation prose.
//!
//! Derives an English summary from a declaration's kind and identifier
//! (`isActive` → "Determines whether active is", `copyItems` → "Copies
//! items"), then lays out the full comment body: reminder, description,
//! author, templates, parameters and returns. Text harvested from an
//! existing comment always wins over derived phrasing.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::humanize::{capitalize_first, humanize, humanize_noun, join_from, split_words, split_words_cased};
use crate::model::{DeclarationKind, DeclarationNode, Parameter};
use crate::snippet::RenderedPhrase;
use crate::tags::{Tag, TagMap};

/// Leading words that turn a name into a yes/no question.
const PREDICATE_VERBS: &[&str] = &["is", "has", "can", "contains", "have", "could"];

/// Leading words that are left unconjugated (`onClick` → "On click").
const INVARIANT_VERBS: &[&str] = &[
    "on", "after", "before", "goto", "do", "should", "will", "must", "may", "to",
];

/// Endings of words that already read as conjugated or as a participle.
const CONJUGATED_SUFFIXES: &[&str] = &["ing", "ed", "s"];

/// Endings that take `-es` in the third person (`fetch` → `fetches`).
const SIBILANT_SUFFIXES: &[&str] = &["ch", "sh", "x", "z"];

/// Verbs ending in `o` that take `-es`; other `o` endings take `-s`.
const O_ES_VERBS: &[&str] = &["go", "undergo", "forgo", "do", "undo", "redo", "veto", "echo"];

const VOID: &str = "void";

/// Everything the generator reads about one declaration.
#[derive(Debug, Clone, Copy)]
pub struct PhraseContext<'a> {
    pub kind: DeclarationKind,
    pub name: &'a str,
    pub parameters: &'a [Parameter],
    pub return_type: Option<&'a str>,
    pub returns_value: bool,
    pub type_parameters: &'a [String],
    pub enclosing_class: Option<&'a str>,
    pub tags: &'a TagMap,
}

impl<'a> PhraseContext<'a> {
    /// `None` when the node has no identifier to describe.
    pub fn from_node(node: &'a DeclarationNode, tags: &'a TagMap) -> Option<Self> {
        let name = node.name.as_deref().filter(|n| !n.is_empty())?;
        Some(Self {
            kind: node.kind,
            name,
            parameters: &node.parameters,
            return_type: node.return_type.as_deref(),
            returns_value: node.returns_value,
            type_parameters: &node.type_parameters,
            enclosing_class: node.enclosing_class.as_deref(),
            tags,
        })
    }
}

/// Generate the comment body for `node`, reporting `command` on failure.
pub fn document(
    node: &DeclarationNode,
    tags: &TagMap,
    config: &Config,
    command: &str,
) -> Result<RenderedPhrase> {
    if node.kind == DeclarationKind::VariableDeclaration {
        return Err(Error::no_documentation(command));
    }
    let ctx = PhraseContext::from_node(node, tags).ok_or_else(|| Error::no_documentation(command))?;
    Ok(describe(&ctx, config))
}

/// Lay out the full comment body for one declaration.
pub fn describe(ctx: &PhraseContext, config: &Config) -> RenderedPhrase {
    let mut sb = RenderedPhrase::new();

    emit_todo(&mut sb, ctx, config);

    match ctx.kind {
        DeclarationKind::Class | DeclarationKind::Interface => {
            emit_description_header(&mut sb, ctx, config);
            emit_author(&mut sb, ctx, config);
            emit_type_parameters(&mut sb, ctx);
        }
        DeclarationKind::Enum
        | DeclarationKind::Property
        | DeclarationKind::GetAccessor
        | DeclarationKind::SetAccessor => {
            emit_description_header(&mut sb, ctx, config);
        }
        // Only reachable through its function initializer, as ArrowFunction.
        DeclarationKind::VariableDeclaration => {}
        DeclarationKind::EnumMember => {
            sb.append_line("");
        }
        DeclarationKind::Method | DeclarationKind::Function => {
            emit_description_header(&mut sb, ctx, config);
            emit_author(&mut sb, ctx, config);
            emit_type_parameters(&mut sb, ctx);
            emit_parameters(&mut sb, ctx);
            emit_returns(&mut sb, ctx, config);
        }
        DeclarationKind::ArrowFunction => {
            emit_description_header(&mut sb, ctx, config);
            emit_type_parameters(&mut sb, ctx);
            emit_parameters(&mut sb, ctx);
            emit_returns(&mut sb, ctx, config);
        }
        DeclarationKind::Constructor => {
            emit_constructor_header(&mut sb, ctx);
            emit_author(&mut sb, ctx, config);
            emit_parameters(&mut sb, ctx);
        }
    }

    sb
}

/// The one-line summary derived from kind and identifier, if any.
pub fn description(ctx: &PhraseContext, config: &Config) -> Option<String> {
    if !config.parse_names {
        return None;
    }

    match ctx.kind {
        DeclarationKind::GetAccessor => Some(format!("Gets {}", humanize(ctx.name))),
        DeclarationKind::SetAccessor => Some(format!("Sets {}", humanize(ctx.name))),
        DeclarationKind::Property => describe_property(ctx),
        DeclarationKind::Method | DeclarationKind::Function | DeclarationKind::ArrowFunction => {
            describe_callable(ctx, config)
        }
        DeclarationKind::Class | DeclarationKind::Interface | DeclarationKind::Enum => {
            Some(capitalize_first(&humanize(ctx.name)))
        }
        DeclarationKind::Constructor => Some(constructor_phrase(ctx)),
        DeclarationKind::EnumMember | DeclarationKind::VariableDeclaration => None,
    }
}

/// Third person singular of a verb (`get` → `gets`, `copy` → `copies`).
/// Words already ending in `-ing`, `-ed` or `-s` are returned unchanged.
pub fn conjugate(verb: &str) -> String {
    let lower = verb.to_lowercase();
    if CONJUGATED_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return verb.to_string();
    }
    if SIBILANT_SUFFIXES.iter().any(|s| lower.ends_with(s))
        || O_ES_VERBS.contains(&lower.as_str())
    {
        return format!("{}es", verb);
    }
    if let Some(stem) = verb.strip_suffix('y') {
        let after_consonant = stem
            .chars()
            .last()
            .is_some_and(|c| c.is_alphabetic() && !"aeiouAEIOU".contains(c));
        if after_consonant {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", verb)
}

fn is_predicate(word: &str) -> bool {
    PREDICATE_VERBS.contains(&word.to_lowercase().as_str())
}

fn is_invariant(word: &str) -> bool {
    INVARIANT_VERBS.contains(&word.to_lowercase().as_str())
}

/// "Determines whether <rest> <predicate>" for `hasChildren`-style names.
fn predicate_phrase(words: &[String]) -> Option<String> {
    if words.len() > 1 && is_predicate(&words[0]) {
        Some(format!("Determines whether {} {}", join_from(words, 1), words[0]))
    } else {
        None
    }
}

fn describe_property(ctx: &PhraseContext) -> Option<String> {
    let words = split_words(ctx.name);
    if let Some(phrase) = predicate_phrase(&words) {
        return Some(phrase);
    }
    let first = words.first()?;

    let mut phrase = capitalize_first(first);
    if words.len() > 1 {
        phrase.push(' ');
        phrase.push_str(&join_from(&words, 1));
    } else if let Some(class) = ctx.enclosing_class {
        phrase.push_str(&format!(" of {}", humanize(class)));
    }
    Some(phrase)
}

fn describe_callable(ctx: &PhraseContext, config: &Config) -> Option<String> {
    let words = split_words(ctx.name);
    if let Some(phrase) = predicate_phrase(&words) {
        return Some(phrase);
    }

    let mut cased = split_words_cased(ctx.name);
    if let Some(prefix) = config.ignore_prefix.as_deref() {
        if cased
            .first()
            .is_some_and(|w| !prefix.is_empty() && w.eq_ignore_ascii_case(prefix))
        {
            cased.remove(0);
        }
    }

    let Some(first) = cased.first() else {
        return Some(capitalize_first(&humanize(ctx.name)));
    };

    let lower = first.to_lowercase();
    let verb = if is_invariant(&lower) {
        capitalize_first(&lower)
    } else {
        capitalize_first(&conjugate(&lower))
    };

    let rest = join_from(&cased, 1);
    let phrase = if !rest.is_empty() {
        format!("{} {}", verb, rest)
    } else if let Some(class) = ctx.enclosing_class {
        format!("{} {}", verb, humanize(class))
    } else {
        verb
    };
    Some(phrase)
}

fn constructor_phrase(ctx: &PhraseContext) -> String {
    let class = ctx.enclosing_class.unwrap_or(ctx.name);
    format!("Creates an instance of {}.", humanize(class))
}

fn emit_todo(sb: &mut RenderedPhrase, ctx: &PhraseContext, config: &Config) {
    if let Some(todo) = ctx.tags.get(&Tag::Todo) {
        sb.append_line(format!("// TODO: {}", todo));
    } else if config.todo_comments && ctx.tags.is_empty() {
        sb.append_line(format!("// TODO: comment {}", ctx.name));
    }
}

fn emit_description_header(sb: &mut RenderedPhrase, ctx: &PhraseContext, config: &Config) {
    if config.include_description_tag {
        sb.append("@description ");
    }
    if let Some(text) = ctx.tags.get(&Tag::Description) {
        sb.append(text);
    } else {
        if let Some(text) = description(ctx, config) {
            sb.append(text);
        }
        sb.append_tabstop();
    }
    sb.append_line("");
}

fn emit_constructor_header(sb: &mut RenderedPhrase, ctx: &PhraseContext) {
    match ctx.tags.get(&Tag::Description) {
        Some(text) => sb.append(text),
        None => sb.append_placeholder(constructor_phrase(ctx)),
    };
    sb.append_line("");
}

fn emit_author(sb: &mut RenderedPhrase, ctx: &PhraseContext, config: &Config) {
    let author = match ctx.tags.get(&Tag::Author) {
        Some(text) => text,
        None if config.include_author_tag => config.author_name.as_str(),
        None => return,
    };
    sb.append(format!("@author {}", author));
    sb.append_tabstop();
    sb.append_line("");
}

fn emit_type_parameters(sb: &mut RenderedPhrase, ctx: &PhraseContext) {
    for name in ctx.type_parameters {
        sb.append(format!("@template {} ", name));
        if let Some(text) = ctx.tags.template(name) {
            sb.append(text);
        }
        sb.append_tabstop();
        sb.append_line("");
    }
}

fn emit_parameters(sb: &mut RenderedPhrase, ctx: &PhraseContext) {
    for param in ctx.parameters {
        sb.append("@param ");
        if param.optional {
            sb.append(format!("[{}]", param.name));
        } else {
            sb.append(&param.name);
        }
        sb.append(" ");
        if let Some(text) = ctx.tags.param(&param.name) {
            sb.append(text);
        }
        sb.append_tabstop();
        sb.append_line("");
    }
}

fn emit_returns(sb: &mut RenderedPhrase, ctx: &PhraseContext, config: &Config) {
    let declared = ctx.return_type.map(str::trim).filter(|t| !t.is_empty());
    if !ctx.returns_value && declared.map_or(true, |t| t == VOID) {
        return;
    }

    sb.append("@returns ");
    if let Some(text) = ctx.tags.get(&Tag::Returns) {
        sb.append(text);
    } else if let Some(return_type) = declared.filter(|_| config.parse_names) {
        let noun = humanize_noun(ctx.name);
        match return_type {
            "boolean" => sb.append(format!("true if {}", noun)),
            "Date" => sb.append(format!("date of {}", noun)),
            _ => sb.append(noun),
        };
    }
    sb.append_tabstop();
    sb.append_line("");
}
