//! Output formats for a command's edit — trait-based dispatch.

use crate::document::{Edit, TextDocument};
use anyhow::{anyhow, Context, Result};
use commentts_syntax::CommentStyle;

/// Turns the single edit of a command into what is written to stdout.
pub trait Emitter {
    fn emit(&self, doc: &TextDocument, edit: &Edit) -> Result<String>;
    /// How cursor stops in generated comments are written for this output.
    fn comment_style(&self) -> CommentStyle;
}

/// The whole document with the edit applied.
pub struct DocumentEmitter;

/// Only the inserted text, cursor stops in snippet syntax.
pub struct SnippetEmitter;

/// `{start, end, text}` for editor integrations.
pub struct JsonEmitter;

impl Emitter for DocumentEmitter {
    fn emit(&self, doc: &TextDocument, edit: &Edit) -> Result<String> {
        Ok(doc.apply(edit))
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Plain
    }
}

impl Emitter for SnippetEmitter {
    fn emit(&self, _doc: &TextDocument, edit: &Edit) -> Result<String> {
        Ok(edit.text.clone())
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Snippet
    }
}

impl Emitter for JsonEmitter {
    fn emit(&self, _doc: &TextDocument, edit: &Edit) -> Result<String> {
        let mut json = serde_json::to_string_pretty(edit).context("failed to serialize edit")?;
        json.push('\n');
        Ok(json)
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Snippet
    }
}

/// Create an emitter for the given format name.
pub fn create_emitter(format: &str) -> Result<Box<dyn Emitter>> {
    match format {
        "document" | "doc" => Ok(Box::new(DocumentEmitter)),
        "snippet" => Ok(Box::new(SnippetEmitter)),
        "json" => Ok(Box::new(JsonEmitter)),
        _ => Err(anyhow!(
            "unknown emit format: {}. Use document, snippet, or json",
            format
        )),
    }
}
