//! commentts-syntax — the host-agnostic core of commentts.
//!
//! - [`phrase`] turns a declaration (kind, identifier, signature) into the
//!   body of a documentation comment.
//! - [`tags`] harvests hand-written text from an existing comment so
//!   regeneration keeps it.
//! - [`scanner`] finds classes, private/readonly fields and existing
//!   accessors with a brace-counting line scanner.
//! - [`codegen`] renders getters, setters and constructors for those fields.
//!
//! Nothing here performs I/O: the host hands over materialized text and a
//! caret, and applies the returned text as one edit.

pub mod codegen;
pub mod config;
pub mod error;
pub mod humanize;
pub mod model;
pub mod phrase;
pub mod scanner;
pub mod snippet;
pub mod tags;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    ClassRecord, DeclarationKind, DeclarationNode, GenerationMode, ParsedField, Parameter, Position, Span,
};
pub use scanner::{ClassScanner, LineScanner, ScanOptions};
pub use snippet::{CommentStyle, RenderedPhrase};
pub use tags::{harvest, Tag, TagMap};
