//! Generation options, built once per command and passed down by reference.
//!
//! Keys use the add-on's option names (`parseNames`, `includeAuthorTag`, ...)
//! so the same table can be read from a TOML file.

use serde::Deserialize;

/// Immutable configuration for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Derive descriptions from identifiers; when off only cursor stops are emitted.
    pub parse_names: bool,
    /// Prefix the description line with `@description`.
    pub include_description_tag: bool,
    /// Emit an `@author` line for classes, interfaces, methods and constructors.
    pub include_author_tag: bool,
    pub author_name: String,
    /// Replace a selected comment block in place instead of inserting alongside.
    pub replace_comments: bool,
    /// Emit a `// TODO: comment <name>` reminder for new documentation.
    pub todo_comments: bool,
    /// Restrict field discovery to the class enclosing the caret.
    pub scoped: bool,
    /// Suppress fields that already have a matching accessor.
    pub filter: bool,
    /// `getName()` / `setName()` methods instead of `get name` / `set name`.
    pub classic: bool,
    /// Framework prefix dropped before verb conjugation (`ngOnInit` → `On init`).
    pub ignore_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse_names: true,
            include_description_tag: false,
            include_author_tag: false,
            author_name: String::new(),
            replace_comments: false,
            todo_comments: false,
            scoped: false,
            filter: true,
            classic: false,
            ignore_prefix: Some("ng".to_string()),
        }
    }
}

impl Config {
    /// Scanner options carried by this configuration.
    pub fn scan_options(&self) -> crate::scanner::ScanOptions {
        crate::scanner::ScanOptions {
            scoped: self.scoped,
            filter: self.filter,
            classic: self.classic,
        }
    }
}
