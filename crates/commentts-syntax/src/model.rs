//! Data model shared by the phrase generator, the class scanner and the
//! code renderer.

use serde::Serialize;
use std::fmt;

/// Kind of declaration the syntax service found at the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    EnumMember,
    Property,
    GetAccessor,
    SetAccessor,
    Method,
    Function,
    ArrowFunction,
    Constructor,
    VariableDeclaration,
}

/// A declared parameter; the generator only needs its name and whether it
/// is optional (`?` or a default value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
        }
    }
}

/// Byte span of a node in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A declaration as handed over by the host's syntax service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    pub kind: DeclarationKind,
    /// Identifier text; `None` when the node carries no identifier.
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Declared return type text, without the leading `:`.
    pub return_type: Option<String>,
    /// A `return <expr>` exists in the declaration's own scope.
    pub returns_value: bool,
    /// Names of declared type parameters (`<T, U>`).
    pub type_parameters: Vec<String>,
    /// Identifier of the class or interface the member belongs to.
    pub enclosing_class: Option<String>,
    pub span: Span,
}

impl DeclarationNode {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            parameters: Vec::new(),
            return_type: None,
            returns_value: false,
            type_parameters: Vec::new(),
            enclosing_class: None,
            span: Span::default(),
        }
    }
}

/// Zero-based line/column position in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A field found by the class scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedField {
    /// Storage name as declared (`_name`).
    pub name: String,
    /// Public-facing name used for accessors and DTO keys (`name`).
    pub figure: String,
    /// Declared type text (`string`).
    pub type_name: String,
}

/// One class found by the class scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    pub name: Option<String>,
    pub start: Position,
    /// Known once the braces re-balance; `None` for a truncated class body.
    pub end: Option<Position>,
    /// Private fields eligible for accessor generation.
    pub vars: Vec<ParsedField>,
    /// Readonly fields used as constructor inputs.
    pub reads: Vec<ParsedField>,
    pub getters: Vec<String>,
    pub setters: Vec<String>,
}

impl ClassRecord {
    pub fn new(name: Option<String>, start: Position) -> Self {
        Self {
            name,
            start,
            end: None,
            vars: Vec::new(),
            reads: Vec::new(),
            getters: Vec::new(),
            setters: Vec::new(),
        }
    }

    /// The record is closed and `pos` lies within `[start, end]`.
    pub fn contains(&self, pos: Position) -> bool {
        match self.end {
            Some(end) => self.start <= pos && pos <= end,
            None => false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// What a code-generation command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Getter,
    Setter,
    Both,
    Constructor,
}

impl GenerationMode {
    pub fn wants_getter(self) -> bool {
        matches!(self, GenerationMode::Getter | GenerationMode::Both)
    }

    pub fn wants_setter(self) -> bool {
        matches!(self, GenerationMode::Setter | GenerationMode::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 0) < Position::new(2, 1));
    }

    #[test]
    fn open_record_contains_nothing() {
        let record = ClassRecord::new(Some("A".into()), Position::new(0, 0));
        assert!(!record.contains(Position::new(0, 0)));
    }

    #[test]
    fn closed_record_bounds_are_inclusive() {
        let mut record = ClassRecord::new(Some("A".into()), Position::new(2, 0));
        record.end = Some(Position::new(5, 0));
        assert!(record.contains(Position::new(2, 0)));
        assert!(record.contains(Position::new(4, 7)));
        assert!(!record.contains(Position::new(5, 1)));
        assert!(!record.contains(Position::new(1, 3)));
    }
}
