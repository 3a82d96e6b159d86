//! TypeScript syntax service on the tree-sitter grammar.
//!
//! Lookup treats whitespace, comments and decorators in front of a node as
//! part of that node, so a caret on an old comment or a blank line above a
//! declaration resolves to the declaration. Tokens that are not declarations
//! resolve to their nearest declaration ancestor.

use super::SyntaxService;
use anyhow::{anyhow, Context, Result};
use commentts_syntax::{DeclarationKind, DeclarationNode, Parameter, Span};
use tree_sitter::{Node, Parser, Tree};

/// Nodes that open a new function scope; their `return`s are not ours.
const FUNCTION_SCOPES: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_declaration",
    "class",
];

/// Function-valued initializers documented as arrow functions.
const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

const CLASS_LIKE: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "interface_declaration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

pub struct TypeScriptSyntax {
    source: String,
    tree: Tree,
}

impl TypeScriptSyntax {
    pub fn parse(source: &str, dialect: Dialect) -> Result<Self> {
        let language = match dialect {
            Dialect::TypeScript => tree_sitter_typescript::language_typescript(),
            Dialect::Tsx => tree_sitter_typescript::language_tsx(),
        };
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .context("failed to load the TypeScript grammar")?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("failed to parse TypeScript source"))?;
        Ok(Self {
            source: source.to_string(),
            tree,
        })
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| unquote(self.text(n)).to_string())
    }

    /// Deepest node whose range, widened back over leading trivia, holds `offset`.
    /// On a shared boundary the later sibling wins.
    fn token_at(&self, offset: usize) -> Node<'_> {
        let mut node = self.tree.root_node();
        let mut leading = 0;
        loop {
            let mut cursor = node.walk();
            let mut start = leading;
            let mut found = None;
            for child in node.children(&mut cursor) {
                if is_trivia(child) {
                    continue;
                }
                let child_start = start;
                start = child.end_byte();
                if child_start > offset {
                    break;
                }
                if offset <= child.end_byte() {
                    found = Some((child, child_start));
                }
            }
            match found {
                Some((child, child_start)) => {
                    node = child;
                    leading = child_start;
                }
                None => return node,
            }
        }
    }

    /// First node at or above `node` that can carry documentation.
    fn resolve<'t>(&self, mut node: Node<'t>) -> Option<(Node<'t>, DeclarationKind)> {
        loop {
            if let Some(kind) = self.declaration_kind(node) {
                if documentable(node, kind) {
                    return Some((node, kind));
                }
            } else if let Some(inner) = delegate(node) {
                if let Some(kind) = self.declaration_kind(inner) {
                    if documentable(inner, kind) {
                        return Some((inner, kind));
                    }
                }
            }
            node = node.parent()?;
        }
    }

    fn declaration_kind(&self, node: Node) -> Option<DeclarationKind> {
        if !node.is_named() {
            return None;
        }
        let kind = match node.kind() {
            "class_declaration" | "abstract_class_declaration" | "class" => DeclarationKind::Class,
            "interface_declaration" => DeclarationKind::Interface,
            "enum_declaration" => DeclarationKind::Enum,
            "enum_assignment" => DeclarationKind::EnumMember,
            "property_identifier" | "string"
                if node.parent().is_some_and(|p| p.kind() == "enum_body") =>
            {
                DeclarationKind::EnumMember
            }
            "public_field_definition" | "property_signature" => DeclarationKind::Property,
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                self.method_kind(node)
            }
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                DeclarationKind::Function
            }
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                DeclarationKind::ArrowFunction
            }
            "variable_declarator" => DeclarationKind::VariableDeclaration,
            _ => return None,
        };
        Some(kind)
    }

    fn method_kind(&self, node: Node) -> DeclarationKind {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_named() {
                continue;
            }
            match child.kind() {
                "get" => return DeclarationKind::GetAccessor,
                "set" => return DeclarationKind::SetAccessor,
                _ => {}
            }
        }
        if self.field_text(node, "name").as_deref() == Some("constructor") {
            DeclarationKind::Constructor
        } else {
            DeclarationKind::Method
        }
    }

    fn declaration(&self, node: Node, kind: DeclarationKind) -> DeclarationNode {
        match kind {
            DeclarationKind::VariableDeclaration | DeclarationKind::Property => {
                let name = self.field_text(node, "name");
                match node.child_by_field_name("value") {
                    Some(value) if FUNCTION_VALUES.contains(&value.kind()) => {
                        self.callable(value, DeclarationKind::ArrowFunction, name, node)
                    }
                    _ => self.plain(kind, name, node),
                }
            }
            DeclarationKind::ArrowFunction => {
                let target = function_target(node).unwrap_or(node);
                let name = self.target_name(target);
                self.callable(node, kind, name, target)
            }
            DeclarationKind::EnumMember => {
                let name = if node.kind() == "enum_assignment" {
                    self.field_text(node, "name")
                } else {
                    Some(unquote(self.text(node)).to_string())
                };
                self.plain(kind, name, node)
            }
            DeclarationKind::Class | DeclarationKind::Interface | DeclarationKind::Enum => {
                let name = self.field_text(node, "name");
                let mut decl = self.plain(kind, name, node);
                decl.type_parameters = self.type_parameters(node);
                decl
            }
            DeclarationKind::Method
            | DeclarationKind::Function
            | DeclarationKind::Constructor
            | DeclarationKind::GetAccessor
            | DeclarationKind::SetAccessor => {
                let name = self.field_text(node, "name");
                self.callable(node, kind, name, node)
            }
        }
    }

    fn plain(&self, kind: DeclarationKind, name: Option<String>, anchor: Node) -> DeclarationNode {
        DeclarationNode {
            kind,
            name,
            parameters: Vec::new(),
            return_type: None,
            returns_value: false,
            type_parameters: Vec::new(),
            enclosing_class: self.enclosing_class(anchor),
            span: anchor_span(anchor),
        }
    }

    /// `func` supplies the signature; `anchor` is where the comment goes.
    fn callable(
        &self,
        func: Node,
        kind: DeclarationKind,
        name: Option<String>,
        anchor: Node,
    ) -> DeclarationNode {
        DeclarationNode {
            kind,
            name,
            parameters: self.parameters(func),
            return_type: func.child_by_field_name("return_type").map(|t| {
                let text = self.text(t).trim();
                text.strip_prefix(':').unwrap_or(text).trim().to_string()
            }),
            returns_value: has_value_return(func),
            type_parameters: self.type_parameters(func),
            enclosing_class: self.enclosing_class(anchor),
            span: anchor_span(anchor),
        }
    }

    fn parameters(&self, func: Node) -> Vec<Parameter> {
        if let Some(single) = func.child_by_field_name("parameter") {
            return vec![Parameter::new(self.text(single), false)];
        }
        let Some(list) = func.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        let parameters = list
            .named_children(&mut cursor)
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .filter_map(|p| {
                let pattern = p.child_by_field_name("pattern")?;
                let name = self.text(pattern).trim_start_matches("...");
                if name == "this" {
                    return None;
                }
                let optional =
                    p.kind() == "optional_parameter" || p.child_by_field_name("value").is_some();
                Some(Parameter::new(name, optional))
            })
            .collect();
        parameters
    }

    fn type_parameters(&self, node: Node) -> Vec<String> {
        let Some(list) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        let names = list
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| self.field_text(p, "name"))
            .collect();
        names
    }

    fn enclosing_class(&self, node: Node) -> Option<String> {
        let mut current = node.parent();
        while let Some(n) = current {
            if CLASS_LIKE.contains(&n.kind()) && n.is_named() {
                return self.field_text(n, "name");
            }
            current = n.parent();
        }
        None
    }

    fn target_name(&self, target: Node) -> Option<String> {
        match target.kind() {
            "variable_declarator" | "public_field_definition" => self.field_text(target, "name"),
            "pair" => self.field_text(target, "key"),
            "assignment_expression" => {
                let left = target.child_by_field_name("left")?;
                if left.kind() == "member_expression" {
                    self.field_text(left, "property")
                } else {
                    Some(self.text(left).to_string())
                }
            }
            _ => None,
        }
    }
}

impl SyntaxService for TypeScriptSyntax {
    fn node_at(&self, offset: usize) -> Option<DeclarationNode> {
        let token = self.token_at(offset);
        let Some((node, kind)) = self.resolve(token) else {
            tracing::debug!("no declaration encloses {} ({})", offset, token.kind());
            return None;
        };
        tracing::debug!("{} at {} resolved to {:?}", token.kind(), offset, kind);
        Some(self.declaration(node, kind))
    }

    fn trace(&self, offset: usize) -> String {
        let mut node = self.token_at(offset);
        let mut chain = vec![node];
        while let Some(parent) = node.parent() {
            chain.push(parent);
            node = parent;
        }
        chain.reverse();

        let mut out = String::new();
        for node in chain {
            let index = node
                .parent()
                .and_then(|p| {
                    let mut cursor = p.walk();
                    let found = p.children(&mut cursor).position(|c| c.id() == node.id());
                    found
                })
                .map_or_else(|| "-".to_string(), |i| i.to_string());
            out.push_str(&format!(
                "{} to {} --- ({}) {} - Index of parent: {}\n",
                node.start_byte(),
                node.end_byte(),
                node.kind_id(),
                node.kind(),
                index
            ));
            out.push_str(&" ".repeat(node.start_position().column));
            out.push_str(self.text(node));
            out.push('\n');
        }
        out
    }
}

fn is_trivia(node: Node) -> bool {
    matches!(node.kind(), "comment" | "decorator")
}

/// Callback arguments and variables without a function value are skipped.
fn documentable(node: Node, kind: DeclarationKind) -> bool {
    match kind {
        DeclarationKind::ArrowFunction => function_target(node).is_some(),
        DeclarationKind::VariableDeclaration => node
            .child_by_field_name("value")
            .is_some_and(|value| FUNCTION_VALUES.contains(&value.kind())),
        _ => true,
    }
}

/// Declaration wrapped by a statement that is not itself documentable.
fn delegate(node: Node) -> Option<Node> {
    match node.kind() {
        "export_statement" => node.child_by_field_name("declaration"),
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            let first = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "variable_declarator");
            first
        }
        _ => None,
    }
}

/// The declaration a function value is assigned to, if any.
fn function_target(func: Node) -> Option<Node> {
    let parent = func.parent()?;
    let value_field = match parent.kind() {
        "variable_declarator" | "public_field_definition" | "pair" => "value",
        "assignment_expression" => "right",
        _ => return None,
    };
    let value = parent.child_by_field_name(value_field)?;
    (value.id() == func.id()).then_some(parent)
}

/// Where the comment for `anchor` is inserted: the enclosing statement for
/// declarators, `export` and member decorators included.
fn anchor_span(anchor: Node) -> Span {
    let mut start = anchor;
    if anchor.kind() == "variable_declarator" {
        if let Some(statement) = anchor
            .parent()
            .filter(|p| matches!(p.kind(), "lexical_declaration" | "variable_declaration"))
        {
            start = statement;
        }
    }
    if anchor.kind() == "assignment_expression" {
        if let Some(statement) = anchor.parent().filter(|p| p.kind() == "expression_statement") {
            start = statement;
        }
    }
    if let Some(export) = start.parent().filter(|p| p.kind() == "export_statement") {
        start = export;
    }
    while let Some(prev) = start.prev_named_sibling() {
        if prev.kind() != "decorator" {
            break;
        }
        start = prev;
    }
    Span {
        start: start.start_byte(),
        end: anchor.end_byte(),
    }
}

/// A `return <expr>` in `func`'s own scope.
fn has_value_return(func: Node) -> bool {
    let mut cursor = func.walk();
    for child in func.children(&mut cursor) {
        if child.kind() == "return_statement" {
            if child.named_child_count() > 0 {
                return true;
            }
            continue;
        }
        if child.is_named() && FUNCTION_SCOPES.contains(&child.kind()) {
            continue;
        }
        if has_value_return(child) {
            return true;
        }
    }
    false
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TypeScriptSyntax {
        TypeScriptSyntax::parse(source, Dialect::TypeScript).unwrap()
    }

    fn at(source: &str, needle: &str) -> DeclarationNode {
        let offset = source.find(needle).unwrap();
        parse(source).node_at(offset).unwrap()
    }

    #[test]
    fn comment_above_class_belongs_to_class() {
        let src = "/** old */\nclass Person {\n}\n";
        let node = parse(src).node_at(0).unwrap();
        assert_eq!(node.kind, DeclarationKind::Class);
        assert_eq!(node.name.as_deref(), Some("Person"));
        assert_eq!(node.span.start, src.find("class").unwrap());
    }

    #[test]
    fn exported_class_at_line_start() {
        let node = parse("export class A {}\n").node_at(0).unwrap();
        assert_eq!(node.kind, DeclarationKind::Class);
        assert_eq!(node.name.as_deref(), Some("A"));
        assert_eq!(node.span.start, 0);
    }

    #[test]
    fn method_with_return() {
        let src = "class Tree {\n  hasChildren(): boolean {\n    return true;\n  }\n}\n";
        let node = at(src, "hasChildren");
        assert_eq!(node.kind, DeclarationKind::Method);
        assert_eq!(node.name.as_deref(), Some("hasChildren"));
        assert_eq!(node.return_type.as_deref(), Some("boolean"));
        assert!(node.returns_value);
        assert_eq!(node.enclosing_class.as_deref(), Some("Tree"));
    }

    #[test]
    fn caret_inside_body_resolves_to_method() {
        let src = "class Tree {\n  walk(): void {\n    let depth = 0;\n  }\n}\n";
        let node = at(src, "depth");
        assert_eq!(node.kind, DeclarationKind::Method);
        assert_eq!(node.name.as_deref(), Some("walk"));
        let node = at(src, "void {");
        assert_eq!(node.kind, DeclarationKind::Method);
        assert!(!node.returns_value);
    }

    #[test]
    fn local_variable_resolves_to_enclosing_function() {
        let src = "function walk(): void {\n  let depth = 0;\n}\n";
        let node = at(src, "depth");
        assert_eq!(node.kind, DeclarationKind::Function);
        assert_eq!(node.name.as_deref(), Some("walk"));
        assert_eq!(node.span.start, 0);
    }

    #[test]
    fn plain_variable_is_not_documented() {
        let src = "const limit = 10;\nexport let retries = 3;\n";
        let syntax = parse(src);
        assert!(syntax.node_at(src.find("limit").unwrap()).is_none());
        assert!(syntax.node_at(0).is_none());
        assert!(syntax.node_at(src.find("retries").unwrap()).is_none());
    }

    #[test]
    fn blank_line_resolves_to_next_member() {
        let src = "class A {\n  x = 1;\n\n  run(): void {}\n}\n";
        let blank = src.find("\n\n").unwrap() + 1;
        let node = parse(src).node_at(blank).unwrap();
        assert_eq!(node.kind, DeclarationKind::Method);
        assert_eq!(node.name.as_deref(), Some("run"));
    }

    #[test]
    fn accessors_and_constructor() {
        let src = "class P {\n  constructor(a: number, b = 2) {}\n  get name(): string { return ''; }\n  set name(v: string) {}\n}\n";
        let ctor = at(src, "constructor");
        assert_eq!(ctor.kind, DeclarationKind::Constructor);
        assert_eq!(
            ctor.parameters,
            vec![Parameter::new("a", false), Parameter::new("b", true)]
        );
        assert_eq!(at(src, "get name").kind, DeclarationKind::GetAccessor);
        assert_eq!(at(src, "set name").kind, DeclarationKind::SetAccessor);
    }

    #[test]
    fn property_and_enclosing_class() {
        let node = at("class P {\n  private _name: string;\n}\n", "_name");
        assert_eq!(node.kind, DeclarationKind::Property);
        assert_eq!(node.name.as_deref(), Some("_name"));
        assert_eq!(node.enclosing_class.as_deref(), Some("P"));
    }

    #[test]
    fn arrow_function_takes_variable_name() {
        let src = "const loadUser = async (id: string, force?: boolean) => {\n  return fetch(id);\n};\n";
        let node = at(src, "loadUser");
        assert_eq!(node.kind, DeclarationKind::ArrowFunction);
        assert_eq!(node.name.as_deref(), Some("loadUser"));
        assert_eq!(
            node.parameters,
            vec![Parameter::new("id", false), Parameter::new("force", true)]
        );
        assert!(node.returns_value);
        assert_eq!(node.span.start, 0);
    }

    #[test]
    fn arrow_field_is_a_function() {
        let node = at("class P {\n  onClick = (e: Event) => {};\n}\n", "onClick");
        assert_eq!(node.kind, DeclarationKind::ArrowFunction);
        assert_eq!(node.name.as_deref(), Some("onClick"));
        assert_eq!(node.parameters, vec![Parameter::new("e", false)]);
        assert_eq!(node.enclosing_class.as_deref(), Some("P"));
    }

    #[test]
    fn nested_returns_are_ignored() {
        let src = "function outer() {\n  const f = function () { return 1; };\n  [1].map((x) => { return x; });\n}\n";
        let node = at(src, "outer");
        assert_eq!(node.kind, DeclarationKind::Function);
        assert!(!node.returns_value);
    }

    #[test]
    fn callback_resolves_to_enclosing_function() {
        let src = "function outer() {\n  [1].map((x) => { return x; });\n}\n";
        let node = at(src, "return x");
        assert_eq!(node.kind, DeclarationKind::Function);
        assert_eq!(node.name.as_deref(), Some("outer"));
    }

    #[test]
    fn type_parameters_and_return_type() {
        let src = "function identity<T, U>(value: T): U {\n  return value as any;\n}\n";
        let node = at(src, "identity");
        assert_eq!(node.type_parameters, vec!["T".to_string(), "U".to_string()]);
        assert_eq!(node.return_type.as_deref(), Some("U"));
    }

    #[test]
    fn enum_members() {
        let src = "enum Color {\n  Red,\n  Green = 2,\n}\n";
        assert_eq!(at(src, "Color").kind, DeclarationKind::Enum);
        let red = at(src, "Red");
        assert_eq!(red.kind, DeclarationKind::EnumMember);
        assert_eq!(red.name.as_deref(), Some("Red"));
        let green = at(src, "Green");
        assert_eq!(green.kind, DeclarationKind::EnumMember);
        assert_eq!(green.name.as_deref(), Some("Green"));
    }

    #[test]
    fn interface_members() {
        let src = "interface Shape<T> {\n  area(): number;\n  label: string;\n}\n";
        let shape = at(src, "Shape");
        assert_eq!(shape.kind, DeclarationKind::Interface);
        assert_eq!(shape.type_parameters, vec!["T".to_string()]);
        let area = at(src, "area");
        assert_eq!(area.kind, DeclarationKind::Method);
        assert_eq!(area.enclosing_class.as_deref(), Some("Shape"));
        assert_eq!(at(src, "label").kind, DeclarationKind::Property);
    }

    #[test]
    fn nothing_past_the_last_statement() {
        let src = "let a = 1;\n\n";
        assert!(parse(src).node_at(src.len()).is_none());
    }

    #[test]
    fn trace_lists_root_to_token() {
        let src = "class A {}\n";
        let trace = parse(src).trace(src.find('A').unwrap());
        let program = trace.find(") program - Index of parent: -").unwrap();
        let class = trace.find(") class_declaration - Index of parent: 0").unwrap();
        let name = trace.find(") type_identifier - Index of parent: 1").unwrap();
        assert!(program < class && class < name);
    }
}
