//! Class scanner: a line-by-line state machine over a TypeScript file.
//!
//! Not a parser: a class opens on the first line mentioning `class` while
//! outside a class, and closes when the number of lines containing `{`
//! equals the number of lines containing `}`. Braces are counted once per
//! line, so `}}` on one line is under-counted, an object literal opening
//! before the class body can desynchronize the counters, and only the first
//! `class <Name>` of a line is seen. Fields and accessors are recognized by
//! the pattern table below.

use crate::humanize::trim_underscore;
use crate::model::{ClassRecord, GenerationMode, ParsedField, Position};
use regex::Regex;
use std::sync::LazyLock;

// -- Pattern table ------------------------------------------------------------

static RE_CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s([a-zA-Z_$][0-9a-zA-Z_$]*)").unwrap());

// `readonly a: number;` / `readonly a: Map<string, X> = new Map();`
static RE_READONLY_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"readonly\s+([a-zA-Z_$][0-9a-zA-Z_$]*)\s?:\s?([.<>{}\[\]\w$\s,|&]+?)\s*[=;]").unwrap()
});

// `private _name: string;`, underscore optional
static RE_PRIVATE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"private\s+(_?[a-zA-Z_$][0-9a-zA-Z_$]*)\s?:\s?([.<>{}\[\]\w$\s,|&]+?)\s*[=;]").unwrap()
});

// `public get name()` and classic `public getName()`
static RE_GET_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+get\s?([a-zA-Z_$][0-9a-zA-Z_$]*)\s*\(").unwrap()
});

// `public set name(value: T)` and classic `public setName(value: T)`
static RE_SET_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+set\s?([a-zA-Z_$][0-9a-zA-Z_$]*)\s*\(\s*[a-zA-Z_$][0-9a-zA-Z_$]*[\s:]+").unwrap()
});

/// Marker put in front of a display name that has no underscore to strip,
/// so the accessor does not collide with the field.
pub const FIGURE_MARKER: char = '$';

/// Scanner switches taken from the command's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Keep fields only for the class enclosing the caret.
    pub scoped: bool,
    /// Drop fields that already have a matching accessor.
    pub filter: bool,
    /// Classic accessor naming (`getName()` rather than `get name()`).
    pub classic: bool,
}

/// Source of class facts for accessor and constructor generation.
pub trait ClassScanner {
    fn scan_classes(&self, lines: &[&str], caret: Position, mode: GenerationMode) -> Vec<ClassRecord>;
}

/// Brace-counting, regex-matching implementation of [`ClassScanner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScanner {
    options: ScanOptions,
}

impl LineScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }
}

#[derive(Default)]
struct Brackets {
    within: bool,
    open: usize,
    closed: usize,
    /// Index of the record opened by the current class line.
    current: Option<usize>,
}

impl ClassScanner for LineScanner {
    fn scan_classes(&self, lines: &[&str], caret: Position, mode: GenerationMode) -> Vec<ClassRecord> {
        let mut classes: Vec<ClassRecord> = Vec::new();
        let mut brackets = Brackets::default();

        for (i, line) in lines.iter().enumerate() {
            // Outside a class, a line mentioning `class` opens a new record
            if !brackets.within && line.contains("class") {
                let name = RE_CLASS_NAME.captures(line).map(|caps| caps[1].to_string());
                tracing::debug!(line = i, name = ?name, "class opened");
                brackets = Brackets {
                    within: true,
                    current: Some(classes.len()),
                    ..Brackets::default()
                };
                classes.push(ClassRecord::new(name, Position::new(i, 0)));
            }

            if !brackets.within {
                continue;
            }

            if let Some(class) = brackets.current.and_then(|idx| classes.get_mut(idx)) {
                collect_members(class, line, self.options.classic);
            }

            if line.contains('{') {
                brackets.open += 1;
            }
            if line.contains('}') {
                brackets.closed += 1;
            }

            if brackets.open != 0 && brackets.closed != 0 && brackets.open == brackets.closed {
                brackets.within = false;
                if let Some(class) = brackets.current.take().and_then(|idx| classes.get_mut(idx)) {
                    close_class(class, Position::new(i, 0), caret, mode, &self.options);
                }
            }
        }

        if brackets.within {
            tracing::debug!("class body never re-balanced; record left open");
        }

        classes
    }
}

/// Record every field and accessor the line declares.
fn collect_members(class: &mut ClassRecord, line: &str, classic: bool) {
    if let Some(caps) = RE_READONLY_DEF.captures(line) {
        class.reads.push(ParsedField {
            name: caps[1].to_string(),
            figure: caps[1].to_string(),
            type_name: caps[2].trim().to_string(),
        });
    }
    if let Some(caps) = RE_PRIVATE_DEF.captures(line) {
        class.vars.push(ParsedField {
            name: caps[1].to_string(),
            figure: public_name(&caps[1], classic),
            type_name: caps[2].trim().to_string(),
        });
    }
    if let Some(caps) = RE_GET_METHOD.captures(line) {
        class.getters.push(caps[1].to_string());
    }
    if let Some(caps) = RE_SET_METHOD.captures(line) {
        class.setters.push(caps[1].to_string());
    }
}

/// Fix the end position, then apply scoped and filter modes.
fn close_class(
    class: &mut ClassRecord,
    end: Position,
    caret: Position,
    mode: GenerationMode,
    options: &ScanOptions,
) {
    class.end = Some(end);
    tracing::debug!(name = class.display_name(), start = %class.start, end = %end, "class closed");

    if options.scoped && (caret < class.start || caret > end) {
        class.vars.clear();
    }

    if options.filter {
        let getters = &class.getters;
        let setters = &class.setters;
        class.vars.retain(|var| {
            let has_getter = mode.wants_getter() && matches_any(&var.figure, getters);
            let has_setter = mode.wants_setter() && matches_any(&var.figure, setters);
            !(has_getter || has_setter)
        });
    }
}

fn matches_any(figure: &str, names: &[String]) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(figure))
}

/// Public-facing name of a private field.
///
/// The leading underscore is stripped. Without one, the non-classic name
/// gets [`FIGURE_MARKER`] in front.
pub fn public_name(field: &str, classic: bool) -> String {
    if field.starts_with('_') {
        return trim_underscore(field).to_string();
    }
    if classic {
        field.to_string()
    } else {
        format!("{}{}", FIGURE_MARKER, field)
    }
}

/// Record enclosing `pos`, if any class has closed around it.
pub fn enclosing_class(classes: &[ClassRecord], pos: Position) -> Option<&ClassRecord> {
    classes.iter().find(|c| c.contains(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = "class Person {
\tprivate _name: string;
\tprivate _age: number = 0;
\treadonly id: string;

\tpublic get age(): number {
\t\treturn this._age;
\t}
}

class Empty {
}
";

    fn scan(source: &str, caret: Position, mode: GenerationMode, options: ScanOptions) -> Vec<ClassRecord> {
        let lines: Vec<&str> = source.lines().collect();
        LineScanner::new(options).scan_classes(&lines, caret, mode)
    }

    fn names(fields: &[ParsedField]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn finds_classes_and_fields() {
        let classes = scan(PERSON, Position::new(1, 0), GenerationMode::Getter, ScanOptions::default());
        assert_eq!(classes.len(), 2);
        let person = &classes[0];
        assert_eq!(person.name.as_deref(), Some("Person"));
        assert_eq!(person.start, Position::new(0, 0));
        assert_eq!(person.end, Some(Position::new(8, 0)));
        assert_eq!(names(&person.vars), vec!["_name", "_age"]);
        assert_eq!(person.vars[0].figure, "name");
        assert_eq!(person.vars[1].type_name, "number");
        assert_eq!(names(&person.reads), vec!["id"]);
        assert_eq!(person.getters, vec!["age"]);
    }

    #[test]
    fn class_without_fields_is_still_listed() {
        let classes = scan(PERSON, Position::new(0, 0), GenerationMode::Both, ScanOptions::default());
        let empty = &classes[1];
        assert_eq!(empty.name.as_deref(), Some("Empty"));
        assert!(empty.vars.is_empty());
        assert_eq!(empty.end, Some(Position::new(11, 0)));
    }

    #[test]
    fn filter_drops_fields_with_getters() {
        let options = ScanOptions {
            filter: true,
            ..ScanOptions::default()
        };
        let classes = scan(PERSON, Position::new(1, 0), GenerationMode::Getter, options);
        assert_eq!(names(&classes[0].vars), vec!["_name"]);

        let classes = scan(PERSON, Position::new(1, 0), GenerationMode::Both, options);
        assert_eq!(names(&classes[0].vars), vec!["_name"]);
    }

    #[test]
    fn filter_ignores_getters_when_generating_setters() {
        let options = ScanOptions {
            filter: true,
            ..ScanOptions::default()
        };
        let classes = scan(PERSON, Position::new(1, 0), GenerationMode::Setter, options);
        assert_eq!(names(&classes[0].vars), vec!["_name", "_age"]);
    }

    #[test]
    fn filter_matches_classic_accessors_case_insensitively() {
        let source = "class A {
  private _total: number;
  private _count: number;
  public getTotal(): number { return this._total; }
  public setCount(value: number): void { this._count = value; }
}
";
        let options = ScanOptions {
            filter: true,
            classic: true,
            ..ScanOptions::default()
        };
        let getters = scan(source, Position::default(), GenerationMode::Getter, options);
        assert_eq!(names(&getters[0].vars), vec!["_count"]);
        let both = scan(source, Position::default(), GenerationMode::Both, options);
        assert!(both[0].vars.is_empty());
    }

    #[test]
    fn scoped_clears_other_classes() {
        let source = "class A {
  private _a: string;
}
class B {
  private _b: string;
}
";
        let options = ScanOptions {
            scoped: true,
            ..ScanOptions::default()
        };
        let classes = scan(source, Position::new(4, 2), GenerationMode::Both, options);
        assert!(classes[0].vars.is_empty());
        assert_eq!(names(&classes[1].vars), vec!["_b"]);
    }

    #[test]
    fn scoped_uses_line_start_positions() {
        let source = "class A {\n  private _a: string;\n}\n";
        let options = ScanOptions {
            scoped: true,
            ..ScanOptions::default()
        };
        // end is (2, 0); a caret later on the closing line is outside
        let classes = scan(source, Position::new(2, 1), GenerationMode::Both, options);
        assert!(classes[0].vars.is_empty());
        let classes = scan(source, Position::new(2, 0), GenerationMode::Both, options);
        assert_eq!(classes[0].vars.len(), 1);
    }

    #[test]
    fn scanning_is_repeatable() {
        let a = scan(PERSON, Position::new(2, 0), GenerationMode::Both, ScanOptions::default());
        let b = scan(PERSON, Position::new(2, 0), GenerationMode::Both, ScanOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn truncated_class_stays_open() {
        let source = "class Broken {\n  private _x: number;\n  method() {\n";
        let options = ScanOptions {
            scoped: true,
            filter: true,
            classic: false,
        };
        let classes = scan(source, Position::new(40, 0), GenerationMode::Getter, options);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].end, None);
        assert_eq!(names(&classes[0].vars), vec!["_x"]);
    }

    #[test]
    fn two_closing_braces_on_one_line_count_once() {
        let source = "class A {\n  run() {\n    go(); }}\nclass B {\n}\n";
        let classes = scan(source, Position::default(), GenerationMode::Both, ScanOptions::default());
        // A never balances, so B is read as part of A
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name.as_deref(), Some("A"));
        assert_eq!(classes[0].end, None);
    }

    #[test]
    fn public_names() {
        assert_eq!(public_name("_name", false), "name");
        assert_eq!(public_name("_name", true), "name");
        assert_eq!(public_name("name", false), "$name");
        assert_eq!(public_name("name", true), "name");
    }

    #[test]
    fn private_readonly_is_a_constructor_input_only() {
        let source = "class A {\n  private readonly _id: string;\n}\n";
        let classes = scan(source, Position::default(), GenerationMode::Both, ScanOptions::default());
        assert!(classes[0].vars.is_empty());
        assert_eq!(names(&classes[0].reads), vec!["_id"]);
    }

    #[test]
    fn generic_and_union_types_are_captured() {
        let source = "class A {\n  private _map: Map<string, number[]>;\n  private _v: string | null = null;\n}\n";
        let classes = scan(source, Position::default(), GenerationMode::Both, ScanOptions::default());
        assert_eq!(classes[0].vars[0].type_name, "Map<string, number[]>");
        assert_eq!(classes[0].vars[1].type_name, "string | null");
    }

    #[test]
    fn enclosing_class_lookup() {
        let classes = scan(PERSON, Position::default(), GenerationMode::Constructor, ScanOptions::default());
        assert_eq!(
            enclosing_class(&classes, Position::new(3, 4)).and_then(|c| c.name.as_deref()),
            Some("Person")
        );
        assert!(enclosing_class(&classes, Position::new(9, 0)).is_none());
    }
}
