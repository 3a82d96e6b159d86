//! Accessor and constructor code for fields found by the class scanner.
//!
//! Output is TypeScript member declarations, tab-indented for insertion
//! inside a class body, each preceded by a blank line and a doc block.

use crate::humanize::capitalize_first;
use crate::model::{ClassRecord, GenerationMode, ParsedField};
use crate::snippet::comment_block;
use serde::Serialize;

/// One eligible field as offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickItem {
    /// Field storage name.
    pub label: String,
    /// Owning class.
    pub description: String,
    /// Declared type.
    pub detail: String,
}

/// Flatten the eligible fields of every class into a pick list.
pub fn pick_items(classes: &[ClassRecord]) -> Vec<PickItem> {
    classes
        .iter()
        .flat_map(|class| {
            class.vars.iter().map(move |var| PickItem {
                label: var.name.clone(),
                description: class.display_name().to_string(),
                detail: var.type_name.clone(),
            })
        })
        .collect()
}

/// Find an eligible field by storage or public name, optionally within one class.
pub fn find_field<'a>(
    classes: &'a [ClassRecord],
    field: &str,
    class_name: Option<&str>,
) -> Option<&'a ParsedField> {
    classes
        .iter()
        .filter(|c| class_name.map_or(true, |n| c.name.as_deref() == Some(n)))
        .flat_map(|c| c.vars.iter())
        .find(|v| v.name == field || v.figure == field)
}

/// Getters and/or setters for `fields`: all getters first, then all setters.
pub fn render_accessors(fields: &[ParsedField], mode: GenerationMode, classic: bool) -> String {
    let mut out = String::new();
    if mode.wants_getter() {
        for field in fields {
            out.push_str(&render_getter(field, classic));
        }
    }
    if mode.wants_setter() {
        for field in fields {
            out.push_str(&render_setter(field, classic));
        }
    }
    out
}

pub fn render_getter(field: &ParsedField, classic: bool) -> String {
    let doc = format!("Getter {}\n@returns {}\n", field.figure, field.type_name);
    let signature = if classic {
        format!("public get{}(): {}", capitalize_first(&field.figure), field.type_name)
    } else {
        format!("public get {}(): {}", field.figure, field.type_name)
    };
    member(&doc, &signature, &[format!("return this.{};", field.name)])
}

pub fn render_setter(field: &ParsedField, classic: bool) -> String {
    let doc = format!("Setter {}\n@param value\n", field.figure);
    let signature = if classic {
        format!(
            "public set{}(value: {}): void",
            capitalize_first(&field.figure),
            field.type_name
        )
    } else {
        format!("public set {}(value: {})", field.figure, field.type_name)
    };
    member(&doc, &signature, &[format!("this.{} = value;", field.name)])
}

/// Constructor taking one `dto` typed as the class, assigning every
/// readonly field in declaration order.
pub fn render_constructor(class: &ClassRecord) -> String {
    let class_name = class.display_name();
    let items = &class.reads;

    let mut doc = format!("Creates an instance of {}.\n", class_name);
    doc.push_str("@param dto object (e.g. dto) to initialize the model, including:\n");
    for item in items {
        doc.push_str(&format!("  {}:\t{},\n", item.name, item.type_name));
    }
    if items.len() >= 2 {
        doc.push_str(&format!(
            "You may use named params like: new {}( {{ {}: <value>, {}: <value>,... }} )\n",
            class_name, items[0].name, items[1].name
        ));
    }

    let body: Vec<String> = items
        .iter()
        .map(|item| format!("this.{} = dto.{};", item.name, item.figure))
        .collect();
    member(&doc, &format!("constructor(dto: {})", class_name), &body)
}

/// Blank line, indented doc block, then `signature { body }` at one tab.
fn member(doc: &str, signature: &str, body: &[String]) -> String {
    let mut out = String::from("\n");
    for line in comment_block(doc).lines() {
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("\t{} {{\n", signature));
    for statement in body {
        out.push_str(&format!("\t\t{}\n", statement));
    }
    out.push_str("\t}\n");
    out
}
