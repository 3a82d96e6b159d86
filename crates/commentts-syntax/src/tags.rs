//! Harvesting of previously authored comment text.
//!
//! When a comment block is regenerated, the text a human already wrote for
//! each tag is collected here and emitted verbatim instead of derived phrasing.

use std::collections::HashMap;

const PARAM: &str = "@param";
const RETURNS: &str = "@returns";
const DESCRIPTION: &str = "@description";
const AUTHOR: &str = "@author";
const TEMPLATE: &str = "@template";
const TODO: &str = "// TODO:";

/// Key of a harvested entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Description,
    Returns,
    Author,
    Todo,
    Param(String),
    Template(String),
}

/// Authored text per tag, read-only once harvested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: HashMap<Tag, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag, text: impl Into<String>) {
        self.entries.insert(tag, text.into());
    }

    pub fn get(&self, tag: &Tag) -> Option<&str> {
        self.entries.get(tag).map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.get(&Tag::Param(name.to_string()))
    }

    pub fn template(&self, name: &str) -> Option<&str> {
        self.get(&Tag::Template(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn append_description(&mut self, text: &str) {
        self.entries
            .entry(Tag::Description)
            .and_modify(|d| {
                d.push('\n');
                d.push_str(text);
            })
            .or_insert_with(|| text.to_string());
    }
}

/// Collect authored text from the lines of an existing comment block.
///
/// Only ` * ...` body lines are considered. Lines carrying a known tag fill
/// that tag; any other non-empty body line is appended to the description.
pub fn harvest<'a>(lines: impl IntoIterator<Item = &'a str>) -> TagMap {
    let mut map = TagMap::new();

    for line in lines {
        let Some(body) = line.trim_start().strip_prefix("* ") else {
            continue;
        };

        if let Some(rest) = after_tag(body, PARAM) {
            if let Some((name, text)) = split_name(rest) {
                let name = name.trim_start_matches('[').trim_end_matches(']');
                map.insert(Tag::Param(name.to_string()), text);
            }
            continue;
        }
        if let Some(rest) = after_tag(body, TEMPLATE) {
            if let Some((name, text)) = split_name(rest) {
                map.insert(Tag::Template(name.to_string()), text);
            }
            continue;
        }

        let simple = [
            (RETURNS, Tag::Returns),
            (DESCRIPTION, Tag::Description),
            (AUTHOR, Tag::Author),
            (TODO, Tag::Todo),
        ];
        if let Some((text, tag)) = simple
            .into_iter()
            .find_map(|(marker, tag)| after_tag(body, marker).map(|t| (t, tag)))
        {
            if !text.is_empty() {
                if tag == Tag::Description {
                    map.append_description(text);
                } else {
                    map.insert(tag, text);
                }
            }
            continue;
        }

        let text = body.trim();
        if !text.is_empty() {
            map.append_description(text);
        }
    }

    map
}

/// Trimmed text following `marker` when the body starts with it.
fn after_tag<'a>(body: &'a str, marker: &str) -> Option<&'a str> {
    body.trim_start().strip_prefix(marker).map(str::trim)
}

/// `name rest of text` → (`name`, `rest of text`); `None` without text.
fn split_name(text: &str) -> Option<(&str, &str)> {
    let blank = text.find(char::is_whitespace)?;
    let rest = text[blank..].trim();
    if blank == 0 || rest.is_empty() {
        return None;
    }
    Some((&text[..blank], rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "\t/**
\t * Documents this function
\t * more doku
\t * @author S.Albert
\t * @template T item type
\t * @param editor active editor
\t * @param [force] skip checks
\t * @param commandName
\t * @returns the inserted text
\t */";

    #[test]
    fn harvests_known_tags() {
        let map = harvest(BLOCK.lines());
        assert_eq!(map.get(&Tag::Author), Some("S.Albert"));
        assert_eq!(map.template("T"), Some("item type"));
        assert_eq!(map.param("editor"), Some("active editor"));
        assert_eq!(map.get(&Tag::Returns), Some("the inserted text"));
    }

    #[test]
    fn optional_param_brackets_are_stripped() {
        let map = harvest(BLOCK.lines());
        assert_eq!(map.param("force"), Some("skip checks"));
    }

    #[test]
    fn params_without_text_are_not_harvested() {
        let map = harvest(BLOCK.lines());
        assert_eq!(map.param("commandName"), None);
    }

    #[test]
    fn free_text_joins_the_description() {
        let map = harvest(BLOCK.lines());
        assert_eq!(
            map.get(&Tag::Description),
            Some("Documents this function\nmore doku")
        );
    }

    #[test]
    fn description_tag_and_continuation() {
        let lines = [" * @description Loads data", " * from the cache"];
        let map = harvest(lines);
        assert_eq!(map.get(&Tag::Description), Some("Loads data\nfrom the cache"));
    }

    #[test]
    fn todo_marker_is_kept() {
        let map = harvest([" * // TODO: comment load"]);
        assert_eq!(map.get(&Tag::Todo), Some("comment load"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn tags_inside_prose_stay_in_the_description() {
        let map = harvest([" * Returns the @author field", " * @returns the name"]);
        assert_eq!(map.get(&Tag::Author), None);
        assert_eq!(map.get(&Tag::Description), Some("Returns the @author field"));
        assert_eq!(map.get(&Tag::Returns), Some("the name"));
    }

    #[test]
    fn delimiters_and_bare_stars_are_ignored() {
        let map = harvest(["/**", " *", " */", "code();"]);
        assert!(map.is_empty());
    }
}
