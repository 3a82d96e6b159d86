//! Identifier → words.
//!
//! `isActive` → `is active`, `_userName` → `user name`, `HTTP_STATUS` →
//! `http status`. Boundaries are a lowercase letter or digit followed by an
//! uppercase letter, and any run of whitespace or underscores.

use regex::Regex;
use std::sync::LazyLock;

static RE_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

static RE_CAMEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Strip one leading underscore.
pub fn trim_underscore(s: &str) -> &str {
    s.strip_prefix('_').unwrap_or(s)
}

/// Insert `separator` at every word boundary, keeping the original casing.
fn separate(s: &str, separator: &str) -> String {
    let s = trim_underscore(s.trim());
    let spaced = RE_GAP.replace_all(s, regex::NoExpand(separator));
    let replacement = format!("${{1}}{}${{2}}", separator.replace('$', "$$"));
    RE_CAMEL.replace_all(&spaced, replacement.as_str()).trim().to_string()
}

/// Lowercase, space-separated words of an identifier.
pub fn humanize(s: &str) -> String {
    separate(s, " ").to_lowercase()
}

/// Lowercase words of an identifier.
pub fn split_words(s: &str) -> Vec<String> {
    separate(s, ";")
        .to_lowercase()
        .split(';')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Words of an identifier in their declared casing (`fetchData` → `fetch`, `Data`).
pub fn split_words_cased(s: &str) -> Vec<String> {
    separate(s, ";")
        .split(';')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Humanized identifier without its leading verb (`isVisible` → `visible`).
/// A single word is returned as is.
pub fn humanize_noun(s: &str) -> String {
    let words = humanize(s);
    match words.find(' ') {
        Some(i) if i > 0 => words[i + 1..].to_string(),
        _ => words,
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Space-join `words[from..]`; empty when `from` is past the end.
pub fn join_from(words: &[String], from: usize) -> String {
    words.get(from..).map(|w| w.join(" ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case() {
        assert_eq!(humanize("getUserName"), "get user name");
        assert_eq!(humanize("isActive"), "is active");
    }

    #[test]
    fn strips_one_leading_underscore() {
        assert_eq!(humanize("_name"), "name");
        assert_eq!(humanize("__name"), "name");
        assert_eq!(trim_underscore("__name"), "_name");
    }

    #[test]
    fn splits_on_underscores_and_whitespace() {
        assert_eq!(humanize("MAX_RETRY_COUNT"), "max retry count");
        assert_eq!(humanize("snake_case  name"), "snake case name");
    }

    #[test]
    fn digits_start_a_boundary() {
        assert_eq!(humanize("base64Encode"), "base64 encode");
    }

    #[test]
    fn uppercase_runs_stay_together() {
        assert_eq!(humanize("HTTPServer"), "httpserver");
        assert_eq!(humanize("parseURL"), "parse url");
    }

    #[test]
    fn humanize_is_idempotent_on_its_output() {
        for ident in ["getUserName", "_privateThing", "MAX_VALUE", "a", "copyToClipboard", "x1Y2"] {
            let once = humanize(ident);
            assert_eq!(humanize(&once), once, "{ident}");
        }
    }

    #[test]
    fn split_words_lowercases() {
        assert_eq!(split_words("hasChildren"), vec!["has", "children"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn split_words_cased_keeps_casing() {
        assert_eq!(split_words_cased("fetchData"), vec!["fetch", "Data"]);
        assert_eq!(split_words_cased("_loadUserProfile"), vec!["load", "User", "Profile"]);
    }

    #[test]
    fn noun_drops_first_word() {
        assert_eq!(humanize_noun("isVisible"), "visible");
        assert_eq!(humanize_noun("getFullName"), "full name");
        assert_eq!(humanize_noun("name"), "name");
    }

    #[test]
    fn capitalizes() {
        assert_eq!(capitalize_first("widget factory"), "Widget factory");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn joins_tail() {
        let words: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(join_from(&words, 1), "b c");
        assert_eq!(join_from(&words, 3), "");
        assert_eq!(join_from(&words, 7), "");
    }
}
