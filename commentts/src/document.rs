//! In-memory text document: line access, position/offset mapping and the
//! single edit a command produces.

use commentts_syntax::Position;
use serde::Serialize;

/// Replace `[start, end)` with `text`. One per command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl Edit {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn replace(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Selected range; a bare caret has `start == end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub struct TextDocument {
    text: String,
    line_starts: Vec<usize>,
    selection: Selection,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            text,
            line_starts,
            selection: Selection::default(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line content without its terminator; empty past the end.
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |&next| next - 1);
        self.text[start..end].trim_end_matches('\r')
    }

    pub fn lines(&self) -> Vec<&str> {
        (0..self.line_count()).map(|i| self.line_text(i)).collect()
    }

    /// Leading whitespace of `line`.
    pub fn indentation(&self, line: usize) -> &str {
        let text = self.line_text(line);
        &text[..text.len() - text.trim_start().len()]
    }

    /// Line terminator used by the document.
    pub fn eol(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Byte offset of `pos`. The column counts characters and is clamped to the line.
    pub fn offset_of(&self, pos: Position) -> usize {
        let Some(&start) = self.line_starts.get(pos.line) else {
            return self.text.len();
        };
        let line = self.line_text(pos.line);
        let within = line
            .char_indices()
            .nth(pos.column)
            .map_or(line.len(), |(i, _)| i);
        start + within
    }

    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position::new(line, column)
    }

    /// Document text with `edit` applied.
    pub fn apply(&self, edit: &Edit) -> String {
        let start = self.offset_of(edit.start);
        let end = self.offset_of(edit.end).max(start);
        let mut out = String::with_capacity(self.text.len() + edit.text.len());
        out.push_str(&self.text[..start]);
        out.push_str(&edit.text);
        out.push_str(&self.text[end..]);
        out
    }
}
