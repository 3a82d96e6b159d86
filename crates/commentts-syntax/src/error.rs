//! User-facing failures of a generation command.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable conditions; each is reported once and no edit is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No recognizable declaration at or around the caret.
    #[error("Sorry! '{command}' wasn't able to produce {output} {condition}.")]
    UnsupportedContext {
        command: String,
        output: String,
        condition: String,
    },

    /// The document is not a TypeScript source.
    #[error("Sorry! '{command}' only supports TypeScript.")]
    UnsupportedFileType { command: String },
}

impl Error {
    pub fn no_documentation(command: &str) -> Self {
        Error::UnsupportedContext {
            command: command.to_string(),
            output: "documentation".to_string(),
            condition: "at the current position".to_string(),
        }
    }

    pub fn no_code(command: &str, condition: impl Into<String>) -> Self {
        Error::UnsupportedContext {
            command: command.to_string(),
            output: "code".to_string(),
            condition: condition.into(),
        }
    }

    pub fn file_type(command: &str) -> Self {
        Error::UnsupportedFileType {
            command: command.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_command() {
        assert_eq!(
            Error::no_documentation("Comment...").to_string(),
            "Sorry! 'Comment...' wasn't able to produce documentation at the current position."
        );
        assert_eq!(
            Error::file_type("Generate Getter").to_string(),
            "Sorry! 'Generate Getter' only supports TypeScript."
        );
    }
}
