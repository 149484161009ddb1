use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Why a `.gph` file could not be turned into a graph.
#[derive(Debug, Error)]
pub enum GraphFileError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("file is not valid UTF-8 text: {0}")]
    Encoding(#[from] FromUtf8Error),
    #[error("line {line}: {issue}")]
    Format { line: usize, issue: FormatIssue },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatIssue {
    #[error("file ended early, expected {0}")]
    MissingLine(&'static str),
    #[error("expected a count, found {0:?}")]
    BadCount(String),
    #[error("expected a number, found {0:?}")]
    BadNumber(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: &'static str, found: usize },
    #[error("edge endpoint {index} does not name one of the {vertex_count} vertices")]
    EndpointOutOfRange { index: usize, vertex_count: usize },
}

impl GraphFileError {
    pub(crate) fn format(line: usize, issue: FormatIssue) -> Self {
        GraphFileError::Format { line, issue }
    }

    /// Title and body for the notification shown when a load fails.
    pub fn user_message(&self) -> (&'static str, String) {
        match self {
            GraphFileError::Encoding(_) => ("Uh oh!", "Failed to import graph.".to_string()),
            GraphFileError::Format { .. } => (
                "Wrong format",
                format!("This file does not match the graph file format ({self})."),
            ),
            GraphFileError::Io(e) => ("Uh oh!", format!("Could not access the file: {e}")),
        }
    }
}
