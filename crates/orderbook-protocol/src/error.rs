//! Ingestion errors.
//!
//! A malformed line is never passed on to the engine: it fails the
//! whole input before any book is replayed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {value:?}")]
    UnknownCommand { value: String },

    #[error("{command} expects {expected} fields, got {actual}")]
    FieldCount {
        command: char,
        expected: usize,
        actual: usize,
    },

    #[error("{command} field `{field}` is not an integer: {value:?}")]
    InvalidInteger {
        command: char,
        field: &'static str,
        value: String,
    },

    #[error("invalid side {value:?}, expected B or S")]
    InvalidSide { value: String },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach a 1-based source line number.
    pub fn at_line(self, line: usize) -> Self {
        ParseError::Line {
            line,
            source: Box::new(self),
        }
    }
}
