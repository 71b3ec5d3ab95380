//! Graph text parsing and editor diagnostics.
//!
//! Graph text is JSON5 (comments, unquoted keys, trailing commas), which is a superset of the
//! JSON a layout engine emits.

use crate::graph::ElkNode;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line and column, when the parser could locate the problem.
    pub location: Option<(usize, usize)>,
}

impl From<json5::Error> for ParseError {
    fn from(err: json5::Error) -> Self {
        match err {
            json5::Error::Message { msg, location } => Self {
                message: msg,
                location: location.map(|l| (l.line, l.column)),
            },
        }
    }
}

pub fn parse_graph(text: &str) -> Result<ElkNode, ParseError> {
    Ok(json5::from_str(text)?)
}

/// An editor error marker. Line and column are 1-based; 0 means unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            message: message.into(),
        }
    }

    pub fn from_parse_error(err: &ParseError) -> Self {
        let (line, column) = err.location.unwrap_or((0, 0));
        Self {
            line,
            column,
            message: err.message.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}
