use crate::ids::IdScope;
use crate::parse::{Diagnostic, ParseError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Editor marker for this error; only parse errors carry a position.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse(err) => Diagnostic::from_parse_error(err),
            other => Diagnostic::error(other.to_string()),
        }
    }
}

/// Terminal failures of a graph-to-scene transformation.
///
/// Any of these aborts the whole call; no partial scene is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("An element is missing an id ({scope}).")]
    MissingIdentifier { scope: IdScope },

    #[error("Duplicate id: {id}.")]
    DuplicateIdentifier { scope: IdScope, id: String },

    #[error("Edge {id} has neither source/target nor sources/targets.")]
    UnrecognizedEdgeShape { id: String },
}

impl TransformError {
    /// The offending id, when the error is about a specific identifier.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::MissingIdentifier { .. } => None,
            Self::DuplicateIdentifier { id, .. } | Self::UnrecognizedEdgeShape { id } => Some(id),
        }
    }
}
