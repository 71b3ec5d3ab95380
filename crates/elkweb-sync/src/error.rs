use elkweb_core::{Diagnostic, ParseError, TransformError};

/// Failure reported by a [`crate::MessageChannel`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no channel is bound")]
    ChannelUnavailable,
    #[error("malformed {method} payload: {source}")]
    MalformedPayload {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("transport failure: {0}")]
    Transport(#[from] ChannelError),
}

/// Failure reported by a [`crate::LayoutEngine`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LayoutError {
    pub message: String,
}

impl LayoutError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("Unknown layouter version: {0}.")]
    UnknownLayoutVersion(String),
    #[error("layout failed: {0}")]
    ExternalLayoutFailure(#[from] LayoutError),
}

impl SessionError {
    /// The editor marker for this failure. Only parse errors carry a location.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse(err) => Diagnostic::from_parse_error(err),
            other => Diagnostic::error(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
