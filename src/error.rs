//! Error types for Gogs API operations.

use thiserror::Error;

use crate::status::status_phrase;

/// Errors that can occur during Gogs API operations.
#[derive(Debug, Error)]
pub enum GogsError {
    /// Configuration is missing or incomplete.
    #[error("Gogs configuration required: {0}")]
    ConfigMissing(String),

    /// The entity type does not support the requested operation.
    #[error("::{operation}:: Not implemented for '{entity}'")]
    NotImplemented {
        operation: &'static str,
        entity: &'static str,
    },

    /// Operation attempted in the wrong lifecycle state or without a
    /// required association.
    #[error("Invalid method request: {0}")]
    InvalidMethodRequest(String),

    /// A search omitted its query or referenced an unknown field.
    #[error("Invalid search parameter: {0}")]
    SearchParam(String),

    /// A positional argument was rejected by its validator.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// Field name unknown to the entity type and its parent.
    #[error("Unknown property '{field}' on '{entity}'")]
    UnknownField { entity: &'static str, field: String },

    /// Entity not found in a loaded collection.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The server refused the request (401/403 class).
    #[error("Not authorized ({status}): {body}")]
    NotAuthorized { status: u16, body: String },

    /// The server answered with a status the verb does not expect.
    #[error("[{status} | {phrase}]: {body}")]
    UnexpectedResponse {
        status: u16,
        phrase: &'static str,
        body: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Codec(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl GogsError {
    /// Build an authorization failure, defaulting the status to 401.
    pub fn not_authorized(body: impl Into<String>, status: Option<u16>) -> Self {
        Self::NotAuthorized {
            status: status.unwrap_or(401),
            body: body.into(),
        }
    }

    /// Build an unexpected-response failure with its looked-up phrase.
    pub fn unexpected(body: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedResponse {
            status,
            phrase: status_phrase(status),
            body: body.into(),
        }
    }

    /// The raw response body for HTTP-class failures.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::NotAuthorized { body, .. } | Self::UnexpectedResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The HTTP status for HTTP-class failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotAuthorized { status, .. } | Self::UnexpectedResponse { status, .. } => {
                Some(*status)
            }
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is an authorization failure.
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, Self::NotAuthorized { .. })
    }
}

/// Result type alias for Gogs operations.
pub type Result<T> = core::result::Result<T, GogsError>;
