//! Error types for the query interface

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Failures while serving or issuing a query
///
/// On the server side these only ever end one connection.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("server closed the connection without a response")]
    NoResponse,

    #[error("invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}
