//! Error types for response building and delivery.

use std::path::PathBuf;

use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while delivering a rendered response to a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The receiving side of the send channel is gone.
    #[error("transport channel closed")]
    Closed,

    /// The sink was asked to send a second response.
    #[error("response already sent")]
    AlreadySent,
}

/// Errors that can occur while populating or sending a response.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// File-mode attachment pointed at something that is not a regular file.
    #[error("file `{}` does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    /// Manual attachment without content.
    #[error("manual attachment requires `content`")]
    MissingContent,

    /// Manual attachment without a filename, or a path with no final component.
    #[error("attachment requires a `filename`")]
    MissingFilename,

    /// Reading an attachment failed for a reason other than absence.
    #[error("failed to read attachment: {0}")]
    Io(#[from] std::io::Error),

    /// Media could not be converted into JSON.
    #[error("failed to serialize media: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A header value contained bytes not allowed on the wire.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for response operations.
pub type ResponseResult<T> = Result<T, ResponseError>;

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Handler failed to build response");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
