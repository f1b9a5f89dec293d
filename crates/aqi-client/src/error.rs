//! Error types for AQI client operations

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::context::Cause;
use crate::transport::BoxError;

/// Result type alias for AQI client operations
pub type Result<T> = std::result::Result<T, AqiClientError>;

/// Errors that can occur during AQI client operations
///
/// `InvalidPath` and `EncodingError` are raised while building a request.
/// The remaining request variants are raised by dispatch.
#[derive(Error, Debug)]
pub enum AqiClientError {
    /// Path could not be resolved against the base URL
    #[error("Invalid path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    EncodingError(#[source] serde_json::Error),

    /// Request never produced a response
    ///
    /// `cause` is set when the context had ended by the time the call
    /// failed.
    #[error("{}", describe_transport(.cause, .source))]
    TransportError {
        cause: Option<Cause>,
        #[source]
        source: BoxError,
    },

    /// Server answered with a status of 300 or above
    ///
    /// The response is returned unread for inspection.
    #[error("Unexpected response code returned: HTTP {status}")]
    HttpStatusError {
        status: StatusCode,
        response: Box<reqwest::Response>,
    },

    /// Response body could not be read
    #[error("Unable to read body: {0}")]
    ReadError(#[source] reqwest::Error),

    /// Response body was not valid JSON for the destination
    #[error("Unable to parse API response: {0}")]
    ParseError(#[source] serde_json::Error),

    /// Client configuration was rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Local I/O failure outside any request, e.g. binding a test listener
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn describe_transport(cause: &Option<Cause>, source: &BoxError) -> String {
    match cause {
        Some(cause) if source.downcast_ref::<Cause>().is_some() => {
            format!("HTTP request aborted: {}", cause)
        }
        Some(cause) => format!("HTTP request aborted: {}: {}", cause, source),
        None => format!("HTTP request failed: {}", source),
    }
}

impl AqiClientError {
    /// Transport error for a context that ended before the call finished
    pub(crate) fn aborted(cause: Cause) -> Self {
        Self::TransportError {
            cause: Some(cause),
            source: Box::new(cause),
        }
    }

    /// Why the context ended, if this error was caused by cancellation
    pub fn cancellation(&self) -> Option<Cause> {
        match self {
            Self::TransportError { cause, .. } => *cause,
            _ => None,
        }
    }

    /// Whether the call was aborted by its context
    pub fn is_cancelled(&self) -> bool {
        self.cancellation().is_some()
    }

    /// HTTP status for `HttpStatusError`
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatusError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The unread response for `HttpStatusError`
    pub fn response(&self) -> Option<&reqwest::Response> {
        match self {
            Self::HttpStatusError { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// Take ownership of the unread response for `HttpStatusError`
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self {
            Self::HttpStatusError { response, .. } => Some(*response),
            _ => None,
        }
    }
}
