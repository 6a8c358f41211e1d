//! Workflow transport error types.

/// Errors from a workflow API call.
///
/// Every variant is a transport failure from the caller's point of view: the
/// request did not produce a usable fragment list.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session tokens or user auth rejected
    #[error("unauthorized (status {status})")]
    Unauthorized { status: u16 },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON document
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The encoding cannot be sent as a header value
    #[error("token encoding is not a valid header value")]
    InvalidEncoding,

    /// A scripted client ran out of responses
    #[error("no scripted response for {0}")]
    Unscripted(String),
}
