//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (unreachable host, timeout,
    /// connection reset, truncated body).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The request was superseded or aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,
    /// The response parsed, but did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    DataShape(String),
}

impl Error {
    /// True when the request was aborted on purpose and should not be reported.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// True when the failure is a connectivity problem rather than a bad answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
