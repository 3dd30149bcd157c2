//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding lookup and input validation failures.
#[derive(Debug)]
pub enum F1StatsError {
    /// An error from the underlying API client.
    Api(ergast_api::Error),
    /// The API answered, but the requested record does not exist.
    NotFound(String),
    /// Caller-provided input failed validation.
    InvalidInput(String),
}

impl F1StatsError {
    /// Superseded or aborted work. Never shown to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_cancelled())
    }

    /// Message for the error banner. Connectivity problems and server-side
    /// problems read differently so the user knows whether retrying helps.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ergast_api::Error::Transport(_)) => {
                "No response from the server. Check your connection and try again.".to_string()
            }
            Self::Api(ergast_api::Error::HttpStatus { status, .. }) => {
                format!("Server error: {}", status)
            }
            Self::Api(ergast_api::Error::DataShape(_)) => {
                "The server returned data in an unexpected format.".to_string()
            }
            Self::Api(ergast_api::Error::Cancelled) => "Request was cancelled.".to_string(),
            Self::NotFound(what) => format!("{} not found.", what),
            Self::InvalidInput(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for F1StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for F1StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ergast_api::Error> for F1StatsError {
    fn from(e: ergast_api::Error) -> Self {
        Self::Api(e)
    }
}
