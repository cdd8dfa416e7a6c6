//! Error types for gitbridge.

use thiserror::Error;

/// Main error type for gitbridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input, detected before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No provider registered under the requested name
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The requested issue does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider call did not succeed
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an error from a non-success HTTP status and its response body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Error::NotFound(message),
            _ => Error::Transport {
                status: Some(status),
                message,
            },
        }
    }

    /// Build an error for a request that never produced a status.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status an API layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidArgument(_) | Error::UnsupportedProvider(_) => 400,
            Error::NotFound(_) => 404,
            Error::Transport { status, .. } => status.unwrap_or(502),
            Error::Config(_) => 500,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Result type alias for gitbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(Error::from_status(404, "gone"), Error::NotFound(_)));
        assert!(matches!(
            Error::from_status(401, "Bad credentials"),
            Error::Transport {
                status: Some(401),
                ..
            }
        ));
        assert!(matches!(
            Error::from_status(503, ""),
            Error::Transport {
                status: Some(503),
                ..
            }
        ));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Error::InvalidArgument("x".into()).status_code(), 400);
        assert_eq!(Error::UnsupportedProvider("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::from_status(403, "").status_code(), 403);
        assert_eq!(Error::transport("connection refused").status_code(), 502);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::from_status(401, "Bad credentials").to_string(),
            "Transport error (401): Bad credentials"
        );
        assert_eq!(
            Error::transport("connection refused").to_string(),
            "Transport error: connection refused"
        );
    }
}
