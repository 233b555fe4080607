//! Error types shared by the client, the sampler and the history store.
//!
//! One enum covers the whole picking workflow so the binary can turn any
//! failure into a one-line message without knowing which crate raised it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while picking from a collection or recording history
#[derive(Error, Debug)]
pub enum PickerError {
    /// The remote collection reports zero items
    #[error("Collection is empty")]
    EmptyCollection,

    /// The filter never matched within the attempt ceiling
    #[error("Could not find an item matching the filter after {attempts} attempts")]
    NoMatchFound { attempts: u32 },

    /// HTTP 429 persisted after every retry
    #[error("Rate limited (HTTP {status}) after {retries} retries")]
    RateLimited { status: u16, retries: u32 },

    /// HTTP 401, the token is not accepted
    #[error("Authentication failed (HTTP 401), check your Discogs token")]
    Unauthorized,

    /// HTTP 404, the user or collection folder does not exist
    #[error("Resource not found (HTTP 404), check your Discogs username")]
    NotFound,

    /// Any other non-success status, or a successful response that could
    /// not be understood
    ///
    /// `status` is `None` when the failure is about the payload rather than
    /// the status line (e.g. an empty page inside the reported range).
    #[error("{}", api_error_message(.status, .message))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    /// Connection or I/O failure that outlived the retry budget
    #[error("Network error after {attempts} attempts: {source}")]
    NetworkError {
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading or writing the local history file failed
    #[error("History file {}: {source}", .path.display())]
    HistoryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn api_error_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("API request failed with status {status}: {message}"),
        None => format!("API error: {message}"),
    }
}

impl PickerError {
    /// Shorthand for payload-level API errors without an HTTP status
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiError {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::NotFound => Some(404),
            Self::ApiError { status, .. } => *status,
            _ => None,
        }
    }
}

/// Convenience type alias for Results in the picker crates
pub type Result<T> = std::result::Result<T, PickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = PickerError::NoMatchFound { attempts: 50 };
        assert!(err.to_string().contains("50 attempts"));

        let err = PickerError::RateLimited {
            status: 429,
            retries: 3,
        };
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("429"));

        let err = PickerError::ApiError {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 503: Service Unavailable"
        );
        assert_eq!(PickerError::api("empty page").status(), None);
    }

    #[test]
    fn test_network_error_keeps_source() {
        use std::error::Error as _;

        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = PickerError::NetworkError {
            attempts: 4,
            source: Box::new(cause),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Network error after 4 attempts"));
    }
}
