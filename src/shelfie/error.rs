use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A single failed form check, tied to the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum ShelfieError {
    /// The request never got a response (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Not logged in or session expired")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The reader may not review this book yet; carries the prompt to show.
    #[error("Cannot review yet: {0}")]
    NotEligible(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ShelfieError {
    /// Failures worth another attempt: nothing came back, or the server fell over.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ShelfieError::Network(_) | ShelfieError::Server { .. }
        )
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ShelfieError::BadRequest { .. } => Some(400),
            ShelfieError::Unauthorized => Some(401),
            ShelfieError::Forbidden(_) => Some(403),
            ShelfieError::NotFound(_) => Some(404),
            ShelfieError::Unprocessable(_) => Some(422),
            ShelfieError::Server { status, .. } | ShelfieError::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let err = ShelfieError::Validation(vec![
            FieldError::new("rating", "bad rating"),
            FieldError::new("content", "empty"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: bad rating; empty");
    }

    #[test]
    fn only_transport_and_server_failures_retry() {
        assert!(ShelfieError::Network("refused".into()).is_retryable());
        assert!(ShelfieError::Server {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!ShelfieError::NotFound("x".into()).is_retryable());
        assert!(!ShelfieError::Unauthorized.is_retryable());
    }

    #[test]
    fn status_maps_response_errors() {
        assert_eq!(ShelfieError::Unauthorized.status(), Some(401));
        assert_eq!(ShelfieError::Forbidden(String::new()).status(), Some(403));
        assert_eq!(ShelfieError::Network(String::new()).status(), None);
    }
}
