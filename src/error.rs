//! Error type shared by every client operation.

/// Crate-wide result alias.
pub type Result<T, E = PushError> = std::result::Result<T, E>;

/// Errors returned by the push client.
#[derive(Debug)]
pub enum PushError {
    /// Missing credential or package names, or an unreadable config file.
    InvalidConfig(String),
    /// A message or request argument was rejected before any network call.
    Validation(String),
    /// The request could not be sent (connect, TLS, timeout).
    Request(String),
    /// The server answered without a body.
    EmptyResponse,
    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The response body could not be read.
    ReadBody(String),
    /// The response body was not the expected JSON.
    Decode(String),
}

impl PushError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        PushError::Validation(msg.into())
    }

    /// Whether the retry executor may try the request again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PushError::Request(_)
                | PushError::EmptyResponse
                | PushError::Status { .. }
                | PushError::ReadBody(_)
        )
    }
}

impl std::fmt::Display for PushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushError::InvalidConfig(msg) => write!(f, "Invalid client config: {}", msg),
            PushError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            PushError::Request(msg) => write!(f, "xiaomi push API request failed: {}", msg),
            PushError::EmptyResponse => write!(f, "xiaomi push API response nil"),
            PushError::Status { status, body } => {
                write!(f, "xiaomi push API status {}, response {}", status, body)
            }
            PushError::ReadBody(msg) => {
                write!(f, "Failed to read xiaomi push API response: {}", msg)
            }
            PushError::Decode(msg) => {
                write!(f, "Failed to parse xiaomi push API response: {}", msg)
            }
        }
    }
}

impl std::error::Error for PushError {}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        PushError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_retryable() {
        assert!(PushError::Request("connection reset".into()).is_retryable());
        assert!(PushError::EmptyResponse.is_retryable());
        assert!(
            PushError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(PushError::ReadBody("eof".into()).is_retryable());
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        assert!(!PushError::InvalidConfig("no secret".into()).is_retryable());
        assert!(!PushError::Validation("empty title".into()).is_retryable());
        assert!(!PushError::Decode("expected value".into()).is_retryable());
    }

    #[test]
    fn test_status_error_display() {
        let err = PushError::Status {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.to_string(), "xiaomi push API status 500, response oops");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PushError::from(err);
        assert!(matches!(err, PushError::Decode(_)));
        assert!(err.to_string().contains("parse"));
    }
}
