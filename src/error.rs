use thiserror::Error;

/// Type alias for Result with MailError
pub type Result<T> = std::result::Result<T, MailError>;

/// Error types for fetching and analyzing sent mail
#[derive(Error, Debug)]
pub enum MailError {
    /// Mail API returned an error
    #[error("Mail API error: {0}")]
    ApiError(String),

    /// Authentication failed or credentials expired
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Body data that is not valid base64url or not valid UTF-8
    #[error("Failed to decode message body: {0}")]
    DecodeError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or unreadable language resources (stopwords, entity tables)
    #[error("Resource error: {0}")]
    ResourceError(String),
}

impl MailError {
    /// Check if the error is transient, i.e. a later run may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MailError::RateLimitExceeded(_)
                | MailError::ServerError { .. }
                | MailError::NetworkError(_)
        )
    }
}

impl From<google_gmail1::Error> for MailError {
    fn from(error: google_gmail1::Error) -> Self {
        match error {
            google_gmail1::Error::Failure(ref response) => {
                let status = response.status();
                let status_code = status.as_u16();
                let message = format!(
                    "HTTP {}: {}",
                    status_code,
                    status.canonical_reason().unwrap_or("Unknown")
                );

                match status_code {
                    429 => MailError::RateLimitExceeded(message),
                    401 => MailError::AuthError(message),
                    404 => MailError::MessageNotFound("Resource not found".to_string()),
                    400 => MailError::BadRequest(message),
                    403 => MailError::Forbidden(message),
                    500..=599 => MailError::ServerError {
                        status: status_code,
                        message,
                    },
                    _ => MailError::ApiError(message),
                }
            }
            google_gmail1::Error::BadRequest(ref err) => MailError::BadRequest(format!("{}", err)),
            google_gmail1::Error::HttpError(ref err) => {
                MailError::NetworkError(format!("Connection error: {}", err))
            }
            google_gmail1::Error::Io(err) => MailError::NetworkError(err.to_string()),
            google_gmail1::Error::MissingToken(ref err) => {
                MailError::AuthError(format!("No usable token: {}", err))
            }
            _ => MailError::ApiError(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(MailError::RateLimitExceeded("HTTP 429".to_string()).is_transient());
        assert!(MailError::ServerError {
            status: 503,
            message: "Service unavailable".to_string(),
        }
        .is_transient());
        assert!(MailError::NetworkError("Connection timeout".to_string()).is_transient());
    }

    #[test]
    fn test_non_transient_errors() {
        assert!(!MailError::BadRequest("Invalid query".to_string()).is_transient());
        assert!(!MailError::AuthError("expired".to_string()).is_transient());
        assert!(!MailError::DecodeError("bad base64".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let display = MailError::RateLimitExceeded("HTTP 429: Too Many Requests".to_string())
            .to_string();
        assert_eq!(display, "Rate limit exceeded: HTTP 429: Too Many Requests");

        let display = MailError::DecodeError("invalid byte".to_string()).to_string();
        assert!(display.contains("decode message body"));
    }
}
