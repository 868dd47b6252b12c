//! Error types for the external information sources.

/// Coarse classification of a source failure, used to pick the reply shown
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure: connection refused, timeout, unreadable body.
    Network,
    /// Credential absent, placeholder, or rejected by the service.
    Misconfiguration,
    /// Anything else: unexpected status, malformed payload.
    Other,
}

/// Errors from a news or knowledge source call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request rejected ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("missing or placeholder API key")]
    MissingCredential,
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl SourceError {
    /// Classify this failure for user-facing handling.
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Network(_) => FailureKind::Network,
            SourceError::MissingCredential => FailureKind::Misconfiguration,
            SourceError::Status { status, message } => {
                if matches!(status, 401 | 403) || mentions_api_key(message) {
                    FailureKind::Misconfiguration
                } else {
                    FailureKind::Other
                }
            }
            SourceError::Rejected { code, message } => {
                if code.starts_with("apiKey") || mentions_api_key(message) {
                    FailureKind::Misconfiguration
                } else {
                    FailureKind::Other
                }
            }
            SourceError::Decode(_) | SourceError::Client(_) => FailureKind::Other,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            SourceError::Network(err.to_string())
        } else if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

fn mentions_api_key(message: &str) -> bool {
    message.to_lowercase().contains("api key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_kind() {
        let err = SourceError::Network("connection refused".to_string());
        assert_eq!(err.kind(), FailureKind::Network);
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_missing_credential_is_misconfiguration() {
        assert_eq!(
            SourceError::MissingCredential.kind(),
            FailureKind::Misconfiguration
        );
    }

    #[test]
    fn test_auth_status_is_misconfiguration() {
        for status in [401, 403] {
            let err = SourceError::Status {
                status,
                message: "denied".to_string(),
            };
            assert_eq!(err.kind(), FailureKind::Misconfiguration);
        }
    }

    #[test]
    fn test_bad_request_mentioning_key_is_misconfiguration() {
        let err = SourceError::Status {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Misconfiguration);
    }

    #[test]
    fn test_server_error_is_other() {
        let err = SourceError::Status {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Other);
    }

    #[test]
    fn test_rejected_api_key_code_is_misconfiguration() {
        let err = SourceError::Rejected {
            code: "apiKeyInvalid".to_string(),
            message: "Your API key is invalid".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Misconfiguration);

        let err = SourceError::Rejected {
            code: "rateLimited".to_string(),
            message: "Too many requests".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Other);
    }

    #[test]
    fn test_decode_is_other() {
        let err = SourceError::Decode("expected value".to_string());
        assert_eq!(err.kind(), FailureKind::Other);
        assert!(err.to_string().contains("invalid response"));
    }
}
