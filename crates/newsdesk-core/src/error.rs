use thiserror::Error;

/// Top-level error type for the Newsdesk system.
///
/// Subsystem crates define their own error types and implement
/// `From<NewsdeskError>` (or the reverse) so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NewsdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown news category: {0}")]
    UnknownCategory(String),
}

impl From<toml::de::Error> for NewsdeskError {
    fn from(err: toml::de::Error) -> Self {
        NewsdeskError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NewsdeskError {
    fn from(err: toml::ser::Error) -> Self {
        NewsdeskError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NewsdeskError {
    fn from(err: serde_json::Error) -> Self {
        NewsdeskError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Newsdesk operations.
pub type Result<T> = std::result::Result<T, NewsdeskError>;
