//! Error types for drive-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from drive-core
    #[error(transparent)]
    Core(#[from] drive_core::Error),

    /// Error from drive-client
    #[error(transparent)]
    Client(#[from] drive_client::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Profile TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// Profile TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
