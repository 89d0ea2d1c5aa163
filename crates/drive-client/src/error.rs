//! Error types for drive-client

use std::path::PathBuf;

/// Result type for drive-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the remote store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node id does not exist (or has been deleted) on the remote side
    #[error("Remote node not found: {id}")]
    NodeNotFound { id: String },

    /// Creation was refused because an exact-name sibling already exists
    #[error("Name already exists under {parent_id}: {name}")]
    NameConflict { parent_id: String, name: String },

    /// A child listing entry was missing one of the required
    /// `id`/`name`/`type` keys
    #[error("Malformed node record: {message}")]
    MalformedRecord { message: String },

    /// A remote path string that cannot be interpreted as a rooted
    /// segment sequence
    #[error("Unsupported remote path {path:?}: {message}")]
    InvalidPath { path: String, message: String },

    /// Transport-level failure (connection, status, protocol)
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport {
            message: e.to_string(),
        }
    }
}
