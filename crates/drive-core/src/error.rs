//! Error types for drive-core
//!
//! Resolution failures are values, not panics: a caller composing multiple
//! resolutions can match on the variant and aggregate. Ambiguity always
//! carries every live candidate name so the message is actionable without a
//! debug re-run.

use drive_client::NodeKind;

use crate::sync::FailedAction;

/// Result type for drive-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in drive-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No node matches the requested path
    #[error("Remote path not found: {path}")]
    NotFound { path: String },

    /// More than one live candidate at one path segment
    #[error("Ambiguous path {path} at segment '{segment}': candidates are [{}]", candidates.join(", "))]
    Ambiguous {
        path: String,
        segment: String,
        candidates: Vec<String>,
    },

    /// A file was expected but a folder found, or vice versa
    #[error("Remote path {path} is a {actual}, expected a {expected}")]
    TypeMismatch {
        path: String,
        expected: NodeKind,
        actual: NodeKind,
    },

    /// One or more plan actions failed; the rest of the plan was attempted
    #[error("Sync finished with {} failed action(s): {}", failed.len(), summarize(failed))]
    PartialSyncFailure { failed: Vec<FailedAction> },

    /// Remote client error
    #[error(transparent)]
    Client(#[from] drive_client::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn summarize(failed: &[FailedAction]) -> String {
    failed
        .iter()
        .map(|f| format!("{} ({})", f.rel_path, f.cause))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_display_lists_every_candidate() {
        let error = Error::Ambiguous {
            path: "/vocabulary".to_string(),
            segment: "vocabulary".to_string(),
            candidates: vec!["vocabulary(1)".to_string(), "vocabulary(2)".to_string()],
        };

        let display = format!("{}", error);
        assert!(display.contains("vocabulary(1)"), "got: {display}");
        assert!(display.contains("vocabulary(2)"), "got: {display}");
    }

    #[test]
    fn type_mismatch_display_names_both_kinds() {
        let error = Error::TypeMismatch {
            path: "/notes".to_string(),
            expected: NodeKind::File,
            actual: NodeKind::Folder,
        };

        let display = format!("{}", error);
        assert!(display.contains("folder"));
        assert!(display.contains("file"));
    }
}
