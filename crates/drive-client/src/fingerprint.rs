//! Content fingerprints
//!
//! A single canonical fingerprint format (`sha256:<hex>`) is used for
//! exact-change detection on both sides of a sync.

use sha2::{Digest, Sha256};
use std::path::Path;

const PREFIX: &str = "sha256:";

/// Fingerprint in-memory content as `"sha256:<hex>"`.
pub fn content_fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Fingerprint a file's contents as `"sha256:<hex>"`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_fingerprint(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(content_fingerprint(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_has_prefix_and_is_deterministic() {
        let a = content_fingerprint(b"test");
        let b = content_fingerprint(b"test");
        assert!(a.starts_with("sha256:"));
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_known_value() {
        assert_eq!(
            content_fingerprint(b"hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn file_fingerprint_matches_content_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(
            file_fingerprint(&path).unwrap(),
            content_fingerprint(b"hello world")
        );
    }
}
