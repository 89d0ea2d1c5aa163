//! Local directory tree builder

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temp-directory tree built with a fluent API.
///
/// ```
/// use drive_test_utils::LocalTree;
///
/// let tree = LocalTree::new()
///     .dir("docs")
///     .file("docs/a.txt", "hello");
/// assert!(tree.join("docs/a.txt").is_file());
/// ```
pub struct LocalTree {
    dir: TempDir,
}

impl Default for LocalTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Create a file (and its parent directories) with the given content.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        self
    }

    /// Create a directory (and its parents).
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.join(rel)).expect("create dir");
        self
    }

    /// The tree root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a forward-slash relative path against the root.
    pub fn join(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .fold(self.dir.path().to_path_buf(), |p, s| p.join(s))
    }
}
