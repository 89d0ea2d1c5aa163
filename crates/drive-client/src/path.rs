//! Normalized remote path handling
//!
//! Remote addresses are always filepath-like: a leading `/` anchors the path
//! at the tree root, and every other addressing scheme (URLs, `drive:`-style
//! prefixes) is rejected up front instead of being misread as a node name.

use crate::{Error, Result};

/// A normalized, rooted remote path.
///
/// Stored as a forward-slash string that always starts with `/`, never ends
/// with `/` (except the root itself), and contains no empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    inner: String,
}

impl RemotePath {
    /// The tree root, `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Parse a user-supplied remote path string.
    ///
    /// An empty or whitespace-only string means the root. A missing leading
    /// slash is tolerated (`docs/a` reads as `/docs/a`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for URL-like strings (`scheme://...`)
    /// and for `name:path`-style prefixes.
    pub fn parse(raw: &str) -> Result<Self> {
        let value = raw.trim();
        if value.contains("://") {
            return Err(Error::InvalidPath {
                path: raw.to_string(),
                message: "use a filepath-like path such as '/tasks'".to_string(),
            });
        }
        if value.contains(':') && !value.starts_with('/') {
            return Err(Error::InvalidPath {
                path: raw.to_string(),
                message: "use a filepath-like path such as 'tasks'".to_string(),
            });
        }

        let mut inner = String::from("/");
        for segment in value.split('/').filter(|s| !s.is_empty()) {
            if !inner.ends_with('/') {
                inner.push('/');
            }
            inner.push_str(segment);
        }
        Ok(Self { inner })
    }

    /// Whether this is the tree root.
    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Iterate over the path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> Self {
        let inner = if self.is_root() {
            format!("/{}", segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// The last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.inner.rsplit('/').next()
    }

    /// The normalized string form.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::str::FromStr for RemotePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
