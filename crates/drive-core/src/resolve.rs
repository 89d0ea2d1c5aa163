//! Path Resolver
//!
//! Maps a filepath-style address to the unique remote node whose relative
//! path matches segment by segment, using exact name equality at each level.
//!
//! Remote stores that allow duplicate names under one parent make naive
//! first-match resolution silently wrong. The resolver refuses instead of
//! guessing whenever more than one candidate name is live at a level, while
//! tolerating old auto-renamed `name(N)` leftovers coexisting with one
//! canonical exact-name entry.

use regex::Regex;
use tracing::{debug, warn};

use drive_client::{Node, NodeKind, NodeRecord, ROOT_ID, RemoteClient, RemotePath};

use crate::{Error, Result};

/// Children of one level, partitioned against an expected segment name.
pub(crate) struct Candidates {
    /// Children whose name equals the segment verbatim
    pub exact: Vec<Node>,
    /// Names matching the auto-rename pattern `segment(N)`
    pub siblings: Vec<String>,
}

/// Partition a child listing into exact matches and auto-renamed siblings.
///
/// The sibling pattern is `^<escaped-segment>\(\d+\)$`, computed relative to
/// the expected name — never a generic "looks like a copy" heuristic.
/// Records missing `id`/`name`/`type` are skipped with a warning; resolution
/// behaves identically for typed and raw records.
pub(crate) fn partition_children(records: &[NodeRecord], segment: &str) -> Candidates {
    let sibling_pattern = Regex::new(&format!(r"^{}\(\d+\)$", regex::escape(segment)))
        .expect("escaped segment forms a valid pattern");

    let mut exact = Vec::new();
    let mut siblings = Vec::new();
    for record in records {
        let Some(name) = record.name() else {
            warn!("skipping child record without a name");
            continue;
        };
        if name == segment {
            match record.to_node() {
                Some(node) => exact.push(node),
                None => warn!(name, "skipping malformed child record"),
            }
        } else if sibling_pattern.is_match(name) {
            siblings.push(name.to_string());
        }
    }
    Candidates { exact, siblings }
}

/// Resolve `path` to a unique node, optionally requiring its kind.
///
/// # Errors
///
/// - [`Error::NotFound`] when a segment has neither an exact match nor
///   auto-renamed siblings
/// - [`Error::Ambiguous`] when a segment has no exact match but live
///   `segment(N)` siblings, or more than one exact match
/// - [`Error::TypeMismatch`] when the final node is not of the required kind
pub fn resolve_node(
    client: &dyn RemoteClient,
    path: &RemotePath,
    expected: Option<NodeKind>,
) -> Result<Node> {
    let root = client.get_node(ROOT_ID)?;
    if path.is_root() {
        if expected == Some(NodeKind::File) {
            return Err(Error::TypeMismatch {
                path: path.to_string(),
                expected: NodeKind::File,
                actual: NodeKind::Folder,
            });
        }
        return Ok(root);
    }

    let segments: Vec<&str> = path.segments().collect();
    let mut current = root;
    for (idx, segment) in segments.iter().enumerate() {
        let last = idx + 1 == segments.len();
        // Intermediate segments must be folders; the final one may be a file.
        let kind_filter = if last { None } else { Some(NodeKind::Folder) };
        let records = client.list_children(&current.id, kind_filter)?;
        let candidates = partition_children(&records, segment);
        current = select_unique(candidates, path, segment, if last { expected } else { None })?;
        debug!(segment, id = %current.id, "resolved segment");
    }

    Ok(current)
}

/// Apply the refuse-over-guess selection rules to one level's candidates.
fn select_unique(
    candidates: Candidates,
    path: &RemotePath,
    segment: &str,
    expected: Option<NodeKind>,
) -> Result<Node> {
    let Candidates { exact, siblings } = candidates;

    // An expected kind narrows the exact matches first, so a file and a
    // folder sharing one name resolve cleanly when the caller knows what it
    // wants, and report TypeMismatch when only the other kind exists.
    let (mut matching, mismatched): (Vec<Node>, Vec<Node>) = match expected {
        Some(kind) => exact.into_iter().partition(|n| n.kind == kind),
        None => (exact, Vec::new()),
    };

    // Duplicate exact names are a data-integrity anomaly on the remote side;
    // refuse and enumerate them.
    if matching.len() > 1 {
        return Err(Error::Ambiguous {
            path: path.to_string(),
            segment: segment.to_string(),
            candidates: matching.into_iter().map(|n| n.name).collect(),
        });
    }
    if let Some(node) = matching.pop() {
        return Ok(node);
    }
    if let (Some(expected), Some(other)) = (expected, mismatched.first()) {
        return Err(Error::TypeMismatch {
            path: path.to_string(),
            expected,
            actual: other.kind,
        });
    }
    if siblings.is_empty() {
        Err(Error::NotFound {
            path: path.to_string(),
        })
    } else {
        // The segment was never created verbatim; only auto-renamed copies
        // exist. Resolution must not guess.
        Err(Error::Ambiguous {
            path: path.to_string(),
            segment: segment.to_string(),
            candidates: siblings,
        })
    }
}

/// Resolve a path to a node of either kind.
pub fn resolve_any(client: &dyn RemoteClient, path: &RemotePath) -> Result<Node> {
    resolve_node(client, path, None)
}

/// Resolve a path that must be a folder.
pub fn resolve_folder(client: &dyn RemoteClient, path: &RemotePath) -> Result<Node> {
    resolve_node(client, path, Some(NodeKind::Folder))
}

/// Resolve a path that must be a file.
pub fn resolve_file(client: &dyn RemoteClient, path: &RemotePath) -> Result<Node> {
    resolve_node(client, path, Some(NodeKind::File))
}
