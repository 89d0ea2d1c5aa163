//! Tree snapshots for the differ
//!
//! Both sides of a sync are flattened into a map keyed by relative path
//! (forward-slash separated), which makes the diff a sorted merge-join.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use drive_client::{Node, NodeKind, RemoteClient};

use crate::Result;

/// One local filesystem entry, keyed by its relative path.
///
/// The canonical absolute path serves as the local identifier.
#[derive(Debug, Clone)]
pub struct LocalEntry {
    pub path: PathBuf,
    pub kind: NodeKind,
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Walk a local directory tree into a relative-path map.
///
/// Relative paths always use `/` as the separator, regardless of platform.
pub fn walk_local(root: &Path) -> Result<BTreeMap<String, LocalEntry>> {
    let mut entries = BTreeMap::new();
    walk_local_into(root, String::new(), &mut entries)?;
    Ok(entries)
}

fn walk_local_into(
    dir: &Path,
    prefix: String,
    entries: &mut BTreeMap<String, LocalEntry>,
) -> Result<()> {
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        let name = dir_entry.file_name().to_string_lossy().to_string();
        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        let metadata = dir_entry.metadata()?;
        let modified_at = metadata.modified().ok().map(DateTime::<Utc>::from);
        if metadata.is_dir() {
            entries.insert(
                rel.clone(),
                LocalEntry {
                    path: path.clone(),
                    kind: NodeKind::Folder,
                    size: None,
                    modified_at,
                },
            );
            walk_local_into(&path, rel, entries)?;
        } else {
            entries.insert(
                rel,
                LocalEntry {
                    path,
                    kind: NodeKind::File,
                    size: Some(metadata.len()),
                    modified_at,
                },
            );
        }
    }
    Ok(())
}

/// Walk a remote folder recursively into a relative-path map.
///
/// Malformed child records (missing `id`/`name`/`type`) are skipped with a
/// warning rather than failing the whole walk.
pub fn walk_remote(client: &dyn RemoteClient, root: &Node) -> Result<BTreeMap<String, Node>> {
    let mut entries = BTreeMap::new();
    let mut stack = vec![(String::new(), root.id.clone())];

    while let Some((prefix, parent_id)) = stack.pop() {
        for record in client.list_children(&parent_id, None)? {
            let Some(node) = record.to_node() else {
                warn!(parent_id, "skipping malformed remote record");
                continue;
            };
            let rel = if prefix.is_empty() {
                node.name.clone()
            } else {
                format!("{prefix}/{}", node.name)
            };
            if node.is_folder() {
                stack.push((rel.clone(), node.id.clone()));
            }
            entries.insert(rel, node);
        }
    }
    Ok(entries)
}
