//! Folder Materializer
//!
//! Ensures every missing segment of a target path exists as a remote folder,
//! created one level at a time, strictly parent before child. An existing
//! exact match is always reused; creation uses the refuse conflict policy,
//! because auto-renaming during unattended creation would silently produce
//! the ambiguous-sibling problem the resolver guards against.

use tracing::{debug, info};

use drive_client::{ConflictPolicy, Node, NodeKind, ROOT_ID, RemoteClient, RemotePath};

use crate::resolve::partition_children;
use crate::{Error, Result};

/// Ensure the folder at `path` exists, creating missing segments top-down.
///
/// Idempotent: a second run over the same path creates nothing.
///
/// # Errors
///
/// - [`Error::Ambiguous`] when a segment has only auto-renamed siblings or
///   duplicate exact matches; the materializer never picks one
/// - [`Error::TypeMismatch`] when a segment resolves to a file
/// - a [`drive_client::Error::NameConflict`] that persists after one
///   relookup (a concurrent create of a different kind, or a stale listing)
pub fn materialize_folder(client: &dyn RemoteClient, path: &RemotePath) -> Result<Node> {
    let mut current = client.get_node(ROOT_ID)?;
    if path.is_root() {
        return Ok(current);
    }

    let mut walked = RemotePath::root();
    for segment in path.segments() {
        walked = walked.join(segment);
        current = ensure_child_folder(client, &current, segment, &walked, path)?;
    }
    Ok(current)
}

/// Look up the unique exact-match folder child, or `None` when the segment
/// can safely be created.
fn lookup_folder(
    client: &dyn RemoteClient,
    parent: &Node,
    segment: &str,
    walked: &RemotePath,
    requested: &RemotePath,
) -> Result<Option<Node>> {
    let records = client.list_children(&parent.id, None)?;
    let mut candidates = partition_children(&records, segment);

    if candidates.exact.len() > 1 {
        return Err(Error::Ambiguous {
            path: requested.to_string(),
            segment: segment.to_string(),
            candidates: candidates.exact.into_iter().map(|n| n.name).collect(),
        });
    }
    if let Some(node) = candidates.exact.pop() {
        if node.kind != NodeKind::Folder {
            return Err(Error::TypeMismatch {
                path: walked.to_string(),
                expected: NodeKind::Folder,
                actual: node.kind,
            });
        }
        return Ok(Some(node));
    }
    if !candidates.siblings.is_empty() {
        return Err(Error::Ambiguous {
            path: requested.to_string(),
            segment: segment.to_string(),
            candidates: candidates.siblings,
        });
    }
    Ok(None)
}

fn ensure_child_folder(
    client: &dyn RemoteClient,
    parent: &Node,
    segment: &str,
    walked: &RemotePath,
    requested: &RemotePath,
) -> Result<Node> {
    if let Some(existing) = lookup_folder(client, parent, segment, walked, requested)? {
        debug!(segment, id = %existing.id, "reusing existing folder");
        return Ok(existing);
    }

    match client.create_folder(&parent.id, segment, ConflictPolicy::Refuse) {
        Ok(node) => {
            info!(path = %walked, id = %node.id, "created remote folder");
            Ok(node)
        }
        Err(conflict @ drive_client::Error::NameConflict { .. }) => {
            // A concurrent actor may have created the same name between the
            // lookup and the create call; retry the lookup once.
            match lookup_folder(client, parent, segment, walked, requested)? {
                Some(node) => {
                    debug!(segment, id = %node.id, "folder appeared concurrently");
                    Ok(node)
                }
                None => Err(conflict.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// A resolved copy/move destination: the parent folder to place the node
/// under, and optionally a new name for it.
#[derive(Debug, Clone)]
pub struct Destination {
    pub parent_id: String,
    pub new_name: Option<String>,
}

/// Resolve a destination address for copy/move operations.
///
/// `into_folder` (a trailing `/` in the raw address) forces "into that
/// folder, keep the name". Otherwise an existing folder at the full path is
/// used as-is, and failing that the last segment becomes the new name while
/// the parent path is materialized.
pub fn resolve_destination(
    client: &dyn RemoteClient,
    path: &RemotePath,
    into_folder: bool,
) -> Result<Destination> {
    if path.is_root() {
        return Ok(Destination {
            parent_id: ROOT_ID.to_string(),
            new_name: None,
        });
    }

    if into_folder {
        let folder = materialize_folder(client, path)?;
        return Ok(Destination {
            parent_id: folder.id,
            new_name: None,
        });
    }

    match crate::resolve::resolve_folder(client, path) {
        Ok(folder) => Ok(Destination {
            parent_id: folder.id,
            new_name: None,
        }),
        Err(Error::NotFound { .. }) | Err(Error::TypeMismatch { .. }) => {
            let parent_path = path.parent().unwrap_or_else(RemotePath::root);
            let name = path.file_name().map(str::to_string);
            let parent = materialize_folder(client, &parent_path)?;
            Ok(Destination {
                parent_id: parent.id,
                new_name: name,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use drive_client::NodeRecord;
    use drive_test_utils::MemoryRemote;
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    /// Store whose folder creation always refuses, as if another actor keeps
    /// winning the name. With `creates_land` the other actor's folder is
    /// there by the time the refusal comes back.
    struct ContendedRemote {
        inner: MemoryRemote,
        creates_land: bool,
    }

    impl RemoteClient for ContendedRemote {
        fn get_node(&self, id: &str) -> drive_client::Result<Node> {
            self.inner.get_node(id)
        }

        fn list_children(
            &self,
            parent_id: &str,
            kind: Option<NodeKind>,
        ) -> drive_client::Result<Vec<NodeRecord>> {
            self.inner.list_children(parent_id, kind)
        }

        fn create_folder(
            &self,
            parent_id: &str,
            name: &str,
            _policy: ConflictPolicy,
        ) -> drive_client::Result<Node> {
            if self.creates_land {
                self.inner.force_add_folder(parent_id, name);
            }
            Err(drive_client::Error::NameConflict {
                parent_id: parent_id.to_string(),
                name: name.to_string(),
            })
        }

        fn move_node(
            &self,
            id: &str,
            new_parent_id: Option<&str>,
            new_name: Option<&str>,
        ) -> drive_client::Result<Node> {
            self.inner.move_node(id, new_parent_id, new_name)
        }

        fn copy_node(
            &self,
            id: &str,
            new_parent_id: Option<&str>,
            new_name: Option<&str>,
        ) -> drive_client::Result<Node> {
            self.inner.copy_node(id, new_parent_id, new_name)
        }

        fn delete_node(&self, id: &str) -> drive_client::Result<()> {
            self.inner.delete_node(id)
        }

        fn upload(
            &self,
            local_file: &Path,
            parent_id: &str,
            policy: ConflictPolicy,
        ) -> drive_client::Result<Node> {
            self.inner.upload(local_file, parent_id, policy)
        }

        fn download(&self, node: &Node, local_dir: &Path) -> drive_client::Result<PathBuf> {
            self.inner.download(node, local_dir)
        }
    }

    #[test]
    fn creates_missing_nested_path_with_refuse_policy() {
        let remote = MemoryRemote::new();

        let folder = materialize_folder(&remote, &path("/backup/vocabulary")).unwrap();

        assert_eq!(folder.name, "vocabulary");
        let creations = remote.creations();
        assert_eq!(creations.len(), 2);
        assert_eq!(
            creations[0],
            (
                ROOT_ID.to_string(),
                "backup".to_string(),
                ConflictPolicy::Refuse
            )
        );
        assert_eq!(creations[1].1, "vocabulary");
        assert_eq!(creations[1].2, ConflictPolicy::Refuse);
    }

    #[test]
    fn reuses_exact_existing_folder_without_creating() {
        let remote = MemoryRemote::new();
        let exact = remote.add_folder(ROOT_ID, "vocabulary");
        remote.add_folder(ROOT_ID, "vocabulary(1)");

        let folder = materialize_folder(&remote, &path("/vocabulary")).unwrap();

        assert_eq!(folder.id, exact.id);
        assert!(remote.creations().is_empty());
    }

    #[test]
    fn second_run_is_idempotent() {
        let remote = MemoryRemote::new();

        materialize_folder(&remote, &path("/backup/vocabulary")).unwrap();
        let first_run = remote.creations().len();
        let folder = materialize_folder(&remote, &path("/backup/vocabulary")).unwrap();

        assert_eq!(first_run, 2);
        assert_eq!(remote.creations().len(), first_run);
        assert_eq!(folder.name, "vocabulary");
    }

    #[test]
    fn refuses_when_only_auto_renamed_siblings_exist() {
        let remote = MemoryRemote::new();
        remote.add_folder(ROOT_ID, "vocabulary(1)");
        remote.add_folder(ROOT_ID, "vocabulary(2)");

        let err = materialize_folder(&remote, &path("/vocabulary")).unwrap_err();
        let message = err.to_string();
        assert!(message.to_lowercase().contains("ambiguous"), "got: {message}");
        assert!(message.contains("vocabulary(1)"), "got: {message}");
        assert!(message.contains("vocabulary(2)"), "got: {message}");
        assert!(remote.creations().is_empty());
    }

    #[test]
    fn file_in_the_way_is_a_type_mismatch() {
        let remote = MemoryRemote::new();
        remote.add_file(ROOT_ID, "backup", b"not a folder", None);

        let err = materialize_folder(&remote, &path("/backup/vocabulary")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }), "got: {err}");
    }

    #[test]
    fn lost_create_race_adopts_the_folder_that_won() {
        let remote = ContendedRemote {
            inner: MemoryRemote::new(),
            creates_land: true,
        };

        let folder = materialize_folder(&remote, &path("/backup/vocabulary")).unwrap();

        // Both levels were refused, relooked up, and adopted.
        assert_eq!(folder.name, "vocabulary");
        assert_eq!(remote.inner.child_names(ROOT_ID), vec!["backup"]);
        let backup = materialize_folder(&remote, &path("/backup")).unwrap();
        assert_eq!(remote.inner.child_names(&backup.id), vec!["vocabulary"]);
    }

    #[test]
    fn persistent_conflict_surfaces_after_one_relookup() {
        let remote = ContendedRemote {
            inner: MemoryRemote::new(),
            creates_land: false,
        };

        let err = materialize_folder(&remote, &path("/backup")).unwrap_err();

        assert!(
            matches!(
                err,
                Error::Client(drive_client::Error::NameConflict { .. })
            ),
            "got: {err}"
        );
    }

    #[test]
    fn root_materializes_to_the_root_node() {
        let remote = MemoryRemote::new();
        let folder = materialize_folder(&remote, &RemotePath::root()).unwrap();
        assert_eq!(folder.id, ROOT_ID);
        assert!(remote.creations().is_empty());
    }

    #[test]
    fn destination_with_trailing_slash_materializes_the_folder() {
        let remote = MemoryRemote::new();

        let dest = resolve_destination(&remote, &path("/archive/2024"), true).unwrap();

        assert!(dest.new_name.is_none());
        let node = remote.get_node(&dest.parent_id).unwrap();
        assert_eq!(node.name, "2024");
    }

    #[test]
    fn destination_without_trailing_slash_renames_into_parent() {
        let remote = MemoryRemote::new();
        let docs = remote.add_folder(ROOT_ID, "docs");

        let dest = resolve_destination(&remote, &path("/docs/renamed.txt"), false).unwrap();

        assert_eq!(dest.parent_id, docs.id);
        assert_eq!(dest.new_name.as_deref(), Some("renamed.txt"));
    }

    #[test]
    fn destination_existing_folder_keeps_source_name() {
        let remote = MemoryRemote::new();
        let docs = remote.add_folder(ROOT_ID, "docs");

        let dest = resolve_destination(&remote, &path("/docs"), false).unwrap();

        assert_eq!(dest.parent_id, docs.id);
        assert!(dest.new_name.is_none());
    }
}
