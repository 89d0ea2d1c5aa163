//! The remote collaborator trait
//!
//! Everything above this crate talks to the store exclusively through
//! [`RemoteClient`]. All calls are synchronous and blocking; the store's
//! name-collision semantics make concurrent creates under one parent unsafe
//! to coordinate without server-side locking, so no internal parallelism is
//! assumed anywhere.

use std::path::{Path, PathBuf};

use crate::node::{ConflictPolicy, Node, NodeKind, NodeRecord};
use crate::Result;

/// Well-known id of the remote tree root
pub const ROOT_ID: &str = "root";

/// Tree-navigation and mutation primitives of the remote store.
pub trait RemoteClient {
    /// Fetch one node by id.
    ///
    /// Fails with [`crate::Error::NodeNotFound`] if the id is invalid or the
    /// node has been deleted.
    fn get_node(&self, id: &str) -> Result<Node>;

    /// List the children of a folder, optionally restricted to one kind.
    fn list_children(&self, parent_id: &str, kind: Option<NodeKind>) -> Result<Vec<NodeRecord>>;

    /// Create a folder under `parent_id`.
    ///
    /// Under [`ConflictPolicy::Refuse`] an exact-name sibling makes the call
    /// fail with [`crate::Error::NameConflict`].
    fn create_folder(&self, parent_id: &str, name: &str, policy: ConflictPolicy) -> Result<Node>;

    /// Move a node to a new parent and/or name.
    fn move_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node>;

    /// Copy a node to a new parent and/or name.
    fn copy_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node>;

    /// Delete a node (soft-delete/trash semantics acceptable).
    fn delete_node(&self, id: &str) -> Result<()>;

    /// Upload a local file under `parent_id`, keeping its file name.
    fn upload(&self, local_file: &Path, parent_id: &str, policy: ConflictPolicy) -> Result<Node>;

    /// Download a file node into `local_dir`, returning the written path.
    fn download(&self, node: &Node, local_dir: &Path) -> Result<PathBuf>;
}
