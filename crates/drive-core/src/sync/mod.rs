//! Two-way tree synchronization
//!
//! The sync pipeline has two halves: the differ walks both trees and
//! computes a [`SyncPlan`] once, and the reconciler applies it with
//! partial-failure semantics. The [`SyncEngine`] ties them together for one
//! invocation; nothing is persisted between runs.

mod diff;
mod plan;
mod reconcile;

pub use diff::build_plan;
pub use plan::{ActionKind, PlanEntry, SyncMode, SyncOptions, SyncPlan};
pub use reconcile::{FailedAction, SyncReport, apply_plan};

use std::path::{Path, PathBuf};

use drive_client::{Node, RemoteClient};

use crate::walk::{walk_local, walk_remote};
use crate::Result;

/// One-shot synchronization between a local directory and a remote folder.
pub struct SyncEngine<'a> {
    client: &'a dyn RemoteClient,
    local_root: PathBuf,
    remote_root: Node,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine for one local/remote root pair.
    ///
    /// `remote_root` must already be resolved (or materialized) to a folder
    /// node by the caller.
    pub fn new(client: &'a dyn RemoteClient, local_root: impl Into<PathBuf>, remote_root: Node) -> Self {
        Self {
            client,
            local_root: local_root.into(),
            remote_root,
        }
    }

    /// Compute the plan without applying it.
    pub fn plan(&self, options: &SyncOptions) -> Result<SyncPlan> {
        let local = walk_local(&self.local_root)?;
        let remote = walk_remote(self.client, &self.remote_root)?;
        build_plan(&local, &remote, options)
    }

    /// Compute and apply the plan, reporting per-path outcomes.
    ///
    /// A failing action never aborts the rest of the plan; the report lists
    /// every succeeded and failed relative path.
    pub fn sync(&self, options: &SyncOptions) -> Result<SyncReport> {
        let local = walk_local(&self.local_root)?;
        let remote = walk_remote(self.client, &self.remote_root)?;
        let plan = build_plan(&local, &remote, options)?;
        Ok(apply_plan(
            self.client,
            &self.local_root,
            &self.remote_root,
            &remote,
            &plan,
            options,
        ))
    }

    /// The local side of the pair.
    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// The resolved remote folder node.
    pub fn remote_root(&self) -> &Node {
        &self.remote_root
    }
}
