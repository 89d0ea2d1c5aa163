//! Sync Reconciler
//!
//! Applies a [`SyncPlan`] so that no path is used before its parent folder
//! exists on the destination side: creates and updates run top-down
//! (ascending relative path), deletes run bottom-up (descending). Each
//! action is independently retryable; a failure is recorded and the rest of
//! the plan keeps going.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use drive_client::{ConflictPolicy, Node, NodeKind, RemoteClient};

use crate::{Error, Result};

use super::plan::{ActionKind, PlanEntry, SyncOptions, SyncPlan};

/// One plan action that could not be applied.
#[derive(Debug, Clone, Serialize)]
pub struct FailedAction {
    pub rel_path: String,
    pub action: ActionKind,
    pub cause: String,
}

/// Outcome summary of one plan application.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Human-readable descriptions of the actions taken
    pub actions: Vec<String>,
    /// Relative paths whose action succeeded
    pub succeeded: Vec<String>,
    /// Actions that failed, with their causes
    pub failed: Vec<FailedAction>,
}

impl SyncReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn a partially failed report into [`Error::PartialSyncFailure`].
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(Error::PartialSyncFailure {
                failed: self.failed,
            })
        }
    }
}

/// Apply a plan against the client and the local filesystem.
///
/// `remote` is the snapshot the plan was built from; it supplies node ids
/// for downloads and deletions and the folder ids creations hang off.
pub fn apply_plan(
    client: &dyn RemoteClient,
    local_root: &Path,
    remote_root: &Node,
    remote: &BTreeMap<String, Node>,
    plan: &SyncPlan,
    options: &SyncOptions,
) -> SyncReport {
    let mut report = SyncReport::default();

    if options.dry_run {
        for entry in plan.work() {
            report
                .actions
                .push(format!("[dry-run] Would {} {}", entry.action, entry.rel_path));
        }
        return report;
    }

    // Folder ids by relative path; creations extend this as they land.
    let mut dir_ids: HashMap<String, String> = HashMap::new();
    dir_ids.insert(String::new(), remote_root.id.clone());
    for (rel, node) in remote {
        if node.is_folder() {
            dir_ids.insert(rel.clone(), node.id.clone());
        }
    }

    // Plan entries arrive in ascending path order; that is already the
    // parent-first order creates need. Deletes run in reverse so a folder
    // goes only after everything beneath it.
    let mut deletes: Vec<&PlanEntry> = Vec::new();
    for entry in plan.work() {
        if entry.action.is_delete() {
            deletes.push(entry);
            continue;
        }
        record(&mut report, entry, execute(client, local_root, &mut dir_ids, remote, entry));
    }
    for entry in deletes.into_iter().rev() {
        record(&mut report, entry, execute(client, local_root, &mut dir_ids, remote, entry));
    }

    report
}

fn record(report: &mut SyncReport, entry: &PlanEntry, outcome: Result<String>) {
    match outcome {
        Ok(description) => {
            debug!(rel = %entry.rel_path, action = %entry.action, "applied");
            report.actions.push(description);
            report.succeeded.push(entry.rel_path.clone());
        }
        Err(e) => {
            warn!(rel = %entry.rel_path, action = %entry.action, error = %e, "action failed");
            report.failed.push(FailedAction {
                rel_path: entry.rel_path.clone(),
                action: entry.action,
                cause: e.to_string(),
            });
        }
    }
}

fn execute(
    client: &dyn RemoteClient,
    local_root: &Path,
    dir_ids: &mut HashMap<String, String>,
    remote: &BTreeMap<String, Node>,
    entry: &PlanEntry,
) -> Result<String> {
    let rel = entry.rel_path.as_str();
    match entry.action {
        ActionKind::CreateRemote => {
            let parent_id = parent_folder_id(dir_ids, rel)?;
            if entry.kind == NodeKind::Folder {
                let node =
                    client.create_folder(&parent_id, leaf_name(rel), ConflictPolicy::Refuse)?;
                dir_ids.insert(rel.to_string(), node.id);
                Ok(format!("Created remote folder {rel}"))
            } else {
                client.upload(&local_path(local_root, rel), &parent_id, ConflictPolicy::Refuse)?;
                Ok(format!("Uploaded {rel}"))
            }
        }
        ActionKind::UpdateRemote => {
            let parent_id = parent_folder_id(dir_ids, rel)?;
            client.upload(&local_path(local_root, rel), &parent_id, ConflictPolicy::Overwrite)?;
            Ok(format!("Updated remote {rel}"))
        }
        ActionKind::CreateLocal | ActionKind::UpdateLocal => {
            let target = local_path(local_root, rel);
            if entry.kind == NodeKind::Folder {
                fs::create_dir_all(&target)?;
                Ok(format!("Created local folder {rel}"))
            } else {
                let node = remote_node(remote, rel)?;
                let parent = target.parent().unwrap_or(local_root);
                fs::create_dir_all(parent)?;
                client.download(node, parent)?;
                if entry.action == ActionKind::CreateLocal {
                    Ok(format!("Downloaded {rel}"))
                } else {
                    Ok(format!("Updated local {rel}"))
                }
            }
        }
        ActionKind::DeleteLocal => {
            let target = local_path(local_root, rel);
            if entry.kind == NodeKind::Folder {
                fs::remove_dir(&target)?;
            } else {
                fs::remove_file(&target)?;
            }
            Ok(format!("Deleted local {rel}"))
        }
        ActionKind::DeleteRemote => {
            let node = remote_node(remote, rel)?;
            client.delete_node(&node.id)?;
            Ok(format!("Deleted remote {rel}"))
        }
        ActionKind::Skip => Ok(format!("Skipped {rel}")),
    }
}

/// The remote folder id a relative path hangs under.
///
/// Missing means the parent's own creation failed earlier in this run; the
/// child is reported failed instead of being placed somewhere wrong.
fn parent_folder_id(dir_ids: &HashMap<String, String>, rel: &str) -> Result<String> {
    let parent_rel = rel.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
    dir_ids.get(parent_rel).cloned().ok_or_else(|| Error::NotFound {
        path: format!("/{parent_rel}"),
    })
}

fn remote_node<'a>(remote: &'a BTreeMap<String, Node>, rel: &str) -> Result<&'a Node> {
    remote.get(rel).ok_or_else(|| Error::NotFound {
        path: format!("/{rel}"),
    })
}

fn leaf_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

fn local_path(root: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(root.to_path_buf(), |p, s| p.join(s))
}
