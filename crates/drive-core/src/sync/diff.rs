//! Tree Differ
//!
//! Classifies every relative path present in either tree as unchanged,
//! added, removed, or modified, and turns the classification into a
//! [`SyncPlan`] under the configured directionality.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use drive_client::{Node, NodeKind, file_fingerprint};

use crate::walk::LocalEntry;
use crate::Result;

use super::plan::{ActionKind, SyncMode, SyncOptions, SyncPlan};

/// Build a plan from two tree snapshots.
///
/// Equivalent to a sorted merge-join on relative path strings: both inputs
/// are ordered maps, and the union of their keys is visited once.
pub fn build_plan(
    local: &BTreeMap<String, LocalEntry>,
    remote: &BTreeMap<String, Node>,
    options: &SyncOptions,
) -> Result<SyncPlan> {
    let mut plan = SyncPlan::default();

    let mut keys: Vec<&String> = local.keys().chain(remote.keys()).collect();
    keys.sort();
    keys.dedup();

    for rel in keys {
        match (local.get(rel), remote.get(rel)) {
            (Some(l), None) => {
                let action = match options.mode {
                    SyncMode::Both | SyncMode::Local => ActionKind::CreateRemote,
                    // Local absence wins only when deletions are followed;
                    // otherwise the local stray is left alone.
                    SyncMode::Remote if options.follow_delete => ActionKind::DeleteLocal,
                    SyncMode::Remote => ActionKind::Skip,
                };
                plan.push(rel.clone(), l.kind, action);
            }
            (None, Some(r)) => {
                let action = match options.mode {
                    SyncMode::Both | SyncMode::Remote => ActionKind::CreateLocal,
                    SyncMode::Local if options.follow_delete => ActionKind::DeleteRemote,
                    SyncMode::Local => ActionKind::Skip,
                };
                plan.push(rel.clone(), r.kind, action);
            }
            (Some(l), Some(r)) => {
                let action = classify_both(rel, l, r, options)?;
                plan.push(rel.clone(), l.kind, action);
            }
            (None, None) => unreachable!("key came from one of the maps"),
        }
    }

    Ok(plan)
}

fn classify_both(
    rel: &str,
    local: &LocalEntry,
    remote: &Node,
    options: &SyncOptions,
) -> Result<ActionKind> {
    if local.kind != remote.kind {
        // A file shadowing a folder (or vice versa) cannot be reconciled by
        // copying; leave both sides untouched.
        warn!(rel, local = %local.kind, remote = %remote.kind, "kind mismatch, skipping");
        return Ok(ActionKind::Skip);
    }
    if local.kind == NodeKind::Folder {
        return Ok(ActionKind::Skip);
    }

    // Second resolution is the finest granularity both sides can represent.
    let local_ts = local.modified_at.map(|t| t.timestamp());
    let remote_ts = remote.modified_at.map(|t| t.timestamp());

    // An equal fingerprint means identical content regardless of timestamps.
    if !options.ignore_content
        && let Some(remote_fp) = remote.content_fingerprint.as_deref()
    {
        let local_fp = file_fingerprint(&local.path)?;
        if local_fp == remote_fp {
            return Ok(ActionKind::Skip);
        }
        // Content differs; a timestamp tie still needs a winner.
        if local_ts == remote_ts {
            return Ok(match options.mode {
                SyncMode::Local => ActionKind::UpdateRemote,
                SyncMode::Remote => ActionKind::UpdateLocal,
                SyncMode::Both => {
                    debug!(rel, "content differs but timestamps tie, skipping");
                    ActionKind::Skip
                }
            });
        }
    } else if local_ts == remote_ts {
        return Ok(ActionKind::Skip);
    }

    Ok(match options.mode {
        SyncMode::Local => ActionKind::UpdateRemote,
        SyncMode::Remote => ActionKind::UpdateLocal,
        SyncMode::Both => {
            if local_ts > remote_ts {
                ActionKind::UpdateRemote
            } else {
                ActionKind::UpdateLocal
            }
        }
    })
}
