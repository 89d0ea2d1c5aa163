//! Sync plan types

use serde::Serialize;

use drive_client::NodeKind;

/// Which side wins on a detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Mirror both ways; ties resolved newer-wins by timestamp
    #[default]
    Both,
    /// The local tree wins
    Local,
    /// The remote tree wins
    Remote,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "both" => Ok(Self::Both),
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown sync mode: {other}")),
        }
    }
}

/// Options for one sync invocation.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub mode: SyncMode,
    /// Decide staleness by timestamp alone; fingerprints are never computed.
    /// Trades false-negative staleness detection for speed on large trees.
    pub ignore_content: bool,
    /// Propagate an absence on the winning side as a deletion on the other.
    /// Only meaningful under the directional modes.
    pub follow_delete: bool,
    /// Render the plan without applying it.
    pub dry_run: bool,
}

/// One per-relative-path action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    CreateLocal,
    CreateRemote,
    UpdateLocal,
    UpdateRemote,
    DeleteLocal,
    DeleteRemote,
    Skip,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateLocal => "create-local",
            Self::CreateRemote => "create-remote",
            Self::UpdateLocal => "update-local",
            Self::UpdateRemote => "update-remote",
            Self::DeleteLocal => "delete-local",
            Self::DeleteRemote => "delete-remote",
            Self::Skip => "skip",
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteLocal | Self::DeleteRemote)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a [`SyncPlan`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    pub rel_path: String,
    pub kind: NodeKind,
    pub action: ActionKind,
}

/// The computed set of per-path actions needed to reconcile two trees.
///
/// Built and consumed entirely within one sync invocation; never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncPlan {
    pub entries: Vec<PlanEntry>,
}

impl SyncPlan {
    pub fn push(&mut self, rel_path: impl Into<String>, kind: NodeKind, action: ActionKind) {
        self.entries.push(PlanEntry {
            rel_path: rel_path.into(),
            kind,
            action,
        });
    }

    /// Entries that require work, in plan order.
    pub fn work(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.action != ActionKind::Skip)
    }

    /// Whether the trees are already reconciled.
    pub fn is_noop(&self) -> bool {
        self.work().next().is_none()
    }

    /// Look up the planned action for one relative path.
    pub fn action_for(&self, rel_path: &str) -> Option<ActionKind> {
        self.entries
            .iter()
            .find(|e| e.rel_path == rel_path)
            .map(|e| e.action)
    }
}
