//! The node model shared by the local and remote tree
//!
//! A remote collaborator may return children either as fully typed nodes or
//! as loosely shaped key/value records. [`NodeRecord`] covers both so that
//! resolution behaves identically no matter which shape the store produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether an entry is a file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(format!("unknown node kind: {other}")),
        }
    }
}

/// One entry in a tree, local or remote.
///
/// `id` is opaque and unique within the remote store; local entries use the
/// canonical absolute path instead. `name` is the last path segment and never
/// contains a separator. Identity for diff purposes is the pair (parent
/// relative path, name) — two independent creations of "the same" folder
/// carry different ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_fingerprint: Option<String>,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Conflict policy for remote creation and upload calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail when an exact-name sibling already exists
    Refuse,
    /// Let the store suffix the name with `(N)` on collision
    AutoRename,
    /// Replace the existing entry
    Overwrite,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refuse => "refuse",
            Self::AutoRename => "auto_rename",
            Self::Overwrite => "overwrite",
        }
    }
}

/// A child-listing entry in either of the shapes a store may return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRecord {
    Typed(Node),
    Raw(serde_json::Map<String, Value>),
}

impl NodeRecord {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Typed(node) => Some(&node.id),
            Self::Raw(map) => map.get("id").and_then(Value::as_str),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Typed(node) => Some(&node.name),
            Self::Raw(map) => map.get("name").and_then(Value::as_str),
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            Self::Typed(node) => Some(node.kind),
            Self::Raw(map) => map
                .get("type")
                .or_else(|| map.get("kind"))
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Convert to a typed [`Node`], requiring at least `id`/`name`/`type`.
    ///
    /// Optional fields are picked up when present under their common key
    /// spellings (`modified_at`/`updated_at`, `content_fingerprint`/
    /// `content_hash`).
    pub fn to_node(&self) -> Option<Node> {
        match self {
            Self::Typed(node) => Some(node.clone()),
            Self::Raw(map) => {
                let id = map.get("id").and_then(Value::as_str)?;
                let name = map.get("name").and_then(Value::as_str)?;
                let kind = self.kind()?;
                let modified_at = map
                    .get("modified_at")
                    .or_else(|| map.get("updated_at"))
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok());
                let content_fingerprint = map
                    .get("content_fingerprint")
                    .or_else(|| map.get("content_hash"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(Node {
                    id: id.to_string(),
                    name: name.to_string(),
                    kind,
                    size: map.get("size").and_then(Value::as_u64),
                    modified_at,
                    content_fingerprint,
                })
            }
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self::Typed(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_record(json: Value) -> NodeRecord {
        match json {
            Value::Object(map) => NodeRecord::Raw(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn typed_and_raw_records_expose_the_same_accessors() {
        let node = Node {
            id: "n-1".into(),
            name: "notes".into(),
            kind: NodeKind::Folder,
            size: None,
            modified_at: None,
            content_fingerprint: None,
        };
        let typed = NodeRecord::from(node.clone());
        let raw = raw_record(serde_json::json!({
            "id": "n-1",
            "name": "notes",
            "type": "folder",
        }));

        assert_eq!(typed.id(), raw.id());
        assert_eq!(typed.name(), raw.name());
        assert_eq!(typed.kind(), raw.kind());
        assert_eq!(typed.to_node(), Some(node));
    }

    #[test]
    fn raw_record_picks_up_alternate_key_spellings() {
        let raw = raw_record(serde_json::json!({
            "id": "f-1",
            "name": "report.txt",
            "type": "file",
            "size": 42,
            "updated_at": "2024-05-01T10:00:00Z",
            "content_hash": "sha256:abc",
        }));

        let node = raw.to_node().unwrap();
        assert_eq!(node.size, Some(42));
        assert!(node.modified_at.is_some());
        assert_eq!(node.content_fingerprint.as_deref(), Some("sha256:abc"));
    }

    #[test]
    fn raw_record_without_id_yields_no_node() {
        let raw = raw_record(serde_json::json!({ "name": "orphan", "type": "file" }));
        assert!(raw.to_node().is_none());
    }

    #[test]
    fn node_json_uses_type_key() {
        let node = Node {
            id: "n-1".into(),
            name: "a".into(),
            kind: NodeKind::File,
            size: Some(1),
            modified_at: None,
            content_fingerprint: None,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
    }
}
