//! In-memory remote store double
//!
//! [`MemoryRemote`] implements [`RemoteClient`] with the semantics the core
//! is written against: exact-name conflict policies, `name(N)` auto-rename,
//! and trash-style deletion. Interior mutability keeps the trait's `&self`
//! signatures; everything is single-threaded, like the real client.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value, json};

use drive_client::{
    ConflictPolicy, Error, Node, NodeKind, NodeRecord, ROOT_ID, RemoteClient, Result,
    content_fingerprint,
};

#[derive(Default)]
struct State {
    nodes: HashMap<String, Node>,
    children: HashMap<String, Vec<String>>,
    contents: HashMap<String, Vec<u8>>,
    seq: u64,
    created: Vec<(String, String, ConflictPolicy)>,
}

/// An in-memory hierarchical store.
pub struct MemoryRemote {
    state: RefCell<State>,
    raw_records: bool,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert(
            ROOT_ID.to_string(),
            Node {
                id: ROOT_ID.to_string(),
                name: ROOT_ID.to_string(),
                kind: NodeKind::Folder,
                size: None,
                modified_at: None,
                content_fingerprint: None,
            },
        );
        state.children.insert(ROOT_ID.to_string(), Vec::new());
        Self {
            state: RefCell::new(state),
            raw_records: false,
        }
    }

    /// Return child listings as loosely-typed key/value records instead of
    /// typed nodes.
    pub fn with_raw_records(mut self) -> Self {
        self.raw_records = true;
        self
    }

    /// Seed a folder, asserting the name is not already taken.
    pub fn add_folder(&self, parent_id: &str, name: &str) -> Node {
        assert!(
            !self.has_exact_child(parent_id, name),
            "test setup: {name} already exists under {parent_id}"
        );
        self.force_add_folder(parent_id, name)
    }

    /// Seed a folder even when an exact-name sibling exists (for modelling
    /// remote data-integrity anomalies).
    pub fn force_add_folder(&self, parent_id: &str, name: &str) -> Node {
        let mut state = self.state.borrow_mut();
        let id = next_id(&mut state);
        let node = Node {
            id: id.clone(),
            name: name.to_string(),
            kind: NodeKind::Folder,
            size: None,
            modified_at: Some(truncate_secs(Utc::now())),
            content_fingerprint: None,
        };
        attach(&mut state, parent_id, node.clone());
        state.contents.remove(&id);
        node
    }

    /// Seed a file with content; `modified_at` defaults to now.
    pub fn add_file(
        &self,
        parent_id: &str,
        name: &str,
        content: &[u8],
        modified_at: Option<DateTime<Utc>>,
    ) -> Node {
        let mut state = self.state.borrow_mut();
        let id = next_id(&mut state);
        let node = Node {
            id: id.clone(),
            name: name.to_string(),
            kind: NodeKind::File,
            size: Some(content.len() as u64),
            modified_at: Some(truncate_secs(modified_at.unwrap_or_else(Utc::now))),
            content_fingerprint: Some(content_fingerprint(content)),
        };
        attach(&mut state, parent_id, node.clone());
        state.contents.insert(id, content.to_vec());
        node
    }

    /// Every successful folder creation made through the client trait, as
    /// (parent id, name, policy), in order.
    pub fn creations(&self) -> Vec<(String, String, ConflictPolicy)> {
        self.state.borrow().created.clone()
    }

    /// Names of a folder's children, in insertion order.
    pub fn child_names(&self, parent_id: &str) -> Vec<String> {
        let state = self.state.borrow();
        state
            .children
            .get(parent_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.nodes.get(id).map(|n| n.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stored content of a file node.
    pub fn file_content(&self, id: &str) -> Option<Vec<u8>> {
        self.state.borrow().contents.get(id).cloned()
    }

    fn has_exact_child(&self, parent_id: &str, name: &str) -> bool {
        self.child_names(parent_id).iter().any(|n| n == name)
    }

    /// Smallest free `name(N)` under a parent.
    fn auto_renamed(&self, parent_id: &str, name: &str) -> String {
        let names = self.child_names(parent_id);
        let mut n = 1;
        loop {
            let candidate = format!("{name}({n})");
            if !names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn next_id(state: &mut State) -> String {
    state.seq += 1;
    format!("id-{}", state.seq)
}

fn attach(state: &mut State, parent_id: &str, node: Node) {
    state
        .children
        .entry(parent_id.to_string())
        .or_default()
        .push(node.id.clone());
    if node.is_folder() {
        state.children.entry(node.id.clone()).or_default();
    }
    state.nodes.insert(node.id.clone(), node);
}

fn detach(state: &mut State, id: &str) {
    for ids in state.children.values_mut() {
        ids.retain(|child| child != id);
    }
}

fn remove_recursive(state: &mut State, id: &str) {
    let child_ids = state.children.remove(id).unwrap_or_default();
    for child in child_ids {
        remove_recursive(state, &child);
    }
    detach(state, id);
    state.nodes.remove(id);
    state.contents.remove(id);
}

fn truncate_secs(dt: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(dt.timestamp(), 0)
        .single()
        .unwrap_or(dt)
}

/// Render a node as the loosely-typed record shape some stores return,
/// using the alternate key spellings (`updated_at`, `content_hash`).
fn raw_record(node: &Node) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("id".into(), json!(node.id));
    map.insert("name".into(), json!(node.name));
    map.insert("type".into(), json!(node.kind.as_str()));
    if let Some(size) = node.size {
        map.insert("size".into(), json!(size));
    }
    if let Some(ts) = node.modified_at {
        map.insert("updated_at".into(), json!(ts.to_rfc3339()));
    }
    if let Some(fp) = &node.content_fingerprint {
        map.insert("content_hash".into(), json!(fp));
    }
    map
}

impl RemoteClient for MemoryRemote {
    fn get_node(&self, id: &str) -> Result<Node> {
        self.state
            .borrow()
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NodeNotFound { id: id.to_string() })
    }

    fn list_children(&self, parent_id: &str, kind: Option<NodeKind>) -> Result<Vec<NodeRecord>> {
        let state = self.state.borrow();
        let parent = state
            .nodes
            .get(parent_id)
            .ok_or_else(|| Error::NodeNotFound {
                id: parent_id.to_string(),
            })?;
        if !parent.is_folder() {
            return Err(Error::transport(format!("{parent_id} is not a folder")));
        }
        let ids = state.children.get(parent_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .filter(|node| kind.is_none_or(|k| node.kind == k))
            .map(|node| {
                if self.raw_records {
                    NodeRecord::Raw(raw_record(node))
                } else {
                    NodeRecord::Typed(node.clone())
                }
            })
            .collect())
    }

    fn create_folder(&self, parent_id: &str, name: &str, policy: ConflictPolicy) -> Result<Node> {
        self.get_node(parent_id)?;
        let exists = self.has_exact_child(parent_id, name);
        let final_name = match (exists, policy) {
            (true, ConflictPolicy::Refuse) => {
                return Err(Error::NameConflict {
                    parent_id: parent_id.to_string(),
                    name: name.to_string(),
                });
            }
            (true, ConflictPolicy::Overwrite) => {
                let state = self.state.borrow();
                let existing = state
                    .children
                    .get(parent_id)
                    .into_iter()
                    .flatten()
                    .filter_map(|id| state.nodes.get(id))
                    .find(|n| n.name == name && n.is_folder())
                    .cloned();
                if let Some(node) = existing {
                    return Ok(node);
                }
                name.to_string()
            }
            (true, ConflictPolicy::AutoRename) => self.auto_renamed(parent_id, name),
            (false, _) => name.to_string(),
        };

        let node = self.force_add_folder(parent_id, &final_name);
        self.state.borrow_mut().created.push((
            parent_id.to_string(),
            name.to_string(),
            policy,
        ));
        Ok(node)
    }

    fn move_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node> {
        let node = self.get_node(id)?;
        let parent_id = new_parent_id.unwrap_or(ROOT_ID).to_string();
        let name = new_name.unwrap_or(&node.name).to_string();
        self.get_node(&parent_id)?;
        if self.has_exact_child(&parent_id, &name) {
            return Err(Error::NameConflict { parent_id, name });
        }

        let mut state = self.state.borrow_mut();
        detach(&mut state, id);
        state
            .children
            .entry(parent_id)
            .or_default()
            .push(id.to_string());
        let node = state
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::NodeNotFound { id: id.to_string() })?;
        node.name = name;
        Ok(node.clone())
    }

    fn copy_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node> {
        let source = self.get_node(id)?;
        let parent_id = new_parent_id.unwrap_or(ROOT_ID).to_string();
        let name = new_name.unwrap_or(&source.name).to_string();
        self.get_node(&parent_id)?;
        if self.has_exact_child(&parent_id, &name) {
            return Err(Error::NameConflict { parent_id, name });
        }

        if source.is_folder() {
            let copy = self.force_add_folder(&parent_id, &name);
            let child_ids = self
                .state
                .borrow()
                .children
                .get(id)
                .cloned()
                .unwrap_or_default();
            for child in child_ids {
                self.copy_node(&child, Some(&copy.id), None)?;
            }
            Ok(copy)
        } else {
            let content = self.file_content(id).unwrap_or_default();
            Ok(self.add_file(&parent_id, &name, &content, source.modified_at))
        }
    }

    fn delete_node(&self, id: &str) -> Result<()> {
        self.get_node(id)?;
        let mut state = self.state.borrow_mut();
        remove_recursive(&mut state, id);
        Ok(())
    }

    fn upload(&self, local_file: &Path, parent_id: &str, policy: ConflictPolicy) -> Result<Node> {
        self.get_node(parent_id)?;
        let name = local_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::io(
                    local_file,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
                )
            })?;
        let content = std::fs::read(local_file).map_err(|e| Error::io(local_file, e))?;
        let modified_at = std::fs::metadata(local_file)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        if self.has_exact_child(parent_id, &name) {
            match policy {
                ConflictPolicy::Refuse => {
                    return Err(Error::NameConflict {
                        parent_id: parent_id.to_string(),
                        name,
                    });
                }
                ConflictPolicy::Overwrite => {
                    let mut state = self.state.borrow_mut();
                    let existing_id = state
                        .children
                        .get(parent_id)
                        .into_iter()
                        .flatten()
                        .find(|id| {
                            state
                                .nodes
                                .get(*id)
                                .is_some_and(|n| n.name == name && !n.is_folder())
                        })
                        .cloned();
                    if let Some(id) = existing_id {
                        state.contents.insert(id.clone(), content.clone());
                        let node = state
                            .nodes
                            .get_mut(&id)
                            .ok_or_else(|| Error::NodeNotFound { id: id.clone() })?;
                        node.size = Some(content.len() as u64);
                        node.content_fingerprint = Some(content_fingerprint(&content));
                        node.modified_at = modified_at.map(truncate_secs);
                        return Ok(node.clone());
                    }
                    // Exact name exists but is a folder; fall through to a
                    // plain create, which the store reports as a conflict.
                    return Err(Error::NameConflict {
                        parent_id: parent_id.to_string(),
                        name,
                    });
                }
                ConflictPolicy::AutoRename => {
                    let renamed = self.auto_renamed(parent_id, &name);
                    return Ok(self.add_file(parent_id, &renamed, &content, modified_at));
                }
            }
        }
        Ok(self.add_file(parent_id, &name, &content, modified_at))
    }

    fn download(&self, node: &Node, local_dir: &Path) -> Result<PathBuf> {
        let content = self
            .file_content(&node.id)
            .ok_or_else(|| Error::NodeNotFound {
                id: node.id.clone(),
            })?;
        let target = local_dir.join(&node.name);
        std::fs::write(&target, &content).map_err(|e| Error::io(&target, e))?;
        Ok(target)
    }
}
