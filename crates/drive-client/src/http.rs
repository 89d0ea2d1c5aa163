//! HTTP-backed implementation of [`RemoteClient`]
//!
//! A thin, blocking JSON client. Session/token lifecycle and retry/backoff
//! policy live outside this crate; the client is handed a ready bearer token
//! and reports transport failures as-is.

use std::fs::File;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::RemoteClient;
use crate::node::{ConflictPolicy, Node, NodeKind, NodeRecord};
use crate::{Error, Result};

/// Blocking HTTP client for a remote hierarchical store.
pub struct HttpRemote {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListChildren {
    items: Vec<NodeRecord>,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map a non-success status to the error taxonomy.
    ///
    /// `conflict` carries the (parent_id, name) pair a 409 refers to; calls
    /// that cannot conflict pass `None` and surface 409 as transport noise.
    fn check(
        &self,
        resp: Response,
        id: &str,
        conflict: Option<(&str, &str)>,
    ) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match (status, conflict) {
            (StatusCode::NOT_FOUND, _) => Err(Error::NodeNotFound { id: id.to_string() }),
            (StatusCode::CONFLICT, Some((parent_id, name))) => Err(Error::NameConflict {
                parent_id: parent_id.to_string(),
                name: name.to_string(),
            }),
            _ => {
                let body = resp.text().unwrap_or_default();
                Err(Error::transport(format!("{status}: {body}")))
            }
        }
    }
}

impl RemoteClient for HttpRemote {
    fn get_node(&self, id: &str) -> Result<Node> {
        let url = self.url(&format!("nodes/{id}"));
        debug!(%url, "get_node");
        let resp = self.http.get(&url).bearer_auth(&self.token).send()?;
        Ok(self.check(resp, id, None)?.json()?)
    }

    fn list_children(&self, parent_id: &str, kind: Option<NodeKind>) -> Result<Vec<NodeRecord>> {
        let url = self.url(&format!("nodes/{parent_id}/children"));
        debug!(%url, kind = ?kind, "list_children");
        let mut req = self.http.get(&url).bearer_auth(&self.token);
        if let Some(kind) = kind {
            req = req.query(&[("kind", kind.as_str())]);
        }
        let resp = req.send()?;
        let listing: ListChildren = self.check(resp, parent_id, None)?.json()?;
        Ok(listing.items)
    }

    fn create_folder(&self, parent_id: &str, name: &str, policy: ConflictPolicy) -> Result<Node> {
        let url = self.url(&format!("nodes/{parent_id}/folders"));
        debug!(%url, name, policy = policy.as_str(), "create_folder");
        let body = json!({ "name": name, "on_conflict": policy.as_str() });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        Ok(self
            .check(resp, parent_id, Some((parent_id, name)))?
            .json()?)
    }

    fn move_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node> {
        let url = self.url(&format!("nodes/{id}/move"));
        let body = json!({ "parent_id": new_parent_id, "name": new_name });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        let conflict = new_parent_id.zip(new_name);
        Ok(self.check(resp, id, conflict)?.json()?)
    }

    fn copy_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
        new_name: Option<&str>,
    ) -> Result<Node> {
        let url = self.url(&format!("nodes/{id}/copy"));
        let body = json!({ "parent_id": new_parent_id, "name": new_name });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        let conflict = new_parent_id.zip(new_name);
        Ok(self.check(resp, id, conflict)?.json()?)
    }

    fn delete_node(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("nodes/{id}/trash"));
        debug!(%url, "delete_node");
        let resp = self.http.post(&url).bearer_auth(&self.token).send()?;
        self.check(resp, id, None)?;
        Ok(())
    }

    fn upload(&self, local_file: &Path, parent_id: &str, policy: ConflictPolicy) -> Result<Node> {
        let name = local_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::io(
                local_file,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
            ))?;
        let file = File::open(local_file).map_err(|e| Error::io(local_file, e))?;

        let url = self.url(&format!("nodes/{parent_id}/files"));
        debug!(%url, name, "upload");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("name", name.as_str()), ("on_conflict", policy.as_str())])
            .body(file)
            .send()?;
        Ok(self
            .check(resp, parent_id, Some((parent_id, name.as_str())))?
            .json()?)
    }

    fn download(&self, node: &Node, local_dir: &Path) -> Result<PathBuf> {
        let url = self.url(&format!("nodes/{}/content", node.id));
        debug!(%url, "download");
        let resp = self.http.get(&url).bearer_auth(&self.token).send()?;
        let bytes = self.check(resp, &node.id, None)?.bytes()?;

        let target = local_dir.join(&node.name);
        std::fs::write(&target, &bytes).map_err(|e| Error::io(&target, e))?;
        Ok(target)
    }
}
