//! Remote store client abstraction for Drive Manager
//!
//! Provides the node model, normalized remote-path handling, content
//! fingerprints, and the [`RemoteClient`] trait through which every other
//! crate talks to the remote hierarchical store.

pub mod client;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod node;
pub mod path;

pub use client::{ROOT_ID, RemoteClient};
pub use error::{Error, Result};
pub use fingerprint::{content_fingerprint, file_fingerprint};
pub use http::HttpRemote;
pub use node::{ConflictPolicy, Node, NodeKind, NodeRecord};
pub use path::RemotePath;
