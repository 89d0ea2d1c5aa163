//! Path resolution and tree reconciliation core for Drive Manager
//!
//! This crate turns filepath-style addresses into unique remote nodes and
//! reconciles a local directory tree with a remote one:
//!
//! - **Path Resolver**: exact, refuse-over-guess segment resolution that
//!   detects auto-renamed `name(N)` siblings
//! - **Folder Materializer**: idempotent, strictly top-down creation of
//!   missing remote folders
//! - **Tree Differ**: merged traversal of both trees producing a [`SyncPlan`]
//! - **Sync Reconciler**: plan application with partial-failure reporting
//!
//! # Architecture
//!
//! `drive-core` sits between the client crate and the CLI:
//!
//! ```text
//!        CLI
//!         |
//!     drive-core
//!         |
//!    drive-client
//! ```
//!
//! The core never performs network calls itself; every remote operation goes
//! through the [`drive_client::RemoteClient`] collaborator.

pub mod error;
pub mod materialize;
pub mod resolve;
pub mod sync;
pub mod walk;

pub use error::{Error, Result};
pub use materialize::{Destination, materialize_folder, resolve_destination};
pub use resolve::{resolve_any, resolve_file, resolve_folder, resolve_node};
pub use sync::{
    ActionKind, FailedAction, PlanEntry, SyncEngine, SyncMode, SyncOptions, SyncPlan, SyncReport,
    apply_plan, build_plan,
};
pub use walk::{LocalEntry, walk_local, walk_remote};
