//! Shared test fixtures for the drive-manager workspace.
//!
//! This crate provides standardised test doubles to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`remote`] — [`MemoryRemote`], an in-memory store with the real
//!   conflict-policy and auto-rename semantics
//! - [`tree`] — [`LocalTree`], a temp-directory tree builder

pub mod remote;
pub mod tree;

pub use remote::MemoryRemote;
pub use tree::LocalTree;
