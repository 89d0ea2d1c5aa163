//! End-to-end resolution and materialization flows
//!
//! These tests exercise the resolver and materializer together against the
//! in-memory store, the way a CLI command composes them.

use drive_client::{ConflictPolicy, RemoteClient, RemotePath, ROOT_ID};
use drive_core::{Error, materialize_folder, resolve_any, resolve_destination, resolve_folder};
use drive_test_utils::MemoryRemote;
use pretty_assertions::assert_eq;

fn path(s: &str) -> RemotePath {
    RemotePath::parse(s).unwrap()
}

#[test]
fn resolve_then_materialize_reuses_every_existing_level() {
    let remote = MemoryRemote::new();
    let backup = remote.add_folder(ROOT_ID, "backup");
    let vocab = remote.add_folder(&backup.id, "vocabulary");

    // Resolution and materialization agree on the same node.
    let resolved = resolve_folder(&remote, &path("/backup/vocabulary")).unwrap();
    let materialized = materialize_folder(&remote, &path("/backup/vocabulary")).unwrap();
    assert_eq!(resolved.id, vocab.id);
    assert_eq!(materialized.id, vocab.id);
    assert!(remote.creations().is_empty());
}

#[test]
fn materialize_creates_only_the_missing_suffix() {
    let remote = MemoryRemote::new();
    let backup = remote.add_folder(ROOT_ID, "backup");

    let deep = materialize_folder(&remote, &path("/backup/2024/may")).unwrap();

    assert_eq!(deep.name, "may");
    let creations = remote.creations();
    assert_eq!(creations.len(), 2);
    assert_eq!(creations[0].0, backup.id);
    assert_eq!(creations[0].1, "2024");
    assert!(creations.iter().all(|c| c.2 == ConflictPolicy::Refuse));
}

#[test]
fn auto_renamed_leftovers_block_materialization_midway() {
    let remote = MemoryRemote::new();
    let backup = remote.add_folder(ROOT_ID, "backup");
    remote.add_folder(&backup.id, "vocabulary(1)");

    let err = materialize_folder(&remote, &path("/backup/vocabulary/deep")).unwrap_err();

    match err {
        Error::Ambiguous { segment, candidates, .. } => {
            assert_eq!(segment, "vocabulary");
            assert_eq!(candidates, vec!["vocabulary(1)".to_string()]);
        }
        other => panic!("expected Ambiguous, got: {other}"),
    }
    // Nothing was created below the ambiguous level.
    assert!(remote.creations().is_empty());
}

#[test]
fn store_auto_rename_produces_what_the_resolver_rejects() {
    let remote = MemoryRemote::new();

    // Two auto-renaming creations of the same name: the store keeps both.
    remote
        .create_folder(ROOT_ID, "vocabulary", ConflictPolicy::AutoRename)
        .unwrap();
    remote
        .create_folder(ROOT_ID, "vocabulary", ConflictPolicy::AutoRename)
        .unwrap();
    remote.delete_node(
        &resolve_any(&remote, &path("/vocabulary")).unwrap().id,
    )
    .unwrap();

    // Only `vocabulary(1)` survives; exact resolution must now refuse.
    let err = resolve_any(&remote, &path("/vocabulary")).unwrap_err();
    assert!(matches!(err, Error::Ambiguous { .. }), "got: {err}");
}

#[test]
fn destination_rules_cover_copy_and_move() {
    let remote = MemoryRemote::new();
    let docs = remote.add_folder(ROOT_ID, "docs");
    let file = remote.add_file(ROOT_ID, "a.txt", b"hello", None);

    // Into an existing folder, keeping the name.
    let into = resolve_destination(&remote, &path("/docs"), false).unwrap();
    let copied = remote
        .copy_node(&file.id, Some(&into.parent_id), into.new_name.as_deref())
        .unwrap();
    assert_eq!(copied.name, "a.txt");
    assert_eq!(remote.child_names(&docs.id), vec!["a.txt"]);

    // To a fresh name under a materialized parent.
    let renamed = resolve_destination(&remote, &path("/archive/b.txt"), false).unwrap();
    assert_eq!(renamed.new_name.as_deref(), Some("b.txt"));
    let moved = remote
        .move_node(&file.id, Some(&renamed.parent_id), renamed.new_name.as_deref())
        .unwrap();
    assert_eq!(moved.name, "b.txt");
    let archive = resolve_folder(&remote, &path("/archive")).unwrap();
    assert_eq!(remote.child_names(&archive.id), vec!["b.txt"]);
}
