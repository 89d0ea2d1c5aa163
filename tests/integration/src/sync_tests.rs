//! End-to-end sync flows over the in-memory store and a temp directory

use chrono::{Duration, Utc};
use drive_client::{RemoteClient, ROOT_ID};
use drive_core::{ActionKind, SyncEngine, SyncMode, SyncOptions};
use drive_test_utils::{LocalTree, MemoryRemote};
use pretty_assertions::assert_eq;

fn engine<'a>(remote: &'a MemoryRemote, tree: &LocalTree) -> SyncEngine<'a> {
    let root = remote.get_node(ROOT_ID).unwrap();
    SyncEngine::new(remote, tree.path(), root)
}

#[test]
fn mirror_sync_converges_in_one_run() {
    let remote = MemoryRemote::new();
    let docs = remote.add_folder(ROOT_ID, "docs");
    remote.add_file(&docs.id, "remote-only.txt", b"from remote", None);
    let tree = LocalTree::new().file("local-only.txt", "from local");

    let report = engine(&remote, &tree).sync(&SyncOptions::default()).unwrap();
    assert!(report.success(), "failed: {:?}", report.failed);

    // Both sides now hold both entries.
    assert!(tree.join("docs/remote-only.txt").is_file());
    let mut root_names = remote.child_names(ROOT_ID);
    root_names.sort();
    assert_eq!(root_names, vec!["docs", "local-only.txt"]);

    // A second run has nothing left to do.
    let plan = engine(&remote, &tree).plan(&SyncOptions::default()).unwrap();
    assert!(plan.is_noop(), "residual plan: {plan:?}");
}

#[test]
fn newer_remote_version_overwrites_local_under_both() {
    let remote = MemoryRemote::new();
    let tree = LocalTree::new().file("a.txt", "stale local");
    remote.add_file(
        ROOT_ID,
        "a.txt",
        b"fresh remote",
        Some(Utc::now() + Duration::hours(1)),
    );

    let report = engine(&remote, &tree).sync(&SyncOptions::default()).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    assert_eq!(
        std::fs::read_to_string(tree.join("a.txt")).unwrap(),
        "fresh remote"
    );
}

#[test]
fn newer_local_version_overwrites_remote_under_both() {
    let remote = MemoryRemote::new();
    let tree = LocalTree::new().file("a.txt", "fresh local");
    let old = remote.add_file(
        ROOT_ID,
        "a.txt",
        b"stale remote",
        Some(Utc::now() - Duration::hours(1)),
    );

    let report = engine(&remote, &tree).sync(&SyncOptions::default()).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    assert_eq!(
        remote.file_content(&old.id).unwrap(),
        b"fresh local".to_vec()
    );
}

#[test]
fn local_wins_mode_never_touches_local_files() {
    let remote = MemoryRemote::new();
    remote.add_file(
        ROOT_ID,
        "a.txt",
        b"remote version",
        Some(Utc::now() + Duration::hours(1)),
    );
    let tree = LocalTree::new().file("a.txt", "local version");

    let options = SyncOptions {
        mode: SyncMode::Local,
        ..SyncOptions::default()
    };
    let report = engine(&remote, &tree).sync(&options).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    // The remote copy was overwritten even though it was newer.
    assert_eq!(
        std::fs::read_to_string(tree.join("a.txt")).unwrap(),
        "local version"
    );
}

#[test]
fn remote_only_addition_survives_local_wins_without_follow_delete() {
    let remote = MemoryRemote::new();
    remote.add_file(ROOT_ID, "remote-addition.txt", b"keep me", None);
    let tree = LocalTree::new();

    let options = SyncOptions {
        mode: SyncMode::Local,
        ..SyncOptions::default()
    };
    let report = engine(&remote, &tree).sync(&options).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    assert_eq!(remote.child_names(ROOT_ID), vec!["remote-addition.txt"]);
}

#[test]
fn follow_delete_empties_the_losing_side() {
    let remote = MemoryRemote::new();
    let stale = remote.add_folder(ROOT_ID, "stale");
    remote.add_file(&stale.id, "gone.txt", b"x", None);
    let tree = LocalTree::new().file("kept.txt", "k");

    let options = SyncOptions {
        mode: SyncMode::Local,
        follow_delete: true,
        ..SyncOptions::default()
    };
    let report = engine(&remote, &tree).sync(&options).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    assert_eq!(remote.child_names(ROOT_ID), vec!["kept.txt"]);
}

#[test]
fn dry_run_only_renders_the_plan() {
    let remote = MemoryRemote::new();
    remote.add_file(ROOT_ID, "remote.txt", b"r", None);
    let tree = LocalTree::new().file("local.txt", "l");

    let options = SyncOptions {
        dry_run: true,
        ..SyncOptions::default()
    };
    let report = engine(&remote, &tree).sync(&options).unwrap();

    assert_eq!(report.actions.len(), 2);
    assert!(report.actions.iter().all(|a| a.starts_with("[dry-run]")));
    assert!(!tree.join("remote.txt").exists());
    assert_eq!(remote.child_names(ROOT_ID), vec!["remote.txt"]);
}

#[test]
fn plan_classifies_nested_trees_per_side() {
    let remote = MemoryRemote::new();
    let shared = remote.add_folder(ROOT_ID, "shared");
    remote.add_file(&shared.id, "r.txt", b"r", None);
    let tree = LocalTree::new().file("shared/l.txt", "l");

    let plan = engine(&remote, &tree).plan(&SyncOptions::default()).unwrap();

    assert_eq!(plan.action_for("shared"), Some(ActionKind::Skip));
    assert_eq!(plan.action_for("shared/l.txt"), Some(ActionKind::CreateRemote));
    assert_eq!(plan.action_for("shared/r.txt"), Some(ActionKind::CreateLocal));
}

#[test]
fn raw_record_store_syncs_identically() {
    let remote = MemoryRemote::new().with_raw_records();
    let docs = remote.add_folder(ROOT_ID, "docs");
    remote.add_file(&docs.id, "a.txt", b"raw shaped", None);
    let tree = LocalTree::new();

    let report = engine(&remote, &tree).sync(&SyncOptions::default()).unwrap();

    assert!(report.success(), "failed: {:?}", report.failed);
    assert_eq!(
        std::fs::read_to_string(tree.join("docs/a.txt")).unwrap(),
        "raw shaped"
    );
}
