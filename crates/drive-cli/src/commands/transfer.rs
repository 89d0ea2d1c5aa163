//! Upload and download command implementations
//!
//! Folder transfers reuse the sync engine with a directional mode: `put` of
//! a directory is a local-wins sync into a materialized remote folder, `get`
//! of a folder is a remote-wins sync into a fresh local directory.

use std::path::Path;

use colored::Colorize;

use drive_client::{ConflictPolicy, RemoteClient, RemotePath};
use drive_core::{SyncEngine, SyncMode, SyncOptions, materialize_folder, resolve_any};

use crate::commands::print_json;
use crate::context;
use crate::error::{CliError, Result};

/// Run the put command: upload a local file or folder.
pub fn run_put(
    profile: &str,
    local_path: &str,
    remote_path: &str,
    policy: ConflictPolicy,
    json: bool,
) -> Result<()> {
    let client = context::connect(profile)?;
    let local = Path::new(local_path);
    if !local.exists() {
        return Err(CliError::user(format!("local path not found: {local_path}")));
    }
    let remote = RemotePath::parse(remote_path)?;

    if local.is_dir() {
        let name = local
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| CliError::user(format!("cannot derive a folder name from {local_path}")))?;
        let dest = materialize_folder(&client, &remote.join(&name))?;
        let options = SyncOptions {
            mode: SyncMode::Local,
            ..SyncOptions::default()
        };
        let report = SyncEngine::new(&client, local, dest).sync(&options)?;
        if json {
            print_json(&report)?;
        } else {
            println!(
                "{} uploaded {} entr{}",
                "OK".green().bold(),
                report.succeeded.len(),
                if report.succeeded.len() == 1 { "y" } else { "ies" }
            );
        }
        report.into_result().map_err(CliError::from)?;
    } else {
        let parent = materialize_folder(&client, &remote)?;
        let node = client.upload(local, &parent.id, policy)?;
        if json {
            print_json(&node)?;
        } else {
            println!("{} uploaded {}", "OK".green().bold(), node.name.cyan());
        }
    }
    Ok(())
}

/// Run the get command: download a remote file or folder.
pub fn run_get(profile: &str, remote_path: &str, local_path: &str, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let node = resolve_any(&client, &RemotePath::parse(remote_path)?)?;
    let local_dir = Path::new(local_path);
    std::fs::create_dir_all(local_dir)?;

    if node.is_folder() {
        let target = local_dir.join(&node.name);
        std::fs::create_dir_all(&target)?;
        let options = SyncOptions {
            mode: SyncMode::Remote,
            ..SyncOptions::default()
        };
        let report = SyncEngine::new(&client, target.as_path(), node).sync(&options)?;
        if json {
            print_json(&report)?;
        } else {
            println!("{}", target.display());
        }
        report.into_result().map_err(CliError::from)?;
    } else {
        let written = client.download(&node, local_dir)?;
        if json {
            print_json(&serde_json::json!({ "output": written }))?;
        } else {
            println!("{}", written.display());
        }
    }
    Ok(())
}
