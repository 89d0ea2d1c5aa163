//! Sync command implementation

use std::path::Path;

use colored::Colorize;

use drive_client::RemotePath;
use drive_core::{SyncEngine, SyncOptions, materialize_folder};

use crate::commands::print_json;
use crate::context;
use crate::error::{CliError, Result};

/// Run the sync command.
///
/// The remote root is materialized first, so syncing into a fresh remote
/// path starts from an empty folder instead of failing. Plan-application
/// failures are reported after the whole plan has been attempted; any
/// failure makes the command exit non-zero.
pub fn run_sync(
    profile: &str,
    local_path: &str,
    remote_path: &str,
    options: SyncOptions,
    json: bool,
) -> Result<()> {
    let local = Path::new(local_path);
    if !local.is_dir() {
        return Err(CliError::user(format!(
            "local path is not a folder: {local_path}"
        )));
    }

    let client = context::connect(profile)?;
    let remote_root = materialize_folder(&client, &RemotePath::parse(remote_path)?)?;

    let report = SyncEngine::new(&client, local, remote_root).sync(&options)?;

    if json {
        print_json(&report)?;
        report.into_result().map_err(CliError::from)?;
        return Ok(());
    }

    for action in &report.actions {
        println!("   {action}");
    }
    if report.success() {
        println!("{} sync done", "OK".green().bold());
        Ok(())
    } else {
        println!(
            "{} {} action(s) failed:",
            "FAILED".red().bold(),
            report.failed.len()
        );
        for failure in &report.failed {
            println!(
                "   {} {} ({}): {}",
                "!".red(),
                failure.rel_path.cyan(),
                failure.action,
                failure.cause
            );
        }
        report.into_result().map_err(CliError::from)?;
        Ok(())
    }
}
