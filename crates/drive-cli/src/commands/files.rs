//! Path-addressed remote file command implementations
//!
//! ls, mb, rm, cp, and mv all anchor on the Path Resolver; cp and mv also
//! use the destination rule (trailing `/` means "into that folder").

use colored::Colorize;

use drive_client::{Node, RemoteClient, RemotePath};
use drive_core::{materialize_folder, resolve_any, resolve_destination};

use crate::commands::print_json;
use crate::context;
use crate::error::Result;

/// Run the ls command.
pub fn run_ls(profile: &str, path: &str, long: bool, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let target = resolve_any(&client, &RemotePath::parse(path)?)?;

    let items: Vec<Node> = if target.is_folder() {
        client
            .list_children(&target.id, None)?
            .iter()
            .filter_map(|record| record.to_node())
            .collect()
    } else {
        vec![target]
    };

    if json {
        return print_json(&items);
    }
    for item in &items {
        if long {
            let modified = item
                .modified_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:6} {:>12} {:24} {}",
                item.kind,
                item.size.unwrap_or(0),
                modified,
                item.name
            );
        } else {
            println!("{}", item.name);
        }
    }
    Ok(())
}

/// Run the mb command: materialize every missing folder segment.
pub fn run_mb(profile: &str, path: &str, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let folder = materialize_folder(&client, &RemotePath::parse(path)?)?;

    if json {
        print_json(&folder)?;
    } else {
        println!("{}", folder.id);
    }
    Ok(())
}

/// Run the rm command: move a node to trash.
pub fn run_rm(profile: &str, path: &str, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let target = resolve_any(&client, &RemotePath::parse(path)?)?;
    client.delete_node(&target.id)?;

    if json {
        print_json(&serde_json::json!({ "ok": true, "id": target.id, "name": target.name }))?;
    } else {
        println!("moved to trash: {}", target.name.cyan());
    }
    Ok(())
}

/// Run the cp command.
pub fn run_cp(profile: &str, source: &str, destination: &str, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let src = resolve_any(&client, &RemotePath::parse(source)?)?;
    let dest = resolve_destination(
        &client,
        &RemotePath::parse(destination)?,
        destination.ends_with('/'),
    )?;

    let result = client.copy_node(&src.id, Some(&dest.parent_id), dest.new_name.as_deref())?;
    if json {
        print_json(&result)?;
    } else {
        println!("{}", result.id);
    }
    Ok(())
}

/// Run the mv command.
pub fn run_mv(profile: &str, source: &str, destination: &str, json: bool) -> Result<()> {
    let client = context::connect(profile)?;
    let src = resolve_any(&client, &RemotePath::parse(source)?)?;
    let dest = resolve_destination(
        &client,
        &RemotePath::parse(destination)?,
        destination.ends_with('/'),
    )?;

    let result = client.move_node(&src.id, Some(&dest.parent_id), dest.new_name.as_deref())?;
    if json {
        print_json(&result)?;
    } else {
        println!("{}", result.id);
    }
    Ok(())
}
