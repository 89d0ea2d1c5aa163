//! Login, logout, and info command implementations
//!
//! Token acquisition itself (QR codes, refresh flows) is the remote
//! service's business; `login` stores a ready token and verifies it with one
//! root lookup.

use colored::Colorize;
use serde_json::json;

use drive_client::{HttpRemote, ROOT_ID, RemoteClient};

use crate::commands::print_json;
use crate::context::{self, Profile};
use crate::error::Result;

/// Run the login command: verify credentials, then persist them.
pub fn run_login(profile: &str, base_url: &str, token: &str, json: bool) -> Result<()> {
    let client = HttpRemote::new(base_url, token);
    client.get_node(ROOT_ID)?;

    let path = context::save_profile(
        profile,
        &Profile {
            base_url: base_url.to_string(),
            access_token: token.to_string(),
        },
    )?;

    if json {
        print_json(&json!({ "ok": true, "profile": profile, "path": path }))?;
    } else {
        println!("{} login ok: {}", "OK".green().bold(), profile);
    }
    Ok(())
}

/// Run the logout command: remove the stored profile.
pub fn run_logout(profile: &str, json: bool) -> Result<()> {
    let removed = context::delete_profile(profile)?;
    if json {
        let message = if removed { "logged out" } else { "already logged out" };
        print_json(&json!({ "ok": true, "profile": profile, "message": message }))?;
    } else if removed {
        println!("logout ok: {profile}");
    } else {
        println!("already logged out: {profile}");
    }
    Ok(())
}

/// Run the info command: show the profile and the remote root.
pub fn run_info(profile: &str, json: bool) -> Result<()> {
    let stored = context::load_profile(profile)?;
    let client = context::connect(profile)?;
    let root = client.get_node(ROOT_ID)?;

    if json {
        print_json(&json!({
            "profile": profile,
            "base_url": stored.base_url,
            "root": root,
        }))?;
    } else {
        println!("profile: {profile}");
        println!("base_url: {}", stored.base_url);
        println!("root id: {}", root.id);
    }
    Ok(())
}
