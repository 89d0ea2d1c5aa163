//! Profile storage and client construction
//!
//! A profile is a small TOML file holding the base URL and access token for
//! one remote store. Each command builds its own client from the profile;
//! no state is shared across invocations.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use drive_client::HttpRemote;

use crate::error::{CliError, Result};

/// Stored credentials for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub base_url: String,
    pub access_token: String,
}

/// Path of a profile file: `<config dir>/drive-manager/<name>.toml`.
pub fn profile_path(name: &str) -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| CliError::user("could not determine the user config directory"))?;
    Ok(dir.join("drive-manager").join(format!("{name}.toml")))
}

/// Load a stored profile.
///
/// A missing file means the profile has never logged in.
pub fn load_profile(name: &str) -> Result<Profile> {
    let path = profile_path(name)?;
    if !path.exists() {
        return Err(CliError::user(format!(
            "not logged in (profile '{name}'): run 'drive login' first"
        )));
    }
    let content = fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

/// Persist a profile, creating the config directory if needed.
pub fn save_profile(name: &str, profile: &Profile) -> Result<PathBuf> {
    let path = profile_path(name)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, toml::to_string_pretty(profile)?)?;
    Ok(path)
}

/// Remove a stored profile. Returns false when it was already absent.
pub fn delete_profile(name: &str) -> Result<bool> {
    let path = profile_path(name)?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    Ok(true)
}

/// Build a client from a stored profile.
pub fn connect(name: &str) -> Result<HttpRemote> {
    let profile = load_profile(name)?;
    Ok(HttpRemote::new(profile.base_url, profile.access_token))
}
