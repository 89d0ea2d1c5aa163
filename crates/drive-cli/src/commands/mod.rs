//! Command implementations for drive-cli

pub mod auth;
pub mod files;
pub mod sync;
pub mod transfer;

pub use auth::{run_info, run_login, run_logout};
pub use files::{run_cp, run_ls, run_mb, run_mv, run_rm};
pub use sync::run_sync;
pub use transfer::{run_get, run_put};

use crate::error::Result;

/// Print a value as pretty JSON for `--json` output.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
