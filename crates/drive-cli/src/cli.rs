//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use drive_client::ConflictPolicy;
use drive_core::SyncMode;

/// Drive Manager - path-addressed remote file operations and folder sync
#[derive(Parser, Debug)]
#[command(name = "drive")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config profile name
    #[arg(long, global = true, default_value = "default")]
    pub profile: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Store credentials for a profile and verify the session
    Login {
        /// Remote store base URL
        #[arg(long, env = "DRIVE_BASE_URL")]
        base_url: String,

        /// Access token for the remote store
        #[arg(long, env = "DRIVE_TOKEN")]
        token: String,
    },

    /// Remove the stored profile
    Logout,

    /// Show profile and remote root information
    Info,

    /// List remote files
    Ls {
        /// Remote path, e.g. /Movies
        #[arg(default_value = "/")]
        path: String,

        /// Long listing
        #[arg(short, long)]
        long: bool,
    },

    /// Make a remote folder path (every missing segment)
    Mb {
        /// Remote folder path
        path: String,
    },

    /// Upload a local file or folder
    Put {
        /// Local path to upload
        local_path: String,

        /// Remote folder path
        #[arg(default_value = "/")]
        remote_path: String,

        /// Name conflict strategy for file uploads
        #[arg(long, value_enum, default_value_t = ConflictArg::AutoRename)]
        on_conflict: ConflictArg,
    },

    /// Download a remote file or folder
    Get {
        /// Remote path to download
        remote_path: String,

        /// Local destination folder
        #[arg(default_value = ".")]
        local_path: String,
    },

    /// Move a remote file or folder to trash
    Rm {
        /// Remote path
        path: String,
    },

    /// Copy a remote file or folder
    Cp {
        /// Source remote path
        source: String,

        /// Destination remote path or folder (trailing / means "into")
        destination: String,
    },

    /// Move a remote file or folder
    Mv {
        /// Source remote path
        source: String,

        /// Destination remote path or folder (trailing / means "into")
        destination: String,
    },

    /// Sync a local folder with a remote folder
    Sync {
        /// Local folder path
        local_path: String,

        /// Remote folder path
        remote_path: String,

        /// Which side wins on a difference
        #[arg(long, value_enum, default_value_t = ModeArg::Both)]
        mode: ModeArg,

        /// Decide staleness by timestamp alone, never hashing content
        #[arg(long)]
        ignore_content: bool,

        /// Propagate deletions to the losing side
        #[arg(long)]
        follow_delete: bool,

        /// Preview the plan without applying it
        #[arg(long)]
        dry_run: bool,
    },
}

/// `--mode` values for sync
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Both,
    Local,
    Remote,
}

impl From<ModeArg> for SyncMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Both => SyncMode::Both,
            ModeArg::Local => SyncMode::Local,
            ModeArg::Remote => SyncMode::Remote,
        }
    }
}

/// `--on-conflict` values for put
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictArg {
    Refuse,
    AutoRename,
    Overwrite,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Refuse => ConflictPolicy::Refuse,
            ConflictArg::AutoRename => ConflictPolicy::AutoRename,
            ConflictArg::Overwrite => ConflictPolicy::Overwrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_flags_parse() {
        let cli = Cli::try_parse_from([
            "drive",
            "sync",
            "./local",
            "/backup",
            "--mode",
            "local",
            "--ignore-content",
            "--follow-delete",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync {
                mode,
                ignore_content,
                follow_delete,
                dry_run,
                ..
            } => {
                assert_eq!(mode, ModeArg::Local);
                assert!(ignore_content);
                assert!(follow_delete);
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_command_is_a_parse_error() {
        assert!(Cli::try_parse_from(["drive"]).is_err());
    }
}
