//! Drive Manager CLI
//!
//! The command-line interface for the remote drive: path-addressed file
//! operations and local/remote folder synchronization.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    // Missing/invalid commands exit with code 2 via clap's own error path.
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Login { base_url, token } => {
            commands::run_login(&cli.profile, base_url, token, cli.json)
        }
        Commands::Logout => commands::run_logout(&cli.profile, cli.json),
        Commands::Info => commands::run_info(&cli.profile, cli.json),
        Commands::Ls { path, long } => commands::run_ls(&cli.profile, path, *long, cli.json),
        Commands::Mb { path } => commands::run_mb(&cli.profile, path, cli.json),
        Commands::Put {
            local_path,
            remote_path,
            on_conflict,
        } => commands::run_put(
            &cli.profile,
            local_path,
            remote_path,
            (*on_conflict).into(),
            cli.json,
        ),
        Commands::Get {
            remote_path,
            local_path,
        } => commands::run_get(&cli.profile, remote_path, local_path, cli.json),
        Commands::Rm { path } => commands::run_rm(&cli.profile, path, cli.json),
        Commands::Cp {
            source,
            destination,
        } => commands::run_cp(&cli.profile, source, destination, cli.json),
        Commands::Mv {
            source,
            destination,
        } => commands::run_mv(&cli.profile, source, destination, cli.json),
        Commands::Sync {
            local_path,
            remote_path,
            mode,
            ignore_content,
            follow_delete,
            dry_run,
        } => commands::run_sync(
            &cli.profile,
            local_path,
            remote_path,
            drive_core::SyncOptions {
                mode: (*mode).into(),
                ignore_content: *ignore_content,
                follow_delete: *follow_delete,
                dry_run: *dry_run,
            },
            cli.json,
        ),
    }
}
