//! webtogit: archive web documents into local git repositories.
//!
//! # Usage
//!
//! ```text
//! webtogit [sync] [REPO] [--manifest PATH] [--continue-on-error]
//! webtogit print-config
//! webtogit bootstrap [--config-only]
//! webtogit repo create|destroy|list
//! ```
//!
//! Global flags: `--configfile-path` (`WEBTOGIT_CONFIGFILE_PATH`),
//! `--datadir-path` (`WEBTOGIT_DATADIR_PATH`), `-v/--verbose`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    bootstrap::BootstrapArgs, print_config::PrintConfigArgs, repo::RepoCommand, sync::SyncArgs,
    GlobalArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "webtogit",
    version,
    about = "Archive web documents as files in local git repositories",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Defaults to `sync` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every source and commit the changes, for one or all repositories.
    Sync(SyncArgs),

    /// Print the resolved configuration and the managed repositories.
    PrintConfig(PrintConfigArgs),

    /// Create the settings file, the data directory and the default repository.
    Bootstrap(BootstrapArgs),

    /// Create, destroy or list archive repositories.
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => args.run(&cli.global),
        Commands::PrintConfig(args) => args.run(&cli.global),
        Commands::Bootstrap(args) => args.run(&cli.global),
        Commands::Repo { command } => commands::repo::run(command, &cli.global),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
