//! `webtogit repo create|destroy|list`

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use webtogit_core::{paths, RepoName};
use webtogit_sync::{
    create_repo, destroy_named, registry, CreateOutcome, DestroyOutcome, ScanEntry,
};

use super::GlobalArgs;

/// Manage archive repositories under the data directory.
#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Create a new archive repository with a starter `sources.yml`.
    Create(CreateArgs),

    /// Delete an archive repository. Refuses directories without the marker file.
    Destroy(DestroyArgs),

    /// List managed repositories and the directories that were skipped.
    List,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory name under the data root.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct DestroyArgs {
    pub name: String,

    /// Do not fail when the directory is not a managed repository or cannot
    /// be removed completely.
    #[arg(long)]
    pub ignore_errors: bool,
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "path")]
    path: String,
}

pub fn run(cmd: RepoCommand, global: &GlobalArgs) -> Result<()> {
    let settings = global.load_settings()?;
    match cmd {
        RepoCommand::Create(args) => {
            let name = RepoName::from(args.name);
            match create_repo(&settings, &name)
                .with_context(|| format!("failed to create repository '{name}'"))?
            {
                CreateOutcome::Created(repo) => {
                    println!("✓ Created '{}' at {}", repo.name, repo.path.display());
                    println!(
                        "  Edit {} to list the documents to archive.",
                        paths::manifest_path(&repo.path).display()
                    );
                }
                CreateOutcome::AlreadyManaged(repo) => {
                    println!("✓ '{}' is already a managed repository", repo.name)
                }
            }
            Ok(())
        }
        RepoCommand::Destroy(args) => {
            let name = RepoName::from(args.name);
            match destroy_named(&settings, &name, args.ignore_errors)
                .with_context(|| format!("failed to destroy repository '{name}'"))?
            {
                DestroyOutcome::Removed(path) => println!("✓ Removed {}", path.display()),
                DestroyOutcome::Skipped(path) => {
                    println!("- Skipped {} (not a managed repository)", path.display())
                }
            }
            Ok(())
        }
        RepoCommand::List => print_list(&settings.datadir_path),
    }
}

/// Print the managed and skipped entries of `data_root` as a table.
pub fn print_list(data_root: &Path) -> Result<()> {
    let entries = registry::scan(data_root)
        .with_context(|| format!("failed to scan {}", data_root.display()))?;
    if entries.is_empty() {
        println!("No repositories under {}.", data_root.display());
        return Ok(());
    }

    let rows: Vec<RepoRow> = entries
        .iter()
        .map(|entry| match entry {
            ScanEntry::Managed(repo) => RepoRow {
                name: repo.name.to_string(),
                status: "managed".green().to_string(),
                path: repo.path.display().to_string(),
            },
            ScanEntry::Skipped { path, reason } => RepoRow {
                name: file_name(path),
                status: format!("skipped: {reason}").bright_black().to_string(),
                path: path.display().to_string(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
