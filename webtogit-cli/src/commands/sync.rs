//! `webtogit sync [REPO]`: fetch every source and commit what changed.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use webtogit_core::{FetchPolicy, RepoName};
use webtogit_sync::{
    pipeline::{self, SyncOptions, SyncScope},
    HttpFetcher, RepoReport,
};

use super::GlobalArgs;

/// Arguments for `webtogit sync`.
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Repository to sync (omit to sync every managed repository).
    pub repo: Option<String>,

    /// Read sources from this file instead of each repository's `sources.yml`.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Keep fetching after a failed source and report all failures at the end.
    #[arg(long)]
    pub continue_on_error: bool,
}

impl SyncArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let settings = global.load_settings()?;

        let mut options = SyncOptions::from_settings(&settings);
        options.manifest_override = self.manifest;
        if self.continue_on_error {
            options.policy = FetchPolicy::ContinueOnError;
        }

        let scope = match self.repo {
            Some(name) => SyncScope::Repository(RepoName::from(name)),
            None => SyncScope::All,
        };
        let client = HttpFetcher::new(settings.fetch_timeout());
        let reports = pipeline::run(&settings, scope, &client, &options).with_context(|| {
            format!("sync failed under {}", settings.datadir_path.display())
        })?;

        if reports.is_empty() {
            println!(
                "No repositories under {}. Run: webtogit repo create <name>",
                settings.datadir_path.display()
            );
            return Ok(());
        }

        for report in &reports {
            print_report(report);
        }

        let failed = reports.iter().filter(|r| !r.is_clean()).count();
        if failed > 0 {
            bail!("{failed} of {} repositories did not sync cleanly", reports.len());
        }
        Ok(())
    }
}

fn print_report(report: &RepoReport) {
    let mark = if report.is_clean() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("{mark} '{}' ({})", report.name, report.path.display());
    for line in report.render().lines() {
        println!("  {line}");
    }
}
