//! `webtogit print-config`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use webtogit_core::FetchPolicy;
use webtogit_sync::registry;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct PrintConfigArgs {}

#[derive(Serialize)]
struct ConfigDump {
    configfile_path: PathBuf,
    datadir_path: PathBuf,
    fetch_timeout_secs: u64,
    fetch_policy: FetchPolicy,
    repos: Vec<PathBuf>,
}

impl PrintConfigArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let settings = global.load_settings()?;
        let repos = registry::discover(&settings.datadir_path)
            .context("failed to scan data directory")?
            .into_iter()
            .map(|repo| repo.path)
            .collect();

        let dump = ConfigDump {
            configfile_path: global.configfile_path()?,
            datadir_path: settings.datadir_path,
            fetch_timeout_secs: settings.fetch_timeout_secs,
            fetch_policy: settings.fetch_policy,
            repos,
        };
        print!(
            "{}",
            serde_yaml::to_string(&dump).context("failed to serialize configuration")?
        );
        Ok(())
    }
}
