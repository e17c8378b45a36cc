pub mod bootstrap;
pub mod print_config;
pub mod repo;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use webtogit_core::{config, Settings};

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Settings file. Defaults to `<config_dir>/webtogit/settings.yml`.
    #[arg(
        long,
        global = true,
        env = "WEBTOGIT_CONFIGFILE_PATH",
        value_name = "PATH"
    )]
    pub configfile_path: Option<PathBuf>,

    /// Data root holding one directory per archive repository.
    /// Overrides `datadir_path` from the settings file.
    #[arg(
        long,
        global = true,
        env = "WEBTOGIT_DATADIR_PATH",
        value_name = "PATH"
    )]
    pub datadir_path: Option<PathBuf>,

    /// Log progress to stderr (`RUST_LOG` takes precedence).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn configfile_path(&self) -> Result<PathBuf> {
        match &self.configfile_path {
            Some(path) => Ok(path.clone()),
            None => config::default_configfile_path().context("no --configfile-path given"),
        }
    }

    /// `--datadir-path` if given, else the platform default.
    pub fn datadir_or_default(&self) -> Result<PathBuf> {
        match &self.datadir_path {
            Some(path) => Ok(path.clone()),
            None => config::default_datadir_path().context("no --datadir-path given"),
        }
    }

    /// Settings from the config file with `--datadir-path` applied.
    ///
    /// Without a settings file, an explicit `--datadir-path` is enough to run
    /// with default settings.
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.configfile_path()?;
        if !path.exists() {
            if let Some(datadir) = &self.datadir_path {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Settings::new(datadir.clone()));
            }
        }
        let settings = config::load(&path).with_context(|| {
            format!(
                "failed to load settings from {}; run `webtogit bootstrap` first",
                path.display()
            )
        })?;
        Ok(settings.with_datadir(self.datadir_path.clone()))
    }
}
