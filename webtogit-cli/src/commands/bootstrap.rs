//! `webtogit bootstrap [--config-only]`

use anyhow::{Context, Result};
use clap::Args;

use webtogit_core::config::{self, ConfigBootstrap};
use webtogit_core::RepoName;
use webtogit_sync::{create_repo, CreateOutcome};

use super::{repo, GlobalArgs};

/// Create the settings file, the data directory and the default repository.
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Only create and check the settings file.
    #[arg(long)]
    pub config_only: bool,
}

impl BootstrapArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config_path = global.configfile_path()?;
        let datadir = global.datadir_or_default()?;

        match config::bootstrap_config(&config_path, &datadir)
            .with_context(|| format!("invalid settings file {}", config_path.display()))?
        {
            ConfigBootstrap::Created(path) => println!("✓ Created {}", path.display()),
            ConfigBootstrap::Existing(path) => println!("✓ Using {}", path.display()),
        }
        if self.config_only {
            return Ok(());
        }

        let settings = global.load_settings()?;
        std::fs::create_dir_all(&settings.datadir_path).with_context(|| {
            format!("cannot create data directory {}", settings.datadir_path.display())
        })?;

        let name = RepoName::from(settings.default_repo_name.clone());
        match create_repo(&settings, &name)
            .with_context(|| format!("failed to create default repository '{name}'"))?
        {
            CreateOutcome::Created(repo) => {
                println!("✓ Created repository '{}' at {}", repo.name, repo.path.display())
            }
            CreateOutcome::AlreadyManaged(repo) => {
                println!("✓ Repository '{}' already exists", repo.name)
            }
        }

        repo::print_list(&settings.datadir_path)
    }
}
