//! Runtime context for a `git-merge-repo` run.

use std::env;

use anyhow::{Context, Result};
use gittools_config::{ColorChoice, GitToolsConfig, find_config_file, load_config};
use gittools_git::{GitRunner, gitdir};

use crate::cli::Cli;

/// Runtime context, constructed once in `main` after CLI parsing.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Runs the configured git binary in the target repository.
    pub git: GitRunner,
    pub config: GitToolsConfig,
    pub dry_run: bool,
    pub quiet: bool,
}

impl RuntimeContext {
    /// Locate and load the configuration for the repository `-C` points at
    /// (or the current directory).
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = match &cli.path {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("cannot determine current directory")?,
        };

        let probe = GitRunner::new(&cwd);
        let common_dir = gitdir::git_common_dir(&probe).ok();
        let config = match find_config_file(common_dir.as_deref())? {
            Some(path) => {
                tracing::debug!(config = %path.display(), "loading configuration");
                load_config(&path).with_context(|| format!("loading {}", path.display()))?
            }
            None => GitToolsConfig::default(),
        };

        let git = GitRunner::new(cwd).with_program(&config.git);
        Ok(Self {
            git,
            config,
            dry_run: cli.dry_run,
            quiet: cli.quiet,
        })
    }

    /// Whether coloured output is forced on, off, or left to detection.
    pub fn color_override(&self) -> Option<bool> {
        match self.config.color {
            ColorChoice::Auto => None,
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
        }
    }
}
