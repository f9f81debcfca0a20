//! Runtime context for a `git-find` run.
//!
//! The [`RuntimeContext`] holds everything the search needs: the git runner,
//! the configuration with command-line overrides applied, and output flags.

use std::env;

use anyhow::{Context, Result};
use gittools_config::{ColorChoice, GitToolsConfig, find_config_file, load_config};
use gittools_git::{GitRunner, gitdir};

use crate::cli::{Cli, ColorWhen};

/// Runtime context, constructed once in `main` after CLI parsing.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Runs the configured git binary in the working directory.
    pub git: GitRunner,

    /// Effective configuration (file, then flags).
    pub config: GitToolsConfig,

    pub json: bool,
    pub names_only: bool,
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build the context: locate and load the configuration, then apply
    /// command-line overrides on top of it.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = match &cli.global.directory {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("cannot determine current directory")?,
        };

        // Config discovery runs before the configured binary is known.
        let probe = GitRunner::new(&cwd);
        let common_dir = gitdir::git_common_dir(&probe).ok();
        let config_path = find_config_file(common_dir.as_deref())?;
        let mut config = match &config_path {
            Some(path) => load_config(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GitToolsConfig::default(),
        };
        tracing::debug!(config = ?config_path, "configuration resolved");

        apply_overrides(&mut config, cli);

        let git = GitRunner::new(cwd).with_program(&config.git);
        Ok(Self {
            git,
            config,
            json: cli.global.json,
            names_only: cli.find.names_only,
            quiet: cli.global.quiet,
        })
    }

    /// Whether coloured output is forced on, off, or left to detection.
    pub fn color_override(&self) -> Option<bool> {
        if self.json {
            return Some(false);
        }
        match self.config.color {
            ColorChoice::Auto => None,
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
        }
    }

    /// Whether text output may go through a pager.
    pub fn use_pager(&self) -> bool {
        self.config.pager && !self.json && !self.names_only
    }
}

fn apply_overrides(config: &mut GitToolsConfig, cli: &Cli) {
    let find = &cli.find;
    if find.no_reflogs {
        config.find.reflogs = false;
    }
    if find.no_dangling {
        config.find.dangling = false;
    }
    if find.no_head {
        config.find.head = false;
    }
    if let Some(abbrev) = find.abbrev {
        config.find.abbrev = usize::from(abbrev);
    }
    if let Some(max) = find.max_names {
        config.find.max_names = max;
    }
    if find.no_pager {
        config.pager = false;
    }
    if let Some(when) = cli.global.color {
        config.color = match when {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        };
    }
}
