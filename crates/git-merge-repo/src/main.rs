//! `git-merge-repo` -- merge another repository into a subdirectory.
//!
//! Parses CLI arguments with clap, validates them into a merge plan, and
//! either prints the plan (`--dry-run`) or runs it.

mod cli;
mod context;
mod merge;

use anyhow::Result;
use clap::Parser;
use gittools_git::gitdir;

use cli::Cli;
use context::RuntimeContext;
use merge::MergePlan;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("git_merge_repo=debug,gittools_git=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Handle errors: print message and exit with code 1
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = RuntimeContext::from_cli(cli)?;
    gittools_ui::terminal::set_color_override(ctx.color_override());

    let branch = cli
        .branch
        .as_deref()
        .unwrap_or(&ctx.config.merge_repo.branch);
    let plan = MergePlan::new(
        &cli.repository,
        &cli.directory,
        cli.name.as_deref(),
        branch,
        cli.message.as_deref(),
        ctx.config.merge_repo.allow_unrelated_histories,
    )?;
    tracing::debug!(?plan, "merge planned");

    if ctx.dry_run {
        merge::print_plan(&plan);
        return Ok(());
    }

    gitdir::require_repo(&ctx.git)?;
    merge::execute(&ctx.git, &plan, ctx.quiet)
}
