//! `git-find` -- report every name, parent and child of commits and tags.
//!
//! Parses CLI arguments with clap, resolves the runtime context (git runner
//! and configuration), and runs the search.

mod cli;
mod context;
mod find;
mod output;
mod report;
mod scan;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::Cli;
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("git_find=debug,gittools_git=debug,gittools_core=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "git-find", &mut std::io::stdout());
        return;
    }

    let result = RuntimeContext::from_cli(&cli).and_then(|ctx| {
        gittools_ui::terminal::set_color_override(ctx.color_override());
        find::run(&ctx, &cli.revisions)
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
