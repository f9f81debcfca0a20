//! Clap CLI definitions for the `git-find` command.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use clap_complete::Shell;

/// git-find -- name every commit and tag, even lost ones.
#[derive(Parser, Debug)]
#[command(
    name = "git-find",
    about = "Report every name, parent and child of commits and tags",
    long_about = "Walks the whole object graph, including reflogs and dangling objects, and \
                  reports every name by which each given commit or tag can be reached \
                  (e.g. master~3, topic^2~1, HEAD@{4}), together with its parents and children.",
    version
)]
pub struct Cli {
    /// Commits or tags to look up (anything `git rev-parse` accepts).
    #[arg(value_name = "REVISION", required_unless_present = "completions")]
    pub revisions: Vec<String>,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub find: FindArgs,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Flags shared with the other gittools commands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Run as if started in <PATH>.
    #[arg(short = 'C', value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,

    /// When to colour output.
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorWhen>,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Flags controlling the search.
#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// Print only the names, one per line.
    #[arg(long)]
    pub names_only: bool,

    /// Do not name history through reflog entries.
    #[arg(long)]
    pub no_reflogs: bool,

    /// Do not look for dangling commits and tags.
    #[arg(long)]
    pub no_dangling: bool,

    /// Do not treat HEAD as a name.
    #[arg(long)]
    pub no_head: bool,

    /// Hex digits shown for abbreviated object ids.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(4..=64))]
    pub abbrev: Option<u8>,

    /// Maximum names printed per object (0 = unlimited).
    #[arg(long, value_name = "N")]
    pub max_names: Option<usize>,

    /// Never pipe output through a pager.
    #[arg(long)]
    pub no_pager: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn revisions_are_required() {
        assert!(Cli::try_parse_from(["git-find"]).is_err());
        assert!(Cli::try_parse_from(["git-find", "--completions", "bash"]).is_ok());
    }

    #[test]
    fn abbrev_is_range_checked() {
        assert!(Cli::try_parse_from(["git-find", "--abbrev", "3", "HEAD"]).is_err());
        let cli = Cli::try_parse_from(["git-find", "--abbrev", "12", "HEAD"]).unwrap();
        assert_eq!(cli.find.abbrev, Some(12));
    }
}
