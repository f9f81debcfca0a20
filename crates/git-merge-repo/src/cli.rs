//! Clap CLI definitions for the `git-merge-repo` command.

use std::path::PathBuf;

use clap::Parser;

/// git-merge-repo -- merge another repository into a subdirectory.
#[derive(Parser, Debug)]
#[command(
    name = "git-merge-repo",
    about = "Merge another repository into a subdirectory, keeping its history",
    long_about = "Fetches REPOSITORY as a new remote and records a merge whose tree places \
                  the remote branch's files under DIRECTORY. The other repository's history \
                  becomes the second parent of the merge commit.",
    version
)]
pub struct Cli {
    /// Repository to merge (path or URL).
    #[arg(value_name = "REPOSITORY")]
    pub repository: String,

    /// Subdirectory that receives its files.
    #[arg(value_name = "DIRECTORY")]
    pub directory: String,

    /// Run as if started in <PATH>.
    #[arg(short = 'C', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Name of the remote to add (default: last component of DIRECTORY).
    #[arg(long, value_name = "REMOTE")]
    pub name: Option<String>,

    /// Branch of REPOSITORY to merge (default: merge-repo.branch, or master).
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Commit message for the merge.
    #[arg(short = 'm', long, value_name = "MSG")]
    pub message: Option<String>,

    /// Print the git commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
