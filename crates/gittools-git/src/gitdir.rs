//! Repository discovery.
//!
//! Provides functions for finding the repository a command runs in and the
//! directory where shared repository files (such as `gittools.yaml`) live.

use std::path::PathBuf;

use crate::commands::{GitError, GitRunner, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The repository's common directory (`.git` of the main worktree, or the
/// bare repository itself), as an absolute path.
///
/// # Errors
///
/// Returns [`GitError::NotARepo`] when the runner's directory is not inside
/// a repository.
pub fn git_common_dir(git: &GitRunner) -> Result<PathBuf> {
    let out = git
        .run(&["rev-parse", "--git-common-dir"])
        .map_err(|err| not_a_repo(git, err))?;
    let path = PathBuf::from(normalize_git_path(&out));
    let path = if path.is_absolute() {
        path
    } else {
        git.cwd().join(path)
    };
    Ok(path.canonicalize().unwrap_or(path))
}

/// Fail with [`GitError::NotARepo`] unless the runner's directory is inside
/// a repository.
pub fn require_repo(git: &GitRunner) -> Result<()> {
    git.run(&["rev-parse", "--git-dir"])
        .map(|_| ())
        .map_err(|err| not_a_repo(git, err))
}

fn not_a_repo(git: &GitRunner, err: GitError) -> GitError {
    match err {
        GitError::CommandFailed { .. } => GitError::NotARepo(git.cwd().to_path_buf()),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Normalize git paths for Windows compatibility.
///
/// Git on Windows may return MSYS-style paths like `/c/Users/...` or forward-
/// slash paths like `C:/Users/...`. This function converts them to native
/// format.
fn normalize_git_path(path: &str) -> String {
    if std::path::MAIN_SEPARATOR != '\\' {
        return path.to_string();
    }

    let path = path.trim();

    // Convert /c/Users/... to C:\Users\...
    if path.len() >= 3
        && path.as_bytes()[0] == b'/'
        && path.as_bytes()[2] == b'/'
        && path.as_bytes()[1].is_ascii_alphabetic()
    {
        let drive = path.as_bytes()[1].to_ascii_uppercase() as char;
        let rest = &path[2..];
        return format!("{drive}:{}", rest.replace('/', "\\"));
    }

    path.replace('/', "\\")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
