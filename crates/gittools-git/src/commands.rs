//! Git command execution wrappers.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! rest of the codebase does not need to deal with `std::process::Command`
//! directly.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use gittools_core::parse::ParseError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The git command exited with a non-zero status.
    #[error("git {command} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// The subcommand that failed, e.g. `rev-list`.
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The content of stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// A revision argument does not name any object.
    #[error("unknown revision '{0}'")]
    UnknownRevision(String),

    /// Git printed something we could not understand.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs one git binary in one working directory.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: OsString,
    cwd: PathBuf,
}

impl GitRunner {
    /// A runner for `git` found on `PATH`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("git"),
            cwd: cwd.into(),
        }
    }

    /// Use a different git binary.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!(cwd = %self.cwd.display(), "git {}", args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.cwd);
        cmd
    }

    /// Run git with `args` and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::SpawnError`] if git cannot be started, or
    /// [`GitError::CommandFailed`] if it exits with a non-zero status.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.command(args).output()?;
        check(args, output)
    }

    /// Like [`run`](Self::run), but feed `input` to git's stdin.
    pub fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<String> {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The commands fed this way read all of stdin before writing output.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }
        let output = child.wait_with_output()?;
        check(args, output)
    }

    /// Run git and return its stdout even when it exits non-zero.
    ///
    /// The failure is logged at `warn`. Only spawning errors are returned.
    pub fn run_lenient(&self, args: &[&str]) -> Result<String> {
        let output = self.command(args).output()?;
        if !output.status.success() {
            tracing::warn!(
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git {} exited with failure, using its output anyway",
                args.first().copied().unwrap_or_default()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git with stdout and stderr inherited from this process.
    ///
    /// Used for porcelain commands whose progress output the user should see.
    pub fn run_inherited(&self, args: &[&str]) -> Result<()> {
        let status = self.command(args).status()?;
        if !status.success() {
            return Err(GitError::CommandFailed {
                command: subcommand(args),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

fn subcommand(args: &[&str]) -> String {
    args.first().copied().unwrap_or_default().to_string()
}

fn check(args: &[&str], output: Output) -> Result<String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed {
            command: subcommand(args),
            code: output.status.code(),
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(stdout)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_version() {
        // `git --version` should succeed on any system with git installed.
        let result = GitRunner::new(".").run(&["--version"]);
        assert!(result.is_ok(), "git --version failed: {result:?}");
        let output = result.unwrap();
        assert!(
            output.starts_with("git version"),
            "unexpected output: {output}"
        );
    }

    #[test]
    fn test_run_failure() {
        let result = GitRunner::new(".").run(&["not-a-real-subcommand"]);
        match result.unwrap_err() {
            GitError::CommandFailed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "not-a-real-subcommand");
                assert!(code.is_some());
                assert!(!stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_bad_cwd() {
        let result = GitRunner::new("/nonexistent/directory/xyz").run(&["status"]);
        assert!(matches!(result, Err(GitError::SpawnError(_))));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let runner = GitRunner::new(".").with_program("/nonexistent/bin/git-xyz");
        assert!(matches!(
            runner.run(&["--version"]),
            Err(GitError::SpawnError(_))
        ));
    }

    #[test]
    fn test_run_with_input_feeds_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let runner = GitRunner::new(dir.path());
        runner.run(&["init", "-q"]).unwrap();
        let id = runner
            .run_with_input(&["hash-object", "--stdin"], b"hello\n")
            .unwrap();
        // Well-known SHA-1 of the blob "hello\n".
        assert_eq!(id, "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn test_run_lenient_keeps_output_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = GitRunner::new(dir.path());
        // Outside a repository rev-parse fails; lenient mode still succeeds.
        let out = runner.run_lenient(&["rev-parse", "--verify", "--quiet", "HEAD"]);
        assert!(out.is_ok());
    }
}
