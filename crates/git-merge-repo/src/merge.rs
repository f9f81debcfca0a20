//! Subtree merge of another repository.
//!
//! A merge is four git commands run in order:
//!
//! 1. `git remote add -f <name> <repository>`
//! 2. `git merge -s ours --no-commit [--allow-unrelated-histories] <name>/<branch>`
//! 3. `git read-tree --prefix=<directory>/ -u <name>/<branch>`
//! 4. `git commit -m "Merge <name>/<branch> as <directory>/"`
//!
//! The `ours` merge records the other history as a parent without touching
//! the tree; `read-tree` then stages that history's files under the prefix.

use anyhow::{Context, Result};
use gittools_git::GitRunner;
use gittools_ui::styles::{render_accent, render_pass_icon, render_step_icon};
use thiserror::Error;

/// Problems with the arguments, found before anything runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("repository must not be empty")]
    EmptyRepository,

    #[error("repository must not start with '-': {0}")]
    OptionLikeRepository(String),

    #[error("directory must not be empty")]
    EmptyDirectory,

    #[error("directory must be relative: {0}")]
    AbsoluteDirectory(String),

    #[error("directory must not contain '..': {0}")]
    ParentComponent(String),

    #[error("invalid remote name '{0}'")]
    InvalidRemoteName(String),

    #[error("branch must not be empty")]
    EmptyBranch,
}

/// Inputs of a merge, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub repository: String,
    /// Normalised directory, without a trailing slash.
    pub prefix: String,
    pub remote: String,
    pub branch: String,
    pub message: String,
    pub allow_unrelated_histories: bool,
}

/// One git invocation of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub args: Vec<String>,
}

impl Step {
    fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The step as a copy-pasteable shell command.
    pub fn command_line(&self) -> String {
        let mut line = String::from("git");
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }
}

impl MergePlan {
    /// Validate the arguments and fill in defaults.
    ///
    /// The remote name defaults to the last component of `directory`; the
    /// message defaults to `Merge <remote>/<branch> as <directory>/`.
    pub fn new(
        repository: &str,
        directory: &str,
        name: Option<&str>,
        branch: &str,
        message: Option<&str>,
        allow_unrelated_histories: bool,
    ) -> Result<Self, PlanError> {
        // `remote add` would read a leading dash as an option.
        if repository.is_empty() {
            return Err(PlanError::EmptyRepository);
        }
        if repository.starts_with('-') {
            return Err(PlanError::OptionLikeRepository(repository.to_string()));
        }
        let prefix = normalize_directory(directory)?;

        let remote = match name {
            Some(name) => {
                if !is_valid_remote_name(name) {
                    return Err(PlanError::InvalidRemoteName(name.to_string()));
                }
                name.to_string()
            }
            None => {
                let last = prefix.rsplit('/').next().unwrap_or(&prefix);
                let derived = sanitize_remote_name(last);
                if !is_valid_remote_name(&derived) {
                    return Err(PlanError::InvalidRemoteName(derived));
                }
                derived
            }
        };

        let branch = branch.trim();
        if branch.is_empty() {
            return Err(PlanError::EmptyBranch);
        }

        let message = match message {
            Some(m) => m.to_string(),
            None => format!("Merge {remote}/{branch} as {prefix}/"),
        };

        Ok(Self {
            repository: repository.to_string(),
            prefix,
            remote,
            branch: branch.to_string(),
            message,
            allow_unrelated_histories,
        })
    }

    /// `<remote>/<branch>`.
    pub fn tracking_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    /// The four git invocations, in order.
    pub fn steps(&self) -> Vec<Step> {
        let tracking = self.tracking_ref();

        let mut merge = vec!["merge", "-s", "ours", "--no-commit"];
        if self.allow_unrelated_histories {
            merge.push("--allow-unrelated-histories");
        }
        merge.push(tracking.as_str());

        vec![
            Step::new([
                "remote",
                "add",
                "-f",
                self.remote.as_str(),
                self.repository.as_str(),
            ]),
            Step::new(merge),
            Step::new([
                "read-tree".to_string(),
                format!("--prefix={}/", self.prefix),
                "-u".to_string(),
                tracking,
            ]),
            Step::new(["commit", "-m", self.message.as_str()]),
        ]
    }
}

/// Print the commands of `plan` without running them.
pub fn print_plan(plan: &MergePlan) {
    for step in plan.steps() {
        println!("{}", step.command_line());
    }
}

/// Run the commands of `plan`, stopping at the first that fails.
pub fn execute(git: &GitRunner, plan: &MergePlan, quiet: bool) -> Result<()> {
    let steps = plan.steps();
    let total = steps.len();
    for (n, step) in steps.iter().enumerate() {
        let line = step.command_line();
        if !quiet {
            eprintln!("{} {}", render_step_icon(), render_accent(&line));
        }
        tracing::debug!(step = n + 1, total, command = %line, "running");

        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
        git.run_inherited(&args)
            .with_context(|| format!("step {} of {total} failed: {line}", n + 1))?;
    }

    if !quiet {
        eprintln!(
            "{} Merged {} into {}/",
            render_pass_icon(),
            plan.tracking_ref(),
            plan.prefix
        );
    }
    Ok(())
}

/// Normalise `directory` to `a/b` form: drop empty and `.` components,
/// reject absolute paths and `..`.
pub fn normalize_directory(directory: &str) -> Result<String, PlanError> {
    let trimmed = directory.trim();
    if trimmed.starts_with('/') {
        return Err(PlanError::AbsoluteDirectory(directory.to_string()));
    }

    let mut parts = Vec::new();
    for part in trimmed.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(PlanError::ParentComponent(directory.to_string())),
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Err(PlanError::EmptyDirectory);
    }
    Ok(parts.join("/"))
}

/// Replace every character git would refuse in a remote name with `-`.
pub fn sanitize_remote_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    // Components may not start with a dot or end in `.lock`.
    while name.starts_with('.') {
        name.replace_range(..1, "-");
    }
    if let Some(stem) = name.strip_suffix(".lock") {
        name = format!("{stem}-lock");
    }
    name
}

fn is_valid_remote_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('.')
        && !name.ends_with(".lock")
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@,+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan(directory: &str) -> MergePlan {
        MergePlan::new("../lib", directory, None, "master", None, true).unwrap()
    }

    #[test]
    fn default_plan_has_four_steps() {
        let lines: Vec<String> = plan("vendor/lib")
            .steps()
            .iter()
            .map(Step::command_line)
            .collect();
        assert_eq!(
            lines,
            [
                "git remote add -f lib ../lib",
                "git merge -s ours --no-commit --allow-unrelated-histories lib/master",
                "git read-tree --prefix=vendor/lib/ -u lib/master",
                "git commit -m 'Merge lib/master as vendor/lib/'",
            ]
        );
    }

    #[test]
    fn related_histories_skip_the_flag() {
        let plan = MergePlan::new("../lib", "lib", Some("up"), "main", Some("Import"), false)
            .unwrap();
        let steps = plan.steps();
        assert_eq!(
            steps[1].args,
            ["merge", "-s", "ours", "--no-commit", "up/main"]
        );
        assert_eq!(steps[3].args, ["commit", "-m", "Import"]);
    }

    #[test]
    fn directory_is_normalised() {
        assert_eq!(normalize_directory("lib/").unwrap(), "lib");
        assert_eq!(normalize_directory("./a//b/").unwrap(), "a/b");
        assert_eq!(normalize_directory(" lib ").unwrap(), "lib");
    }

    #[test]
    fn bad_directories_are_rejected() {
        assert_eq!(normalize_directory(""), Err(PlanError::EmptyDirectory));
        assert_eq!(normalize_directory("./"), Err(PlanError::EmptyDirectory));
        assert!(matches!(
            normalize_directory("/abs"),
            Err(PlanError::AbsoluteDirectory(_))
        ));
        assert!(matches!(
            normalize_directory("a/../b"),
            Err(PlanError::ParentComponent(_))
        ));
    }

    #[test]
    fn remote_name_is_derived_and_sanitised() {
        assert_eq!(plan("third party/my lib").remote, "my-lib");
        assert_eq!(sanitize_remote_name(".hidden"), "-hidden");
        assert_eq!(sanitize_remote_name("x.lock"), "x-lock");
        assert_eq!(sanitize_remote_name("a~b^c:d"), "a-b-c-d");
    }

    #[test]
    fn explicit_remote_name_is_validated() {
        let err = MergePlan::new("../lib", "lib", Some("bad name"), "master", None, true)
            .unwrap_err();
        assert_eq!(err, PlanError::InvalidRemoteName("bad name".into()));
    }

    #[test]
    fn derived_name_starting_with_dash_is_rejected() {
        assert!(matches!(
            MergePlan::new("../lib", "-lib", None, "master", None, true),
            Err(PlanError::InvalidRemoteName(_))
        ));
    }

    #[test]
    fn repository_is_never_an_option() {
        assert_eq!(
            MergePlan::new("-x", "lib", None, "master", None, true),
            Err(PlanError::OptionLikeRepository("-x".into()))
        );
        assert_eq!(
            MergePlan::new("", "lib", None, "master", None, true),
            Err(PlanError::EmptyRepository)
        );
        assert!(MergePlan::new("./-x", "lib", None, "master", None, true).is_ok());
    }

    #[test]
    fn empty_branch_is_rejected() {
        assert_eq!(
            MergePlan::new("../lib", "lib", None, " ", None, true),
            Err(PlanError::EmptyBranch)
        );
    }

    #[test]
    fn arguments_with_spaces_are_quoted() {
        assert_eq!(shell_quote("plain/path"), "plain/path");
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
