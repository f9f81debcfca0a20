//! End-to-end CLI integration tests for the `git-find` binary.
//!
//! Each test builds a throwaway repository in a temporary directory and runs
//! `git-find` against it as a subprocess via `assert_cmd`.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const IDENTITY: [(&str, &str); 4] = [
    ("GIT_AUTHOR_NAME", "Test"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "Test"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

/// Run git in `dir` and return its trimmed stdout.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .envs(IDENTITY)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A fresh repository on `master`.
fn init_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q", "-b", "master"]);
    tmp
}

fn commit(dir: &Path, msg: &str) -> String {
    git(dir, &["commit", "-q", "--allow-empty", "-m", msg]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Build a `Command` for `git-find`, isolated from the user's configuration.
fn git_find(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("git-find").unwrap();
    cmd.current_dir(dir)
        .env_remove("GITTOOLS_CONFIG")
        .env("XDG_CONFIG_HOME", dir.join(".no-config"))
        .env("GITTOOLS_NO_PAGER", "1")
        .arg("--color")
        .arg("never");
    cmd
}

/// Run `git-find --json` and return the parsed report array.
fn find_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = git_find(dir).arg("--json").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "git-find failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn names(report: &serde_json::Value) -> Vec<String> {
    report["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["text"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

#[test]
fn branch_tip_is_named_by_its_branch() {
    let tmp = init_repo();
    commit(tmp.path(), "one");
    commit(tmp.path(), "two");

    git_find(tmp.path())
        .arg("master")
        .assert()
        .success()
        .stdout(predicate::str::contains("name    master\n"))
        .stdout(predicate::str::contains("name    HEAD\n"));
}

#[test]
fn ancestor_is_named_relative_to_branch() {
    let tmp = init_repo();
    let first = commit(tmp.path(), "one");
    commit(tmp.path(), "two");
    commit(tmp.path(), "three");

    let reports = find_json(tmp.path(), &[&first]);
    let report = &reports[0];
    assert_eq!(report["id"], first.as_str());
    assert_eq!(report["kind"], "commit");
    assert_eq!(report["dangling"], false);
    let names = names(report);
    assert_eq!(names[0], "master~2");
    assert!(names.contains(&"HEAD~2".to_string()), "{names:?}");
    assert!(report["parents"].as_array().unwrap().is_empty());
    assert_eq!(report["children"][0]["name"], "master~1");
}

#[test]
fn merge_commit_reports_both_parents() {
    let tmp = init_repo();
    let dir = tmp.path();
    commit(dir, "base");
    git(dir, &["checkout", "-q", "-b", "topic"]);
    let side = commit(dir, "side");
    git(dir, &["checkout", "-q", "master"]);
    let main = commit(dir, "main");
    git(dir, &["merge", "-q", "--no-ff", "-m", "merge topic", "topic"]);

    let reports = find_json(dir, &["HEAD"]);
    let parents = reports[0]["parents"].as_array().unwrap();
    assert_eq!(parents.len(), 2);
    assert!(main.starts_with(parents[0]["id"].as_str().unwrap()));
    assert_eq!(parents[0]["name"], "master~1");
    assert!(side.starts_with(parents[1]["id"].as_str().unwrap()));
    assert_eq!(parents[1]["name"], "topic");

    let side_names = names(&find_json(dir, &[&side])[0]);
    assert!(side_names.contains(&"topic".to_string()));
    assert!(side_names.contains(&"master^2".to_string()), "{side_names:?}");
}

#[test]
fn annotated_tag_and_its_commit() {
    let tmp = init_repo();
    let dir = tmp.path();
    let tagged = commit(dir, "release");
    git(dir, &["tag", "-a", "-m", "release", "v1.0"]);
    commit(dir, "after");

    let commit_names = names(&find_json(dir, &[&tagged])[0]);
    assert!(commit_names.contains(&"v1.0^{}".to_string()), "{commit_names:?}");
    assert!(commit_names.contains(&"master~1".to_string()));

    let tag = &find_json(dir, &["v1.0"])[0];
    assert_eq!(tag["kind"], "tag");
    assert_eq!(names(tag), ["v1.0"]);
    assert!(tagged.starts_with(tag["parents"][0]["id"].as_str().unwrap()));
}

#[test]
fn nested_tags_peel_one_level_at_a_time() {
    let tmp = init_repo();
    let dir = tmp.path();
    let tagged = commit(dir, "release");
    git(dir, &["tag", "-a", "-m", "inner", "inner"]);
    git(dir, &["tag", "-a", "-m", "outer", "outer", "inner"]);
    let inner = git(dir, &["rev-parse", "inner"]);

    let commit_names = names(&find_json(dir, &[&tagged])[0]);
    assert!(commit_names.contains(&"inner^{}".to_string()), "{commit_names:?}");
    assert!(commit_names.contains(&"outer^{}".to_string()), "{commit_names:?}");

    let outer = &find_json(dir, &["outer"])[0];
    assert_eq!(outer["kind"], "tag");
    let targets = outer["parents"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["kind"], "tag");
    assert_eq!(targets[0]["name"], "inner");
    assert!(inner.starts_with(targets[0]["id"].as_str().unwrap()));
}

// ---------------------------------------------------------------------------
// Lost history
// ---------------------------------------------------------------------------

#[test]
fn amended_commit_is_found_through_reflog() {
    let tmp = init_repo();
    let dir = tmp.path();
    commit(dir, "base");
    let original = commit(dir, "original");
    git(dir, &["commit", "-q", "--amend", "--allow-empty", "-m", "amended"]);

    let report = &find_json(dir, &[&original])[0];
    let names = names(report);
    assert!(names.contains(&"master@{1}".to_string()), "{names:?}");
    assert!(names.contains(&"HEAD@{1}".to_string()), "{names:?}");
    assert_eq!(report["names"][0]["kind"], "reflog");
    assert_eq!(report["dangling"], false);
    assert_eq!(report["parents"][0]["name"], "master~1");
}

#[test]
fn amended_commit_is_dangling_without_reflogs() {
    let tmp = init_repo();
    let dir = tmp.path();
    commit(dir, "base");
    let original = commit(dir, "original");
    git(dir, &["commit", "-q", "--amend", "--allow-empty", "-m", "amended"]);

    let report = &find_json(dir, &["--no-reflogs", "--abbrev", "8", &original])[0];
    assert_eq!(report["dangling"], true);
    assert_eq!(names(report), [original[..8].to_string()]);
    assert_eq!(report["names"][0]["kind"], "dangling");
}

#[test]
fn unreferenced_commit_is_reported_dangling() {
    let tmp = init_repo();
    let dir = tmp.path();
    commit(dir, "base");
    let tree = git(dir, &["rev-parse", "HEAD^{tree}"]);
    let lost = git(dir, &["commit-tree", &tree, "-p", "HEAD", "-m", "lost"]);

    git_find(dir)
        .arg(&lost)
        .assert()
        .success()
        .stdout(predicate::str::contains("[dangling]"))
        .stdout(predicate::str::contains(format!("name    {}\n", &lost[..7])));
}

#[test]
fn deleted_annotated_tag_is_dangling_with_its_target() {
    let tmp = init_repo();
    let dir = tmp.path();
    let tagged = commit(dir, "release");
    git(dir, &["tag", "-a", "-m", "gone", "gone"]);
    let tag = git(dir, &["rev-parse", "gone"]);
    git(dir, &["tag", "-d", "gone"]);

    let report = &find_json(dir, &[&tag])[0];
    assert_eq!(report["kind"], "tag");
    assert_eq!(report["dangling"], true);
    assert_eq!(report["names"][0]["kind"], "dangling");
    let targets = report["parents"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert!(tagged.starts_with(targets[0]["id"].as_str().unwrap()));
    assert_eq!(targets[0]["name"], "master");

    git_find(dir)
        .arg(&tag)
        .assert()
        .success()
        .stdout(predicate::str::contains("[dangling]"))
        .stdout(predicate::str::contains("target  "));
}

// ---------------------------------------------------------------------------
// Output modes and errors
// ---------------------------------------------------------------------------

#[test]
fn names_only_prints_one_name_per_line() {
    let tmp = init_repo();
    commit(tmp.path(), "one");
    commit(tmp.path(), "two");

    git_find(tmp.path())
        .args(["--names-only", "--no-head", "--no-reflogs", "HEAD~1"])
        .assert()
        .success()
        .stdout("master~1\n");
}

#[test]
fn max_names_caps_the_list() {
    let tmp = init_repo();
    commit(tmp.path(), "one");

    let report = &find_json(tmp.path(), &["--max-names", "1", "HEAD"])[0];
    assert_eq!(names(report), ["master"]);
    assert!(report["omitted_names"].as_u64().unwrap() >= 1);
}

#[test]
fn unknown_revision_fails() {
    let tmp = init_repo();
    commit(tmp.path(), "one");

    git_find(tmp.path())
        .arg("no-such-branch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: unknown revision 'no-such-branch'"));
}

#[test]
fn json_errors_are_json() {
    let tmp = init_repo();
    commit(tmp.path(), "one");

    let output = git_find(tmp.path())
        .args(["--json", "no-such-branch"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().contains("no-such-branch"));
}

#[test]
fn trees_are_rejected() {
    let tmp = init_repo();
    commit(tmp.path(), "one");

    git_find(tmp.path())
        .arg("HEAD^{tree}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("only commits and tags"));
}

#[test]
fn outside_a_repository_fails() {
    let tmp = TempDir::new().unwrap();
    git_find(tmp.path())
        .env("GIT_CEILING_DIRECTORIES", tmp.path())
        .arg("HEAD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn directory_flag_selects_repository() {
    let tmp = init_repo();
    commit(tmp.path(), "one");
    let elsewhere = TempDir::new().unwrap();

    git_find(elsewhere.path())
        .arg("-C")
        .arg(tmp.path())
        .arg("master")
        .assert()
        .success()
        .stdout(predicate::str::contains("name    master"));
}

#[test]
fn completions_need_no_repository() {
    let tmp = TempDir::new().unwrap();
    git_find(tmp.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git-find"));
}

#[test]
fn repository_config_is_honoured() {
    let tmp = init_repo();
    commit(tmp.path(), "one");
    std::fs::write(
        tmp.path().join(".git").join("gittools.yaml"),
        "find:\n  head: false\n  reflogs: false\n",
    )
    .unwrap();

    git_find(tmp.path())
        .args(["--names-only", "HEAD"])
        .assert()
        .success()
        .stdout("master\n");
}
