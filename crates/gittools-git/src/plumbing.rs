//! Typed plumbing queries.
//!
//! Each function runs one plumbing command and scrapes its output with the
//! matching parser from [`gittools_core::parse`].

use gittools_core::object::{ObjectId, ObjectKind};
use gittools_core::parse::{
    REF_FORMAT, REFLOG_FORMAT, RefRecord, ReflogRecord, parse_fsck_line, parse_ref_line,
    parse_reflog_line, parse_rev_list_line, parse_tag_header,
};

use crate::commands::{GitError, GitRunner, Result};

/// A commit and its parents, as printed by `git rev-list --parents`.
pub type CommitEdges = (ObjectId, Vec<ObjectId>);

fn lines(out: &str) -> impl Iterator<Item = &str> {
    out.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// List every ref with `git for-each-ref`.
pub fn list_refs(git: &GitRunner) -> Result<Vec<RefRecord>> {
    let format = format!("--format={REF_FORMAT}");
    let out = git.run(&["for-each-ref", &format])?;
    lines(&out)
        .map(|line| parse_ref_line(line).map_err(GitError::from))
        .collect()
}

/// The object `HEAD` points at, or `None` on an unborn branch.
pub fn head(git: &GitRunner) -> Result<Option<ObjectId>> {
    match git.run(&["rev-parse", "--verify", "--quiet", "HEAD"]) {
        Ok(out) => Ok(Some(ObjectId::parse(&out).map_err(|e| GitError::Parse(e.into()))?)),
        Err(GitError::CommandFailed { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Walk history with `git rev-list --parents`.
///
/// `tips` are passed on stdin so the argument list stays short no matter
/// how many dangling commits a repository holds.
pub fn rev_list_parents(
    git: &GitRunner,
    tips: &[ObjectId],
    all: bool,
    reflog: bool,
) -> Result<Vec<CommitEdges>> {
    if tips.is_empty() && !all && !reflog {
        return Ok(Vec::new());
    }

    let mut args = vec!["rev-list", "--parents"];
    if all {
        args.push("--all");
    }
    if reflog {
        args.push("--reflog");
    }
    args.push("--stdin");

    let mut input = String::new();
    for tip in tips {
        input.push_str(tip.as_str());
        input.push('\n');
    }

    let out = git.run_with_input(&args, input.as_bytes())?;
    lines(&out)
        .map(|line| parse_rev_list_line(line).map_err(GitError::from))
        .collect()
}

/// Entries of the reflog of `refname`, newest first.
///
/// A ref without a reflog yields an empty list.
pub fn reflog(git: &GitRunner, refname: &str) -> Result<Vec<ReflogRecord>> {
    let format = format!("--format={REFLOG_FORMAT}");
    let out = match git.run(&["reflog", "show", &format, refname, "--"]) {
        Ok(out) => out,
        Err(GitError::CommandFailed { stderr, .. }) => {
            tracing::debug!(refname, %stderr, "no readable reflog");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };
    lines(&out)
        .map(|line| parse_reflog_line(line).map_err(GitError::from))
        .collect()
}

/// Objects `git fsck` reports as dangling.
///
/// With `reflogs` false, commits kept alive only by a reflog entry count
/// as dangling too. fsck exits non-zero on any repository damage; the
/// dangling objects it found are still returned.
pub fn dangling(git: &GitRunner, reflogs: bool) -> Result<Vec<(ObjectKind, ObjectId)>> {
    let mut args = vec!["fsck", "--dangling", "--no-progress"];
    if !reflogs {
        args.push("--no-reflogs");
    }
    let out = git.run_lenient(&args)?;
    let mut found = Vec::new();
    for line in lines(&out) {
        if let Some(entry) = parse_fsck_line(line)? {
            found.push(entry);
        }
    }
    Ok(found)
}

/// The object an annotated tag points at.
pub fn tag_target(git: &GitRunner, tag: &ObjectId) -> Result<(ObjectId, ObjectKind)> {
    let out = git.run(&["cat-file", "tag", tag.as_str()])?;
    Ok(parse_tag_header(&out)?)
}

/// Resolve a revision expression to an object id without peeling tags.
///
/// # Errors
///
/// Returns [`GitError::UnknownRevision`] when `revision` names no object.
pub fn resolve(git: &GitRunner, revision: &str) -> Result<ObjectId> {
    if revision.is_empty() || revision.starts_with('-') {
        return Err(GitError::UnknownRevision(revision.to_string()));
    }
    let expr = format!("{revision}^{{object}}");
    match git.run(&["rev-parse", "--verify", "--quiet", &expr]) {
        Ok(out) => ObjectId::parse(&out).map_err(|e| GitError::Parse(e.into())),
        Err(GitError::CommandFailed { .. }) => Err(GitError::UnknownRevision(revision.to_string())),
        Err(err) => Err(err),
    }
}

/// The type of an object, via `git cat-file -t`.
pub fn object_kind(git: &GitRunner, id: &ObjectId) -> Result<ObjectKind> {
    let out = git.run(&["cat-file", "-t", id.as_str()])?;
    out.parse::<ObjectKind>()
        .map_err(|e| GitError::Parse(e.into()))
}
