//! Parsers for the plumbing output `git-find` consumes.
//!
//! Each function takes one line (or one small block) of text exactly as the
//! corresponding `git` command prints it. The format strings the callers
//! must pass are exported next to the parsers so both sides stay in sync.

use crate::object::{ObjectError, ObjectId, ObjectKind};

/// Errors raised while scraping `git` output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {what} output: '{line}'")]
    Malformed { what: &'static str, line: String },

    #[error(transparent)]
    Object(#[from] ObjectError),
}

fn malformed(what: &'static str, line: &str) -> ParseError {
    ParseError::Malformed {
        what,
        line: line.to_string(),
    }
}

// ---------------------------------------------------------------------------
// for-each-ref
// ---------------------------------------------------------------------------

/// `--format` argument for `git for-each-ref`.
///
/// `%(object)` and `%(type)` come from the tag header and go down exactly
/// one level, unlike `%(*objectname)`, which newer gits peel fully.
pub const REF_FORMAT: &str =
    "%(objectname) %(objecttype) %(refname) %(refname:short) %(object) %(type)";

/// One ref as listed by `git for-each-ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Full name, e.g. `refs/heads/master`.
    pub refname: String,
    /// Unambiguous short name, e.g. `master` or `heads/master`.
    pub short: String,
    /// For annotated tags: the object the tag points at, which may itself
    /// be a tag.
    pub target: Option<(ObjectId, ObjectKind)>,
}

/// Parse one line printed with [`REF_FORMAT`].
///
/// The two target fields are empty for anything but annotated tags, so a
/// valid line has either four or six whitespace-separated fields.
pub fn parse_ref_line(line: &str) -> Result<RefRecord, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let target = match fields.len() {
        4 => None,
        6 => Some((
            ObjectId::parse(fields[4])?,
            fields[5].parse::<ObjectKind>()?,
        )),
        _ => return Err(malformed("for-each-ref", line)),
    };
    Ok(RefRecord {
        id: ObjectId::parse(fields[0])?,
        kind: fields[1].parse::<ObjectKind>()?,
        refname: fields[2].to_string(),
        short: fields[3].to_string(),
        target,
    })
}

// ---------------------------------------------------------------------------
// rev-list --parents
// ---------------------------------------------------------------------------

/// Parse one line of `git rev-list --parents`: a commit id followed by the
/// ids of its parents.
pub fn parse_rev_list_line(line: &str) -> Result<(ObjectId, Vec<ObjectId>), ParseError> {
    let mut fields = line.split_whitespace();
    let id = ObjectId::parse(fields.next().ok_or_else(|| malformed("rev-list", line))?)?;
    let parents = fields
        .map(ObjectId::parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((id, parents))
}

// ---------------------------------------------------------------------------
// reflog
// ---------------------------------------------------------------------------

/// `--format` argument for `git reflog show`.
pub const REFLOG_FORMAT: &str = "%H %gd";

/// One reflog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflogRecord {
    pub id: ObjectId,
    /// Short selector, e.g. `master@{2}`.
    pub selector: String,
}

/// Parse one line printed with [`REFLOG_FORMAT`].
pub fn parse_reflog_line(line: &str) -> Result<ReflogRecord, ParseError> {
    let (id, selector) = line
        .trim()
        .split_once(' ')
        .ok_or_else(|| malformed("reflog", line))?;
    let selector = selector.trim();
    if !selector.ends_with('}') || !selector.contains("@{") {
        return Err(malformed("reflog", line));
    }
    Ok(ReflogRecord {
        id: ObjectId::parse(id)?,
        selector: selector.to_string(),
    })
}

// ---------------------------------------------------------------------------
// fsck
// ---------------------------------------------------------------------------

/// Parse one line of `git fsck --dangling`.
///
/// Returns `Some` for `dangling <kind> <id>` lines and `None` for every other
/// diagnostic fsck prints (`missing`, `broken link`, `unreachable`, ...).
pub fn parse_fsck_line(line: &str) -> Result<Option<(ObjectKind, ObjectId)>, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["dangling", kind, id] => Ok(Some((kind.parse::<ObjectKind>()?, ObjectId::parse(id)?))),
        ["dangling", ..] => Err(malformed("fsck", line)),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// cat-file tag
// ---------------------------------------------------------------------------

/// Extract the tagged object from the header of `git cat-file tag <id>`.
pub fn parse_tag_header(text: &str) -> Result<(ObjectId, ObjectKind), ParseError> {
    let mut object = None;
    let mut kind = None;
    for line in text.lines() {
        if line.is_empty() {
            // End of header; the message follows.
            break;
        }
        if let Some(rest) = line.strip_prefix("object ") {
            object = Some(ObjectId::parse(rest)?);
        } else if let Some(rest) = line.strip_prefix("type ") {
            kind = Some(rest.parse::<ObjectKind>()?);
        }
    }
    match (object, kind) {
        (Some(object), Some(kind)) => Ok((object, kind)),
        _ => Err(malformed("cat-file tag", text.lines().next().unwrap_or(""))),
    }
}
