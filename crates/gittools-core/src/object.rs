//! Object identifiers and object kinds.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Errors raised when validating object ids or kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object id '{0}': expected 4 to 64 hexadecimal digits")]
    InvalidId(String),

    #[error("unknown object type '{0}'")]
    UnknownKind(String),
}

/// Minimum number of hex digits accepted for an object id.
pub const MIN_ID_LEN: usize = 4;

/// Maximum number of hex digits (a full SHA-256 object name).
pub const MAX_ID_LEN: usize = 64;

/// A lowercase hexadecimal object name.
///
/// Both full SHA-1 (40 digits) and SHA-256 (64 digits) names are accepted,
/// as well as abbreviations down to [`MIN_ID_LEN`] digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate and normalise an object id.
    pub fn parse(s: &str) -> Result<Self, ObjectError> {
        let s = s.trim();
        let valid_len = (MIN_ID_LEN..=MAX_ID_LEN).contains(&s.len());
        if !valid_len || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ObjectError::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The full id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `len` digits (or the whole id when it is shorter).
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The four object types stored in a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Commit,
    Tag,
    Tree,
    Blob,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "commit" => Ok(ObjectKind::Commit),
            "tag" => Ok(ObjectKind::Tag),
            "tree" => Ok(ObjectKind::Tree),
            "blob" => Ok(ObjectKind::Blob),
            other => Err(ObjectError::UnknownKind(other.to_string())),
        }
    }
}
