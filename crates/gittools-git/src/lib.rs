//! Git integration for the gittools helpers.
//!
//! Everything here goes through the `git` binary: [`commands`] runs it,
//! [`gitdir`] locates repositories, and [`plumbing`] turns plumbing output
//! into the typed records of `gittools-core`.

pub mod commands;
pub mod gitdir;
pub mod plumbing;

pub use commands::{GitError, GitRunner, Result};
