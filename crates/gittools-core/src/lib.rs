//! Core types for the gittools helpers.
//!
//! This crate holds the in-memory object table that `git-find` builds from
//! `git` output, the name model (`master~2^2`, `v1.0^{}`, `HEAD@{3}`), the
//! propagation of names from refs toward ancestors, and the line parsers
//! that turn plumbing output into typed records.

pub mod graph;
pub mod naming;
pub mod object;
pub mod parse;
