//! Terminal UI components for the gittools helpers.
//!
//! Provides colour styling, terminal detection, and pager support for CLI
//! output.

pub mod pager;
pub mod styles;
pub mod terminal;
