//! Configuration management for the gittools helpers.
//!
//! This crate handles locating and loading `gittools.yaml` files and
//! providing typed access to their values.

pub mod config;
pub mod locate;

pub use config::{ColorChoice, ConfigError, FindConfig, GitToolsConfig, MergeRepoConfig, load_config};
pub use locate::find_config_file;
