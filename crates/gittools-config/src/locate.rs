//! Discovery of the configuration file.
//!
//! The first of these that exists wins:
//!
//! 1. the file named by `$GITTOOLS_CONFIG` (which must exist);
//! 2. `gittools.yaml` in the repository's common git directory;
//! 3. `$XDG_CONFIG_HOME/gittools/config.yaml`, falling back to
//!    `~/.config/gittools/config.yaml`.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "GITTOOLS_CONFIG";

/// File name looked up inside the git common directory.
pub const REPO_CONFIG_NAME: &str = "gittools.yaml";

/// Locate the configuration file for a repository whose common directory is
/// `common_dir` (pass `None` outside a repository).
///
/// Returns `Ok(None)` when no file exists, meaning defaults apply.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when `$GITTOOLS_CONFIG` names a file
/// that does not exist.
pub fn find_config_file(common_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let explicit = std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_config_file(explicit, common_dir, user_config_path())
}

/// The per-user configuration path, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("gittools").join("config.yaml"));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("gittools").join("config.yaml"))
}

fn resolve_config_file(
    explicit: Option<PathBuf>,
    common_dir: Option<&Path>,
    user: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    let repo = common_dir.map(|dir| dir.join(REPO_CONFIG_NAME));
    Ok([repo, user].into_iter().flatten().find(|path| path.is_file()))
}
