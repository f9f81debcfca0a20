//! Configuration types and loading.
//!
//! The main entry point is [`GitToolsConfig`], which represents the contents
//! of a `gittools.yaml` file. Configuration is loaded with [`load_config`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A file named explicitly (e.g. through `$GITTOOLS_CONFIG`) is missing.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when stdout is a terminal and the environment allows it.
    #[default]
    Auto,
    Always,
    Never,
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// `find:` section, read by `git-find`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FindConfig {
    /// Name history reachable only from reflogs.
    #[serde(default = "default_true")]
    pub reflogs: bool,

    /// Include dangling commits and tags reported by `git fsck`.
    #[serde(default = "default_true")]
    pub dangling: bool,

    /// Treat `HEAD` as a name.
    #[serde(default = "default_true")]
    pub head: bool,

    /// Hex digits shown for abbreviated ids.
    #[serde(default = "default_abbrev")]
    pub abbrev: usize,

    /// Maximum names printed per object; 0 means no limit.
    #[serde(default)]
    pub max_names: usize,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            reflogs: true,
            dangling: true,
            head: true,
            abbrev: default_abbrev(),
            max_names: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_abbrev() -> usize {
    7
}

/// `merge-repo:` section, read by `git-merge-repo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergeRepoConfig {
    /// Branch of the other repository to merge.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Pass `--allow-unrelated-histories` to the merge step.
    #[serde(default = "default_true")]
    pub allow_unrelated_histories: bool,
}

impl Default for MergeRepoConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            allow_unrelated_histories: true,
        }
    }
}

fn default_branch() -> String {
    "master".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full configuration, corresponding to `gittools.yaml`.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// will be deserialized correctly with sensible default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitToolsConfig {
    /// The git binary to run.
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default)]
    pub color: ColorChoice,

    /// Page long reports through `$PAGER`.
    #[serde(default = "default_true")]
    pub pager: bool,

    #[serde(default)]
    pub find: FindConfig,

    #[serde(default)]
    pub merge_repo: MergeRepoConfig,
}

impl Default for GitToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            color: ColorChoice::default(),
            pager: true,
            find: FindConfig::default(),
            merge_repo: MergeRepoConfig::default(),
        }
    }
}

fn default_git() -> String {
    "git".to_string()
}

impl GitToolsConfig {
    /// Check value ranges that YAML types alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.git.trim().is_empty() {
            return Err(invalid("git", "must name a git binary"));
        }
        if !(4..=64).contains(&self.find.abbrev) {
            return Err(invalid("find.abbrev", "must be between 4 and 64"));
        }
        if self.merge_repo.branch.trim().is_empty() {
            return Err(invalid("merge-repo.branch", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load and validate configuration from `path`.
///
/// If the file does not exist or is empty, a default [`GitToolsConfig`] is
/// returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// [`ConfigError::ParseError`] if it contains invalid YAML, or
/// [`ConfigError::InvalidValue`] if a value is out of range.
pub fn load_config(path: &Path) -> Result<GitToolsConfig> {
    if !path.exists() {
        return Ok(GitToolsConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(GitToolsConfig::default());
    }

    let config: GitToolsConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = GitToolsConfig::default();
        assert_eq!(cfg.git, "git");
        assert_eq!(cfg.color, ColorChoice::Auto);
        assert!(cfg.pager);
        assert!(cfg.find.reflogs && cfg.find.dangling && cfg.find.head);
        assert_eq!(cfg.find.abbrev, 7);
        assert_eq!(cfg.merge_repo.branch, "master");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config_returns_default() {
        let cfg = load_config(Path::new("/nonexistent/path/gittools.yaml")).unwrap();
        assert_eq!(cfg.find.abbrev, 7);
    }

    #[test]
    fn test_load_empty_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gittools.yaml");
        std::fs::write(&path, "\n  \n").unwrap();
        assert!(load_config(&path).unwrap().find.head);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "color: never\nfind:\n  reflogs: false\n  max-names: 3\nmerge-repo:\n  branch: main\n";
        let cfg: GitToolsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.color, ColorChoice::Never);
        assert!(!cfg.find.reflogs);
        assert_eq!(cfg.find.max_names, 3);
        // Everything else should be default
        assert!(cfg.find.dangling);
        assert_eq!(cfg.find.abbrev, 7);
        assert_eq!(cfg.merge_repo.branch, "main");
        assert!(cfg.merge_repo.allow_unrelated_histories);
    }

    #[test]
    fn test_invalid_abbrev_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gittools.yaml");
        std::fs::write(&path, "find:\n  abbrev: 2\n").unwrap();
        match load_config(&path).unwrap_err() {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "find.abbrev"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gittools.yaml");
        std::fs::write(&path, "find: [unclosed\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
