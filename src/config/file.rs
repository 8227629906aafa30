// src/config/file.rs

//! Parser for mvncopy TOML configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Contents of a configuration file
///
/// ```toml
/// packages = ["com.android.support:support-compat:26.0.0"]
/// repositories = ["https://maven.example.com/releases"]
/// target_dir = "Assets/Plugins/Android"
/// maven_local = true
///
/// [[lock_group]]
/// pattern = 'com\.android\.support:.*'
/// exclude = 'com\.android\.support:multidex.*'
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Package coordinates to copy
    #[serde(default)]
    pub packages: Vec<String>,

    /// Repositories searched before the built-in ones
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Destination directory
    pub target_dir: Option<PathBuf>,

    /// Android SDK root
    pub android_sdk: Option<PathBuf>,

    /// Search `~/.m2/repository`
    pub maven_local: Option<bool>,

    /// Skip Google Maven and Maven Central
    pub no_remote_repos: Option<bool>,

    /// Version lock groups; the built-in set is used when empty
    #[serde(default, rename = "lock_group")]
    pub lock_groups: Vec<LockGroupConfig>,
}

/// A `[[lock_group]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockGroupConfig {
    /// Regex matched against `group:artifact:version`
    pub pattern: String,

    /// Regex removing matches from the group
    pub exclude: Option<String>,
}

impl LockGroupConfig {
    pub fn new(pattern: &str, exclude: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_string(),
            exclude: exclude.map(str::to_string),
        }
    }
}

impl ConfigFile {
    /// Validate the configuration for consistency
    pub fn validate(&self) -> ConfigResult<()> {
        for (index, group) in self.lock_groups.iter().enumerate() {
            if group.pattern.trim().is_empty() {
                return Err(ConfigError::InvalidLockGroup(format!(
                    "lock_group #{} has an empty pattern",
                    index + 1
                )));
            }
            if group.exclude.as_deref().is_some_and(|e| e.trim().is_empty()) {
                return Err(ConfigError::InvalidLockGroup(format!(
                    "lock_group #{} has an empty exclude pattern",
                    index + 1
                )));
            }
        }

        if self.target_dir.as_deref() == Some(Path::new("")) {
            return Err(ConfigError::MissingTargetDir);
        }

        Ok(())
    }
}

/// Parse a configuration file
pub fn parse_config_file(path: &Path) -> ConfigResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_string(&content)
}

/// Parse a configuration from a TOML string
pub fn parse_config_string(content: &str) -> ConfigResult<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
packages = ["com.example:foo:1.0", "com.example:bar:2.0@srcaar"]
repositories = ["https://maven.example.com/releases", "/opt/m2"]
target_dir = "out/libs"
maven_local = true

[[lock_group]]
pattern = 'com\.example:.*'
exclude = 'com\.example:bar.*'

[[lock_group]]
pattern = 'org\.other:.*'
"#;
        let config = parse_config_string(toml).unwrap();
        assert_eq!(config.packages.len(), 2);
        assert_eq!(config.repositories[1], "/opt/m2");
        assert_eq!(config.target_dir, Some(PathBuf::from("out/libs")));
        assert_eq!(config.maven_local, Some(true));
        assert_eq!(config.no_remote_repos, None);
        assert_eq!(
            config.lock_groups,
            vec![
                LockGroupConfig::new(r"com\.example:.*", Some(r"com\.example:bar.*")),
                LockGroupConfig::new(r"org\.other:.*", None),
            ]
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_string("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config_string("pakages = []").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_empty_lock_pattern_rejected() {
        let toml = r#"
[[lock_group]]
pattern = " "
"#;
        let err = parse_config_string(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLockGroup(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/mvncopy.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
