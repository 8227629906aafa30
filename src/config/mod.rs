// src/config/mod.rs

//! Run configuration
//!
//! Settings come from two places: an optional TOML file and command-line
//! overrides (which clap also fills from environment variables). Overrides
//! win for scalar values; list values from both sources are combined with
//! command-line entries first.

mod file;

pub use file::{ConfigFile, LockGroupConfig, parse_config_file, parse_config_string};

use crate::coordinate::{self, Coordinate};
use crate::repository::{RepoLocation, RepositorySettings};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Lock groups used when the configuration declares none
///
/// `(pattern, exclude)` pairs matched against `group:artifact:version`.
pub const DEFAULT_LOCK_GROUPS: [(&str, Option<&str>); 3] = [
    (r"com\.android\.support:.*", Some(r"com\.android\.support:multidex.*")),
    (r"com\.google\.android\.gms:play-services-.*", None),
    (r"com\.google\.firebase:firebase-.*", None),
];

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("No packages to copy; pass --packages or set PACKAGES_TO_COPY")]
    MissingPackages,

    #[error("No target directory; pass --target-dir or set TARGET_DIR")]
    MissingTargetDir,

    #[error("Invalid repository '{location}': {reason}")]
    InvalidRepository { location: String, reason: String },

    #[error("Invalid lock group: {0}")]
    InvalidLockGroup(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The built-in lock groups
pub fn default_lock_groups() -> Vec<LockGroupConfig> {
    DEFAULT_LOCK_GROUPS
        .iter()
        .map(|(pattern, exclude)| LockGroupConfig::new(pattern, *exclude))
        .collect()
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Raw package lists, each possibly holding several coordinates
    pub packages: Vec<String>,
    pub target_dir: Option<PathBuf>,
    pub repositories: Vec<String>,
    pub android_sdk: Option<PathBuf>,
    pub maven_local: bool,
    pub no_remote_repos: bool,
}

/// Fully merged settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub packages: Vec<Coordinate>,
    pub target_dir: PathBuf,
    pub repositories: RepositorySettings,
    pub lock_groups: Vec<LockGroupConfig>,
}

impl Settings {
    /// Merge command-line overrides with a configuration file
    pub fn resolve(overrides: Overrides, file: ConfigFile) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        let packages: Vec<Coordinate> = overrides
            .packages
            .iter()
            .chain(file.packages.iter())
            .flat_map(|raw| coordinate::parse_list(raw))
            .filter(|c| seen.insert(c.to_string()))
            .collect();
        if packages.is_empty() {
            return Err(ConfigError::MissingPackages);
        }

        let target_dir = overrides
            .target_dir
            .or(file.target_dir)
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::MissingTargetDir)?;

        let repositories = overrides
            .repositories
            .iter()
            .chain(file.repositories.iter())
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                RepoLocation::parse(raw).map_err(|e| ConfigError::InvalidRepository {
                    location: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let lock_groups = if file.lock_groups.is_empty() {
            default_lock_groups()
        } else {
            file.lock_groups
        };

        Ok(Self {
            packages,
            target_dir,
            repositories: RepositorySettings {
                repositories,
                use_maven_local: overrides.maven_local || file.maven_local.unwrap_or(false),
                android_sdk: overrides.android_sdk.or(file.android_sdk),
                use_remote_defaults: !(overrides.no_remote_repos
                    || file.no_remote_repos.unwrap_or(false)),
            },
            lock_groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(packages: &str, target: &str) -> Overrides {
        Overrides {
            packages: vec![packages.to_string()],
            target_dir: Some(PathBuf::from(target)),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_from_overrides_only() {
        let settings =
            Settings::resolve(overrides("a:b:1.0;c:d:2.0", "out"), ConfigFile::default()).unwrap();
        assert_eq!(settings.packages.len(), 2);
        assert_eq!(settings.packages[1].to_string(), "c:d:2.0");
        assert_eq!(settings.target_dir, PathBuf::from("out"));
        assert!(settings.repositories.use_remote_defaults);
        assert!(!settings.repositories.use_maven_local);
        assert_eq!(settings.lock_groups, default_lock_groups());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let file = parse_config_string(
            r#"
packages = ["a:b:1.0", "e:f:3.0"]
repositories = ["https://file.example.com/m2"]
target_dir = "from-file"
no_remote_repos = true

[[lock_group]]
pattern = 'e:.*'
"#,
        )
        .unwrap();
        let mut cli = overrides("a:b:1.0", "from-cli");
        cli.repositories = vec!["https://cli.example.com/m2".to_string()];

        let settings = Settings::resolve(cli, file).unwrap();
        assert_eq!(settings.target_dir, PathBuf::from("from-cli"));
        let packages: Vec<String> = settings.packages.iter().map(|c| c.to_string()).collect();
        assert_eq!(packages, vec!["a:b:1.0", "e:f:3.0"]);
        let repos: Vec<String> = settings
            .repositories
            .repositories
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(
            repos,
            vec!["https://cli.example.com/m2/", "https://file.example.com/m2/"]
        );
        assert!(!settings.repositories.use_remote_defaults);
        assert_eq!(settings.lock_groups, vec![LockGroupConfig::new("e:.*", None)]);
    }

    #[test]
    fn test_missing_packages() {
        let err = Settings::resolve(overrides(" ; ", "out"), ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPackages));
    }

    #[test]
    fn test_missing_target_dir() {
        let mut cli = overrides("a:b:1.0", "");
        cli.target_dir = None;
        let err = Settings::resolve(cli, ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTargetDir));
    }

    #[test]
    fn test_default_lock_groups() {
        let groups = default_lock_groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0].exclude.as_deref(),
            Some(r"com\.android\.support:multidex.*")
        );
    }
}
