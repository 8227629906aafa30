// src/repository/mod.rs

//! Repository access
//!
//! This module provides:
//! - Repository locations (remote URLs and local directories)
//! - The `RepositoryClient` trait the resolver talks to
//! - A Maven-layout implementation with transitive dependency walking
//! - Construction of the default repository search list

mod client;
mod maven;
mod metadata;
mod pom;

pub use client::HttpClient;
pub use maven::MavenClient;
pub use metadata::MavenMetadata;
pub use pom::{PomDependency, PomParent, PomProject};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Google's Maven repository
pub const GOOGLE_MAVEN_URL: &str = "https://maven.google.com/";

/// Maven Central
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2/";

/// Maven repositories bundled with the Android SDK, relative to its root
pub const ANDROID_SDK_REPOSITORIES: [&str; 2] =
    ["extras/android/m2repository", "extras/google/m2repository"];

/// Where a repository lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoLocation {
    /// HTTP(S) repository; the URL always ends with `/`
    Remote(Url),
    /// Directory on the local filesystem
    Local(PathBuf),
}

impl RepoLocation {
    /// Parse a repository location
    ///
    /// `http://` and `https://` become remote repositories, `file://` URLs and
    /// plain paths become local ones.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::ParseError("empty repository location".to_string()));
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            let with_slash = if s.ends_with('/') {
                s.to_string()
            } else {
                format!("{s}/")
            };
            let url = Url::parse(&with_slash)
                .map_err(|e| Error::ParseError(format!("Invalid repository URL '{}': {}", s, e)))?;
            return Ok(RepoLocation::Remote(url));
        }

        if s.starts_with("file:") {
            let url = Url::parse(s)
                .map_err(|e| Error::ParseError(format!("Invalid repository URL '{}': {}", s, e)))?;
            let path = url
                .to_file_path()
                .map_err(|_| Error::ParseError(format!("Not a local path: {}", s)))?;
            return Ok(RepoLocation::Local(path));
        }

        Ok(RepoLocation::Local(PathBuf::from(s)))
    }

    /// Location of a file relative to the repository root
    pub fn locate(&self, relative: &str) -> Result<ContentLocation> {
        match self {
            RepoLocation::Remote(base) => base
                .join(relative)
                .map(ContentLocation::Remote)
                .map_err(|e| {
                    Error::ParseError(format!("Invalid path '{}' under {}: {}", relative, base, e))
                }),
            RepoLocation::Local(root) => Ok(ContentLocation::Local(root.join(relative))),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RepoLocation::Local(_))
    }
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoLocation::Remote(url) => write!(f, "{}", url),
            RepoLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Where a resolved artifact's bytes can be read from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentLocation {
    Remote(Url),
    Local(PathBuf),
}

impl fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentLocation::Remote(url) => write!(f, "{}", url),
            ContentLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// An artifact produced by a repository client
///
/// The coordinate is the module actually resolved, which can differ from
/// the request (transitive dependencies, conflict resolution).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    /// File extension of the artifact as published
    pub extension: String,
    pub location: ContentLocation,
}

impl ResolvedArtifact {
    pub fn new(coordinate: Coordinate, extension: impl Into<String>, location: ContentLocation) -> Self {
        Self {
            coordinate,
            extension: extension.into(),
            location,
        }
    }
}

/// How much of the dependency graph a lookup returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// The requested modules plus everything they depend on
    Transitive,
    /// Only the requested modules
    Direct,
}

/// Resolves coordinates against an ordered list of repositories
///
/// Lookups are lenient: coordinates that cannot be found are simply absent
/// from the output. `Err` is reserved for failures that make the whole
/// lookup meaningless, such as a repository that cannot be reached.
pub trait RepositoryClient {
    fn lookup(
        &self,
        coordinates: &[Coordinate],
        repositories: &[RepoLocation],
        mode: LookupMode,
    ) -> Result<Vec<ResolvedArtifact>>;
}

/// Inputs for building the repository search list
#[derive(Debug, Clone, Default)]
pub struct RepositorySettings {
    /// User-supplied repositories, highest priority first
    pub repositories: Vec<RepoLocation>,
    /// Include `~/.m2/repository`
    pub use_maven_local: bool,
    /// Android SDK root providing bundled m2repositories
    pub android_sdk: Option<PathBuf>,
    /// Include Google Maven and Maven Central
    pub use_remote_defaults: bool,
}

/// Build the ordered repository search list
///
/// Order: user repositories, Maven local, Android SDK repositories, then
/// the remote defaults. Duplicates keep their first position.
pub fn repository_list(settings: &RepositorySettings) -> Result<Vec<RepoLocation>> {
    let mut list: Vec<RepoLocation> = settings.repositories.clone();

    if settings.use_maven_local {
        match dirs::home_dir() {
            Some(home) => list.push(RepoLocation::Local(home.join(".m2").join("repository"))),
            None => tracing::warn!("Cannot locate home directory, skipping Maven local repository"),
        }
    }

    if let Some(ref sdk) = settings.android_sdk {
        list.extend(android_sdk_repositories(sdk));
    }

    if settings.use_remote_defaults {
        for url in [GOOGLE_MAVEN_URL, MAVEN_CENTRAL_URL] {
            list.push(RepoLocation::parse(url)?);
        }
    }

    let mut seen = std::collections::HashSet::new();
    list.retain(|repo| seen.insert(repo.clone()));
    Ok(list)
}

fn android_sdk_repositories(sdk: &Path) -> Vec<RepoLocation> {
    ANDROID_SDK_REPOSITORIES
        .iter()
        .map(|relative| sdk.join(relative))
        .filter(|path| {
            let exists = path.is_dir();
            if !exists {
                tracing::debug!("Android SDK repository {} not present", path.display());
            }
            exists
        })
        .map(RepoLocation::Local)
        .collect()
}
