// src/lib.rs

//! mvncopy
//!
//! Resolves Maven package coordinates against a list of repositories and
//! copies the resulting artifacts into one directory.
//!
//! # Architecture
//!
//! - Two-phase lookup: misses are retried under the `srcaar` classifier
//! - Lock groups: related packages are forced onto their highest version
//! - Idempotent copies: files already at the destination are not fetched
//! - Report: copied files, missing packages and version rewrites

pub mod config;
pub mod coordinate;
pub mod copy;
mod error;
pub mod pipeline;
pub mod progress;
pub mod repository;
pub mod resolver;
pub mod transfer;
pub mod version;

pub use config::{ConfigError, ConfigFile, LockGroupConfig, Settings};
pub use coordinate::Coordinate;
pub use copy::{CopyOutcome, CopyPlanEntry, Report};
pub use error::{Error, Result};
pub use pipeline::{RunRequest, run};
pub use progress::{CliProgress, LogProgress, ProgressTracker, SilentProgress};
pub use repository::{
    ContentLocation, LookupMode, MavenClient, RepoLocation, RepositoryClient, ResolvedArtifact,
};
pub use resolver::{LockGroup, Modification, ReconciliationResult};
pub use transfer::{ArtifactTransfer, FileTransfer};
