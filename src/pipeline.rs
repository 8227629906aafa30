// src/pipeline.rs

//! End-to-end copy run
//!
//! ```text
//! requested ──> resolve (default, then fallback classifier)
//!                  │
//!                  v
//!              reconcile (lock groups)
//!                  │
//!                  v
//!              find_missing ──> copy set = reconciled ∪ missing
//!                  │
//!                  v
//!              direct lookup of the copy set
//!                  │
//!                  v
//!              plan ──> execute ──> Report
//! ```

use crate::coordinate::Coordinate;
use crate::copy::{self, Report};
use crate::error::Result;
use crate::progress::ProgressTracker;
use crate::repository::{LookupMode, RepoLocation, RepositoryClient};
use crate::resolver::{self, LockGroup};
use crate::transfer::FileTransfer;
use std::path::PathBuf;
use tracing::info;

/// Inputs for one run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub packages: Vec<Coordinate>,
    pub repositories: Vec<RepoLocation>,
    pub target_dir: PathBuf,
    pub lock_groups: Vec<LockGroup>,
}

/// Resolve, reconcile and copy the requested packages
///
/// Unresolved packages end up in the report. Collaborator failures and
/// malformed versions inside lock groups abort the run.
pub fn run<C, T>(
    client: &C,
    transfer: &T,
    request: &RunRequest,
    progress: &dyn ProgressTracker,
) -> Result<Report>
where
    C: RepositoryClient + ?Sized,
    T: FileTransfer + ?Sized,
{
    info!(
        "Resolving {} packages against {} repositories",
        request.packages.len(),
        request.repositories.len()
    );

    let resolved = resolver::resolve(client, &request.packages, &request.repositories)?;
    let reconciled = resolver::reconcile(&resolved, &request.lock_groups)?;
    let missing = resolver::find_missing(&request.packages, &reconciled.coordinates);

    let mut copy_set = reconciled.coordinates.clone();
    copy_set.extend(missing.iter().cloned());
    let copy_set: Vec<Coordinate> = copy_set.into_iter().collect();

    let artifacts = client.lookup(&copy_set, &request.repositories, LookupMode::Direct)?;
    info!(
        "{} of {} coordinates located for copying",
        artifacts.len(),
        copy_set.len()
    );

    let entries = copy::plan(&artifacts, &request.target_dir);
    let outcome = copy::execute(&entries, transfer, progress)?;

    Ok(Report::build(
        &request.packages,
        &outcome,
        &reconciled.modifications,
    ))
}
