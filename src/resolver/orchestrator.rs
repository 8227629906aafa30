// src/resolver/orchestrator.rs

//! Two-phase lookup
//!
//! Phase one asks the repository client for every complete requested
//! coordinate. Phase two retries the misses under the fallback classifier,
//! since repository indexes often leave the alternate packaging out.

use crate::coordinate::{Coordinate, FALLBACK_CLASSIFIER};
use crate::error::Result;
use crate::repository::{LookupMode, RepoLocation, RepositoryClient, ResolvedArtifact};
use std::collections::HashSet;
use tracing::{debug, info};

/// Resolve requested coordinates, retrying misses with the fallback classifier
///
/// Incomplete coordinates are skipped. Unresolved coordinates are not an
/// error; they are simply absent from the output. The output is not
/// deduplicated by package: a default and a fallback artifact for the same
/// package can both appear.
pub fn resolve<C: RepositoryClient + ?Sized>(
    client: &C,
    requested: &[Coordinate],
    repositories: &[RepoLocation],
) -> Result<Vec<ResolvedArtifact>> {
    let complete: Vec<Coordinate> = requested
        .iter()
        .filter(|c| {
            if !c.is_complete() {
                debug!("Skipping incomplete coordinate '{}'", c);
            }
            c.is_complete()
        })
        .cloned()
        .collect();

    if complete.is_empty() {
        return Ok(Vec::new());
    }

    let phase1 = client.lookup(&complete, repositories, LookupMode::Transitive)?;
    info!(
        "Phase 1 resolved {} artifacts for {} coordinates",
        phase1.len(),
        complete.len()
    );

    let resolved_keys: HashSet<String> = phase1
        .iter()
        .map(|a| a.coordinate.versionless_key())
        .collect();

    let retry: Vec<Coordinate> = complete
        .iter()
        .filter(|c| c.classifier.is_none() && !resolved_keys.contains(&c.versionless_key()))
        .map(|c| c.with_classifier(FALLBACK_CLASSIFIER))
        .collect();

    let mut artifacts = phase1;
    if !retry.is_empty() {
        debug!(
            "Retrying {} coordinates with classifier {}",
            retry.len(),
            FALLBACK_CLASSIFIER
        );
        let phase2 = client.lookup(&retry, repositories, LookupMode::Transitive)?;
        info!("Phase 2 resolved {} artifacts", phase2.len());
        artifacts.extend(phase2);
    }

    let mut seen = HashSet::new();
    artifacts.retain(|a| seen.insert(a.clone()));
    Ok(artifacts)
}
