// src/resolver/gap.rs

//! Requested packages that never resolved

use crate::coordinate::Coordinate;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Requested coordinates with no `group:artifact` match in the final set
///
/// The original request is returned for each gap, since nothing resolved
/// for it. Incomplete requests are ignored.
pub fn find_missing<'a, I>(requested: &[Coordinate], resolved: I) -> BTreeSet<Coordinate>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let resolved_keys: HashSet<String> = resolved
        .into_iter()
        .map(Coordinate::group_artifact_key)
        .collect();

    requested
        .iter()
        .filter(|c| c.is_complete())
        .filter(|c| !resolved_keys.contains(&c.group_artifact_key()))
        .inspect(|c| debug!("{} did not resolve", c))
        .cloned()
        .collect()
}
