// src/resolver/reconcile.rs

//! Version lock reconciliation
//!
//! Packages released together (the Android support library, Play services,
//! Firebase) break when mixed across versions. A lock group collects every
//! resolved artifact whose `group:artifact:version` matches its pattern and
//! moves all of them to the highest version present.
//!
//! An artifact whose key matches the pattern of more than one group is
//! ambiguous and is left unlocked.

use crate::config::LockGroupConfig;
use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::repository::ResolvedArtifact;
use crate::version;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::{debug, info};

/// Packages that must share one version
#[derive(Debug, Clone)]
pub struct LockGroup {
    pattern: Regex,
    exclude: Option<Regex>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl LockGroup {
    /// Create a lock group from full-match patterns
    pub fn new(pattern: &str, exclude: Option<&str>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            exclude: exclude.map(compile).transpose()?,
        })
    }

    /// Compile a configured lock group
    pub fn from_config(config: &LockGroupConfig) -> Result<Self> {
        Self::new(&config.pattern, config.exclude.as_deref())
    }

    /// Compile every configured lock group, keeping their order
    pub fn compile_all(configs: &[LockGroupConfig]) -> Result<Vec<Self>> {
        configs.iter().map(Self::from_config).collect()
    }

    /// Whether a lock key matches this group's pattern, ignoring the exclusion
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    /// Whether a lock key is removed from this group by its exclude pattern
    pub fn excludes(&self, key: &str) -> bool {
        self.exclude.as_ref().is_some_and(|e| e.is_match(key))
    }
}

/// A coordinate whose version was rewritten
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Modification {
    pub original: Coordinate,
    pub updated: Coordinate,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.original, self.updated)
    }
}

/// Output of [`reconcile`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Final coordinates, unique by full string
    pub coordinates: BTreeSet<Coordinate>,
    /// Rewrites in the order they were made
    pub modifications: Vec<Modification>,
}

/// Index of the group that owns a lock key, if exactly one can
fn owner(key: &str, groups: &[LockGroup]) -> Option<usize> {
    let mut matching = groups
        .iter()
        .enumerate()
        .filter(|(_, group)| group.matches(key));

    let (index, group) = matching.next()?;
    if matching.next().is_some() {
        debug!("{} matches several lock groups, leaving it unlocked", key);
        return None;
    }
    if group.excludes(key) {
        return None;
    }
    Some(index)
}

/// Force every lock group's members onto the group's highest version
///
/// Every input artifact contributes exactly one coordinate to the output:
/// untouched when it belongs to no group, rewritten otherwise. A version the
/// comparator cannot parse inside a lock group fails the whole run.
pub fn reconcile(
    resolved: &[ResolvedArtifact],
    groups: &[LockGroup],
) -> Result<ReconciliationResult> {
    let mut members: Vec<Vec<&Coordinate>> = vec![Vec::new(); groups.len()];
    let mut result = ReconciliationResult::default();

    for artifact in resolved {
        let coordinate = &artifact.coordinate;
        let owned = coordinate
            .version
            .as_ref()
            .and_then(|_| owner(&coordinate.lock_key(), groups));
        match owned {
            Some(index) => members[index].push(coordinate),
            None => {
                result.coordinates.insert(coordinate.clone());
            }
        }
    }

    let mut recorded = HashSet::new();
    for (group, members) in groups.iter().zip(members) {
        if members.is_empty() {
            continue;
        }

        let versions = members.iter().filter_map(|c| c.version.as_deref());
        let Some(target) = version::max_version(versions)?.map(str::to_string) else {
            continue;
        };
        debug!(
            "Lock group {} has {} members at version {}",
            group.pattern,
            members.len(),
            target
        );

        for coordinate in members {
            let updated = coordinate.with_version(&target);
            if updated != *coordinate {
                let modification = Modification {
                    original: coordinate.clone(),
                    updated: updated.clone(),
                };
                if recorded.insert(modification.clone()) {
                    info!("Locked {}", modification);
                    result.modifications.push(modification);
                }
            }
            result.coordinates.insert(updated);
        }
    }

    Ok(result)
}
