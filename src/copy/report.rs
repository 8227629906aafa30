// src/copy/report.rs

//! End-of-run report

use super::CopyOutcome;
use crate::coordinate::Coordinate;
use crate::resolver::Modification;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// What a run copied, could not find, and re-versioned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Copied file names, sorted
    pub copied: BTreeSet<String>,
    /// Requested coordinates with nothing copied for their package, sorted
    pub missing: BTreeSet<Coordinate>,
    /// Version rewrites, sorted by original coordinate
    pub modifications: Vec<Modification>,
}

impl Report {
    /// Assemble the report for a run
    ///
    /// A complete requested coordinate is missing when no copied artifact
    /// shares its versionless key, so nothing is ever both copied and
    /// missing.
    pub fn build(
        requested: &[Coordinate],
        outcome: &CopyOutcome,
        modifications: &[Modification],
    ) -> Self {
        let missing = requested
            .iter()
            .filter(|c| c.is_complete())
            .filter(|c| !outcome.copied_keys.contains(&c.versionless_key()))
            .cloned()
            .collect();

        let mut modifications = modifications.to_vec();
        modifications.sort();
        modifications.dedup();

        Self {
            copied: outcome.copied.clone(),
            missing,
            modifications,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.missing.is_empty() && self.modifications.is_empty()
    }
}

fn section<I, T>(f: &mut fmt::Formatter<'_>, title: &str, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Ok(());
    }
    writeln!(f, "{title}")?;
    for item in items {
        writeln!(f, "{item}")?;
    }
    writeln!(f)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "Copied artifacts:", &self.copied)?;
        section(f, "Missing artifacts:", &self.missing)?;
        section(f, "Modified artifacts:", &self.modifications)
    }
}
