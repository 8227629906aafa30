// src/version/mod.rs

//! Version comparison and range matching
//!
//! Versions are compared numerically segment by segment:
//! - the version is split on `.`
//! - each segment is split on `-` and only the first piece is used
//! - that piece must be a non-empty run of ASCII digits, of any length
//!
//! The first differing segment decides. When the common prefix is equal the
//! version with more segments is greater, so `1.2 < 1.2.0 < 1.10.0`.
//!
//! This is a weak order: `1.0-alpha` and `1.0` compare equal. Callers that
//! need a total order use [`compare_total`], which breaks ties on the raw
//! string.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// Numeric segments with leading zeros stripped
fn segments(version: &str) -> Result<Vec<&str>> {
    version
        .split('.')
        .map(|segment| {
            let head = segment.split('-').next().unwrap_or_default();
            if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::MalformedVersion {
                    version: version.to_string(),
                    reason: format!("segment '{}' is not numeric", segment),
                });
            }
            Ok(head.trim_start_matches('0'))
        })
        .collect()
}

/// Order digit strings numerically without a width limit
fn cmp_segments(left: &[&str], right: &[&str]) -> Ordering {
    left.iter()
        .zip(right.iter())
        .map(|(l, r)| l.len().cmp(&r.len()).then_with(|| l.cmp(r)))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

/// Compare two version strings
pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    Ok(cmp_segments(&segments(a)?, &segments(b)?))
}

/// Compare two versions, breaking numeric ties deterministically
///
/// Among versions that compare equal the lexicographically smaller string is
/// treated as greater, so `26.0.1` wins over `26.0.1-rc1`.
pub fn compare_total(a: &str, b: &str) -> Result<Ordering> {
    Ok(compare(a, b)?.then_with(|| b.cmp(a)))
}

/// Sort versions ascending
///
/// Stable: versions that compare equal keep their input order.
pub fn sort_ascending<S: AsRef<str>>(versions: &[S]) -> Result<Vec<String>> {
    // Validate up front so the sort comparator cannot fail
    let mut keyed = versions
        .iter()
        .map(|v| Ok((segments(v.as_ref())?, v.as_ref().to_string())))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(a, _), (b, _)| cmp_segments(a, b));

    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}

/// Pick the greatest version using [`compare_total`]
///
/// Returns `None` for an empty input. Every candidate is validated, including
/// a lone one.
pub fn max_version<'a, I>(versions: I) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&str> = None;
    for candidate in versions {
        let replace = match best {
            Some(current) => compare_total(candidate, current)? == Ordering::Greater,
            None => {
                segments(candidate)?;
                true
            }
        };
        if replace {
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// One side of a version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: String,
    pub inclusive: bool,
}

/// A Maven dependency version requirement
///
/// Examples:
/// - `1.2.3` → Soft(1.2.3), a preferred version
/// - `[1.2.3]` → Range with both bounds inclusive at 1.2.3
/// - `[1.0,2.0)` → 1.0 <= v < 2.0
/// - `(,1.5]` → v <= 1.5
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRange {
    /// Plain version, no range syntax
    Soft(String),
    /// Bounded range; either side may be open
    Range {
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
}

impl VersionRange {
    /// Parse a version requirement
    ///
    /// Multi-set ranges (`[1,2),[3,4)`) keep only the last set, which holds the
    /// newest versions.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let starts_range = s.starts_with('[') || s.starts_with('(');
        if !starts_range {
            if s.is_empty() {
                return Err(Error::ParseError("empty version requirement".to_string()));
            }
            return Ok(VersionRange::Soft(s.to_string()));
        }

        let last_set = match s.rfind(['[', '(']) {
            Some(pos) => &s[pos..],
            None => s,
        };

        let open = last_set.chars().next().unwrap_or('[');
        let close = last_set.chars().last().unwrap_or(']');
        if !matches!(close, ']' | ')') || last_set.len() < 2 {
            return Err(Error::ParseError(format!("unterminated version range '{}'", s)));
        }

        let inner = &last_set[1..last_set.len() - 1];
        let bound = |v: &str, inclusive: bool| {
            let v = v.trim();
            (!v.is_empty()).then(|| Bound {
                version: v.to_string(),
                inclusive,
            })
        };

        match inner.split_once(',') {
            Some((lo, hi)) => Ok(VersionRange::Range {
                lower: bound(lo, open == '['),
                upper: bound(hi, close == ']'),
            }),
            None => {
                let pinned = bound(inner, true).ok_or_else(|| {
                    Error::ParseError(format!("empty version range '{}'", s))
                })?;
                Ok(VersionRange::Range {
                    lower: Some(pinned.clone()),
                    upper: Some(pinned),
                })
            }
        }
    }

    /// The single version this requirement names, if it names exactly one
    pub fn pinned(&self) -> Option<&str> {
        match self {
            VersionRange::Soft(v) => Some(v),
            VersionRange::Range {
                lower: Some(lo),
                upper: Some(hi),
            } if lo.version == hi.version && lo.inclusive && hi.inclusive => Some(&lo.version),
            VersionRange::Range { .. } => None,
        }
    }

    /// Check whether a version satisfies this requirement
    pub fn contains(&self, version: &str) -> Result<bool> {
        match self {
            VersionRange::Soft(v) => Ok(compare(version, v)? == Ordering::Equal),
            VersionRange::Range { lower, upper } => {
                if let Some(lo) = lower {
                    let ord = compare(version, &lo.version)?;
                    if ord == Ordering::Less || (ord == Ordering::Equal && !lo.inclusive) {
                        return Ok(false);
                    }
                }
                if let Some(hi) = upper {
                    let ord = compare(version, &hi.version)?;
                    if ord == Ordering::Greater || (ord == Ordering::Equal && !hi.inclusive) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Highest version from `available` inside this requirement
    ///
    /// Versions that fail to parse are skipped.
    pub fn select<'a>(&self, available: &'a [String]) -> Option<&'a str> {
        let inside = available
            .iter()
            .filter(|v| self.contains(v).unwrap_or(false))
            .map(String::as_str);
        max_version(inside).ok().flatten()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Soft(v) => write!(f, "{}", v),
            VersionRange::Range { lower, upper } => {
                let open = if lower.as_ref().is_some_and(|b| b.inclusive) { '[' } else { '(' };
                let close = if upper.as_ref().is_some_and(|b| b.inclusive) { ']' } else { ')' };
                let lo = lower.as_ref().map_or("", |b| b.version.as_str());
                let hi = upper.as_ref().map_or("", |b| b.version.as_str());
                if self.pinned().is_some() {
                    write!(f, "[{}]", lo)
                } else {
                    write!(f, "{}{},{}{}", open, lo, hi, close)
                }
            }
        }
    }
}
