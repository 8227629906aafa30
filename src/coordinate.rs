// src/coordinate.rs

//! Package coordinates
//!
//! A coordinate identifies a package in a Maven-style repository using the
//! format `group:artifact[:version][@classifier]`.
//!
//! Examples:
//! - `com.android.support:support-compat:26.0.0`
//! - `com.google.firebase:firebase-app-unity:4.3.0@srcaar`
//! - `com.example:foo` - versionless, resolved to the latest release
//!
//! The classifier selects an alternate artifact type published next to the
//! default one. Coordinates compare, hash and sort by their full display
//! string.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Separator between group, artifact and version
pub const FIELD_SEPARATOR: char = ':';

/// Separator that introduces the classifier
pub const CLASSIFIER_SEPARATOR: char = '@';

/// Reserved classifier probed when the default lookup misses
pub const FALLBACK_CLASSIFIER: &str = "srcaar";

/// Archive extension that fallback artifacts are copied as
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "aar";

/// A package coordinate
#[derive(Debug, Clone)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
}

impl Coordinate {
    /// Create a complete coordinate
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.map(str::to_string),
            classifier: None,
        }
    }

    /// Parse a coordinate string
    ///
    /// Never fails. A specifier with fewer than two components produces a
    /// coordinate that is only good for display; check [`Coordinate::is_complete`]
    /// before using it for lookups or grouping.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        let (body, classifier) = match spec.split_once(CLASSIFIER_SEPARATOR) {
            Some((body, classifier)) => (body, non_empty(classifier)),
            None => (spec, None),
        };

        let mut parts = body.splitn(3, FIELD_SEPARATOR);
        let group = parts.next().unwrap_or_default().trim().to_string();
        let artifact = parts.next().unwrap_or_default().trim().to_string();
        let version = parts.next().and_then(non_empty);

        Self {
            group,
            artifact,
            version,
            classifier,
        }
    }

    /// Whether group and artifact are both present
    pub fn is_complete(&self) -> bool {
        !self.group.is_empty() && !self.artifact.is_empty()
    }

    /// `group.artifact`, the "already resolved" signal
    ///
    /// Ignores version and classifier on purpose.
    pub fn versionless_key(&self) -> String {
        format!("{}.{}", self.group, self.artifact)
    }

    /// `group:artifact`, used for conflict grouping and missing detection
    pub fn group_artifact_key(&self) -> String {
        format!("{}{}{}", self.group, FIELD_SEPARATOR, self.artifact)
    }

    /// `group:artifact:version` without the classifier, the string lock
    /// group patterns are matched against
    pub fn lock_key(&self) -> String {
        match &self.version {
            Some(version) => format!("{}{}{}", self.group_artifact_key(), FIELD_SEPARATOR, version),
            None => self.group_artifact_key(),
        }
    }

    /// Copy of this coordinate with a different version
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..self.clone()
        }
    }

    /// Copy of this coordinate with a different classifier
    pub fn with_classifier(&self, classifier: &str) -> Self {
        Self {
            classifier: Some(classifier.to_string()),
            ..self.clone()
        }
    }

    /// Whether this coordinate asks for the fallback artifact type
    pub fn is_fallback(&self) -> bool {
        self.classifier.as_deref() == Some(FALLBACK_CLASSIFIER)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.group)?;
        // An empty artifact keeps its separator when a version follows
        if !self.artifact.is_empty() || self.version.is_some() {
            write!(f, "{}{}", FIELD_SEPARATOR, self.artifact)?;
        }
        if let Some(ref version) = self.version {
            write!(f, "{}{}", FIELD_SEPARATOR, version)?;
        }
        if let Some(ref classifier) = self.classifier {
            write!(f, "{}{}", CLASSIFIER_SEPARATOR, classifier)?;
        }
        Ok(())
    }
}

impl FromStr for Coordinate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Coordinate::parse(s))
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Split a raw package list into coordinates
///
/// Entries may be separated by `;`, `,` or whitespace. Empty entries are dropped.
pub fn parse_list(raw: &str) -> Vec<Coordinate> {
    raw.split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(Coordinate::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let c = Coordinate::parse("com.example:foo:1.0@srcaar");
        assert_eq!(c.group, "com.example");
        assert_eq!(c.artifact, "foo");
        assert_eq!(c.version.as_deref(), Some("1.0"));
        assert_eq!(c.classifier.as_deref(), Some("srcaar"));
        assert!(c.is_complete());
        assert!(c.is_fallback());
    }

    #[test]
    fn test_parse_versionless() {
        let c = Coordinate::parse("com.example:foo");
        assert_eq!(c.version, None);
        assert_eq!(c.classifier, None);
        assert!(c.is_complete());
        assert_eq!(c.to_string(), "com.example:foo");
    }

    #[test]
    fn test_parse_group_only_is_incomplete() {
        let c = Coordinate::parse("com.example");
        assert!(!c.is_complete());
        // Still displayable
        assert_eq!(c.to_string(), "com.example");
    }

    #[test]
    fn test_parse_empty_artifact_is_incomplete() {
        assert!(!Coordinate::parse("com.example:").is_complete());
        assert!(!Coordinate::parse(":foo:1.0").is_complete());
    }

    #[test]
    fn test_derived_keys() {
        let c = Coordinate::parse("com.android.support:support-compat:26.0.0");
        assert_eq!(c.versionless_key(), "com.android.support.support-compat");
        assert_eq!(c.group_artifact_key(), "com.android.support:support-compat");
        assert_eq!(c.lock_key(), "com.android.support:support-compat:26.0.0");
    }

    #[test]
    fn test_versionless_key_ignores_version_and_classifier() {
        let a = Coordinate::parse("com.example:foo:1.0");
        let b = Coordinate::parse("com.example:foo:2.0@srcaar");
        assert_eq!(a.versionless_key(), b.versionless_key());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_roundtrip_shape() {
        for spec in [
            "com.example:foo:1.0",
            "com.example:foo:1.0@srcaar",
            "com.example:foo@srcaar",
        ] {
            assert_eq!(Coordinate::parse(spec).to_string(), spec);
        }
    }

    #[test]
    fn test_ordering_is_by_display_string() {
        // '.' sorts before ':' so "a.b:x" comes first even though "a" < "a.b"
        let a = Coordinate::parse("a:x:1");
        let b = Coordinate::parse("a.b:x:1");
        assert!(b < a);
    }

    #[test]
    fn test_empty_artifact_not_equal_to_shorter_coordinate() {
        let incomplete = Coordinate::parse("g::1.0");
        let complete = Coordinate::parse("g:1.0");
        assert!(!incomplete.is_complete());
        assert!(complete.is_complete());
        assert_eq!(incomplete.to_string(), "g::1.0");
        assert_ne!(incomplete, complete);
        assert_ne!(incomplete.cmp(&complete), Ordering::Equal);

        let set: std::collections::HashSet<_> = [incomplete, complete].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_with_version_and_classifier() {
        let c = Coordinate::parse("com.example:foo:1.0");
        assert_eq!(c.with_version("2.0").to_string(), "com.example:foo:2.0");
        assert_eq!(
            c.with_classifier(FALLBACK_CLASSIFIER).to_string(),
            "com.example:foo:1.0@srcaar"
        );
    }

    #[test]
    fn test_parse_list_separators() {
        let list = parse_list("com.a:x:1;com.b:y:2, com.c:z:3\ncom.d:w");
        let strings: Vec<String> = list.iter().map(ToString::to_string).collect();
        assert_eq!(strings, vec!["com.a:x:1", "com.b:y:2", "com.c:z:3", "com.d:w"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list(" ;; ,").is_empty());
    }
}
