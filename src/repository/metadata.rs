// src/repository/metadata.rs

//! `maven-metadata.xml` parsing
//!
//! Only the `versioning` block is used: `release`, `latest` and the list of
//! published versions.

use crate::error::{Error, Result};
use crate::version;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Versioning information for one `group:artifact`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub release: Option<String>,
    pub latest: Option<String>,
    pub versions: Vec<String>,
}

impl MavenMetadata {
    /// Parse a metadata document
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut metadata = MavenMetadata::default();
        let mut path: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::ParseError(format!("Bad metadata text: {}", e)))?
                        .trim()
                        .to_string();
                    if text.is_empty() {
                        continue;
                    }
                    let tail: Vec<&str> = path.iter().rev().take(2).map(String::as_str).collect();
                    match tail.as_slice() {
                        ["release", "versioning"] => metadata.release = Some(text),
                        ["latest", "versioning"] => metadata.latest = Some(text),
                        ["version", "versions"] => metadata.versions.push(text),
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::ParseError(format!(
                        "Invalid maven-metadata.xml at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
        }

        Ok(metadata)
    }

    /// The version a versionless request resolves to
    ///
    /// `release`, then `latest`, then the highest parseable listed version.
    pub fn preferred_version(&self) -> Option<&str> {
        self.release
            .as_deref()
            .or(self.latest.as_deref())
            .or_else(|| {
                let parseable = self
                    .versions
                    .iter()
                    .filter(|v| version::compare(v, v).is_ok())
                    .map(String::as_str);
                version::max_version(parseable).ok().flatten()
            })
    }
}
