// src/transfer.rs

//! Artifact file transfer
//!
//! Copies resolved artifacts from their repository into the destination
//! directory. Files are written to a temporary name next to the
//! destination and renamed into place, so an interrupted run never leaves a
//! truncated artifact that a later run would treat as already copied.

use crate::error::{Error, Result};
use crate::repository::{ContentLocation, HttpClient, ResolvedArtifact};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Moves artifact bytes to a destination path
pub trait FileTransfer {
    /// Whether the destination already holds a file
    fn exists(&self, path: &Path) -> bool;

    /// Copy an artifact to `destination`
    fn copy(&self, artifact: &ResolvedArtifact, destination: &Path) -> Result<()>;
}

/// Transfer for local and remote Maven repositories
#[derive(Debug, Clone)]
pub struct ArtifactTransfer {
    http: HttpClient,
}

impl ArtifactTransfer {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn copy_local(source: &Path, destination: &Path) -> io::Result<u64> {
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut input = File::open(source)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        let copied = io::copy(&mut input, temp.as_file_mut())?;
        temp.persist(destination).map_err(|e| e.error)?;
        Ok(copied)
    }
}

impl FileTransfer for ArtifactTransfer {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn copy(&self, artifact: &ResolvedArtifact, destination: &Path) -> Result<()> {
        let failed = |reason: String| Error::TransferFailed {
            artifact: artifact.coordinate.to_string(),
            destination: destination.display().to_string(),
            reason,
        };

        match &artifact.location {
            ContentLocation::Local(source) => {
                let bytes =
                    Self::copy_local(source, destination).map_err(|e| failed(e.to_string()))?;
                debug!(
                    "Copied {} bytes from {} to {}",
                    bytes,
                    source.display(),
                    destination.display()
                );
                Ok(())
            }
            ContentLocation::Remote(url) => self
                .http
                .download_file(url, destination)
                .map_err(|e| failed(e.to_string())),
        }
    }
}
