// src/copy/mod.rs

//! Copy planning and execution
//!
//! Every resolved artifact is copied as `<group>.<artifact>-<version>.<ext>`.
//! Fallback artifacts take the default archive extension so consumers see
//! the same file name whichever classifier supplied them. A destination
//! file that already exists counts as copied and is not fetched again.

mod report;

pub use report::Report;

use crate::coordinate::{DEFAULT_ARCHIVE_EXTENSION, FALLBACK_CLASSIFIER};
use crate::error::Result;
use crate::progress::ProgressTracker;
use crate::repository::ResolvedArtifact;
use crate::transfer::FileTransfer;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension an artifact is copied under
pub fn normalized_extension(extension: &str) -> &str {
    if extension == FALLBACK_CLASSIFIER {
        DEFAULT_ARCHIVE_EXTENSION
    } else {
        extension
    }
}

/// File name an artifact is copied as, `None` without a version
pub fn target_filename(artifact: &ResolvedArtifact) -> Option<String> {
    let coordinate = &artifact.coordinate;
    let version = coordinate.version.as_deref()?;
    Some(format!(
        "{}-{}.{}",
        coordinate.versionless_key(),
        version,
        normalized_extension(&artifact.extension)
    ))
}

/// One artifact to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlanEntry {
    pub artifact: ResolvedArtifact,
    pub target_filename: String,
    pub destination: PathBuf,
}

/// Compute destinations for resolved artifacts
///
/// When two artifacts map to the same file name the first one wins.
pub fn plan(artifacts: &[ResolvedArtifact], destination_dir: &Path) -> Vec<CopyPlanEntry> {
    let mut names = HashSet::new();
    let mut entries = Vec::new();

    for artifact in artifacts {
        let Some(target_filename) = target_filename(artifact) else {
            warn!("Cannot copy {} without a version", artifact.coordinate);
            continue;
        };
        if !names.insert(target_filename.clone()) {
            debug!(
                "{} already planned, skipping {}",
                target_filename, artifact.coordinate
            );
            continue;
        }
        entries.push(CopyPlanEntry {
            artifact: artifact.clone(),
            destination: destination_dir.join(&target_filename),
            target_filename,
        });
    }

    entries
}

/// What a copy run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// File names present at the destination after the run
    pub copied: BTreeSet<String>,
    /// Versionless keys of the copied artifacts
    pub copied_keys: BTreeSet<String>,
    /// Artifacts fetched during this run
    pub transferred: usize,
    /// Artifacts already present
    pub skipped: usize,
}

/// Copy planned artifacts that are not at their destination yet
///
/// The first failed transfer aborts the run.
pub fn execute<T: FileTransfer + ?Sized>(
    entries: &[CopyPlanEntry],
    transfer: &T,
    progress: &dyn ProgressTracker,
) -> Result<CopyOutcome> {
    let mut outcome = CopyOutcome::default();
    progress.set_length(entries.len() as u64);

    for entry in entries {
        progress.set_message(&entry.target_filename);

        if transfer.exists(&entry.destination) {
            debug!("{} already present", entry.destination.display());
            outcome.skipped += 1;
        } else {
            if let Err(e) = transfer.copy(&entry.artifact, &entry.destination) {
                progress.finish_with_error(&format!("Failed to copy {}", entry.target_filename));
                return Err(e);
            }
            outcome.transferred += 1;
        }

        outcome.copied.insert(entry.target_filename.clone());
        outcome
            .copied_keys
            .insert(entry.artifact.coordinate.versionless_key());
        progress.increment(1);
    }

    progress.finish_with_message(&format!(
        "{} copied, {} already present",
        outcome.transferred, outcome.skipped
    ));
    info!(
        "Copied {} artifacts, {} already present",
        outcome.transferred, outcome.skipped
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::error::Error;
    use crate::progress::SilentProgress;
    use crate::repository::ContentLocation;
    use std::cell::{Cell, RefCell};

    fn artifact(coordinate: &str, extension: &str) -> ResolvedArtifact {
        ResolvedArtifact::new(
            Coordinate::parse(coordinate),
            extension,
            ContentLocation::Local(PathBuf::from("/repo/file")),
        )
    }

    /// Transfer that records destinations in memory
    #[derive(Default)]
    struct MemoryTransfer {
        present: RefCell<HashSet<PathBuf>>,
        copies: Cell<usize>,
        fail: bool,
    }

    impl FileTransfer for MemoryTransfer {
        fn exists(&self, path: &Path) -> bool {
            self.present.borrow().contains(path)
        }

        fn copy(&self, artifact: &ResolvedArtifact, destination: &Path) -> Result<()> {
            if self.fail {
                return Err(Error::TransferFailed {
                    artifact: artifact.coordinate.to_string(),
                    destination: destination.display().to_string(),
                    reason: "disk full".to_string(),
                });
            }
            self.copies.set(self.copies.get() + 1);
            self.present.borrow_mut().insert(destination.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_target_filename() {
        assert_eq!(
            target_filename(&artifact("com.example:foo:1.0@srcaar", "srcaar")).as_deref(),
            Some("com.example.foo-1.0.aar")
        );
        assert_eq!(
            target_filename(&artifact("com.example:lib:2.1", "jar")).as_deref(),
            Some("com.example.lib-2.1.jar")
        );
        assert_eq!(target_filename(&artifact("com.example:lib", "jar")), None);
    }

    #[test]
    fn test_normalized_extension() {
        assert_eq!(normalized_extension("srcaar"), "aar");
        assert_eq!(normalized_extension("aar"), "aar");
        assert_eq!(normalized_extension("jar"), "jar");
    }

    #[test]
    fn test_plan_dedups_file_names() {
        let artifacts = vec![
            artifact("com.example:foo:1.0", "aar"),
            artifact("com.example:foo:1.0@srcaar", "srcaar"),
            artifact("com.example:bar:2.0", "jar"),
        ];
        let entries = plan(&artifacts, Path::new("/out"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].destination, PathBuf::from("/out/com.example.foo-1.0.aar"));
        assert_eq!(entries[0].artifact.extension, "aar");
        assert_eq!(entries[1].target_filename, "com.example.bar-2.0.jar");
    }

    #[test]
    fn test_execute_is_idempotent() {
        let entries = plan(
            &[artifact("a:b:1.0", "aar"), artifact("a:c:2.0", "jar")],
            Path::new("/out"),
        );
        let transfer = MemoryTransfer::default();

        let first = execute(&entries, &transfer, &SilentProgress::new()).unwrap();
        assert_eq!(first.transferred, 2);
        assert_eq!(transfer.copies.get(), 2);

        let second = execute(&entries, &transfer, &SilentProgress::new()).unwrap();
        assert_eq!(second.transferred, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(transfer.copies.get(), 2);
        assert_eq!(first.copied, second.copied);
        assert_eq!(first.copied_keys, second.copied_keys);
    }

    #[test]
    fn test_execute_stops_on_failure() {
        let entries = plan(&[artifact("a:b:1.0", "aar")], Path::new("/out"));
        let transfer = MemoryTransfer {
            fail: true,
            ..Default::default()
        };
        let progress = SilentProgress::new();

        let err = execute(&entries, &transfer, &progress).unwrap_err();
        assert!(matches!(err, Error::TransferFailed { .. }));
        assert!(progress.is_finished());
    }
}
