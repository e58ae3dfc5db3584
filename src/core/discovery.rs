//! Shard artifact discovery.
//!
//! Walks the resolved results root and sorts every regular file into one of
//! two buckets by its exact file name: coverage profiles and JUnit reports.
//! Everything else, including all directories, is ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::config::DiscoveryConfig;
use crate::core::errors::{Result, ShardMergeError};

/// Artifacts found under a results root, in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    /// Coverage profile artifacts
    pub coverage: Vec<PathBuf>,
    /// JUnit report artifacts
    pub reports: Vec<PathBuf>,
}

impl ArtifactSet {
    /// True when neither kind of artifact was found
    pub fn is_empty(&self) -> bool {
        self.coverage.is_empty() && self.reports.is_empty()
    }
}

/// Artifact discovery utility
pub struct ArtifactDiscovery;

impl ArtifactDiscovery {
    /// Walk `root` and collect artifacts matching the configured file names.
    ///
    /// Entries are visited sorted by file name so the same tree always yields
    /// the same order.
    pub fn discover(root: &Path, config: &DiscoveryConfig) -> Result<ArtifactSet> {
        debug!(
            "Artifact discovery in {} (coverage: {}, reports: {})",
            root.display(),
            config.coverage_file_name,
            config.report_file_name
        );

        let mut artifacts = ArtifactSet::default();
        let walker = WalkDir::new(root)
            .follow_links(config.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                ShardMergeError::discovery(root, format!("directory walk failed: {e}"))
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name();
            if name == config.coverage_file_name.as_str() {
                debug!("  coverage artifact: {}", entry.path().display());
                artifacts.coverage.push(entry.into_path());
            } else if name == config.report_file_name.as_str() {
                debug!("  report artifact: {}", entry.path().display());
                artifacts.reports.push(entry.into_path());
            }
        }

        info!(
            "Discovered {} coverage artifacts and {} report artifacts",
            artifacts.coverage.len(),
            artifacts.reports.len()
        );
        if artifacts.is_empty() {
            warn!("No artifacts found under {}", root.display());
        }

        Ok(artifacts)
    }
}
