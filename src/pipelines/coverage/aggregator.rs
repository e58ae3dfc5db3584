//! Cross-artifact coverage aggregation and emission.

use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::core::errors::{Result, ShardMergeError};
use crate::core::file_utils::{ArtifactReader, OutputFile};
use crate::pipelines::coverage::merge::{merge_blocks, normalize_blocks};
use crate::pipelines::coverage::parser::parse_profiles;
use crate::pipelines::coverage::types::{CoverageStats, FileProfile};

/// Header line of every merged profile.
pub const MERGED_MODE_LINE: &str = "mode: set";

/// Accumulated per-source-file profiles, keyed by file name.
#[derive(Debug, Default)]
pub struct CoverageAggregator {
    profiles: IndexMap<String, FileProfile>,
    artifacts: usize,
}

impl CoverageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one per-file profile into the accumulator for its file name.
    pub fn merge_profile(&mut self, profile: FileProfile) -> Result<()> {
        match self.profiles.get_mut(&profile.file_name) {
            Some(existing) => {
                let merged = merge_blocks(&existing.file_name, &existing.blocks, profile.blocks)?;
                debug!(
                    "Merged {}: {} -> {} blocks",
                    existing.file_name,
                    existing.blocks.len(),
                    merged.len()
                );
                existing.blocks = merged;
            }
            None => {
                let blocks = normalize_blocks(&profile.file_name, profile.blocks)?;
                debug!("New source file {} ({} blocks)", profile.file_name, blocks.len());
                self.profiles.insert(
                    profile.file_name.clone(),
                    FileProfile::new(profile.file_name, profile.mode, blocks),
                );
            }
        }
        Ok(())
    }

    /// Parse profile text and merge every file it mentions.
    pub fn ingest_text(&mut self, text: &str) -> Result<usize> {
        let profiles = parse_profiles(text)?;
        let count = profiles.len();
        for profile in profiles {
            self.merge_profile(profile)?;
        }
        self.artifacts += 1;
        Ok(count)
    }

    /// Read, parse and merge one coverage artifact.
    pub fn ingest_artifact(&mut self, path: &Path) -> Result<()> {
        let text = ArtifactReader::read_to_string(path, "coverage")?;
        let files = self.ingest_text(&text).map_err(|e| e.with_path(path))?;
        debug!("Ingested {} ({} source files)", path.display(), files);
        Ok(())
    }

    /// Ingest every artifact in order, stopping at the first failure.
    pub fn aggregate<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        for path in paths {
            self.ingest_artifact(path.as_ref())?;
        }
        Ok(())
    }

    pub fn profile(&self, file_name: &str) -> Option<&FileProfile> {
        self.profiles.get(file_name)
    }

    /// Accumulated profiles in first-seen order.
    pub fn profiles(&self) -> impl Iterator<Item = &FileProfile> {
        self.profiles.values()
    }

    pub fn stats(&self) -> CoverageStats {
        CoverageStats {
            artifacts: self.artifacts,
            source_files: self.profiles.len(),
            blocks: self.profiles.values().map(|p| p.blocks.len()).sum(),
        }
    }

    /// Write every accumulated block, flushing after each source file.
    pub fn write_blocks<W: Write>(&self, writer: &mut W, sort_files: bool) -> io::Result<()> {
        let mut profiles: Vec<&FileProfile> = self.profiles.values().collect();
        if sort_files {
            profiles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        }

        for profile in profiles {
            for block in &profile.blocks {
                writeln!(writer, "{}:{}", profile.file_name, block)?;
            }
            writer.flush()?;
        }
        Ok(())
    }

    /// Header plus all blocks.
    pub fn write_to<W: Write>(&self, writer: &mut W, sort_files: bool) -> io::Result<()> {
        writeln!(writer, "{MERGED_MODE_LINE}")?;
        self.write_blocks(writer, sort_files)
    }

    /// Write the merged profile to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path, sort_files: bool) -> Result<()> {
        let mut writer = OutputFile::create(path)?;
        self.write_to(&mut writer, sort_files)
            .and_then(|()| writer.flush())
            .map_err(|e| ShardMergeError::output_write(path, e))
    }
}

/// Merge all coverage artifacts into `output`.
///
/// The output is created and its header written before the first artifact is
/// read, so a failing run still leaves a valid (if empty) profile behind.
pub fn merge_coverage<P: AsRef<Path>>(
    artifacts: &[P],
    output: &Path,
    sort_files: bool,
) -> Result<CoverageStats> {
    let mut writer = OutputFile::create(output)?;
    writeln!(writer, "{MERGED_MODE_LINE}")
        .and_then(|()| writer.flush())
        .map_err(|e| ShardMergeError::output_write(output, e))?;

    let mut aggregator = CoverageAggregator::new();
    aggregator.aggregate(artifacts)?;

    aggregator
        .write_blocks(&mut writer, sort_files)
        .map_err(|e| ShardMergeError::output_write(output, e))?;

    let stats = aggregator.stats();
    info!(
        "Merged {} coverage artifacts into {} ({} source files, {} blocks)",
        stats.artifacts,
        output.display(),
        stats.source_files,
        stats.blocks
    );
    Ok(stats)
}
