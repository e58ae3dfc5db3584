//! File utilities for reading shard artifacts and creating merged outputs.
//!
//! Artifact reads map every failure to [`ShardMergeError::ArtifactOpen`] and
//! output creation maps to [`ShardMergeError::OutputWrite`], so callers never
//! have to remember which I/O error belongs to which side of the pipeline.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::core::errors::{Result, ShardMergeError};

/// Reads artifact files produced by individual test shards
pub struct ArtifactReader;

impl ArtifactReader {
    /// Read an artifact to a string.
    ///
    /// Invalid UTF-8 is a parse error for `format`: decoding it lossily would
    /// fold distinct source file names onto the same replacement text.
    pub fn read_to_string(path: &Path, format: &str) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| ShardMergeError::artifact_open(path, e))?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        String::from_utf8(bytes).map_err(|err| {
            let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            ShardMergeError::parse_at_line(
                format,
                format!("invalid UTF-8 at byte offset {}", valid.len()),
                line,
            )
            .with_path(path)
        })
    }
}

/// Creates merged output files
pub struct OutputFile;

impl OutputFile {
    /// Create (truncate) an output file, creating missing parent directories.
    pub fn create(path: &Path) -> Result<BufWriter<File>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ShardMergeError::output_write(path, e))?;
        }
        let file = File::create(path).map_err(|e| ShardMergeError::output_write(path, e))?;
        Ok(BufWriter::new(file))
    }
}
