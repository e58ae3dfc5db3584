//! Error types for the shardmerge-rs library.
//!
//! Every failure in a collection run is fatal: the collector runs once per CI
//! aggregation step and a silently partial result is worse than a hard stop.
//! The variants below keep enough context (artifact path, source file, span)
//! for the top-level driver to print a useful message before exiting.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main result type for shardmerge operations.
pub type Result<T> = std::result::Result<T, ShardMergeError>;

/// Error type for all shardmerge operations.
#[derive(Error, Debug)]
pub enum ShardMergeError {
    /// An artifact could not be opened for reading
    #[error("Failed to open artifact {}: {source}", .path.display())]
    ArtifactOpen {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An artifact does not conform to its expected format
    #[error("Parse error in {format} artifact{}: {message}", location_suffix(.path, .line))]
    ArtifactParse {
        /// Artifact format ("coverage" or "junit")
        format: String,
        /// Error description
        message: String,
        /// Artifact path, attached once known
        path: Option<PathBuf>,
        /// 1-based line number (if available)
        line: Option<usize>,
    },

    /// The same span was reported with two different statement counts
    #[error("Inconsistent statement count for {file}:{span}: changed from {previous} to {incoming}")]
    ConsistencyViolation {
        /// Source file name as written in the profile
        file: String,
        /// Span in `startLine.startCol,endLine.endCol` notation
        span: String,
        /// Statement count already accumulated
        previous: u32,
        /// Statement count reported by the new block
        incoming: u32,
    },

    /// The merged output could not be created or written
    #[error("Failed to write output {}: {source}", .path.display())]
    OutputWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The results root could not be resolved or walked
    #[error("Discovery error under {}: {message}", .root.display())]
    Discovery {
        /// Root of the walk
        root: PathBuf,
        /// Error description
        message: String,
    },

    /// Other I/O errors
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for configuration values
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field that failed validation
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn location_suffix(path: &Option<PathBuf>, line: &Option<usize>) -> String {
    let mut suffix = String::new();
    if let Some(path) = path {
        suffix.push_str(&format!(" {}", path.display()));
    }
    if let Some(line) = line {
        suffix.push_str(&format!(" (line {line})"));
    }
    suffix
}

impl ShardMergeError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an artifact-open error
    pub fn artifact_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ArtifactOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an artifact parse error without location
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactParse {
            format: format.into(),
            message: message.into(),
            path: None,
            line: None,
        }
    }

    /// Create an artifact parse error pointing at a 1-based line
    pub fn parse_at_line(format: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::ArtifactParse {
            format: format.into(),
            message: message.into(),
            path: None,
            line: Some(line),
        }
    }

    /// Create a consistency violation for a span
    pub fn consistency(
        file: impl Into<String>,
        span: impl Into<String>,
        previous: u32,
        incoming: u32,
    ) -> Self {
        Self::ConsistencyViolation {
            file: file.into(),
            span: span.into(),
            previous,
            incoming,
        }
    }

    /// Create an output write error
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a discovery error
    pub fn discovery(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error for a field
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Attach the artifact path to a parse error that was raised on in-memory text.
    pub fn with_path(mut self, artifact: &Path) -> Self {
        if let Self::ArtifactParse { path, .. } = &mut self {
            if path.is_none() {
                *path = Some(artifact.to_path_buf());
            }
        }
        self
    }

    /// Prefix the message of message-carrying variants with extra context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Serialization { message, .. } => {
                *message = format!("{}: {}", context.into(), message);
            }
            _ => {} // Located variants already carry their context
        }
        self
    }
}

impl From<io::Error> for ShardMergeError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for ShardMergeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for ShardMergeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<quick_xml::Error> for ShardMergeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Serialization {
            message: format!("XML serialization failed: {err}"),
            data_type: Some("XML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ShardMergeError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}
