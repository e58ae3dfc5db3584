use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Instrumentation mode declared on the first line of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    Set,
    Count,
    Atomic,
}

impl CoverMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        }
    }
}

impl FromStr for CoverMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "set" => Ok(Self::Set),
            "count" => Ok(Self::Count),
            "atomic" => Ok(Self::Atomic),
            other => Err(format!("unknown coverage mode {other:?}")),
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous span of source statements with its observed execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileBlock {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    /// Statements inside the span; identical spans must agree on this
    pub num_statements: u32,
    /// Hit indicator, OR-combined across shards
    pub hits: u64,
}

impl ProfileBlock {
    pub fn new(
        (start_line, start_col): (u32, u32),
        (end_line, end_col): (u32, u32),
        num_statements: u32,
        hits: u64,
    ) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
            num_statements,
            hits,
        }
    }

    /// Full four-coordinate span equality.
    pub fn same_span(&self, other: &Self) -> bool {
        self.start_line == other.start_line
            && self.start_col == other.start_col
            && self.end_line == other.end_line
            && self.end_col == other.end_col
    }

    /// Span in `startLine.startCol,endLine.endCol` notation
    pub fn span(&self) -> String {
        format!(
            "{}.{},{}.{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// Renders the part of a profile line after `file:`.
impl fmt::Display for ProfileBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{},{}.{} {} {}",
            self.start_line,
            self.start_col,
            self.end_line,
            self.end_col,
            self.num_statements,
            self.hits
        )
    }
}

/// One source file's blocks as reported by a single artifact, or the
/// accumulated state for that file across artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProfile {
    pub file_name: String,
    pub mode: CoverMode,
    pub blocks: Vec<ProfileBlock>,
}

impl FileProfile {
    pub fn new(file_name: impl Into<String>, mode: CoverMode, blocks: Vec<ProfileBlock>) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks,
        }
    }
}

/// Counters describing a finished coverage merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub artifacts: usize,
    pub source_files: usize,
    pub blocks: usize,
}
