//! Summary of a collection run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pipelines::coverage::CoverageStats;
use crate::pipelines::junit::ReportStats;

/// What a finished collection run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectSummary {
    /// Resolved results root that was walked
    pub root: PathBuf,

    /// Coverage artifacts merged
    pub coverage_artifacts: usize,

    /// Test reports merged
    pub report_artifacts: usize,

    /// Distinct source files in the merged profile
    pub source_files: usize,

    /// Blocks in the merged profile
    pub merged_blocks: usize,

    /// Test cases in the merged report (passed + failed)
    pub tests: u64,

    /// Failed or errored test cases
    pub failures: u64,

    /// Skipped test cases (already counted as passed)
    pub skipped: u64,

    /// Where the merged coverage profile was written
    pub coverage_output: PathBuf,

    /// Where the merged report was written
    pub report_output: PathBuf,
}

impl CollectSummary {
    pub(crate) fn new(
        root: PathBuf,
        coverage: CoverageStats,
        reports: ReportStats,
        coverage_output: PathBuf,
        report_output: PathBuf,
    ) -> Self {
        Self {
            root,
            coverage_artifacts: coverage.artifacts,
            report_artifacts: reports.artifacts,
            source_files: coverage.source_files,
            merged_blocks: coverage.blocks,
            tests: reports.tests,
            failures: reports.failures,
            skipped: reports.skipped,
            coverage_output,
            report_output,
        }
    }

    /// True when any merged test case failed.
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}
