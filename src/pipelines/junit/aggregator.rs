//! Cross-shard test report aggregation.

use std::path::Path;

use tracing::{debug, info};

use crate::core::errors::Result;
use crate::core::file_utils::ArtifactReader;
use crate::pipelines::junit::parser::parse_report;
use crate::pipelines::junit::types::{MergedSuite, ReportStats, TestCase};
use crate::pipelines::junit::writer::write_suite;

/// Collects test cases from every report in ingestion order.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    cases: Vec<TestCase>,
    artifacts: usize,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse report text and append its cases. Returns how many were added.
    pub fn ingest_text(&mut self, xml: &str) -> Result<usize> {
        let cases = parse_report(xml)?;
        let count = cases.len();
        self.cases.extend(cases);
        self.artifacts += 1;
        Ok(count)
    }

    pub fn ingest_report(&mut self, path: &Path) -> Result<()> {
        let xml = ArtifactReader::read_to_string(path, "junit")?;
        let count = self.ingest_text(&xml).map_err(|e| e.with_path(path))?;
        debug!("Ingested {} ({} test cases)", path.display(), count);
        Ok(())
    }

    /// Ingest every report in order, stopping at the first failure.
    pub fn aggregate<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        for path in paths {
            self.ingest_report(path.as_ref())?;
        }
        Ok(())
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn artifacts(&self) -> usize {
        self.artifacts
    }

    pub fn finish(self, suite_name: &str) -> MergedSuite {
        MergedSuite::from_cases(suite_name, self.cases)
    }
}

/// Merge all test reports into a single suite written to `output`.
pub fn merge_reports<P: AsRef<Path>>(
    reports: &[P],
    output: &Path,
    suite_name: &str,
    indent: usize,
) -> Result<ReportStats> {
    let mut aggregator = ReportAggregator::new();
    aggregator.aggregate(reports)?;

    let artifacts = aggregator.artifacts();
    let suite = aggregator.finish(suite_name);
    write_suite(&suite, output, indent)?;

    let stats = ReportStats {
        artifacts,
        tests: suite.tests(),
        failures: suite.failures(),
        skipped: suite.skipped,
    };
    info!(
        "Merged {} test reports into {} ({} tests, {} failures)",
        stats.artifacts,
        output.display(),
        stats.tests,
        stats.failures
    );
    Ok(stats)
}
