use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Skipped,
    Failed,
    Errored,
}

impl TestStatus {
    /// Failed and errored cases count as failures; skipped cases do not.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }
}

/// A single test case as read from a shard report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub duration: Duration,
    pub status: TestStatus,
    /// `message` attribute of the skipped/failure/error element
    pub message: Option<String>,
    /// `type` attribute of the failure/error element
    pub failure_type: Option<String>,
    /// Text content of the failure/error element
    pub detail: Option<String>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, classname: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            classname: classname.into(),
            duration,
            status: TestStatus::Passed,
            message: None,
            failure_type: None,
            detail: None,
        }
    }
}

/// Concatenation of every ingested case plus its tallies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
    /// Passed plus skipped
    pub passed: u64,
    pub skipped: u64,
    /// Failed plus errored
    pub failed: u64,
}

impl MergedSuite {
    /// Build a suite and compute its tallies once.
    pub fn from_cases(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        let mut passed = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for case in &cases {
            match case.status {
                TestStatus::Passed => passed += 1,
                TestStatus::Skipped => {
                    passed += 1;
                    skipped += 1;
                }
                TestStatus::Failed | TestStatus::Errored => failed += 1,
            }
        }
        Self {
            name: name.into(),
            cases,
            passed,
            skipped,
            failed,
        }
    }

    pub fn tests(&self) -> u64 {
        self.passed + self.failed
    }

    pub fn failures(&self) -> u64 {
        self.failed
    }

    pub fn total_duration(&self) -> Duration {
        self.cases.iter().map(|c| c.duration).sum()
    }
}

/// Counters describing a finished report merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub artifacts: usize,
    pub tests: u64,
    pub failures: u64,
    pub skipped: u64,
}
