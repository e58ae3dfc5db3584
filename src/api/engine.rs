//! Collection engine tying discovery and both merge pipelines together.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::results::CollectSummary;
use crate::core::config::ShardMergeConfig;
use crate::core::discovery::ArtifactDiscovery;
use crate::core::errors::{Result, ShardMergeError};
use crate::pipelines::coverage::merge_coverage;
use crate::pipelines::junit::merge_reports;

/// Runs one collection: discover, merge coverage, merge reports
pub struct CollectEngine {
    config: ShardMergeConfig,
}

impl CollectEngine {
    /// Create an engine, rejecting invalid configuration up front
    pub fn new(config: ShardMergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ShardMergeConfig {
        &self.config
    }

    /// Resolve the results root relative to the process working directory.
    pub fn results_root(&self) -> Result<PathBuf> {
        self.config.discovery.results_root(&current_dir()?)
    }

    /// Run against the process working directory.
    pub fn run(&self) -> Result<CollectSummary> {
        self.run_from(&current_dir()?)
    }

    /// Run with `cwd` as the base for the results root and relative outputs.
    ///
    /// The coverage pipeline runs first; any failure stops the run before the
    /// report pipeline starts.
    pub fn run_from(&self, cwd: &Path) -> Result<CollectSummary> {
        let root = self.config.discovery.results_root(cwd)?;
        info!("Collecting shard results under {}", root.display());

        let artifacts = ArtifactDiscovery::discover(&root, &self.config.discovery)?;

        let output = &self.config.output;
        let coverage_output = cwd.join(&output.coverage_path);
        let report_output = cwd.join(&output.report_path);

        let coverage = merge_coverage(&artifacts.coverage, &coverage_output, output.sort_files)?;
        let reports = merge_reports(
            &artifacts.reports,
            &report_output,
            &output.suite_name,
            output.indent,
        )?;

        Ok(CollectSummary::new(
            root,
            coverage,
            reports,
            coverage_output,
            report_output,
        ))
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| ShardMergeError::io("Failed to determine working directory", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn seed_testlogs(workspace: &Path) -> PathBuf {
        let testlogs = workspace.join("out/testlogs");
        for (shard, cov, xml) in [
            (
                "pkg/a_test/shard_1_of_2",
                "mode: set\npkg/a.go:1.1,3.2 2 1\n",
                r#"<testsuites><testsuite><testcase name="TestA" classname="pkg"/></testsuite></testsuites>"#,
            ),
            (
                "pkg/a_test/shard_2_of_2",
                "mode: set\npkg/a.go:1.1,3.2 2 0\npkg/a.go:5.1,5.10 1 1\n",
                r#"<testsuites><testsuite><testcase name="TestB" classname="pkg"><failure message="x"/></testcase></testsuite></testsuites>"#,
            ),
        ] {
            let dir = testlogs.join(shard);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("coverage.dat"), cov).unwrap();
            fs::write(dir.join("test.xml"), xml).unwrap();
        }
        testlogs
    }

    fn config_for(testlogs: &Path) -> ShardMergeConfig {
        let mut config = ShardMergeConfig::default();
        config.discovery.root = Some(testlogs.to_path_buf());
        config
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = ShardMergeConfig::default();
        config.output.report_path = config.output.coverage_path.clone();
        assert!(matches!(
            CollectEngine::new(config),
            Err(ShardMergeError::Validation { .. })
        ));
    }

    #[test]
    fn test_run_merges_both_pipelines() {
        let workspace = TempDir::new().unwrap();
        let testlogs = seed_testlogs(workspace.path());
        let engine = CollectEngine::new(config_for(&testlogs)).unwrap();

        let summary = engine.run_from(workspace.path()).unwrap();

        assert_eq!(summary.root, fs::canonicalize(&testlogs).unwrap());
        assert_eq!(summary.coverage_artifacts, 2);
        assert_eq!(summary.report_artifacts, 2);
        assert_eq!(summary.source_files, 1);
        assert_eq!(summary.merged_blocks, 2);
        assert_eq!(summary.tests, 2);
        assert_eq!(summary.failures, 1);
        assert!(summary.has_failures());
        assert_eq!(
            fs::read_to_string(workspace.path().join("coverage.dat")).unwrap(),
            "mode: set\npkg/a.go:1.1,3.2 2 1\npkg/a.go:5.1,5.10 1 1\n"
        );
        assert!(workspace.path().join("bazel.xml").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_follows_convenience_symlink() {
        let workspace = TempDir::new().unwrap();
        let testlogs = seed_testlogs(workspace.path());
        std::os::unix::fs::symlink(&testlogs, workspace.path().join("bazel-testlogs")).unwrap();

        let engine = CollectEngine::new(ShardMergeConfig::default()).unwrap();
        let summary = engine.run_from(workspace.path()).unwrap();

        assert_eq!(summary.root, fs::canonicalize(&testlogs).unwrap());
        assert_eq!(summary.coverage_artifacts, 2);
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let workspace = TempDir::new().unwrap();
        let engine = CollectEngine::new(ShardMergeConfig::default()).unwrap();
        let err = engine.run_from(workspace.path()).unwrap_err();
        assert!(matches!(err, ShardMergeError::Discovery { .. }));
    }

    #[test]
    fn test_coverage_failure_skips_report_merge() {
        let workspace = TempDir::new().unwrap();
        let testlogs = seed_testlogs(workspace.path());
        fs::write(
            testlogs.join("pkg/a_test/shard_2_of_2/coverage.dat"),
            "mode: set\npkg/a.go:1.1,3.2 9 0\n",
        )
        .unwrap();
        let engine = CollectEngine::new(config_for(&testlogs)).unwrap();

        let err = engine.run_from(workspace.path()).unwrap_err();

        assert!(matches!(err, ShardMergeError::ConsistencyViolation { .. }));
        assert!(!workspace.path().join("bazel.xml").exists());
    }
}
