//! Configuration types and management for shardmerge-rs.
//!
//! The configuration has two sections: `discovery` decides where the
//! per-shard artifacts live and how they are recognised, `output` decides
//! where the merged coverage profile and merged JUnit report are written.
//! Every field has a default, so an empty YAML document is a valid config.

pub mod validation;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ResultExt, ShardMergeError};

pub use validation::{validate_file_name, validate_max_usize, validate_non_empty_path};

/// Main configuration for a collection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardMergeConfig {
    /// Artifact discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Merged output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration construction and I/O methods for [`ShardMergeConfig`].
impl ShardMergeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_yaml::from_str(&content).map_err(|e| {
            ShardMergeError::config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self).context("Failed to encode config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.discovery.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Where to find shard artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Workspace directory the symlinked results dir hangs off (default: cwd)
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    /// Prefix of the build tool's convenience symlinks
    #[serde(default = "DiscoveryConfig::default_symlink_prefix")]
    pub symlink_prefix: String,

    /// Name of the per-test results directory after the prefix
    #[serde(default = "DiscoveryConfig::default_testlogs_dir")]
    pub testlogs_dir: String,

    /// Explicit results root; overrides workspace + prefix
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// File name identifying a coverage artifact
    #[serde(default = "DiscoveryConfig::default_coverage_file_name")]
    pub coverage_file_name: String,

    /// File name identifying a JUnit report artifact
    #[serde(default = "DiscoveryConfig::default_report_file_name")]
    pub report_file_name: String,

    /// Follow symlinks below the root while walking
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            workspace: None,
            symlink_prefix: Self::default_symlink_prefix(),
            testlogs_dir: Self::default_testlogs_dir(),
            root: None,
            coverage_file_name: Self::default_coverage_file_name(),
            report_file_name: Self::default_report_file_name(),
            follow_links: false,
        }
    }
}

impl DiscoveryConfig {
    fn default_symlink_prefix() -> String {
        "bazel-".to_string()
    }

    fn default_testlogs_dir() -> String {
        "testlogs".to_string()
    }

    fn default_coverage_file_name() -> String {
        "coverage.dat".to_string()
    }

    fn default_report_file_name() -> String {
        "test.xml".to_string()
    }

    /// Validate discovery configuration
    pub fn validate(&self) -> Result<()> {
        validate_file_name(&self.coverage_file_name, "discovery.coverage_file_name")?;
        validate_file_name(&self.report_file_name, "discovery.report_file_name")?;
        if self.coverage_file_name == self.report_file_name {
            return Err(ShardMergeError::validation(
                "coverage and report artifacts must use different file names",
                "discovery.report_file_name",
            ));
        }
        if self.root.is_none() && self.testlogs_dir.trim().is_empty() {
            return Err(ShardMergeError::validation(
                "discovery.testlogs_dir must not be empty when no root is given",
                "discovery.testlogs_dir",
            ));
        }
        Ok(())
    }

    /// The path that is walked before symlink resolution. Relative `root` and
    /// `workspace` values are taken relative to `cwd`.
    pub fn unresolved_root(&self, cwd: &Path) -> PathBuf {
        if let Some(root) = &self.root {
            return cwd.join(root);
        }
        let workspace = self
            .workspace
            .as_ref()
            .map_or_else(|| cwd.to_path_buf(), |ws| cwd.join(ws));
        workspace.join(format!("{}{}", self.symlink_prefix, self.testlogs_dir))
    }

    /// Resolve the results root, following the convenience symlink.
    pub fn results_root(&self, cwd: &Path) -> Result<PathBuf> {
        let unresolved = self.unresolved_root(cwd);
        std::fs::canonicalize(&unresolved).map_err(|e| {
            ShardMergeError::discovery(
                unresolved.clone(),
                format!("cannot resolve results root: {e}"),
            )
        })
    }
}

/// Where and how merged results are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Merged coverage profile path
    #[serde(default = "OutputConfig::default_coverage_path")]
    pub coverage_path: PathBuf,

    /// Merged JUnit report path
    #[serde(default = "OutputConfig::default_report_path")]
    pub report_path: PathBuf,

    /// Emit merged source files ordered by name instead of first-seen order
    #[serde(default = "OutputConfig::default_sort_files")]
    pub sort_files: bool,

    /// `name` attribute of the merged test suite
    #[serde(default = "OutputConfig::default_suite_name")]
    pub suite_name: String,

    /// Spaces per nesting level in the merged report
    #[serde(default = "OutputConfig::default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            coverage_path: Self::default_coverage_path(),
            report_path: Self::default_report_path(),
            sort_files: Self::default_sort_files(),
            suite_name: Self::default_suite_name(),
            indent: Self::default_indent(),
        }
    }
}

impl OutputConfig {
    fn default_coverage_path() -> PathBuf {
        PathBuf::from("coverage.dat")
    }

    fn default_report_path() -> PathBuf {
        PathBuf::from("bazel.xml")
    }

    const fn default_sort_files() -> bool {
        true
    }

    fn default_suite_name() -> String {
        "bazel".to_string()
    }

    const fn default_indent() -> usize {
        1
    }

    /// Validate output configuration
    pub fn validate(&self) -> Result<()> {
        validate_non_empty_path(&self.coverage_path, "output.coverage_path")?;
        validate_non_empty_path(&self.report_path, "output.report_path")?;
        validate_max_usize(self.indent, 8, "output.indent")?;
        if self.coverage_path == self.report_path {
            return Err(ShardMergeError::validation(
                "merged coverage and report outputs must be different files",
                "output.report_path",
            ));
        }
        Ok(())
    }
}
