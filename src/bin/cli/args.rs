//! CLI argument structures.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Merge per-shard coverage profiles and JUnit reports
#[derive(Parser)]
#[command(name = "shardmerge")]
#[command(version = VERSION)]
#[command(about = "Collect sharded Bazel test results into one coverage profile and one JUnit report")]
#[command(long_about = "
Walk the Bazel test logs tree, merge every shard's coverage.dat into a single
profile and every shard's test.xml into a single test suite.

Common Usage:

  # Merge results from ./bazel-testlogs into ./coverage.dat and ./bazel.xml
  shardmerge collect

  # Custom output locations
  shardmerge collect --output-coverage out/coverage.dat --output-junit out/junit.xml

  # Workspace created with --symlink_prefix=build-
  shardmerge collect --bazel-symlink-prefix build-

  # Machine-readable run summary
  shardmerge collect --summary json
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge shard coverage profiles and test reports
    Collect(Box<CollectArgs>),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a configuration file (use --verbose for all settings)
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct CollectArgs {
    /// Configuration file (defaults to .shardmerge.yml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Merged coverage profile path [default: coverage.dat]
    #[arg(long)]
    pub output_coverage: Option<PathBuf>,

    /// Merged JUnit report path [default: bazel.xml]
    #[arg(long)]
    pub output_junit: Option<PathBuf>,

    /// Prefix of the Bazel convenience symlinks [default: bazel-]
    #[arg(long, env = "SHARDMERGE_SYMLINK_PREFIX")]
    pub bazel_symlink_prefix: Option<String>,

    /// Walk this directory instead of <workspace>/<prefix>testlogs
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Workspace directory holding the convenience symlinks [default: cwd]
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Emit merged source files in first-seen order instead of by name
    #[arg(long)]
    pub no_sort: bool,

    /// Run summary format
    #[arg(long, value_enum, default_value = "text")]
    pub summary: SummaryFormat,
}

/// How the run summary is printed
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Table for humans
    Text,
    /// Single JSON object on stdout
    Json,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".shardmerge.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,
}
