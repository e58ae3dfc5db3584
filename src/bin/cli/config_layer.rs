//! Configuration Layer Management
//!
//! Defaults, then the configuration file, then command line flags; each
//! layer overrides the one before it.

use std::path::{Path, PathBuf};

use crate::cli::args::CollectArgs;
use shardmerge_rs::core::config::{DiscoveryConfig, OutputConfig, ShardMergeConfig};

/// Config files picked up from the working directory when `--config` is absent
pub const IMPLICIT_CONFIG_FILES: [&str; 2] = [".shardmerge.yml", ".shardmerge.yaml"];

/// Trait for applying command line overrides onto a configuration section
pub trait ApplyCliOverrides {
    /// Overwrite every field the user set explicitly on the command line
    fn apply_overrides(&mut self, args: &CollectArgs);
}

impl ApplyCliOverrides for DiscoveryConfig {
    fn apply_overrides(&mut self, args: &CollectArgs) {
        if let Some(prefix) = &args.bazel_symlink_prefix {
            self.symlink_prefix = prefix.clone();
        }
        if let Some(root) = &args.root {
            self.root = Some(root.clone());
        }
        if let Some(workspace) = &args.workspace {
            self.workspace = Some(workspace.clone());
        }
    }
}

impl ApplyCliOverrides for OutputConfig {
    fn apply_overrides(&mut self, args: &CollectArgs) {
        if let Some(path) = &args.output_coverage {
            self.coverage_path = path.clone();
        }
        if let Some(path) = &args.output_junit {
            self.report_path = path.clone();
        }
        if args.no_sort {
            self.sort_files = false;
        }
    }
}

/// Find the configuration file to load, if any.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => IMPLICIT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    }
}

/// Load a configuration file, or the defaults when `path` is `None`.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<ShardMergeConfig> {
    match path {
        Some(path) => ShardMergeConfig::from_yaml_file(path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            )
        }),
        None => Ok(ShardMergeConfig::default()),
    }
}

/// Build the effective configuration for a `collect` run.
pub fn build_layered_config(args: &CollectArgs) -> anyhow::Result<ShardMergeConfig> {
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = load_configuration(config_path.as_deref())?;

    config.discovery.apply_overrides(args);
    config.output.apply_overrides(args);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}
