//! Configuration management commands.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::{InitConfigArgs, ValidateConfigArgs};
use crate::cli::config_layer::load_configuration;
use shardmerge_rs::ShardMergeConfig;

/// Print default configuration in YAML format
pub fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default shardmerge configuration".dimmed());
    println!("{}", "# Save this to .shardmerge.yml and customize as needed".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&ShardMergeConfig::default())?;
    println!("{}", yaml_output);

    Ok(())
}

/// Initialize a configuration file with defaults
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Configuration file already exists: {}. Use --force to overwrite or choose a different name with --output",
            args.output.display()
        ));
    }

    ShardMergeConfig::default().to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "Key settings you can customize:".bright_blue().bold());

    /// Row type for the configuration tips table.
    #[derive(Tabled)]
    struct CustomizationRow {
        setting: &'static str,
        description: &'static str,
    }

    let rows = vec![
        CustomizationRow {
            setting: "discovery.symlink_prefix",
            description: "Prefix of the convenience symlinks (default: bazel-)",
        },
        CustomizationRow {
            setting: "discovery.root",
            description: "Walk this directory instead of the testlogs symlink",
        },
        CustomizationRow {
            setting: "output.coverage_path",
            description: "Merged coverage profile (default: coverage.dat)",
        },
        CustomizationRow {
            setting: "output.report_path",
            description: "Merged JUnit report (default: bazel.xml)",
        },
        CustomizationRow {
            setting: "output.sort_files",
            description: "Order merged source files by name (default: true)",
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    Ok(())
}

/// Validate a configuration file
pub fn validate_config(args: ValidateConfigArgs, verbose: bool) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let config = match load_configuration(Some(&args.config))
        .and_then(|config| config.validate().map(|()| config).map_err(Into::into))
    {
        Ok(config) => {
            println!("{}", "Configuration file is valid!".bright_green().bold());
            config
        }
        Err(e) => {
            eprintln!("{} {}", "Configuration validation failed:".red(), e);
            eprintln!(
                "{}",
                "Tip: use 'shardmerge print-default-config' to see the valid format".dimmed()
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    if verbose {
        println!();

        /// Row used when printing verbose configuration details.
        #[derive(Tabled)]
        struct DetailRow {
            setting: &'static str,
            value: String,
        }

        let display_opt = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string())
        };

        let rows = vec![
            DetailRow {
                setting: "discovery.workspace",
                value: display_opt(&config.discovery.workspace),
            },
            DetailRow {
                setting: "discovery.symlink_prefix",
                value: config.discovery.symlink_prefix.clone(),
            },
            DetailRow {
                setting: "discovery.testlogs_dir",
                value: config.discovery.testlogs_dir.clone(),
            },
            DetailRow {
                setting: "discovery.root",
                value: display_opt(&config.discovery.root),
            },
            DetailRow {
                setting: "discovery.coverage_file_name",
                value: config.discovery.coverage_file_name.clone(),
            },
            DetailRow {
                setting: "discovery.report_file_name",
                value: config.discovery.report_file_name.clone(),
            },
            DetailRow {
                setting: "discovery.follow_links",
                value: config.discovery.follow_links.to_string(),
            },
            DetailRow {
                setting: "output.coverage_path",
                value: config.output.coverage_path.display().to_string(),
            },
            DetailRow {
                setting: "output.report_path",
                value: config.output.report_path.display().to_string(),
            },
            DetailRow {
                setting: "output.sort_files",
                value: config.output.sort_files.to_string(),
            },
            DetailRow {
                setting: "output.suite_name",
                value: config.output.suite_name.clone(),
            },
            DetailRow {
                setting: "output.indent",
                value: config.output.indent.to_string(),
            },
        ];

        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{}", table);
    }

    Ok(())
}
