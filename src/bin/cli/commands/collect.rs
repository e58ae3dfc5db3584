//! The `collect` command.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::debug;

use crate::cli::args::{CollectArgs, SummaryFormat};
use crate::cli::config_layer::build_layered_config;
use shardmerge_rs::{CollectEngine, CollectSummary};

/// Discover shard artifacts and merge them.
pub fn collect_command(args: CollectArgs) -> anyhow::Result<()> {
    let config = build_layered_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    let engine = CollectEngine::new(config)?;
    let root = engine.results_root()?;
    if args.summary == SummaryFormat::Text {
        println!("root: {}", root.display());
    }

    let summary = engine.run()?;

    match args.summary {
        SummaryFormat::Text => {
            display_summary(&summary);
            println!("complete to collect bazel result.");
        }
        SummaryFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Row type for the run summary table.
#[derive(Tabled)]
struct SummaryRow {
    metric: String,
    value: String,
}

fn display_summary(summary: &CollectSummary) {
    let failures = if summary.has_failures() {
        summary.failures.to_string().red().bold().to_string()
    } else {
        summary.failures.to_string().bright_green().to_string()
    };

    let rows = vec![
        SummaryRow {
            metric: "Coverage artifacts".to_string(),
            value: summary.coverage_artifacts.to_string(),
        },
        SummaryRow {
            metric: "Source files".to_string(),
            value: summary.source_files.to_string(),
        },
        SummaryRow {
            metric: "Merged blocks".to_string(),
            value: summary.merged_blocks.to_string(),
        },
        SummaryRow {
            metric: "Test reports".to_string(),
            value: summary.report_artifacts.to_string(),
        },
        SummaryRow {
            metric: "Tests".to_string(),
            value: summary.tests.to_string(),
        },
        SummaryRow {
            metric: "Failures".to_string(),
            value: failures,
        },
        SummaryRow {
            metric: "Skipped".to_string(),
            value: summary.skipped.to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    println!(
        "{} {}",
        "coverage:".dimmed(),
        summary.coverage_output.display().to_string().cyan()
    );
    println!(
        "{} {}",
        "junit:".dimmed(),
        summary.report_output.display().to_string().cyan()
    );
}
