//! shardmerge CLI - collect sharded Bazel test results
//!
//! Merges every shard's coverage profile and JUnit report found under the
//! Bazel test logs tree into one of each.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for summaries
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Collect(args) => {
            cli::collect_command(*args)?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config()?;
        }
        Commands::InitConfig(args) => {
            cli::init_config(args)?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args, cli.verbose)?;
        }
    }

    Ok(())
}
