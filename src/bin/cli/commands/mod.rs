//! Command implementations.

pub mod collect;
pub mod config;

pub use collect::collect_command;
pub use config::{init_config, print_default_config, validate_config};
