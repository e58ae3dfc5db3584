//! # shardmerge-rs: Bazel shard result collector
//!
//! When a test target is split into shards, every shard leaves its own
//! coverage profile (`coverage.dat`) and JUnit report (`test.xml`) under the
//! workspace's `bazel-testlogs` tree. This library finds those artifacts and
//! merges them into a single coverage profile and a single test report.
//!
//! - **Coverage**: per source file, blocks are merged with a sorted
//!   two-pointer walk; identical spans OR their hit indicators and must agree
//!   on their statement count.
//! - **Reports**: test cases are concatenated into one `<testsuite>` with
//!   pass/fail tallies.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      API Layer                       │
//! ├──────────────────────────────────────────────────────┤
//! │  Core              │  Pipelines                      │
//! │ • Config           │ • Coverage (parse, merge, emit) │
//! │ • Discovery        │ • JUnit (parse, tally, emit)    │
//! │ • Errors / files   │                                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shardmerge_rs::{CollectEngine, ShardMergeConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = CollectEngine::new(ShardMergeConfig::default())?;
//!     let summary = engine.run()?;
//!
//!     println!("{} tests, {} failures", summary.tests, summary.failures);
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Configuration, discovery and shared plumbing
pub mod core {
    //! Configuration, artifact discovery, errors and file helpers.

    pub mod config;
    pub mod discovery;
    pub mod errors;
    pub mod file_utils;
}

// Merge pipelines
pub mod pipelines {
    //! Coverage profile and JUnit report merging.

    pub mod coverage;
    pub mod junit;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::CollectEngine;
pub use api::results::CollectSummary;
pub use core::config::ShardMergeConfig;
pub use core::errors::{Result, ResultExt, ShardMergeError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
