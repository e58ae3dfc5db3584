//! Coverage profile merging.
//!
//! Each shard writes a text profile listing, per source file, the blocks it
//! instrumented together with a statement count and a hit indicator. This
//! module parses those profiles and folds them into one accumulated profile
//! per source file:
//!
//! - [`merge::compare_blocks`] orders blocks by start position,
//! - [`merge::BlockReducer`] ORs hit indicators of identical spans and rejects
//!   spans whose statement counts disagree,
//! - [`merge::merge_blocks`] performs the sorted two-pointer merge of an
//!   accumulated block list with a newly parsed one,
//! - [`CoverageAggregator`] keys the accumulated state by file name and
//!   writes the merged profile.
//!
//! Because the reduction is a bitwise OR and statement counts must agree, the
//! final state does not depend on the order artifacts are ingested in.

pub mod aggregator;
pub mod merge;
pub mod parser;
pub mod types;

pub use aggregator::{merge_coverage, CoverageAggregator, MERGED_MODE_LINE};
pub use merge::{compare_blocks, merge_blocks, normalize_blocks, BlockReducer};
pub use parser::parse_profiles;
pub use types::{CoverMode, CoverageStats, FileProfile, ProfileBlock};
