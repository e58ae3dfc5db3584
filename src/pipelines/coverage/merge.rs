//! Block ordering, reduction and the two-pointer profile merge.
//!
//! Blocks are ordered by start position only. Two blocks that share a start
//! but differ in end position tie under [`compare_blocks`]; the reducer's
//! full-span check then keeps both as separate entries, accumulator first.

use std::cmp::Ordering;

use crate::core::errors::{Result, ShardMergeError};
use crate::pipelines::coverage::types::ProfileBlock;

/// Order blocks by `(start_line, start_col)`.
pub fn compare_blocks(x: &ProfileBlock, y: &ProfileBlock) -> Ordering {
    x.start_line
        .cmp(&y.start_line)
        .then(x.start_col.cmp(&y.start_col))
}

/// Stable sort by start position.
pub fn sort_blocks(blocks: &mut [ProfileBlock]) {
    blocks.sort_by(compare_blocks);
}

/// Growing, sorted block sequence that folds identical spans into the tail.
#[derive(Debug)]
pub struct BlockReducer<'a> {
    file: &'a str,
    blocks: Vec<ProfileBlock>,
}

impl<'a> BlockReducer<'a> {
    pub fn new(file: &'a str) -> Self {
        Self::with_capacity(file, 0)
    }

    pub fn with_capacity(file: &'a str, capacity: usize) -> Self {
        Self {
            file,
            blocks: Vec::with_capacity(capacity),
        }
    }

    /// Append `block`, or OR its hits into the last entry when the spans match.
    ///
    /// Fails with [`ShardMergeError::ConsistencyViolation`] if the matching
    /// span carries a different statement count; the sequence is left as it
    /// was before the call.
    pub fn push(&mut self, block: ProfileBlock) -> Result<()> {
        if let Some(last) = self.blocks.last_mut() {
            if last.same_span(&block) {
                if last.num_statements != block.num_statements {
                    return Err(ShardMergeError::consistency(
                        self.file,
                        block.span(),
                        last.num_statements,
                        block.num_statements,
                    ));
                }
                last.hits |= block.hits;
                return Ok(());
            }
        }
        self.blocks.push(block);
        Ok(())
    }

    pub fn finish(self) -> Vec<ProfileBlock> {
        self.blocks
    }
}

/// Sort and reduce a single block list.
pub fn normalize_blocks(file: &str, mut blocks: Vec<ProfileBlock>) -> Result<Vec<ProfileBlock>> {
    sort_blocks(&mut blocks);
    let mut reducer = BlockReducer::with_capacity(file, blocks.len());
    for block in blocks {
        reducer.push(block)?;
    }
    Ok(reducer.finish())
}

/// Merge `incoming` into an already sorted and reduced `accumulated` list.
///
/// `incoming` is sorted first. On a start-position tie the accumulated block
/// is fed to the reducer before the incoming one.
pub fn merge_blocks(
    file: &str,
    accumulated: &[ProfileBlock],
    mut incoming: Vec<ProfileBlock>,
) -> Result<Vec<ProfileBlock>> {
    sort_blocks(&mut incoming);

    let mut reducer = BlockReducer::with_capacity(file, accumulated.len() + incoming.len());
    let (mut i, mut j) = (0, 0);

    while i < accumulated.len() && j < incoming.len() {
        let (old, new) = (accumulated[i], incoming[j]);
        match compare_blocks(&old, &new) {
            Ordering::Less => {
                reducer.push(old)?;
                i += 1;
            }
            Ordering::Greater => {
                reducer.push(new)?;
                j += 1;
            }
            Ordering::Equal => {
                reducer.push(old)?;
                reducer.push(new)?;
                i += 1;
                j += 1;
            }
        }
    }
    for &old in &accumulated[i..] {
        reducer.push(old)?;
    }
    for &new in &incoming[j..] {
        reducer.push(new)?;
    }

    Ok(reducer.finish())
}
