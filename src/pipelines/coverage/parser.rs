//! Text coverage profile parser.
//!
//! Format:
//!
//! ```text
//! mode: set
//! pkg/a.go:1.1,3.2 2 1
//! ```

use indexmap::IndexMap;

use crate::core::errors::{Result, ShardMergeError};
use crate::pipelines::coverage::merge::normalize_blocks;
use crate::pipelines::coverage::types::{CoverMode, FileProfile, ProfileBlock};

const FORMAT: &str = "coverage";
const MODE_PREFIX: &str = "mode:";

/// Parse a whole profile into per-file profiles in first-seen order.
///
/// Each file's blocks come back sorted and reduced. Empty input yields no
/// profiles.
pub fn parse_profiles(text: &str) -> Result<Vec<FileProfile>> {
    let mut mode: Option<CoverMode> = None;
    let mut files: IndexMap<String, Vec<ProfileBlock>> = IndexMap::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(MODE_PREFIX) {
            let declared: CoverMode = rest
                .trim()
                .parse()
                .map_err(|msg: String| ShardMergeError::parse_at_line(FORMAT, msg, line_no))?;
            match mode {
                None => mode = Some(declared),
                Some(current) if current == declared => {}
                Some(current) => {
                    return Err(ShardMergeError::parse_at_line(
                        FORMAT,
                        format!("inconsistent mode: {current} then {declared}"),
                        line_no,
                    ));
                }
            }
            continue;
        }

        if mode.is_none() {
            return Err(ShardMergeError::parse_at_line(
                FORMAT,
                format!("bad mode line: {line:?}"),
                line_no,
            ));
        }

        let (name, block) = parse_block_line(line)
            .map_err(|msg| ShardMergeError::parse_at_line(FORMAT, msg, line_no))?;
        files.entry(name.to_string()).or_default().push(block);
    }

    let Some(mode) = mode else {
        return Ok(Vec::new());
    };

    files
        .into_iter()
        .map(|(name, blocks)| -> Result<FileProfile> {
            let blocks = normalize_blocks(&name, blocks)?;
            Ok(FileProfile::new(name, mode, blocks))
        })
        .collect()
}

/// Split `name:sl.sc,el.ec stmts hits` into the file name and its block.
fn parse_block_line(line: &str) -> std::result::Result<(&str, ProfileBlock), String> {
    let (name, rest) = line
        .rsplit_once(':')
        .ok_or_else(|| format!("line {line:?} doesn't match expected format"))?;
    if name.is_empty() {
        return Err(format!("line {line:?} has an empty file name"));
    }

    let mut fields = rest.split_whitespace();
    let (Some(span), Some(stmts), Some(hits), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(format!("line {line:?} doesn't match expected format"));
    };

    let (start, end) = span
        .split_once(',')
        .ok_or_else(|| format!("span {span:?} is missing ','"))?;
    let start = parse_position(start)?;
    let end = parse_position(end)?;
    let num_statements = parse_number::<u32>(stmts, "statement count")?;
    let hits = parse_number::<u64>(hits, "hit count")?;

    Ok((name, ProfileBlock::new(start, end, num_statements, hits)))
}

fn parse_position(value: &str) -> std::result::Result<(u32, u32), String> {
    let (line, col) = value
        .split_once('.')
        .ok_or_else(|| format!("position {value:?} is not line.column"))?;
    Ok((
        parse_number::<u32>(line, "line")?,
        parse_number::<u32>(col, "column")?,
    ))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> std::result::Result<T, String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {what} {value:?}"));
    }
    value
        .parse::<T>()
        .map_err(|_| format!("{what} {value:?} is out of range"))
}
