//! JUnit XML report ingestion.
//!
//! Accepts `<testsuites>` documents, bare `<testsuite>` documents and nested
//! suites. Only test cases are kept; suite-level properties and output are
//! dropped because the merged report is a flat case list.

use std::time::Duration;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::errors::{Result, ShardMergeError};
use crate::pipelines::junit::types::{TestCase, TestStatus};

const FORMAT: &str = "junit";

/// Parse one report into its test cases, in document order.
pub fn parse_report(xml: &str) -> Result<Vec<TestCase>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut cases = Vec::new();
    let mut saw_suite = false;
    let mut current: Option<TestCase> = None;
    let mut detail: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => match tag.name().as_ref() {
                b"testsuites" | b"testsuite" => saw_suite = true,
                b"testcase" => current = Some(start_case(&tag)),
                b"failure" | b"error" | b"skipped" => {
                    if let Some(case) = current.as_mut() {
                        apply_outcome(case, &tag);
                        detail = Some(String::new());
                        // Stack traces keep their indentation and line breaks.
                        reader.trim_text(false);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(tag)) => match tag.name().as_ref() {
                b"testsuites" | b"testsuite" => saw_suite = true,
                b"testcase" => cases.push(start_case(&tag)),
                b"failure" | b"error" | b"skipped" => {
                    if let Some(case) = current.as_mut() {
                        apply_outcome(case, &tag);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let Some(buf) = detail.as_mut() {
                    let text = text.unescape().map_err(|e| {
                        ShardMergeError::parse(FORMAT, format!("bad text content: {e}"))
                    })?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(buf) = detail.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(tag)) => match tag.name().as_ref() {
                b"testcase" => {
                    if let Some(case) = current.take() {
                        cases.push(case);
                    }
                }
                b"failure" | b"error" | b"skipped" => {
                    reader.trim_text(true);
                    if let (Some(case), Some(text)) = (current.as_mut(), detail.take()) {
                        if !text.is_empty() && case.status.is_failure() {
                            case.detail = Some(text);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ShardMergeError::parse(
                    FORMAT,
                    format!(
                        "malformed XML at byte {}: {err}",
                        reader.buffer_position()
                    ),
                ));
            }
            _ => {}
        }
    }

    if current.is_some() {
        return Err(ShardMergeError::parse(
            FORMAT,
            "document ended inside a <testcase> element",
        ));
    }
    if !saw_suite {
        return Err(ShardMergeError::parse(
            FORMAT,
            "no <testsuites> or <testsuite> element found",
        ));
    }

    Ok(cases)
}

fn start_case(tag: &BytesStart<'_>) -> TestCase {
    let name = attribute_value(tag, b"name").unwrap_or_default();
    let classname = attribute_value(tag, b"classname").unwrap_or_default();
    let duration = attribute_value(tag, b"time")
        .map(|t| parse_seconds(&t))
        .unwrap_or_default();
    TestCase::new(name, classname, duration)
}

/// Record the status carried by a `<failure>`, `<error>` or `<skipped>` child.
/// A later child overrides an earlier one.
fn apply_outcome(case: &mut TestCase, tag: &BytesStart<'_>) {
    case.status = match tag.name().as_ref() {
        b"failure" => TestStatus::Failed,
        b"error" => TestStatus::Errored,
        _ => TestStatus::Skipped,
    };
    case.message = attribute_value(tag, b"message");
    case.failure_type = if case.status.is_failure() {
        attribute_value(tag, b"type")
    } else {
        None
    };
    case.detail = None;
}

/// Seconds as a decimal string, rounded to the nanosecond; anything
/// unparsable or negative is zero.
fn parse_seconds(value: &str) -> Duration {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| Duration::from_nanos((secs * 1e9).round() as u64))
        .unwrap_or_default()
}

fn attribute_value(tag: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    tag.attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}
