//! Merged JUnit report emission.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::errors::{Result, ResultExt, ShardMergeError};
use crate::core::file_utils::OutputFile;
use crate::pipelines::junit::types::{MergedSuite, TestCase, TestStatus};

/// Render the merged suite as an XML document.
///
/// `indent` is the number of spaces per nesting level; zero writes the whole
/// document on one line after the declaration.
pub fn render_suite(suite: &MergedSuite, indent: usize) -> Result<String> {
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let tests = suite.tests().to_string();
    let failures = suite.failures().to_string();
    let time = format_go_duration(suite.total_duration());
    let mut root = BytesStart::new("testsuite");
    root.push_attribute(("tests", tests.as_str()));
    root.push_attribute(("failures", failures.as_str()));
    root.push_attribute(("time", time.as_str()));
    root.push_attribute(("name", suite.name.as_str()));

    if suite.cases.is_empty() {
        write_event(&mut writer, Event::Empty(root))?;
    } else {
        write_event(&mut writer, Event::Start(root))?;
        for case in &suite.cases {
            write_case(&mut writer, case)?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new("testsuite")))?;
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| ShardMergeError::Serialization {
        message: format!("rendered report is not UTF-8: {e}"),
        data_type: Some("junit".to_string()),
        source: Some(Box::new(e)),
    })
}

/// Render and write the merged suite to `path`.
pub fn write_suite(suite: &MergedSuite, path: &Path, indent: usize) -> Result<()> {
    let document = render_suite(suite, indent)?;
    let mut file = OutputFile::create(path)?;
    file.write_all(document.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| ShardMergeError::output_write(path, e))
}

fn write_case<W: Write>(writer: &mut Writer<W>, case: &TestCase) -> Result<()> {
    let time = format_go_duration(case.duration);
    let mut start = BytesStart::new("testcase");
    start.push_attribute(("classname", case.classname.as_str()));
    start.push_attribute(("name", case.name.as_str()));
    start.push_attribute(("time", time.as_str()));

    let message = case.message.as_deref().unwrap_or_default();
    match case.status {
        TestStatus::Passed => write_event(writer, Event::Empty(start)),
        TestStatus::Skipped => {
            write_event(writer, Event::Start(start))?;
            let mut skipped = BytesStart::new("skipped");
            skipped.push_attribute(("message", message));
            write_event(writer, Event::Empty(skipped))?;
            write_event(writer, Event::End(BytesEnd::new("testcase")))
        }
        TestStatus::Failed | TestStatus::Errored => {
            write_event(writer, Event::Start(start))?;
            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", message));
            failure.push_attribute(("type", case.failure_type.as_deref().unwrap_or_default()));
            match case.detail.as_deref().filter(|d| !d.is_empty()) {
                Some(detail) => {
                    write_event(writer, Event::Start(failure))?;
                    write_event(writer, Event::Text(BytesText::new(detail)))?;
                    write_event(writer, Event::End(BytesEnd::new("failure")))?;
                }
                None => write_event(writer, Event::Empty(failure))?,
            }
            write_event(writer, Event::End(BytesEnd::new("testcase")))
        }
    }
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).context("Failed to write junit report")
}

/// Format a duration the way Go's `time.Duration` prints itself
/// (`0s`, `150ms`, `1.5s`, `2m3s`, `1h0m0s`).
pub fn format_go_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        return if nanos < 1_000 {
            format!("{nanos}ns")
        } else if nanos < 1_000_000 {
            format!("{}µs", fixed_point(nanos, 3))
        } else {
            format!("{}ms", fixed_point(nanos, 6))
        };
    }

    let seconds = fixed_point(nanos % 60_000_000_000, 9);
    let total_secs = nanos / 1_000_000_000;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// `value / 10^digits` with trailing fractional zeros dropped.
fn fixed_point(value: u128, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = digits as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, status: TestStatus, millis: u64) -> TestCase {
        let mut case = TestCase::new(name, "pkg", Duration::from_millis(millis));
        case.status = status;
        case
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_xml_write_failure_is_serialization_error() {
        let mut writer = Writer::new(ClosedSink);
        let err = write_case(&mut writer, &case("TestOk", TestStatus::Passed, 1)).unwrap_err();

        match err {
            ShardMergeError::Serialization {
                message, data_type, ..
            } => {
                assert!(message.starts_with("Failed to write junit report: XML serialization failed"));
                assert_eq!(data_type.as_deref(), Some("XML"));
            }
            other => panic!("Expected Serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_format_go_duration() {
        assert_eq!(format_go_duration(Duration::ZERO), "0s");
        assert_eq!(format_go_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_go_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_go_duration(Duration::from_nanos(2_500)), "2.5µs");
        assert_eq!(format_go_duration(Duration::from_millis(150)), "150ms");
        assert_eq!(format_go_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_go_duration(Duration::from_secs(123)), "2m3s");
        assert_eq!(format_go_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_go_duration(Duration::from_millis(3_661_250)), "1h1m1.25s");
    }

    #[test]
    fn test_render_suite_layout() {
        let mut failed = case("TestBad", TestStatus::Failed, 1500);
        failed.message = Some("Failed".to_string());
        failed.detail = Some("want 2 & got 1".to_string());
        let mut skipped = case("TestSkip", TestStatus::Skipped, 0);
        skipped.message = Some("slow".to_string());

        let suite = MergedSuite::from_cases(
            "bazel",
            vec![case("TestOk", TestStatus::Passed, 250), skipped, failed],
        );
        let xml = render_suite(&suite, 1).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(r#"<testsuite tests="3" failures="1" time="1.75s" name="bazel">"#));
        assert!(xml.contains("\n <testcase classname=\"pkg\" name=\"TestOk\" time=\"250ms\"/>"));
        assert!(xml.contains("\n  <skipped message=\"slow\"/>"));
        assert!(xml.contains(r#"<failure message="Failed" type="">want 2 &amp; got 1</failure>"#));
        assert!(xml.ends_with("</testsuite>\n"));
    }

    #[test]
    fn test_render_empty_suite() {
        let suite = MergedSuite::from_cases("bazel", Vec::new());
        let xml = render_suite(&suite, 2).unwrap();
        assert!(xml.contains(r#"<testsuite tests="0" failures="0" time="0s" name="bazel"/>"#));
    }

    #[test]
    fn test_render_without_indent_is_single_line() {
        let suite = MergedSuite::from_cases("s", vec![case("a", TestStatus::Passed, 0)]);
        let xml = render_suite(&suite, 0).unwrap();
        assert_eq!(xml.trim_end().lines().count(), 1);
    }

    #[test]
    fn test_errored_case_written_as_failure() {
        let mut errored = case("TestPanic", TestStatus::Errored, 0);
        errored.failure_type = Some("panic".to_string());
        let suite = MergedSuite::from_cases("s", vec![errored]);
        let xml = render_suite(&suite, 1).unwrap();
        assert!(xml.contains(r#"<failure message="" type="panic"/>"#));
        assert!(xml.contains(r#"failures="1""#));
    }
}
