use super::failure::FailureInput;
use super::payload::{NormalizedReport, ReportPayload};
use crate::constants::{REJECTION_HEADER_PATTERN, REJECTION_NAME};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static REJECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(REJECTION_HEADER_PATTERN).expect("rejection header pattern is valid"));

/// Shape any failure value into what the sink receives.
///
/// Native errors pass through unchanged. Everything else is coerced to text
/// and split into a title (first line, with the unhandled-rejection header
/// removed) and a stack (the remaining lines).
pub fn normalize(input: FailureInput) -> ReportPayload {
    match input {
        FailureInput::NativeError(error) => ReportPayload::Error(error),
        FailureInput::RawString(text) => ReportPayload::Report(normalize_text(&text)),
        FailureInput::Structured(value) => ReportPayload::Report(normalize_structured(value)),
    }
}

pub fn normalize_text(text: &str) -> NormalizedReport {
    normalize_lines(text.split('\n').map(str::to_string).collect())
}

fn normalize_lines(mut lines: Vec<String>) -> NormalizedReport {
    let first = if lines.is_empty() {
        String::new()
    } else {
        lines.remove(0)
    };

    let mut title = strip_rejection_header(&first);

    // The header can sit alone on its line with the actual error below it.
    if title.trim().is_empty() && title != first && !lines.is_empty() {
        title = lines.remove(0);
    }

    NormalizedReport::new(REJECTION_NAME, title, lines.join("\n"))
}

/// Remove the first occurrence of the unhandled-rejection header.
pub fn strip_rejection_header(title: &str) -> String {
    REJECTION_HEADER.replace(title, "").into_owned()
}

fn normalize_structured(value: Value) -> NormalizedReport {
    match value {
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(message) => NormalizedReport::new(
                map.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(REJECTION_NAME),
                message,
                map.get("stack").and_then(Value::as_str).unwrap_or_default(),
            ),
            None => normalize_text(&Value::Object(map).to_string()),
        },
        Value::Array(items) => normalize_lines(items.into_iter().map(coerce_to_string).collect()),
        other => normalize_text(&coerce_to_string(other)),
    }
}

fn coerce_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn report_of(input: impl Into<FailureInput>) -> NormalizedReport {
        match normalize(input.into()) {
            ReportPayload::Report(report) => report,
            other => panic!("expected a normalized report, got {:?}", other),
        }
    }

    #[test]
    fn test_native_error_is_forwarded_unchanged() {
        let error: crate::report::NativeError = Arc::new(std::io::Error::other("boom"));
        let payload = normalize(FailureInput::NativeError(error.clone()));

        let forwarded = payload.as_error().expect("native error payload");
        assert!(Arc::ptr_eq(forwarded, &error));
    }

    #[test]
    fn test_when_style_rejection_is_normalized() {
        let report = report_of("Potentially unhandled rejection [0]\nError: boom\nat foo.js:10");
        assert_eq!(
            report,
            NormalizedReport::new("Promise rejection", "Error: boom", "at foo.js:10")
        );
    }

    #[test]
    fn test_single_line_has_empty_stack() {
        let report = report_of("Just one line");
        assert_eq!(
            report,
            NormalizedReport::new("Promise rejection", "Just one line", "")
        );
    }

    #[test]
    fn test_header_on_same_line_is_stripped() {
        let report = report_of("Potentially unhandled rejection [3] TypeError: x is undefined\n  at a.js:1\n  at b.js:2");
        assert_eq!(report.message, "TypeError: x is undefined");
        assert_eq!(report.stack, "  at a.js:1\n  at b.js:2");
    }

    #[rstest]
    #[case("Error: plain", "Error: plain")]
    #[case("", "")]
    #[case("   indented title  ", "   indented title  ")]
    #[case("Potentially unhandled rejection [12] two digits", "Potentially unhandled rejection [12] two digits")]
    #[case("potentially unhandled rejection [1] lowercase", "potentially unhandled rejection [1] lowercase")]
    fn test_title_without_header_is_first_line(#[case] first_line: &str, #[case] expected: &str) {
        let report = report_of(format!("{}\nat x.rs:1", first_line));
        assert_eq!(report.message, expected);
        assert_eq!(report.stack, "at x.rs:1");
    }

    #[test]
    fn test_header_in_the_middle_of_title_is_removed() {
        let report = report_of("wrapped: Potentially unhandled rejection [7] inner");
        assert_eq!(report.message, "wrapped: inner");
    }

    #[test]
    fn test_lone_header_without_more_lines_gives_empty_title() {
        let report = report_of("Potentially unhandled rejection [4]");
        assert_eq!(report.message, "");
        assert_eq!(report.stack, "");
    }

    #[test]
    fn test_structured_record_is_kept() {
        let report = report_of(json!({
            "name": "TimeoutError",
            "message": "took too long",
            "stack": "at poll.rs:9"
        }));
        assert_eq!(
            report,
            NormalizedReport::new("TimeoutError", "took too long", "at poll.rs:9")
        );
    }

    #[test]
    fn test_structured_record_defaults_name_and_stack() {
        let report = report_of(json!({"message": "lost connection"}));
        assert_eq!(
            report,
            NormalizedReport::new("Promise rejection", "lost connection", "")
        );
    }

    #[test]
    fn test_array_is_treated_as_lines() {
        let report = report_of(json!([
            "Potentially unhandled rejection [2] Error: nope",
            "at one.js:1",
            5
        ]));
        assert_eq!(report.message, "Error: nope");
        assert_eq!(report.stack, "at one.js:1\n5");
    }

    #[rstest]
    #[case(json!(42), "42")]
    #[case(json!(true), "true")]
    #[case(json!(null), "null")]
    #[case(json!("text\nmore"), "text")]
    #[case(json!({"code": 7}), r#"{"code":7}"#)]
    fn test_other_values_are_coerced(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(report_of(value).message, expected);
    }
}
