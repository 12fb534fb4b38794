//! Outcome classification for conversion utility output

use crate::models::{CommandResult, ConversionStatus};

/// Identifiers the utility emits when a member was converted cleanly.
pub const SUCCESS_IDS: &[&str] = &["MSG3867", "MSG3868", "MSG4330", "MSG4409"];

/// Identifiers for conversions that completed with reservations.
pub const WARNING_IDS: &[&str] = &["MSG4178", "CPF9801", "MSG4331"];

/// Identifiers that still count as a converted member even when the remote
/// job ends with a non-zero exit code. MSG4178 reports conversion warnings,
/// not a failed conversion.
pub const CONVERSION_OK_IDS: &[&str] = &["MSG3867", "MSG3868", "MSG4330", "MSG4409", "MSG4178"];

/// Joblog identifiers carrying no information worth surfacing in a report.
pub const MUTED_IDS: &[&str] = &["MSG3565", "CPC0904", "CPD4090"];

/// The one identifier confirming a converted member exists at the
/// destination and can be opened.
pub const CONVERTED_MEMBER_ID: &str = "MSG3867";

fn contains_any(text: &str, ids: &[&str]) -> bool {
    ids.iter().any(|id| text.contains(id))
}

/// Categorize raw utility output. Success identifiers win over warnings;
/// anything without a known identifier is a failure.
pub fn classify(text: &str) -> ConversionStatus {
    if contains_any(text, SUCCESS_IDS) {
        ConversionStatus::Succeed
    } else if contains_any(text, WARNING_IDS) {
        ConversionStatus::Warning
    } else {
        ConversionStatus::Failed
    }
}

/// Categorize a command result, scanning both output streams.
pub fn classify_result(result: &CommandResult) -> ConversionStatus {
    classify(&format!("{}\n{}", result.stdout, result.stderr))
}

/// Whether the member counts as converted. A zero exit code is enough;
/// otherwise any conversion-ok identifier on either stream rescues the run.
pub fn is_conversion_ok(result: &CommandResult) -> bool {
    result.succeeded()
        || contains_any(&result.stderr, CONVERSION_OK_IDS)
        || contains_any(&result.stdout, CONVERSION_OK_IDS)
}

/// Whether the converted member can be opened afterwards. Gated on the
/// completion identifier in stdout only; warnings on stderr do not imply
/// the destination member was written.
pub fn should_open_converted(result: &CommandResult) -> bool {
    result.stdout.contains(CONVERTED_MEMBER_ID)
}

/// Whether a joblog line is pure noise for reporting purposes.
pub fn is_muted(line: &str) -> bool {
    contains_any(line, MUTED_IDS)
}

/// First line of the output worth storing as the entry's message.
pub fn summary_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_muted(line))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn result(code: i32, stdout: &str, stderr: &str) -> CommandResult {
        CommandResult {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test_case("MSG3867: Member CALC1 converted", ConversionStatus::Succeed; "converted")]
    #[test_case("MSG4409: conversion report produced", ConversionStatus::Succeed; "report produced")]
    #[test_case("MSG4178: 3 statements not converted", ConversionStatus::Warning; "not fully free")]
    #[test_case("CPF9801: Object not found", ConversionStatus::Warning; "object missing")]
    #[test_case("CPF0001: command failed", ConversionStatus::Failed; "unknown id")]
    #[test_case("", ConversionStatus::Failed; "empty output")]
    fn test_classify(text: &str, expected: ConversionStatus) {
        assert_eq!(classify(text), expected);
    }

    #[test]
    fn test_classify_success_wins_over_warning() {
        let text = "MSG4178: warnings issued\nMSG3867: Member CALC1 converted";
        assert_eq!(classify(text), ConversionStatus::Succeed);
    }

    #[test]
    fn test_conversion_ok_zero_exit() {
        assert!(is_conversion_ok(&result(0, "", "")));
    }

    #[test]
    fn test_conversion_ok_rescued_by_warning_id() {
        let res = result(1, "", "MSG4178: 3 statements not converted");
        assert!(is_conversion_ok(&res));
        assert!(!should_open_converted(&res));
    }

    #[test]
    fn test_conversion_not_ok_on_plain_failure() {
        assert!(!is_conversion_ok(&result(1, "CPF0001: failed", "")));
    }

    #[test]
    fn test_open_requires_stdout_completion_id() {
        assert!(should_open_converted(&result(
            0,
            "MSG3867: Member CALC1 converted",
            ""
        )));
        assert!(!should_open_converted(&result(
            0,
            "",
            "MSG3867: Member CALC1 converted"
        )));
    }

    #[test]
    fn test_summary_line_skips_muted_ids() {
        let text = "\nMSG3565: informational chatter\nMSG3867: Member CALC1 converted\n";
        assert_eq!(summary_line(text), "MSG3867: Member CALC1 converted");
        assert_eq!(summary_line("MSG3565: chatter"), "");
    }
}
