//! Markdown rendering of batch outcomes

use crate::classifier;
use crate::models::{BatchOutcome, ConversionStatus, ExecutionReport};

fn status_icon(status: ConversionStatus) -> &'static str {
    match status {
        ConversionStatus::Succeed => "✅",
        ConversionStatus::Warning => "⚠️",
        ConversionStatus::Failed => "❌",
        ConversionStatus::Na => "•",
    }
}

fn member_path(report: &ExecutionReport) -> String {
    let target = &report.target;
    match &target.member {
        Some(member) => format!("{}/{}/{}", target.library, target.file, member),
        None => format!("{}/{}", target.library, target.file),
    }
}

fn joblog_excerpt(report: &ExecutionReport) -> Vec<&str> {
    report
        .result
        .diagnostics()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !classifier::is_muted(line))
        .collect()
}

pub fn generate_markdown_report(outcome: &BatchOutcome) -> String {
    let mut report = String::new();

    report.push_str("# Member Conversion Report\n\n");

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Members**: {}\n", outcome.total));
    report.push_str(&format!("- **Converted**: {}\n", outcome.converted));
    report.push_str(&format!("- **Failed**: {}\n", outcome.failed_count()));
    report.push_str(&format!(
        "- **Status**: {}\n",
        if outcome.all_converted() {
            "✅ Success"
        } else {
            "❌ Incomplete"
        }
    ));
    if outcome.cancelled {
        report.push_str("- **Cancelled**: the run was stopped before all members were attempted\n");
    }
    report.push('\n');

    // Per-member results
    if !outcome.reports.is_empty() {
        report.push_str("## Results\n\n");
        for entry in &outcome.reports {
            let text = format!("{}\n{}", entry.result.stdout, entry.result.stderr);
            let status = classifier::classify(&text);
            let message = classifier::summary_line(&text);
            report.push_str(&format!(
                "- {} **{}**: {}\n",
                status_icon(status),
                member_path(entry),
                if message.is_empty() {
                    "no output"
                } else {
                    &message
                }
            ));
        }
        report.push('\n');
    }

    // Joblog details for everything that did not convert cleanly
    let troubled: Vec<&ExecutionReport> = outcome
        .reports
        .iter()
        .filter(|entry| !classifier::is_conversion_ok(&entry.result))
        .collect();
    if !troubled.is_empty() {
        report.push_str("## ⛔ Failures\n\n");
        for entry in troubled {
            report.push_str(&format!("### {}\n\n", member_path(entry)));
            report.push_str(&format!("Exit code: {}\n\n", entry.result.code));
            let excerpt = joblog_excerpt(entry);
            if !excerpt.is_empty() {
                report.push_str("```text\n");
                for line in excerpt {
                    report.push_str(line);
                    report.push('\n');
                }
                report.push_str("```\n\n");
            }
        }
    }

    report.push_str(&format!("{}\n", outcome.summary_message()));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommandResult, ConversionTarget};

    fn report_for(member: &str, result: CommandResult) -> ExecutionReport {
        let mut target = ConversionTarget::for_file("PRODLIB", "QRPGLESRC", None);
        target.member = Some(member.to_string());
        target.extension = Some("RPGLE".to_string());
        ExecutionReport { target, result }
    }

    fn sample_outcome() -> BatchOutcome {
        BatchOutcome {
            reports: vec![
                report_for(
                    "CALC1",
                    CommandResult {
                        code: 0,
                        stdout: "MSG3867: Member CALC1 converted".into(),
                        stderr: String::new(),
                    },
                ),
                report_for(
                    "PAY01",
                    CommandResult {
                        code: 1,
                        stdout: String::new(),
                        stderr: "MSG3565: chatter\nCPF0001: command ACVTRPGFRE failed".into(),
                    },
                ),
            ],
            converted: 1,
            total: 2,
            cancelled: false,
        }
    }

    #[test]
    fn test_markdown_report_sections() {
        let markdown = generate_markdown_report(&sample_outcome());
        assert!(markdown.starts_with("# Member Conversion Report"));
        assert!(markdown.contains("- **Members**: 2"));
        assert!(markdown.contains("- **Converted**: 1"));
        assert!(markdown.contains("✅ **PRODLIB/QRPGLESRC/CALC1**: MSG3867"));
        assert!(markdown.contains("❌ **PRODLIB/QRPGLESRC/PAY01**"));
        assert!(markdown.contains("## ⛔ Failures"));
        assert!(markdown.contains("Exit code: 1"));
        assert!(markdown.contains("1/2 members could not be converted!"));
    }

    #[test]
    fn test_markdown_report_mutes_joblog_noise() {
        let markdown = generate_markdown_report(&sample_outcome());
        assert!(!markdown.contains("MSG3565"));
        assert!(markdown.contains("CPF0001: command ACVTRPGFRE failed"));
    }

    #[test]
    fn test_markdown_report_notes_cancellation() {
        let mut outcome = sample_outcome();
        outcome.cancelled = true;
        let markdown = generate_markdown_report(&outcome);
        assert!(markdown.contains("- **Cancelled**"));
    }
}
