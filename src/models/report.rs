//! Execution results and batch aggregates

use serde::{Deserialize, Serialize};

use super::target::ConversionTarget;

/// Exit code and captured output of one remote command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        self.code == 0
    }

    /// Primary output stream, falling back to stderr when stdout is empty.
    /// The conversion utility writes its completion messages to either,
    /// depending on how the job ended.
    pub fn output(&self) -> &str {
        if self.stdout.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }

    /// Diagnostic stream, preferring stderr.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Outcome of converting a single target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub target: ConversionTarget,
    pub result: CommandResult,
}

/// Aggregate of one orchestrator run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub reports: Vec<ExecutionReport>,
    pub converted: usize,
    pub total: usize,
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn all_converted(&self) -> bool {
        self.converted == self.total
    }

    pub fn failed_count(&self) -> usize {
        self.total - self.converted
    }

    /// Closing line shown after a run.
    pub fn summary_message(&self) -> String {
        if self.all_converted() {
            if self.total == 1 {
                "Member converted successfully!".to_string()
            } else {
                "All members converted successfully!".to_string()
            }
        } else {
            format!(
                "{}/{} members could not be converted!",
                self.failed_count(),
                self.total
            )
        }
    }
}
