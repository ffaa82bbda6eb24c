//! Pipeline result types.

use crate::build::Step;
use std::time::Duration;

/// Status of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Step succeeded
    Success,
    /// Advisory step finished with warnings
    Warned,
    /// Step failed and stopped the pipeline
    Failed(String),
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Success | StepStatus::Warned)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Success => write!(f, "success"),
            StepStatus::Warned => write!(f, "warnings"),
            StepStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of one executed step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step: Step,
    pub status: StepStatus,
    /// External commands issued
    pub commands: usize,
    pub duration: Duration,
    pub warnings: Vec<String>,
}

/// Result of a pipeline run, in execution order.
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub steps: Vec<StepResult>,
    pub total_duration: Duration,
}

impl PipelineResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: StepResult) {
        self.steps.push(result);
    }

    /// Steps that ran, in order.
    pub fn executed(&self) -> Vec<Step> {
        self.steps.iter().map(|r| r.step).collect()
    }

    pub fn command_count(&self) -> usize {
        self.steps.iter().map(|r| r.commands).sum()
    }

    pub fn all_warnings(&self) -> Vec<&String> {
        self.steps.iter().flat_map(|r| r.warnings.iter()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|r| r.status.is_success())
    }

    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        let warnings = self.all_warnings().len();
        let mut summary = format!(
            "{} step{} ({} command{}) in {:.2}s",
            self.steps.len(),
            if self.steps.len() == 1 { "" } else { "s" },
            self.command_count(),
            if self.command_count() == 1 { "" } else { "s" },
            self.total_duration.as_secs_f64()
        );
        if warnings > 0 {
            summary.push_str(&format!(", {} warning{}", warnings, if warnings == 1 { "" } else { "s" }));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(step: Step, status: StepStatus, commands: usize, warnings: &[&str]) -> StepResult {
        StepResult {
            step,
            status,
            commands,
            duration: Duration::from_millis(5),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_status() {
        assert!(StepStatus::Success.is_success());
        assert!(StepStatus::Warned.is_success());
        assert!(StepStatus::Failed("x".into()).is_failure());
        assert_eq!(StepStatus::Failed("boom".into()).to_string(), "failed: boom");
    }

    #[test]
    fn test_pipeline_result_aggregates() {
        let mut pr = PipelineResult::new();
        pr.add_result(result(Step::Format, StepStatus::Warned, 1, &["clang-format missing"]));
        pr.add_result(result(Step::Shaders, StepStatus::Success, 2, &[]));

        assert_eq!(pr.executed(), vec![Step::Format, Step::Shaders]);
        assert_eq!(pr.command_count(), 3);
        assert_eq!(pr.all_warnings().len(), 1);
        assert!(pr.is_success());
        assert!(pr.summary().starts_with("2 steps (3 commands)"));
        assert!(pr.summary().ends_with("1 warning"));
    }
}
