//! Pipeline orchestration.
//!
//! A [`Pipeline`] is an ordered list of steps. Plans are checked against the
//! ordering rules before anything runs: shaders must be compiled before a
//! build merges them, and a build must finish before its executable runs.

use crate::build::progress::{ProgressEvent, ProgressReporter};
use crate::build::{
    native, shaders, tools, BuildContext, Configuration, DiscoveryError, PipelineResult, Step,
    StepOutcome, StepResult, StepStatus,
};
use crate::process::{CommandRunner, ExitStatus, ProcessError};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Error that stops a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A fatal-policy command exited with a non-zero status
    #[error("{step} failed: `{command}` returned {status}")]
    StepFailed { step: Step, command: String, status: ExitStatus },
    /// A fatal-policy command could not be launched
    #[error("{step} failed: {source}")]
    Launch {
        step: Step,
        #[source]
        source: ProcessError,
    },
    /// Source discovery failed
    #[error("{step} failed: {source}")]
    Discovery {
        step: Step,
        #[source]
        source: DiscoveryError,
    },
    /// Filesystem preparation failed
    #[error("{step} failed: cannot create {path}: {source}")]
    Io {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The step order breaks a pipeline invariant
    #[error(transparent)]
    Order(#[from] PipelineOrderError),
}

impl PipelineError {
    /// Step that failed, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            PipelineError::StepFailed { step, .. }
            | PipelineError::Launch { step, .. }
            | PipelineError::Discovery { step, .. }
            | PipelineError::Io { step, .. } => Some(*step),
            PipelineError::Order(_) => None,
        }
    }

    /// Process exit code for this failure.
    ///
    /// A failing external command propagates its own status when it fits in
    /// a process exit code; everything else maps to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::StepFailed { status, .. } => match status.code() {
                Some(code) if (1..=255).contains(&code) => code as u8,
                _ => 1,
            },
            _ => 1,
        }
    }
}

/// Step ordering violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineOrderError {
    #[error("step '{0}' appears more than once")]
    Duplicate(Step),
    #[error("'{before}' must run before '{after}'")]
    OutOfOrder { before: Step, after: Step },
    #[error("'build' requires 'shaders' earlier in the pipeline")]
    MissingShaders,
}

/// An ordered, validated sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Build a pipeline, enforcing the ordering invariants.
    pub fn new(steps: Vec<Step>) -> Result<Self, PipelineOrderError> {
        let position = |step: Step| steps.iter().position(|s| *s == step);

        for (i, step) in steps.iter().enumerate() {
            if steps[..i].contains(step) {
                return Err(PipelineOrderError::Duplicate(*step));
            }
        }

        if let Some(build) = position(Step::Build) {
            match position(Step::Shaders) {
                Some(shaders) if shaders < build => {}
                Some(_) => {
                    return Err(PipelineOrderError::OutOfOrder {
                        before: Step::Shaders,
                        after: Step::Build,
                    })
                }
                None => return Err(PipelineOrderError::MissingShaders),
            }

            if let Some(run) = position(Step::Run) {
                if run < build {
                    return Err(PipelineOrderError::OutOfOrder {
                        before: Step::Build,
                        after: Step::Run,
                    });
                }
            }
        }

        Ok(Self { steps })
    }

    /// Full pipeline used when only a configuration is given.
    pub fn full() -> Self {
        Self { steps: vec![Step::Format, Step::Shaders, Step::Lint, Step::Build, Step::Run] }
    }

    /// Everything needed to produce a runnable build.
    pub fn build() -> Self {
        Self { steps: vec![Step::Shaders, Step::Lint, Step::Build] }
    }

    /// A single step. `build` expands to [`Pipeline::build`].
    pub fn single(step: Step) -> Self {
        match step {
            Step::Build => Self::build(),
            other => Self { steps: vec![other] },
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Executes pipelines against a context, a command runner and a reporter.
pub struct PipelineExecutor<'a> {
    context: &'a BuildContext,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> PipelineExecutor<'a> {
    pub fn new(
        context: &'a BuildContext,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self { context, runner, reporter }
    }

    /// Run every step in order, stopping at the first fatal failure.
    pub fn execute(
        &self,
        pipeline: &Pipeline,
        configuration: &Configuration,
    ) -> Result<PipelineResult, PipelineError> {
        let start = Instant::now();
        let mut result = PipelineResult::new();

        self.reporter.report(ProgressEvent::PipelineStarted {
            configuration: configuration.to_string(),
            steps: pipeline.steps().to_vec(),
        });

        for &step in pipeline.steps() {
            self.reporter.report(ProgressEvent::StepStarted { step });
            let step_start = Instant::now();

            match self.execute_step(step, configuration) {
                Ok(outcome) => {
                    for warning in &outcome.warnings {
                        self.reporter.report(ProgressEvent::Warning {
                            step: Some(step),
                            message: warning.clone(),
                        });
                    }
                    let status = if outcome.warnings.is_empty() {
                        StepStatus::Success
                    } else {
                        StepStatus::Warned
                    };
                    let duration = step_start.elapsed();
                    self.reporter.report(ProgressEvent::StepCompleted {
                        step,
                        status: status.clone(),
                        duration_ms: duration.as_millis() as u64,
                    });
                    result.add_result(StepResult {
                        step,
                        status,
                        commands: outcome.commands,
                        duration,
                        warnings: outcome.warnings,
                    });
                }
                Err(e) => {
                    self.reporter.report(ProgressEvent::StepCompleted {
                        step,
                        status: StepStatus::Failed(e.to_string()),
                        duration_ms: step_start.elapsed().as_millis() as u64,
                    });
                    self.reporter.report(ProgressEvent::PipelineCompleted {
                        success: false,
                        duration_ms: start.elapsed().as_millis() as u64,
                        completed: result.steps.len(),
                    });
                    return Err(e);
                }
            }
        }

        result.total_duration = start.elapsed();
        self.reporter.report(ProgressEvent::PipelineCompleted {
            success: true,
            duration_ms: result.total_duration.as_millis() as u64,
            completed: result.steps.len(),
        });

        Ok(result)
    }

    fn execute_step(
        &self,
        step: Step,
        configuration: &Configuration,
    ) -> Result<StepOutcome, PipelineError> {
        let (ctx, runner) = (self.context, self.runner);
        match step {
            Step::Format => tools::format(ctx, runner),
            Step::Shaders => shaders::compile_shaders(ctx, runner),
            Step::Lint => tools::lint(ctx, runner),
            Step::Build => native::build(ctx, runner, configuration),
            Step::Run => native::run(ctx, runner, configuration),
            Step::Clean => native::clean(ctx, runner, configuration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline_order() {
        assert_eq!(
            Pipeline::full().steps(),
            &[Step::Format, Step::Shaders, Step::Lint, Step::Build, Step::Run]
        );
    }

    #[test]
    fn test_builtin_pipelines_are_valid() {
        for pipeline in [Pipeline::full(), Pipeline::build()] {
            assert_eq!(Pipeline::new(pipeline.steps().to_vec()).unwrap(), pipeline);
        }
        for step in Step::ALL {
            let pipeline = Pipeline::single(step);
            assert!(Pipeline::new(pipeline.steps().to_vec()).is_ok());
        }
    }

    #[test]
    fn test_single_build_includes_shaders() {
        assert_eq!(Pipeline::single(Step::Build).steps(), &[Step::Shaders, Step::Lint, Step::Build]);
        assert_eq!(Pipeline::single(Step::Run).steps(), &[Step::Run]);
    }

    #[test]
    fn test_build_before_shaders_rejected() {
        let err = Pipeline::new(vec![Step::Build, Step::Shaders]).unwrap_err();
        assert_eq!(err, PipelineOrderError::OutOfOrder { before: Step::Shaders, after: Step::Build });
    }

    #[test]
    fn test_build_without_shaders_rejected() {
        assert_eq!(Pipeline::new(vec![Step::Build]).unwrap_err(), PipelineOrderError::MissingShaders);
    }

    #[test]
    fn test_run_before_build_rejected() {
        let err = Pipeline::new(vec![Step::Shaders, Step::Run, Step::Build]).unwrap_err();
        assert_eq!(err, PipelineOrderError::OutOfOrder { before: Step::Build, after: Step::Run });
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Pipeline::new(vec![Step::Lint, Step::Lint]).unwrap_err();
        assert_eq!(err, PipelineOrderError::Duplicate(Step::Lint));
    }

    #[test]
    fn test_exit_code_mapping() {
        let failed = |code| PipelineError::StepFailed {
            step: Step::Run,
            command: "engine".to_string(),
            status: code,
        };
        assert_eq!(failed(ExitStatus::from_code(3)).exit_code(), 3);
        assert_eq!(failed(ExitStatus::from_code(-1073741819)).exit_code(), 1);
        assert_eq!(failed(ExitStatus::from_code(300)).exit_code(), 1);
        assert_eq!(failed(ExitStatus::terminated()).exit_code(), 1);
        assert_eq!(failed(ExitStatus::from_code(3)).step(), Some(Step::Run));
    }
}
