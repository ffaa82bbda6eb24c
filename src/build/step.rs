//! Pipeline steps and their failure policies.

use crate::build::PipelineError;
use crate::process::{CommandRunner, ExternalCommand, FailurePolicy};
use std::fmt;

/// A named step of the orchestration pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Format,
    Shaders,
    Lint,
    Build,
    Run,
    Clean,
}

impl Step {
    pub const ALL: [Step; 6] =
        [Step::Format, Step::Shaders, Step::Lint, Step::Build, Step::Run, Step::Clean];

    pub fn name(&self) -> &'static str {
        match self {
            Step::Format => "format",
            Step::Shaders => "shaders",
            Step::Lint => "lint",
            Step::Build => "build",
            Step::Run => "run",
            Step::Clean => "clean",
        }
    }

    /// Heading printed when the step starts.
    pub fn title(&self) -> &'static str {
        match self {
            Step::Format => "Formatting sources",
            Step::Shaders => "Compiling shaders",
            Step::Lint => "Running static analysis",
            Step::Build => "Building",
            Step::Run => "Running",
            Step::Clean => "Cleaning",
        }
    }

    /// Formatting and linting are advisory; everything else aborts the run.
    pub fn policy(&self) -> FailurePolicy {
        match self {
            Step::Format | Step::Lint => FailurePolicy::BestEffort,
            Step::Shaders | Step::Build | Step::Run | Step::Clean => FailurePolicy::Fatal,
        }
    }

    pub fn from_name(name: &str) -> Option<Step> {
        Step::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a step did: commands issued and advisory warnings collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub commands: usize,
    pub warnings: Vec<String>,
}

impl StepOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Run one command on behalf of `step`, applying the step's failure policy.
///
/// Fatal steps turn a non-zero exit or a launch failure into an error.
/// Best-effort steps record a warning in `outcome` and return `Ok`.
pub fn invoke(
    runner: &dyn CommandRunner,
    step: Step,
    command: &ExternalCommand,
    outcome: &mut StepOutcome,
) -> Result<(), PipelineError> {
    outcome.commands += 1;

    let failure = match runner.run(command) {
        Ok(status) if status.success() => return Ok(()),
        Ok(status) => PipelineError::StepFailed { step, command: command.to_string(), status },
        Err(source) => PipelineError::Launch { step, source },
    };

    match step.policy() {
        FailurePolicy::Fatal => Err(failure),
        FailurePolicy::BestEffort => {
            log::warn!("{}", failure);
            outcome.warn(failure.to_string());
            Ok(())
        }
    }
}
