//! Invocation parsing and dispatch.
//!
//! `<configuration>` runs the full pipeline, `<command> <configuration>` runs
//! one command. Nothing external is launched until the invocation has been
//! fully parsed.

use crate::build::progress::ProgressReporter;
use crate::build::{BuildContext, Configuration, EmptyConfiguration, Pipeline, PipelineExecutor, Step};
use crate::process::CommandRunner;
use thiserror::Error;

use super::{EXIT_INVALID_ARGS, EXIT_SUCCESS, USAGE};

/// Rejected command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("Invalid command: '{0}'")]
    UnknownCommand(String),
    #[error("expected at most 2 arguments, got {0}")]
    TooManyArguments(usize),
    #[error(transparent)]
    EmptyConfiguration(#[from] EmptyConfiguration),
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// No arguments: show usage
    Usage,
    /// Full pipeline for a configuration
    Full { configuration: Configuration },
    /// One command for a configuration
    Single { command: Step, configuration: Configuration },
}

impl Invocation {
    /// Parse the positional arguments (program name excluded).
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, InvocationError> {
        match args {
            [] => Ok(Invocation::Usage),
            [configuration] => {
                Ok(Invocation::Full { configuration: Configuration::new(configuration.as_ref())? })
            }
            [command, configuration] => {
                let command = Step::from_name(command.as_ref())
                    .ok_or_else(|| InvocationError::UnknownCommand(command.as_ref().to_string()))?;
                Ok(Invocation::Single {
                    command,
                    configuration: Configuration::new(configuration.as_ref())?,
                })
            }
            _ => Err(InvocationError::TooManyArguments(args.len())),
        }
    }

    /// Steps this invocation runs, with its configuration.
    pub fn plan(&self) -> Option<(Pipeline, &Configuration)> {
        match self {
            Invocation::Usage => None,
            Invocation::Full { configuration } => Some((Pipeline::full(), configuration)),
            Invocation::Single { command, configuration } => {
                Some((Pipeline::single(*command), configuration))
            }
        }
    }
}

/// Execute a parsed invocation and return the process exit code.
pub fn dispatch(
    invocation: &Invocation,
    context: &BuildContext,
    runner: &dyn CommandRunner,
    reporter: &dyn ProgressReporter,
) -> u8 {
    let (pipeline, configuration) = match invocation.plan() {
        Some(plan) => plan,
        None => {
            println!("{}", USAGE);
            return EXIT_SUCCESS;
        }
    };

    log::debug!("platform: {}, project root: {}", context.platform().os(), context.project_root().display());

    match PipelineExecutor::new(context, runner, reporter).execute(&pipeline, configuration) {
        Ok(result) => {
            log::info!("{}", result.summary());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Parse positional arguments and dispatch them.
///
/// Usage and invalid invocations return before any command is run.
pub fn run_with<S: AsRef<str>>(
    args: &[S],
    context: &BuildContext,
    runner: &dyn CommandRunner,
    reporter: &dyn ProgressReporter,
) -> u8 {
    match Invocation::parse(args) {
        Ok(invocation) => dispatch(&invocation, context, runner, reporter),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            EXIT_INVALID_ARGS
        }
    }
}
