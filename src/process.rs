//! External process invocation.
//!
//! Every external tool (premake, make/msbuild, glslc, clang-format, cppcheck
//! and the engine itself) is launched through the [`CommandRunner`] trait.
//! Arguments are passed as a vector and never go through a shell.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A fully described external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ExternalCommand {
    /// Create a command for the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), working_dir: None }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.display().to_string()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.contains(char::is_whitespace) {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

/// Exit status of a finished external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    /// Status of a process that exited normally with the given code.
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a process killed by a signal (no exit code).
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self { code: status.code() }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// How a step reacts to a non-zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the pipeline.
    Fatal,
    /// Log and keep going.
    BestEffort,
}

/// Process launch error.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to run an external command to completion.
pub trait CommandRunner {
    /// Spawn the command, block until it exits and return its status.
    fn run(&self, command: &ExternalCommand) -> Result<ExitStatus, ProcessError>;
}

/// Runs commands on the host with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> Result<ExitStatus, ProcessError> {
        log::debug!("exec: {}", command);

        let mut process = std::process::Command::new(command.program());
        process.args(command.get_args());
        if let Some(dir) = command.working_dir() {
            log::debug!("  in {}", dir.display());
            process.current_dir(dir);
        }

        let status = process
            .status()
            .map_err(|source| ProcessError::Spawn { command: command.to_string(), source })?;
        Ok(status.into())
    }
}

/// Prints each command instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl DryRunRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &ExternalCommand) -> Result<ExitStatus, ProcessError> {
        match command.working_dir() {
            Some(dir) => println!("  $ {}    (in {})", command, dir.display()),
            None => println!("  $ {}", command),
        }
        Ok(ExitStatus::from_code(0))
    }
}
