//! Command-line interface implementation
//!
//! Parses flags with clap, resolves the platform and project configuration,
//! then hands the positional arguments to the dispatcher.

mod dispatch;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::build::progress::{ConsoleProgress, JsonProgress, NullProgress, ProgressReporter};
use crate::build::BuildContext;
use crate::config::loader::{find_config, load_config, merge_cli_overrides, CliOverrides};
use crate::config::SproutConfig;
use crate::platform::{PlatformContext, PlatformError};
use crate::process::{CommandRunner, DryRunRunner, SystemRunner};

pub use dispatch::{dispatch, run_with, Invocation, InvocationError};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Usage text printed when no arguments are given.
pub const USAGE: &str = "\
Usage: sprout-build [OPTIONS] <configuration>
       sprout-build [OPTIONS] <command> <configuration>

Commands:
  build     compile shaders, lint, then build
  run       launch the built executable
  clean     clean the native build
  lint      run static analysis
  shaders   compile shaders only
  format    format sources only

With only a configuration, runs: format -> shaders -> lint -> build -> run";

/// Progress output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgressFormat {
    /// Step banners on stderr
    Console,
    /// One JSON object per event on stderr
    Json,
    /// No progress output
    Off,
}

/// sprout-build - build orchestration for the Magnolia engine and Sprout editor
#[derive(Debug, Parser)]
#[command(name = "sprout-build")]
#[command(about = "Format, compile shaders, lint, build and run the Sprout editor")]
#[command(version)]
pub struct Cli {
    /// `<configuration>` or `<command> <configuration>`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output (debug logging, per-step results)
    #[arg(short, long)]
    pub verbose: bool,

    /// Parallel jobs for the native build (default: logical core count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Path to sprout.toml (default: search upward from the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Project root (default: directory of sprout.toml, else the working directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the build root
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Progress output format
    #[arg(long, value_enum, default_value = "console")]
    pub progress: ProgressFormat,
}

/// Entry point used by the binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    ExitCode::from(execute(&cli))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn execute(cli: &Cli) -> u8 {
    if cli.dry_run {
        execute_with(cli, PlatformContext::detect(), &DryRunRunner::new())
    } else {
        execute_with(cli, PlatformContext::detect(), &SystemRunner::new())
    }
}

/// Run an invocation on a resolved (or unsupported) platform.
fn execute_with(
    cli: &Cli,
    platform: Result<PlatformContext, PlatformError>,
    runner: &dyn CommandRunner,
) -> u8 {
    // Parse before using the platform or config: usage and invalid
    // invocations must not have side effects.
    let invocation = match Invocation::parse(cli.args.as_slice()) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            return EXIT_INVALID_ARGS;
        }
    };
    if invocation == Invocation::Usage {
        println!("{}", USAGE);
        return EXIT_SUCCESS;
    }

    let platform = match platform {
        Ok(platform) => platform,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    let (config, project_root) = match load_project(cli) {
        Ok(loaded) => loaded,
        Err(message) => {
            eprintln!("Error: {}", message);
            return EXIT_ERROR;
        }
    };

    let context = BuildContext::new(config, platform, project_root).with_dry_run(cli.dry_run);

    let reporter: Box<dyn ProgressReporter> = match cli.progress {
        ProgressFormat::Console => Box::new(ConsoleProgress::new().with_verbose(cli.verbose)),
        ProgressFormat::Json => Box::new(JsonProgress::new()),
        ProgressFormat::Off => Box::new(NullProgress::new()),
    };

    dispatch(&invocation, &context, runner, reporter.as_ref())
}

/// Load sprout.toml (if any), apply CLI overrides and pick the project root.
fn load_project(cli: &Cli) -> Result<(SproutConfig, PathBuf), String> {
    let config_path = cli.config.clone().or_else(find_config);
    match &config_path {
        Some(path) => log::debug!("using config: {}", path.display()),
        None => log::debug!("no sprout.toml found, using defaults"),
    }

    let mut config = match &config_path {
        Some(path) => load_config(Some(path.as_path())).map_err(|e| e.to_string())?,
        None => crate::config::default_config(),
    };

    let overrides = CliOverrides { jobs: cli.jobs, build_root: cli.build_dir.clone() };
    merge_cli_overrides(&mut config, &overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"));
    }

    let cwd = std::env::current_dir().map_err(|e| format!("cannot read working directory: {}", e))?;
    let project_root = match (&cli.root, &config_path) {
        (Some(root), _) => cwd.join(root),
        (None, Some(path)) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
            _ => cwd,
        },
        (None, None) => cwd,
    };

    Ok((config, project_root))
}
