//! Native build, run and clean steps.
//!
//! Linux generates makefiles with premake and drives `make`; Windows generates
//! a Visual Studio solution and drives `msbuild`.

use crate::build::artifacts::merge_copy;
use crate::build::step::{invoke, Step, StepOutcome};
use crate::build::{BuildContext, Configuration, PipelineError};
use crate::platform::Os;
use crate::process::{CommandRunner, ExternalCommand};

/// Command generating native project files.
pub fn generate_command(ctx: &BuildContext) -> ExternalCommand {
    let tools = &ctx.config().tools;
    let action = match ctx.platform().os() {
        Os::Linux => &tools.linux_generator_action,
        Os::Windows => &tools.windows_generator_action,
    };

    ExternalCommand::new(ctx.build_generator_path())
        .arg(action.as_str())
        .current_dir(ctx.project_root())
}

fn solution_name(ctx: &BuildContext) -> String {
    format!("{}.sln", ctx.config().project.name)
}

/// Command compiling and linking `configuration` with `jobs` parallel jobs.
pub fn build_command(ctx: &BuildContext, configuration: &Configuration, jobs: usize) -> ExternalCommand {
    match ctx.platform().os() {
        Os::Linux => ExternalCommand::new("make")
            .arg(format!("config={}", configuration))
            .arg(format!("-j{}", jobs))
            .current_dir(ctx.build_root()),
        Os::Windows => ExternalCommand::new("msbuild")
            .arg(solution_name(ctx))
            .arg(format!("/p:Configuration={}", configuration))
            .arg(format!("/m:{}", jobs))
            .current_dir(ctx.build_root()),
    }
}

/// Command running the native clean target for `configuration`.
pub fn clean_command(ctx: &BuildContext, configuration: &Configuration) -> ExternalCommand {
    match ctx.platform().os() {
        Os::Linux => ExternalCommand::new("make")
            .arg("clean")
            .arg(format!("config={}", configuration))
            .current_dir(ctx.build_root()),
        Os::Windows => ExternalCommand::new("msbuild")
            .arg(solution_name(ctx))
            .arg("/t:Clean")
            .arg(format!("/p:Configuration={}", configuration))
            .current_dir(ctx.build_root()),
    }
}

/// Command launching the built executable from its runtime directory.
pub fn run_command(ctx: &BuildContext, configuration: &Configuration) -> ExternalCommand {
    ExternalCommand::new(ctx.executable_path(configuration))
        .current_dir(ctx.runtime_dir(configuration))
}

/// Generate project files, build, then merge compiled shaders next to the
/// executable.
///
/// Generator and build failures abort. A failed shader merge only produces a
/// warning: the binary is usable, it will just miss its shaders at run time.
pub fn build(
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
    configuration: &Configuration,
) -> Result<StepOutcome, PipelineError> {
    let mut outcome = StepOutcome::new();

    invoke(runner, Step::Build, &generate_command(ctx), &mut outcome)?;

    let jobs = ctx.jobs();
    log::debug!("building {} with {} job(s)", configuration, jobs);
    invoke(runner, Step::Build, &build_command(ctx, configuration, jobs), &mut outcome)?;

    let from = ctx.shader_output_dir();
    let to = ctx.runtime_shader_dir(configuration);
    if ctx.is_dry_run() {
        println!("  would copy {} -> {}", from.display(), to.display());
        return Ok(outcome);
    }

    match merge_copy(&from, &to) {
        Ok(stats) => {
            log::debug!("copied {} shader artifact(s) to {}", stats.files, to.display());
        }
        Err(e) => {
            log::warn!("{}", e);
            outcome.warn(format!("shader artifacts not copied: {}", e));
        }
    }

    Ok(outcome)
}

/// Launch the built executable. A non-zero exit is propagated.
pub fn run(
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
    configuration: &Configuration,
) -> Result<StepOutcome, PipelineError> {
    let mut outcome = StepOutcome::new();
    invoke(runner, Step::Run, &run_command(ctx, configuration), &mut outcome)?;
    Ok(outcome)
}

/// Run the native clean target.
pub fn clean(
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
    configuration: &Configuration,
) -> Result<StepOutcome, PipelineError> {
    let mut outcome = StepOutcome::new();
    invoke(runner, Step::Clean, &clean_command(ctx, configuration), &mut outcome)?;
    Ok(outcome)
}
