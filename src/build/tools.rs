//! Advisory source tooling: code formatting and static analysis.
//!
//! Neither step can fail the pipeline. Missing tools, missing source trees
//! and non-zero exits all end up as warnings.

use crate::build::step::{invoke, Step, StepOutcome};
use crate::build::{discover_sources, BuildContext, PipelineError};
use crate::process::{CommandRunner, ExternalCommand};
use std::path::PathBuf;

/// Command formatting `files` in place, or `None` when there is nothing to format.
pub fn format_command(ctx: &BuildContext, files: &[PathBuf]) -> Option<ExternalCommand> {
    if files.is_empty() {
        return None;
    }

    let format = &ctx.config().format;
    let mut cmd = ExternalCommand::new(&ctx.config().tools.formatter)
        .arg("-i")
        .arg(format!("-style={}", format.style))
        .current_dir(ctx.project_root());
    for file in files {
        cmd = cmd.path_arg(file);
    }
    Some(cmd)
}

/// Command running the static analyzer over the engine tree.
pub fn lint_command(ctx: &BuildContext) -> ExternalCommand {
    let lint = &ctx.config().lint;
    ExternalCommand::new(&ctx.config().tools.analyzer)
        .args(lint.args.iter().cloned())
        .path_arg(&ctx.resolve_path(&lint.root))
        .current_dir(ctx.project_root())
}

/// Format every configured source tree with a single formatter invocation.
pub fn format(ctx: &BuildContext, runner: &dyn CommandRunner) -> Result<StepOutcome, PipelineError> {
    let mut outcome = StepOutcome::new();
    let extensions = &ctx.config().format.extensions;

    let mut files = Vec::new();
    for root in &ctx.config().format.roots {
        let root = ctx.resolve_path(root);
        match discover_sources(&root, extensions) {
            Ok(found) => {
                log::debug!("{} file(s) to format in {}", found.len(), root.display());
                files.extend(found);
            }
            Err(e) => outcome.warn(format!("skipping {}: {}", root.display(), e)),
        }
    }

    match format_command(ctx, &files) {
        Some(cmd) => invoke(runner, Step::Format, &cmd, &mut outcome)?,
        None => log::info!("no sources to format"),
    }

    Ok(outcome)
}

/// Run the static analyzer over the engine tree.
pub fn lint(ctx: &BuildContext, runner: &dyn CommandRunner) -> Result<StepOutcome, PipelineError> {
    let mut outcome = StepOutcome::new();
    invoke(runner, Step::Lint, &lint_command(ctx), &mut outcome)?;
    Ok(outcome)
}
