//! Shader compilation.
//!
//! Each `.vert`/`.frag` source directly under the asset directory is compiled
//! with glslc into `<output_dir>/<file name>.spv`. The asset directory itself
//! is the include search path so shaders can include their siblings.

use crate::build::step::{invoke, Step, StepOutcome};
use crate::build::{discover_shaders, BuildContext, DiscoveryError, PipelineError};
use crate::process::{CommandRunner, ExternalCommand};
use std::fs;
use std::path::{Path, PathBuf};

/// One shader source to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub include_dir: PathBuf,
}

impl ShaderJob {
    /// Command line compiling this job with the given compiler.
    pub fn command(&self, compiler: &Path) -> ExternalCommand {
        ExternalCommand::new(compiler)
            .path_arg(&self.source)
            .arg("-I")
            .path_arg(&self.include_dir)
            .arg("-o")
            .path_arg(&self.output)
    }
}

/// Plan one job per discovered shader, in file name order.
pub fn plan_shader_jobs(
    asset_dir: &Path,
    output_dir: &Path,
    extensions: &[String],
    compiled_suffix: &str,
) -> Result<Vec<ShaderJob>, DiscoveryError> {
    let sources = discover_shaders(asset_dir, extensions)?;

    Ok(sources
        .into_iter()
        .filter_map(|source| {
            let file_name = source.file_name()?.to_string_lossy().into_owned();
            Some(ShaderJob {
                output: output_dir.join(format!("{}.{}", file_name, compiled_suffix)),
                include_dir: asset_dir.to_path_buf(),
                source,
            })
        })
        .collect())
}

/// Compile every shader of the project.
///
/// The output directory is created first (an existing one is fine). Any
/// compiler failure aborts with the failing command.
pub fn compile_shaders(
    ctx: &BuildContext,
    runner: &dyn CommandRunner,
) -> Result<StepOutcome, PipelineError> {
    let asset_dir = ctx.shader_source_dir();
    let output_dir = ctx.shader_output_dir();
    let shaders = &ctx.config().shaders;

    if !ctx.is_dry_run() {
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::Io {
            step: Step::Shaders,
            path: output_dir.clone(),
            source,
        })?;
    }

    let jobs = plan_shader_jobs(&asset_dir, &output_dir, &shaders.extensions, &shaders.compiled_suffix)
        .map_err(|source| PipelineError::Discovery { step: Step::Shaders, source })?;
    log::debug!("{} shader(s) found in {}", jobs.len(), asset_dir.display());

    let compiler = ctx.shader_compiler_path();
    let mut outcome = StepOutcome::new();
    for job in &jobs {
        log::info!("compiling {}", job.source.display());
        invoke(runner, Step::Shaders, &job.command(&compiler), &mut outcome)?;
    }

    Ok(outcome)
}
