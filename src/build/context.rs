//! Build context containing configuration and state for a pipeline run.

use crate::build::Configuration;
use crate::config::SproutConfig;
use crate::platform::PlatformContext;
use std::path::{Path, PathBuf};

/// Build context containing configuration, platform and paths for a run.
///
/// The context resolves every project-relative location the pipeline needs.
/// Platform-dependent relative paths go through [`PlatformContext::join`].
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: SproutConfig,
    /// Resolved host platform
    platform: PlatformContext,
    /// Project root directory (where sprout.toml is located)
    project_root: PathBuf,
    /// Whether to print commands instead of running them
    dry_run: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: SproutConfig, platform: PlatformContext, project_root: PathBuf) -> Self {
        Self { config, platform, project_root, dry_run: false }
    }

    pub fn config(&self) -> &SproutConfig {
        &self.config
    }

    pub fn platform(&self) -> &PlatformContext {
        &self.platform
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Set dry-run mode (no filesystem changes, commands are only printed).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Directory holding shader sources.
    pub fn shader_source_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.shaders.source_dir)
    }

    /// Directory receiving compiled shaders.
    pub fn shader_output_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.shaders.output_dir)
    }

    /// Root of the native build (where the generator writes project files).
    pub fn build_root(&self) -> PathBuf {
        self.resolve_path(&self.config.build.root)
    }

    /// Runtime directory of a built configuration: `<build>/<os>/<configuration>`.
    pub fn runtime_dir(&self, configuration: &Configuration) -> PathBuf {
        self.build_root()
            .join(self.platform.join(&[self.platform.os().name(), configuration.as_str()]))
    }

    /// File name of the built executable: `<project>_<configuration><suffix>`.
    pub fn executable_name(&self, configuration: &Configuration) -> String {
        self.platform
            .executable_name(&format!("{}_{}", self.config.project.name, configuration))
    }

    /// Full path of the built executable.
    pub fn executable_path(&self, configuration: &Configuration) -> PathBuf {
        self.runtime_dir(configuration).join(self.executable_name(configuration))
    }

    /// Where compiled shaders are merged next to the executable.
    pub fn runtime_shader_dir(&self, configuration: &Configuration) -> PathBuf {
        let name = self
            .config
            .shaders
            .output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "shaders".to_string());
        self.runtime_dir(configuration).join(name)
    }

    /// Path of the bundled build-file generator.
    pub fn build_generator_path(&self) -> PathBuf {
        let tools_root = self.resolve_path(&self.config.tools.root);
        tools_root.join(self.platform.join(&["premake", self.platform.build_generator_binary()]))
    }

    /// Path of the bundled shader compiler.
    pub fn shader_compiler_path(&self) -> PathBuf {
        let tools_root = self.resolve_path(&self.config.tools.root);
        tools_root.join(self.platform.join(&["glslc", self.platform.shader_compiler_binary()]))
    }

    /// Parallel jobs for the native build.
    pub fn jobs(&self) -> usize {
        self.config.build.jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}
