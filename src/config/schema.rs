//! Configuration schema types for `sprout.toml`
//!
//! Describes the project layout the pipeline operates on. Every field has a
//! default matching the stock Magnolia/Sprout checkout, so the file is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used for executable naming (`<name>_<configuration>`)
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: default_project_name() }
    }
}

fn default_project_name() -> String {
    "sprout".to_string()
}

/// External tool locations and fixed arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Root of the bundled per-platform binaries (premake, glslc)
    #[serde(default = "default_tools_root")]
    pub root: PathBuf,
    /// premake action on linux
    #[serde(default = "default_linux_action")]
    pub linux_generator_action: String,
    /// premake action on windows
    #[serde(default = "default_windows_action")]
    pub windows_generator_action: String,
    /// Code formatter, resolved from PATH
    #[serde(default = "default_formatter")]
    pub formatter: String,
    /// Static analyzer, resolved from PATH
    #[serde(default = "default_analyzer")]
    pub analyzer: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            root: default_tools_root(),
            linux_generator_action: default_linux_action(),
            windows_generator_action: default_windows_action(),
            formatter: default_formatter(),
            analyzer: default_analyzer(),
        }
    }
}

fn default_tools_root() -> PathBuf {
    PathBuf::from("libs")
}

fn default_linux_action() -> String {
    "gmake2".to_string()
}

fn default_windows_action() -> String {
    "vs2022".to_string()
}

fn default_formatter() -> String {
    "clang-format".to_string()
}

fn default_analyzer() -> String {
    "cppcheck".to_string()
}

/// Shader compilation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadersConfig {
    /// Directory holding shader sources (not searched recursively)
    #[serde(default = "default_shader_source")]
    pub source_dir: PathBuf,
    /// Directory receiving compiled shaders
    #[serde(default = "default_shader_output")]
    pub output_dir: PathBuf,
    /// Recognized shader stage extensions
    #[serde(default = "default_shader_extensions")]
    pub extensions: Vec<String>,
    /// Suffix appended to each compiled shader file name
    #[serde(default = "default_compiled_suffix")]
    pub compiled_suffix: String,
}

impl Default for ShadersConfig {
    fn default() -> Self {
        Self {
            source_dir: default_shader_source(),
            output_dir: default_shader_output(),
            extensions: default_shader_extensions(),
            compiled_suffix: default_compiled_suffix(),
        }
    }
}

fn default_shader_source() -> PathBuf {
    PathBuf::from("sprout_editor/assets/shaders")
}

fn default_shader_output() -> PathBuf {
    PathBuf::from("build/shaders")
}

fn default_shader_extensions() -> Vec<String> {
    vec!["vert".to_string(), "frag".to_string()]
}

fn default_compiled_suffix() -> String {
    "spv".to_string()
}

/// Source formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Source trees to format
    #[serde(default = "default_format_roots")]
    pub roots: Vec<PathBuf>,
    /// File extensions to format
    #[serde(default = "default_format_extensions")]
    pub extensions: Vec<String>,
    /// Value passed to `-style=`
    #[serde(default = "default_format_style")]
    pub style: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            roots: default_format_roots(),
            extensions: default_format_extensions(),
            style: default_format_style(),
        }
    }
}

fn default_format_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("magnolia/src"),
        PathBuf::from("sprout/src"),
        PathBuf::from("sprout_editor/src"),
    ]
}

fn default_format_extensions() -> Vec<String> {
    vec!["h".to_string(), "hpp".to_string(), "cpp".to_string()]
}

fn default_format_style() -> String {
    "file".to_string()
}

/// Static analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Engine source tree to analyze
    #[serde(default = "default_lint_root")]
    pub root: PathBuf,
    /// Extra analyzer arguments, placed before the source root
    #[serde(default = "default_lint_args")]
    pub args: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self { root: default_lint_root(), args: default_lint_args() }
    }
}

fn default_lint_root() -> PathBuf {
    PathBuf::from("magnolia/src")
}

fn default_lint_args() -> Vec<String> {
    vec![
        "--enable=warning,performance,portability".to_string(),
        "--std=c++20".to_string(),
        "--quiet".to_string(),
    ]
}

/// Native build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build root; per-platform output lands in `<root>/<os>/<configuration>`
    #[serde(default = "default_build_root")]
    pub root: PathBuf,
    /// Parallel jobs for the native build (default: logical core count)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { root: default_build_root(), jobs: None }
    }
}

fn default_build_root() -> PathBuf {
    PathBuf::from("build")
}

/// Complete `sprout.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SproutConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub shaders: ShadersConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "shaders.extensions")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sprout.toml: '{}' {}", self.field, self.message)
    }
}

impl SproutConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        if self.project.name.trim().is_empty() {
            push("project.name", "must be a non-empty string");
        }

        if self.shaders.extensions.is_empty() {
            push("shaders.extensions", "must list at least one extension");
        }
        if self.shaders.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            push("shaders.extensions", "entries must be non-empty and given without a leading dot");
        }
        if self.shaders.compiled_suffix.is_empty() {
            push("shaders.compiled_suffix", "must be a non-empty string");
        }

        if self.format.roots.is_empty() {
            push("format.roots", "must list at least one source tree");
        }
        if self.format.extensions.is_empty() {
            push("format.extensions", "must list at least one extension");
        }

        if self.tools.formatter.is_empty() {
            push("tools.formatter", "must be a non-empty string");
        }
        if self.tools.analyzer.is_empty() {
            push("tools.analyzer", "must be a non-empty string");
        }

        if self.build.jobs == Some(0) {
            push("build.jobs", "must be a positive integer");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SproutConfig::default().validate().is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: SproutConfig = toml::from_str("").unwrap();
        assert_eq!(config, SproutConfig::default());
        assert_eq!(config.project.name, "sprout");
        assert_eq!(config.shaders.extensions, vec!["vert", "frag"]);
        assert_eq!(config.build.root, PathBuf::from("build"));
    }

    #[test]
    fn test_partial_sections() {
        let config: SproutConfig = toml::from_str(
            r#"
            [project]
            name = "magnolia"

            [shaders]
            source_dir = "assets/shaders"

            [build]
            jobs = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.project.name, "magnolia");
        assert_eq!(config.shaders.source_dir, PathBuf::from("assets/shaders"));
        assert_eq!(config.shaders.output_dir, PathBuf::from("build/shaders"));
        assert_eq!(config.build.jobs, Some(4));
        assert_eq!(config.tools.formatter, "clang-format");
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut config = SproutConfig::default();
        config.project.name = "  ".to_string();
        config.shaders.extensions = vec![".vert".to_string()];
        config.build.jobs = Some(0);

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["project.name", "shaders.extensions", "build.jobs"]);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "build.jobs".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "sprout.toml: 'build.jobs' must be a positive integer");
    }
}
