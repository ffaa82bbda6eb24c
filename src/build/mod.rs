//! Build pipeline module
//!
//! Drives the external toolchain that turns the engine and editor sources
//! into a runnable executable.
//!
//! # Overview
//!
//! The pipeline consists of:
//! - **Format**: clang-format over the source trees (advisory)
//! - **Shaders**: glslc over every `.vert`/`.frag` in the asset directory
//! - **Lint**: cppcheck over the engine tree (advisory)
//! - **Build**: premake, then make/msbuild, then shader artifact merge
//! - **Run** / **Clean**: launch the executable or clean the build
//!
//! # Example
//!
//! ```ignore
//! use sprout_build::build::{BuildContext, Configuration, Pipeline, PipelineExecutor};
//! use sprout_build::build::progress::ConsoleProgress;
//! use sprout_build::process::SystemRunner;
//!
//! let context = BuildContext::new(config, platform, project_root);
//! let executor = PipelineExecutor::new(&context, &SystemRunner, &ConsoleProgress::new());
//! let result = executor.execute(&Pipeline::full(), &Configuration::new("debug")?)?;
//! println!("{}", result.summary());
//! ```

pub mod artifacts;
pub mod configuration;
pub mod context;
pub mod discovery;
pub mod native;
pub mod pipeline;
pub mod progress;
pub mod result;
pub mod shaders;
pub mod step;
pub mod tools;

pub use artifacts::*;
pub use configuration::*;
pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;
pub use shaders::{compile_shaders, plan_shader_jobs, ShaderJob};
pub use step::*;
