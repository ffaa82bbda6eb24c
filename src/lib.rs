//! sprout-build - build orchestration for the Magnolia engine and Sprout editor
//!
//! This library provides functionality to:
//! - Resolve the host platform into an immutable context
//! - Discover and compile shaders, format and lint sources
//! - Generate, build, run and clean the native project
//! - Sequence those steps with fatal or best-effort failure policies

pub mod build;
pub mod cli;
pub mod config;
pub mod platform;
pub mod process;
