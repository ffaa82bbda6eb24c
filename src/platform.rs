//! Host platform resolution.
//!
//! The host operating system is resolved exactly once, at startup, into an
//! immutable [`PlatformContext`]. Every other component receives the context
//! by reference and never inspects the host OS on its own.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Operating systems the engine can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Windows,
}

impl Os {
    /// Every supported operating system.
    pub const SUPPORTED: [Os; 2] = [Os::Linux, Os::Windows];

    /// Lowercase name, as used in build output directories.
    pub fn name(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    /// Parse an OS name as reported by `std::env::consts::OS`.
    pub fn from_name(name: &str) -> Result<Self, PlatformError> {
        match name {
            "linux" => Ok(Os::Linux),
            "windows" => Ok(Os::Windows),
            other => Err(PlatformError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Platform resolution error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("unsupported platform '{0}' (supported: linux, windows)")]
    Unsupported(String),
}

/// Immutable description of the host platform.
///
/// Holds the path separator, the native executable suffix and the names of
/// the per-platform external binaries shipped under the tools root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformContext {
    os: Os,
    path_separator: char,
    executable_suffix: &'static str,
    build_generator_binary: String,
    shader_compiler_binary: String,
}

impl PlatformContext {
    /// Resolve the context for the host running this process.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Resolve the context for a named OS.
    pub fn from_os_name(name: &str) -> Result<Self, PlatformError> {
        Os::from_name(name).map(Self::for_os)
    }

    /// Build the context for a supported OS.
    pub fn for_os(os: Os) -> Self {
        let (path_separator, executable_suffix) = match os {
            Os::Linux => ('/', ""),
            Os::Windows => ('\\', ".exe"),
        };

        // premake ships an os-tagged binary on linux and a plain .exe on windows
        let build_generator_binary = match os {
            Os::Linux => "premake5_linux".to_string(),
            Os::Windows => format!("premake5{}", executable_suffix),
        };
        let shader_compiler_binary = format!("glslc{}", executable_suffix);

        Self {
            os,
            path_separator,
            executable_suffix,
            build_generator_binary,
            shader_compiler_binary,
        }
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn path_separator(&self) -> char {
        self.path_separator
    }

    pub fn executable_suffix(&self) -> &'static str {
        self.executable_suffix
    }

    pub fn build_generator_binary(&self) -> &str {
        &self.build_generator_binary
    }

    pub fn shader_compiler_binary(&self) -> &str {
        &self.shader_compiler_binary
    }

    /// Append the native executable suffix to a file stem.
    pub fn executable_name(&self, stem: &str) -> String {
        format!("{}{}", stem, self.executable_suffix)
    }

    /// Join path components with this platform's separator.
    ///
    /// All platform-dependent relative paths (tool locations, per-platform
    /// build directories, executable paths) are built through this function.
    pub fn join<S: AsRef<str>>(&self, parts: &[S]) -> PathBuf {
        let separator = self.path_separator.to_string();
        let joined = parts
            .iter()
            .map(|p| p.as_ref().trim_matches(|c| c == '/' || c == '\\'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(&separator);
        PathBuf::from(joined)
    }
}
