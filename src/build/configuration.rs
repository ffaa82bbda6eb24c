//! Build configuration label.

use std::fmt;
use thiserror::Error;

/// Rejected configuration label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("build configuration must not be empty")]
pub struct EmptyConfiguration;

/// A build profile name such as `debug` or `release`.
///
/// The label is opaque: it is handed verbatim to the native build system and
/// used in output naming. Only emptiness is rejected here; unknown profiles
/// are rejected by the build system itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration(String);

impl Configuration {
    pub fn new(label: impl Into<String>) -> Result<Self, EmptyConfiguration> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(EmptyConfiguration);
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
