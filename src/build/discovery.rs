//! Source file discovery.
//!
//! Shader sources are discovered directly under the asset directory by
//! extension. Formatter inputs are discovered recursively with glob patterns.

use glob::{glob, Pattern};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during source discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, #[source] glob::PatternError),
    /// IO error during file enumeration
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check whether a file name carries one of the given extensions.
///
/// Extensions are compared exactly: `d.vertx` does not match `vert`.
/// A dotfile such as `.vert` has no extension and is not a shader source.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|e| e == ext),
        None => false,
    }
}

/// Discover shader sources directly under `dir`.
///
/// Only regular files whose extension is listed are returned, sorted by
/// file name. Subdirectories are not descended into. A missing directory is
/// treated as empty.
pub fn discover_shaders(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("shader directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(source) => return Err(DiscoveryError::Io { path: dir.to_path_buf(), source }),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Discover files under `root` (recursively) with any of the given extensions.
pub fn discover_sources(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    let escaped_root = Pattern::escape(&root.display().to_string());

    for ext in extensions {
        let pattern = format!("{}/**/*.{}", escaped_root, ext);
        let paths =
            glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    // Log but continue on glob errors
                    log::warn!("error reading path: {}", e);
                }
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
