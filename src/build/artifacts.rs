//! Build artifact assembly.
//!
//! After a native build the compiled shaders are merged into the runtime
//! directory so the executable finds them next to itself.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Artifact copy error.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact source {0} does not exist")]
    MissingSource(PathBuf),
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counts of what a merge copy touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// Recursively copy `src` into `dst`, merging with whatever is already there.
///
/// Existing destination directories are reused and existing files are
/// overwritten, so repeated calls are idempotent. Files present only in the
/// destination are left untouched.
pub fn merge_copy(src: &Path, dst: &Path) -> Result<CopyStats, ArtifactError> {
    if !src.is_dir() {
        return Err(ArtifactError::MissingSource(src.to_path_buf()));
    }

    let mut stats = CopyStats::default();
    copy_dir(src, dst, &mut stats)?;
    Ok(stats)
}

fn copy_dir(src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<(), ArtifactError> {
    let err = |source| ArtifactError::Copy { from: src.to_path_buf(), to: dst.to_path_buf(), source };

    fs::create_dir_all(dst).map_err(err)?;
    stats.dirs += 1;

    for entry in fs::read_dir(src).map_err(err)? {
        let entry = entry.map_err(err)?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            copy_dir(&from, &to, stats)?;
        } else {
            fs::copy(&from, &to).map_err(|source| ArtifactError::Copy {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            stats.files += 1;
        }
    }

    Ok(())
}
