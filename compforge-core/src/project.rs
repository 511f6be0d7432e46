//! Schedulable projects and their build outcomes.

use std::path::{Path, PathBuf};

use crate::build_system::BuildSystem;
use crate::error::{BuildFailure, Result};

/// A unit of work the [`ProjectBuilder`](crate::builder::ProjectBuilder)
/// can run.
///
/// Implementations are shared across worker threads for the duration of a
/// wave, so `build` takes `&self`.
pub trait Project: Send + Sync {
    /// Absolute source directory.
    fn src_dir(&self) -> &Path;

    fn build_system(&self) -> BuildSystem;

    /// Runs the complete build for this project. Blocks on external tools.
    fn build(&self) -> Result<()>;
}

impl<P: Project + ?Sized> Project for Box<P> {
    fn src_dir(&self) -> &Path {
        (**self).src_dir()
    }

    fn build_system(&self) -> BuildSystem {
        (**self).build_system()
    }

    fn build(&self) -> Result<()> {
        (**self).build()
    }
}

/// Result of building one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success { src_dir: PathBuf },
    Failure(BuildFailure),
    /// The run was interrupted before this project started.
    Skipped { src_dir: PathBuf },
}

impl BuildOutcome {
    /// Runs `project.build()` and captures any error with the project's
    /// source directory.
    pub fn capture<P: Project + ?Sized>(project: &P) -> Self {
        let src_dir = project.src_dir().to_path_buf();
        match project.build() {
            Ok(()) => BuildOutcome::Success { src_dir },
            Err(err) => BuildOutcome::Failure(BuildFailure {
                src_dir,
                message: err.to_string(),
            }),
        }
    }

    pub fn src_dir(&self) -> &Path {
        match self {
            BuildOutcome::Success { src_dir } | BuildOutcome::Skipped { src_dir } => src_dir,
            BuildOutcome::Failure(failure) => &failure.src_dir,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success { .. })
    }
}
