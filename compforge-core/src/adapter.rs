//! Build tool adapter trait for detecting and cleaning project directories.

use std::path::Path;

use crate::build_system::BuildSystem;
use crate::error::Result;

/// Trait for build-system specific project operations.
///
/// Adapters detect projects and clean their in-tree outputs. Building is
/// delegated to the native tools through kind-specific entry points on the
/// concrete adapters.
pub trait BuildToolAdapter: Send + Sync {
    fn build_system(&self) -> BuildSystem;

    /// Returns true when `path` is a project of this adapter's kind.
    ///
    /// Must be read-only and never fail. When the files it needs cannot be
    /// read, detection reports no match.
    fn detect(&self, path: &Path) -> bool;

    /// Removes build outputs the tool leaves inside `path`. A directory that
    /// is not a project of this kind is left untouched.
    fn clean(&self, path: &Path) -> Result<()>;
}
