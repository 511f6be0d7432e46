//! Ordered set of build tool adapters used to classify directories.

use std::path::Path;

use crate::adapter::BuildToolAdapter;
use crate::build_system::BuildSystem;

/// Classifies directories by build-system kind.
///
/// Adapters are tried in registration order and the first match wins.
pub struct Classifier {
    adapters: Vec<Box<dyn BuildToolAdapter>>,
}

impl Classifier {
    /// Creates an empty classifier.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Appends an adapter. Later registrations are tried after earlier ones.
    pub fn register(mut self, adapter: Box<dyn BuildToolAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Returns the kind of the first adapter that detects `path`.
    pub fn classify(&self, path: &Path) -> Option<BuildSystem> {
        if !path.is_dir() {
            return None;
        }
        self.adapters
            .iter()
            .find(|adapter| adapter.detect(path))
            .map(|adapter| adapter.build_system())
    }

    /// Gets the adapter registered for a build system.
    pub fn adapter(&self, build_system: BuildSystem) -> Option<&dyn BuildToolAdapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.build_system() == build_system)
            .map(|adapter| adapter.as_ref())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
