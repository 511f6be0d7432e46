//! One-shot verification of external tool versions for a run.

use compforge_core::build_system::BuildSystem;
use compforge_core::config::Tools;
use compforge_core::error::{Error, Result};
use tracing::debug;

use crate::pip::{PipAdapter, MIN_PIP_MAJOR_VERSION};

/// Proof that the configured pip is recent enough.
///
/// Only [`Toolchain::verify`] creates one; Python projects require it at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedPip(());

/// Tool checks performed once during setup, before any project is
/// constructed.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    pip: Option<VerifiedPip>,
}

impl Toolchain {
    /// Verifies the tools needed by the given build systems.
    ///
    /// pip is checked at most once, however many Python projects the run
    /// contains.
    pub fn verify(required: &[BuildSystem], tools: &Tools) -> Result<Self> {
        let mut toolchain = Self::default();
        if required.contains(&BuildSystem::Pip) {
            let major = PipAdapter::new(tools).verify_version()?;
            debug!(major, "Verified pip version");
            toolchain.pip = Some(VerifiedPip(()));
        }
        Ok(toolchain)
    }

    pub fn pip(&self) -> Option<VerifiedPip> {
        self.pip
    }

    pub(crate) fn require_pip(&self) -> Result<VerifiedPip> {
        self.pip.ok_or_else(|| Error::ToolVersion {
            tool: "pip".to_string(),
            required: MIN_PIP_MAJOR_VERSION,
            found: "an unverified installation".to_string(),
        })
    }
}
