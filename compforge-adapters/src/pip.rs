//! pip adapter for Python SDKs and components.
//!
//! A directory is a Python project when it has a `setup.py`, or when its
//! `descriptor/descriptor.json` declares `"sourceLanguage": "python"`.

use std::fs;
use std::path::{Path, PathBuf};

use compforge_core::adapter::BuildToolAdapter;
use compforge_core::build_system::BuildSystem;
use compforge_core::config::Tools;
use compforge_core::error::{Error, Result};
use compforge_core::tool::ToolCommand;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

/// Oldest pip major version able to build the SDK wheels.
pub const MIN_PIP_MAJOR_VERSION: u32 = 9;

static PIP_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*pip\s+(\d+)").expect("pip version pattern is valid"));

#[derive(Debug, Deserialize)]
struct Descriptor {
    #[serde(rename = "sourceLanguage", default)]
    source_language: Option<String>,
}

/// Adapter for Python projects built and installed with pip.
pub struct PipAdapter {
    pip: String,
    python: String,
}

impl PipAdapter {
    pub const SETUP_PY: &'static str = "setup.py";
    pub const LANGUAGE: &'static str = "python";

    pub fn new(tools: &Tools) -> Self {
        Self {
            pip: tools.pip.clone(),
            python: tools.python.clone(),
        }
    }

    pub fn has_setup_py_file(src_dir: &Path) -> bool {
        src_dir.join(Self::SETUP_PY).exists()
    }

    pub fn descriptor_path(src_dir: &Path) -> PathBuf {
        src_dir.join("descriptor").join("descriptor.json")
    }

    /// True when the component descriptor declares Python as its language.
    ///
    /// A missing or unreadable descriptor is not a match, and neither is one
    /// that is not valid JSON.
    pub fn descriptor_lang_matches(src_dir: &Path) -> bool {
        let path = Self::descriptor_path(src_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            return false;
        };
        match serde_json::from_str::<Descriptor>(&content) {
            Ok(descriptor) => descriptor
                .source_language
                .map(|lang| lang.eq_ignore_ascii_case(Self::LANGUAGE))
                .unwrap_or(false),
            Err(e) => {
                warn!(descriptor = %path.display(), "Ignoring unparsable descriptor: {}", e);
                false
            }
        }
    }

    /// Runs `pip --version` and checks it against
    /// [`MIN_PIP_MAJOR_VERSION`].
    pub fn verify_version(&self) -> Result<u32> {
        let output = ToolCommand::new(&self.pip).arg("--version").output()?;
        check_pip_version(&self.pip, &output)
    }

    /// Builds wheels for `package` and its dependencies into `wheel_dir`.
    pub fn wheel(&self, package: &Path, wheel_dir: &Path, find_links: &[&Path]) -> Result<()> {
        let mut command = ToolCommand::new(&self.pip)
            .arg("wheel")
            .arg(package)
            .arg("--wheel-dir")
            .arg(wheel_dir);
        for link in find_links {
            command = command.arg("--find-links").arg(link);
        }
        command.run()
    }

    /// Installs `package` into `target`, resolving wheels from `find_links`.
    pub fn install(&self, package: &Path, target: &Path, find_links: &Path) -> Result<()> {
        ToolCommand::new(&self.pip)
            .args(["install", "--upgrade", "--target"])
            .arg(target)
            .arg("--find-links")
            .arg(find_links)
            .arg(package)
            .run()
    }
}

/// Parses `pip --version` output such as
/// `pip 8.1.2 from /usr/lib/python2.7/site-packages (python 2.7)`.
fn check_pip_version(tool: &str, output: &str) -> Result<u32> {
    let too_old = || Error::ToolVersion {
        tool: tool.to_string(),
        required: MIN_PIP_MAJOR_VERSION,
        found: output.trim().to_string(),
    };
    let major: u32 = PIP_VERSION_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(too_old)?;
    if major < MIN_PIP_MAJOR_VERSION {
        return Err(too_old());
    }
    Ok(major)
}

impl BuildToolAdapter for PipAdapter {
    fn build_system(&self) -> BuildSystem {
        BuildSystem::Pip
    }

    fn detect(&self, path: &Path) -> bool {
        Self::has_setup_py_file(path) || Self::descriptor_lang_matches(path)
    }

    fn clean(&self, src_dir: &Path) -> Result<()> {
        if !Self::has_setup_py_file(src_dir) {
            return Ok(());
        }
        info!(src_dir = %src_dir.display(), "Cleaning");
        ToolCommand::new(&self.python)
            .args([Self::SETUP_PY, "clean"])
            .current_dir(src_dir)
            .run()
    }
}
