//! Maven adapter for Java SDKs and components.

use std::path::{Path, PathBuf};

use compforge_core::adapter::BuildToolAdapter;
use compforge_core::archive::list_component_packages;
use compforge_core::build_system::BuildSystem;
use compforge_core::config::Tools;
use compforge_core::error::{Error, Result};
use compforge_core::tool::ToolCommand;
use tracing::info;
use walkdir::WalkDir;

/// Flags that keep integration tests out of packaging builds.
const SKIP_INTEGRATION_TESTS_ARGS: [&str; 3] =
    ["-Dit.test=none", "-DfailIfNoTests=false", "-DskipITs"];

/// Directories that never contain module build output.
const EXCLUDED_DIRS: [&str; 2] = ["plugin-files", "src"];

/// Adapter for projects described by a `pom.xml`.
pub struct MavenAdapter {
    mvn: String,
}

impl MavenAdapter {
    pub const MARKER: &'static str = "pom.xml";

    pub fn new(tools: &Tools) -> Self {
        Self {
            mvn: tools.mvn.clone(),
        }
    }

    fn phase(&self, phase: &str, src_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.mvn)
            .arg(phase)
            .args(SKIP_INTEGRATION_TESTS_ARGS)
            .current_dir(src_dir)
    }

    pub fn package(&self, src_dir: &Path) -> Result<()> {
        self.phase("package", src_dir).run()
    }

    pub fn install(&self, src_dir: &Path) -> Result<()> {
        self.phase("install", src_dir).run()
    }

    /// Finds the packages written to each module's `target` directory.
    ///
    /// Hidden directories, `plugin-files` and `src` are not searched, and
    /// nothing below a `target` directory is searched.
    pub fn find_plugin_packages(src_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut packages = Vec::new();
        let mut walker = WalkDir::new(src_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || should_explore(e));

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if entry.file_name() == "target" {
                packages.extend(list_component_packages(entry.path())?);
                walker.skip_current_dir();
            }
        }
        Ok(packages)
    }
}

fn should_explore(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    !name.starts_with('.') && !EXCLUDED_DIRS.contains(&name.as_ref())
}

impl BuildToolAdapter for MavenAdapter {
    fn build_system(&self) -> BuildSystem {
        BuildSystem::Maven
    }

    fn detect(&self, path: &Path) -> bool {
        path.join(Self::MARKER).exists()
    }

    fn clean(&self, src_dir: &Path) -> Result<()> {
        if !self.detect(src_dir) {
            return Ok(());
        }
        info!(src_dir = %src_dir.display(), "Cleaning");
        ToolCommand::new(&self.mvn)
            .arg("clean")
            .current_dir(src_dir)
            .run()
    }
}
