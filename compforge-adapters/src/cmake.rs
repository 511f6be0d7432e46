//! CMake adapter for C++ SDKs and components.

use std::fs;
use std::path::Path;

use compforge_core::adapter::BuildToolAdapter;
use compforge_core::archive::list_component_packages;
use compforge_core::build_system::BuildSystem;
use compforge_core::builder::Parallelism;
use compforge_core::config::Tools;
use compforge_core::error::Result;
use compforge_core::tool::ToolCommand;
use tracing::info;

/// Adapter for projects described by a `CMakeLists.txt`.
pub struct CmakeAdapter {
    cmake: String,
    make: String,
}

impl CmakeAdapter {
    pub const MARKER: &'static str = "CMakeLists.txt";

    pub fn new(tools: &Tools) -> Self {
        Self {
            cmake: tools.cmake.clone(),
            make: tools.make.clone(),
        }
    }

    /// Configures `src_dir` into `build_dir` and runs `make install`.
    pub fn build(&self, build_dir: &Path, src_dir: &Path, jobs: Parallelism) -> Result<()> {
        fs::create_dir_all(build_dir)?;
        ToolCommand::new(&self.cmake)
            .arg("-DCMAKE_RULE_MESSAGES=OFF")
            .arg(src_dir)
            .current_dir(build_dir)
            .run()?;
        self.make_install(jobs).current_dir(build_dir).run()
    }

    fn make_install(&self, jobs: Parallelism) -> ToolCommand {
        let command = ToolCommand::new(&self.make).arg("install");
        match jobs {
            Parallelism::Limited(0) | Parallelism::Limited(1) => command,
            Parallelism::Unbounded => command.arg("--jobs"),
            Parallelism::Limited(n) => command.arg("--jobs").arg(n.to_string()),
        }
    }
}

impl BuildToolAdapter for CmakeAdapter {
    fn build_system(&self) -> BuildSystem {
        BuildSystem::Cmake
    }

    fn detect(&self, path: &Path) -> bool {
        path.join(Self::MARKER).exists()
    }

    /// Cleans a CMake build directory and deletes the packages it produced.
    fn clean(&self, build_dir: &Path) -> Result<()> {
        if !build_dir.join("makefile").exists() && !build_dir.join("Makefile").exists() {
            return Ok(());
        }
        info!(build_dir = %build_dir.display(), "Cleaning");
        ToolCommand::new(&self.make)
            .arg("clean")
            .current_dir(build_dir)
            .run()?;
        for package in list_component_packages(build_dir)? {
            info!(package = %package.display(), "Deleting");
            fs::remove_file(&package)?;
        }
        Ok(())
    }
}
