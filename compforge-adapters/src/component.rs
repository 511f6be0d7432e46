//! Component projects and their packaging steps.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compforge_core::archive::{
    copy_packages, list_component_packages, tar_directory, PackageArchive, PACKAGE_EXTENSION,
};
use compforge_core::build_system::BuildSystem;
use compforge_core::config::BuildSettings;
use compforge_core::error::Result;
use compforge_core::locator::ResolvedComponent;
use compforge_core::paths::{generate_build_path, leaf_name};
use compforge_core::project::Project;
use tracing::debug;

use crate::cmake::CmakeAdapter;
use crate::maven::MavenAdapter;
use crate::pip::PipAdapter;
use crate::toolchain::Toolchain;

/// Component resources copied into every Python package.
const PLUGIN_FILES_DIR: &str = "plugin-files";

struct CppComponent {
    src_dir: PathBuf,
    build_dir: PathBuf,
}

struct JavaComponent {
    src_dir: PathBuf,
}

struct PythonComponent {
    src_dir: PathBuf,
}

enum Kind {
    Cpp(CppComponent),
    Java(JavaComponent),
    Python(PythonComponent),
}

/// A component of one of the supported build systems.
///
/// Building a component always ends by copying the packages returned from
/// [`Component::build_package`] into the shared plugin-output directory.
pub struct Component {
    kind: Kind,
    settings: Arc<BuildSettings>,
}

impl Component {
    /// Creates the project for a resolved component.
    ///
    /// Python components require pip to have been verified for this run.
    pub fn create(
        resolved: &ResolvedComponent,
        settings: Arc<BuildSettings>,
        toolchain: &Toolchain,
    ) -> Result<Self> {
        let src_dir = resolved.src_dir.clone();
        let kind = match resolved.build_system {
            BuildSystem::Cmake => {
                let build_dir = generate_build_path(&settings.build_dir, &src_dir);
                Kind::Cpp(CppComponent { src_dir, build_dir })
            }
            BuildSystem::Maven => Kind::Java(JavaComponent { src_dir }),
            BuildSystem::Pip => {
                toolchain.require_pip()?;
                Kind::Python(PythonComponent { src_dir })
            }
        };
        Ok(Self { kind, settings })
    }

    /// Out-of-source build directory, for CMake components.
    pub fn build_dir(&self) -> Option<&Path> {
        match &self.kind {
            Kind::Cpp(component) => Some(&component.build_dir),
            _ => None,
        }
    }

    pub fn plugin_output_dir(&self) -> PathBuf {
        self.settings.plugin_output_dir()
    }

    /// Runs the kind-specific build and returns the packages it produced
    /// outside the plugin-output directory.
    pub fn build_package(&self) -> Result<Vec<PathBuf>> {
        match &self.kind {
            Kind::Cpp(component) => {
                CmakeAdapter::new(&self.settings.tools).build(
                    &component.build_dir,
                    &component.src_dir,
                    self.settings.make_jobs,
                )?;
                list_component_packages(&component.build_dir)
            }
            Kind::Java(component) => {
                MavenAdapter::new(&self.settings.tools).package(&component.src_dir)?;
                MavenAdapter::find_plugin_packages(&component.src_dir)
            }
            Kind::Python(component) => {
                let output_dir = self.plugin_output_dir();
                if PipAdapter::has_setup_py_file(&component.src_dir) {
                    self.build_setuptools_component(&component.src_dir, &output_dir)?;
                } else {
                    tar_directory(&component.src_dir, &output_dir)?;
                }
                // Written straight into the output directory.
                Ok(Vec::new())
            }
        }
    }

    /// Packages `plugin-files` together with wheels for the component and
    /// all of its dependencies.
    fn build_setuptools_component(&self, src_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
        let leaf = leaf_name(src_dir);
        let temp_dir = tempfile::tempdir()?;
        let wheelhouse = temp_dir.path().join("wheelhouse");

        let sdk_wheelhouse = self.settings.sdk_wheelhouse();
        let plugin_wheelhouse = src_dir.join(PLUGIN_FILES_DIR).join("wheelhouse");
        let mut find_links = vec![sdk_wheelhouse.as_path()];
        if plugin_wheelhouse.exists() {
            find_links.push(plugin_wheelhouse.as_path());
        }
        PipAdapter::new(&self.settings.tools).wheel(src_dir, &wheelhouse, &find_links)?;

        let archive_path = output_dir.join(format!("{}.{}", leaf, PACKAGE_EXTENSION));
        let mut archive = PackageArchive::create(&archive_path)?;
        archive.append_path(&src_dir.join(PLUGIN_FILES_DIR), Path::new(&leaf))?;

        let mut wheels: Vec<PathBuf> = fs::read_dir(&wheelhouse)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        wheels.sort();
        for wheel in wheels {
            let arcname = Path::new(&leaf)
                .join("wheelhouse")
                .join(leaf_name(&wheel));
            archive.append_path(&wheel, &arcname)?;
        }
        let archive_path = archive.finish()?;
        debug!(archive = %archive_path.display(), "Wrote Python component package");
        Ok(archive_path)
    }
}

impl Project for Component {
    fn src_dir(&self) -> &Path {
        match &self.kind {
            Kind::Cpp(c) => &c.src_dir,
            Kind::Java(c) => &c.src_dir,
            Kind::Python(c) => &c.src_dir,
        }
    }

    fn build_system(&self) -> BuildSystem {
        match &self.kind {
            Kind::Cpp(_) => BuildSystem::Cmake,
            Kind::Java(_) => BuildSystem::Maven,
            Kind::Python(_) => BuildSystem::Pip,
        }
    }

    fn build(&self) -> Result<()> {
        let packages = self.build_package()?;
        copy_packages(&packages, &self.plugin_output_dir())?;
        Ok(())
    }
}
