//! Component SDK projects, built before any component.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use compforge_core::adapter::BuildToolAdapter;
use compforge_core::build_system::BuildSystem;
use compforge_core::config::BuildSettings;
use compforge_core::error::{Error, Result};
use compforge_core::paths::{absolutize, generate_build_path};
use compforge_core::project::Project;

use crate::cmake::CmakeAdapter;
use crate::maven::MavenAdapter;
use crate::pip::PipAdapter;
use crate::toolchain::VerifiedPip;

/// Python SDK sub-packages, relative to `<sdk>/detection`.
const PYTHON_SDK_PACKAGES: [&str; 2] = ["api", "component_util"];

pub struct CppSdk {
    src_dir: PathBuf,
    build_dir: PathBuf,
    settings: Arc<BuildSettings>,
}

impl CppSdk {
    pub fn new(src: &Path, settings: Arc<BuildSettings>) -> Result<Self> {
        let src_dir = absolutize(src);
        let adapter = CmakeAdapter::new(&settings.tools);
        if !adapter.detect(&src_dir) {
            return Err(Error::NotAProject {
                role: "C++ SDK",
                kind: BuildSystem::Cmake,
                path: src_dir,
            });
        }
        let build_dir = generate_build_path(&settings.build_dir, &src_dir);
        Ok(Self {
            src_dir,
            build_dir,
            settings,
        })
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

pub struct JavaSdk {
    src_dir: PathBuf,
    settings: Arc<BuildSettings>,
}

impl JavaSdk {
    pub fn new(src: &Path, settings: Arc<BuildSettings>) -> Result<Self> {
        let src_dir = absolutize(src);
        if !MavenAdapter::new(&settings.tools).detect(&src_dir) {
            return Err(Error::NotAProject {
                role: "Java SDK",
                kind: BuildSystem::Maven,
                path: src_dir,
            });
        }
        Ok(Self { src_dir, settings })
    }
}

pub struct PythonSdk {
    src_dir: PathBuf,
    packages: Vec<PathBuf>,
    settings: Arc<BuildSettings>,
}

impl PythonSdk {
    /// The installable packages live under `<src>/detection`.
    pub fn new(src: &Path, settings: Arc<BuildSettings>, _pip: VerifiedPip) -> Result<Self> {
        let src_dir = absolutize(src).join("detection");
        let packages: Vec<PathBuf> = PYTHON_SDK_PACKAGES
            .iter()
            .map(|p| src_dir.join(p))
            .collect();
        if let Some(missing) = packages.iter().find(|p| !PipAdapter::has_setup_py_file(p)) {
            return Err(Error::MissingSetupPy {
                role: "Python SDK",
                path: missing.clone(),
            });
        }
        Ok(Self {
            src_dir,
            packages,
            settings,
        })
    }
}

/// An SDK of one of the supported build systems.
pub enum Sdk {
    Cpp(CppSdk),
    Java(JavaSdk),
    Python(PythonSdk),
}

impl Project for Sdk {
    fn src_dir(&self) -> &Path {
        match self {
            Sdk::Cpp(sdk) => &sdk.src_dir,
            Sdk::Java(sdk) => &sdk.src_dir,
            Sdk::Python(sdk) => &sdk.src_dir,
        }
    }

    fn build_system(&self) -> BuildSystem {
        match self {
            Sdk::Cpp(_) => BuildSystem::Cmake,
            Sdk::Java(_) => BuildSystem::Maven,
            Sdk::Python(_) => BuildSystem::Pip,
        }
    }

    fn build(&self) -> Result<()> {
        match self {
            Sdk::Cpp(sdk) => CmakeAdapter::new(&sdk.settings.tools).build(
                &sdk.build_dir,
                &sdk.src_dir,
                sdk.settings.make_jobs,
            ),
            Sdk::Java(sdk) => MavenAdapter::new(&sdk.settings.tools).install(&sdk.src_dir),
            Sdk::Python(sdk) => {
                let pip = PipAdapter::new(&sdk.settings.tools);
                let wheelhouse = sdk.settings.sdk_wheelhouse();
                let site_packages = sdk.settings.sdk_installed_packages();
                for package in &sdk.packages {
                    pip.wheel(package, &wheelhouse, &[wheelhouse.as_path()])?;
                    pip.install(package, &site_packages, &wheelhouse)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compforge_core::builder::Parallelism;
    use compforge_core::config::Tools;
    use std::fs;
    use tempfile::TempDir;

    fn settings(build_dir: &Path) -> Arc<BuildSettings> {
        Arc::new(BuildSettings {
            build_dir: build_dir.to_path_buf(),
            make_jobs: Parallelism::Limited(1),
            sdk_install_path: build_dir.join("sdk"),
            tools: Tools::default(),
        })
    }

    #[test]
    fn test_cpp_sdk_requires_cmake_project() {
        let temp_dir = TempDir::new().unwrap();
        let err = CppSdk::new(temp_dir.path(), settings(temp_dir.path()))
            .err()
            .unwrap();
        let msg = err.to_string();
        assert!(msg.contains("Unable to build C++ SDK"));
        assert!(msg.contains("does not appear to be a CMake project"));
    }

    #[test]
    fn test_cpp_sdk_build_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("CMakeLists.txt"), "").unwrap();
        let build_root = temp_dir.path().join("build");
        let sdk = CppSdk::new(temp_dir.path(), settings(&build_root)).unwrap();
        assert_eq!(
            sdk.build_dir(),
            generate_build_path(&build_root, temp_dir.path()).as_path()
        );
    }

    #[test]
    fn test_java_sdk_requires_maven_project() {
        let temp_dir = TempDir::new().unwrap();
        let err = JavaSdk::new(temp_dir.path(), settings(temp_dir.path()))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Maven project"));
    }
}
