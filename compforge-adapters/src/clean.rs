//! Removal of build output left by previous runs.

use std::fs;

use compforge_core::adapter::BuildToolAdapter;
use compforge_core::archive::list_component_packages;
use compforge_core::build_system::BuildSystem;
use compforge_core::classifier::Classifier;
use compforge_core::config::BuildSettings;
use compforge_core::error::Result;
use compforge_core::project::Project;
use tracing::{debug, info};

use crate::cmake::CmakeAdapter;

/// Cleans the build root and the source trees of `projects`.
///
/// Collected packages in the plugin-output directory are deleted first,
/// then every CMake build directory under the build root is cleaned, then
/// each project's own adapter cleans its source directory.
pub fn clean_build(
    settings: &BuildSettings,
    classifier: &Classifier,
    projects: &[&dyn Project],
) -> Result<()> {
    let build_root = &settings.build_dir;
    for package in list_component_packages(build_root)? {
        info!(package = %package.display(), "Deleting");
        fs::remove_file(&package)?;
    }

    if build_root.is_dir() {
        let cmake = CmakeAdapter::new(&settings.tools);
        let mut build_dirs = Vec::new();
        for entry in fs::read_dir(build_root)? {
            let path = entry?.path();
            if path.is_dir() {
                build_dirs.push(path);
            }
        }
        build_dirs.sort();
        for build_dir in &build_dirs {
            cmake.clean(build_dir)?;
        }
    }

    for project in projects {
        clean_sources(classifier, *project)?;
    }
    Ok(())
}

fn clean_sources(classifier: &Classifier, project: &dyn Project) -> Result<()> {
    let src_dir = project.src_dir();
    match classifier.adapter(project.build_system()) {
        // CMake builds out of source; its build directory was handled above.
        Some(adapter) if adapter.build_system() != BuildSystem::Cmake => adapter.clean(src_dir),
        _ => {
            debug!(src_dir = %src_dir.display(), "No source-level clean");
            Ok(())
        }
    }
}
