//! Component resolution from a manifest or a component list.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::build_system::{BuildSystem, LANG_DIRS};
use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::manifest;
use crate::paths::split_path_list;

/// Environment variable holding additional colon-separated search paths.
pub const SEARCH_PATH_ENV: &str = "MPF_COMPONENT_SEARCH_PATH";

/// A requested component matched to a concrete, classified directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// Identifier as it was requested.
    pub requested: String,
    /// Canonical source directory.
    pub src_dir: PathBuf,
    pub build_system: BuildSystem,
}

/// Turns requested component identifiers into classified project records.
///
/// Resolution is all-or-nothing: every identifier that matches nothing and
/// every duplicate is reported in one error before any build work starts.
#[derive(Debug, Clone, Default)]
pub struct ComponentLocator {
    components: Vec<String>,
    search_paths: Vec<PathBuf>,
}

impl ComponentLocator {
    /// Creates a locator over explicit identifiers and search roots.
    ///
    /// Each search root is followed by its language sub-directories.
    pub fn new(components: Vec<String>, search_roots: Vec<PathBuf>) -> Self {
        let search_paths = search_roots
            .into_iter()
            .flat_map(|root| {
                let lang_dirs: Vec<PathBuf> =
                    LANG_DIRS.iter().map(|lang| root.join(lang)).collect();
                std::iter::once(root).chain(lang_dirs)
            })
            .collect();
        Self {
            components,
            search_paths,
        }
    }

    /// Uses the components listed in a package manifest.
    ///
    /// Manifest entries are resolved as paths only; search roots do not apply.
    pub fn from_manifest(manifest_path: &Path) -> Result<Self> {
        let components = manifest::read_component_paths(manifest_path)?;
        Ok(Self::new(components, Vec::new()))
    }

    /// Uses a colon-separated component list, searching the colon-separated
    /// `search_path` plus the paths in [`SEARCH_PATH_ENV`].
    pub fn from_component_list(components: &str, search_path: &str) -> Self {
        let env_paths = std::env::var(SEARCH_PATH_ENV).unwrap_or_default();
        Self::from_component_list_with_env(components, search_path, &env_paths)
    }

    pub fn from_component_list_with_env(
        components: &str,
        search_path: &str,
        env_search_path: &str,
    ) -> Self {
        let components = split_path_list(components)
            .into_iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        let joined = format!("{}:{}", search_path, env_search_path);
        Self::new(components, split_path_list(&joined))
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Search paths in lookup order, language sub-directories included.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Resolves every requested component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ComponentsNotFound`] naming every identifier that
    /// matched nothing, or [`Error::DuplicateComponents`] naming every
    /// directory that was resolved more than once.
    pub fn locate(&self, classifier: &Classifier) -> Result<Vec<ResolvedComponent>> {
        let mut located = Vec::with_capacity(self.components.len());
        let mut missing = Vec::new();

        for requested in &self.components {
            let found = self.locate_component(requested, classifier)?;
            if found.is_empty() {
                missing.push(requested.clone());
            } else {
                located.extend(found);
            }
        }

        if !missing.is_empty() {
            return Err(Error::ComponentsNotFound(missing));
        }

        let duplicates = find_duplicates(&located);
        if !duplicates.is_empty() {
            return Err(Error::DuplicateComponents(duplicates));
        }

        Ok(located)
    }

    fn locate_component(
        &self,
        requested: &str,
        classifier: &Classifier,
    ) -> Result<Vec<ResolvedComponent>> {
        let component_path = Path::new(requested);
        if let Some(component) = self.check_search_paths(requested, component_path, classifier)? {
            return Ok(vec![component]);
        }
        self.check_lang_dirs(requested, classifier)
    }

    /// Tries `component_path` as given, then under each search path in order.
    fn check_search_paths(
        &self,
        requested: &str,
        component_path: &Path,
        classifier: &Classifier,
    ) -> Result<Option<ResolvedComponent>> {
        let candidates = std::iter::once(component_path.to_path_buf())
            .chain(self.search_paths.iter().map(|s| s.join(component_path)));

        for candidate in candidates {
            if let Some(build_system) = classifier.classify(&candidate) {
                let src_dir = std::fs::canonicalize(&candidate)?;
                debug!(
                    component = requested,
                    src_dir = %src_dir.display(),
                    build_system = %build_system,
                    "Located component"
                );
                return Ok(Some(ResolvedComponent {
                    requested: requested.to_string(),
                    src_dir,
                    build_system,
                }));
            }
        }
        Ok(None)
    }

    /// Treats `requested` as the top level of a multi-language component
    /// repository and collects one project per language directory.
    fn check_lang_dirs(
        &self,
        requested: &str,
        classifier: &Classifier,
    ) -> Result<Vec<ResolvedComponent>> {
        let mut found = Vec::new();
        for lang_dir in LANG_DIRS {
            let lang_path = Path::new(requested).join(lang_dir);
            if let Some(component) = self.check_search_paths(requested, &lang_path, classifier)? {
                found.push(component);
            }
        }
        Ok(found)
    }
}

fn find_duplicates(components: &[ResolvedComponent]) -> Vec<PathBuf> {
    let mut seen = FxHashSet::default();
    components
        .iter()
        .filter(|c| !seen.insert(c.src_dir.as_path()))
        .map(|c| c.src_dir.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_paths_include_lang_dirs() {
        let locator = ComponentLocator::new(vec![], vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        let expected: Vec<PathBuf> = [
            "/a", "/a/cpp", "/a/java", "/a/python", "/b", "/b/cpp", "/b/java", "/b/python",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(locator.search_paths(), expected.as_slice());
    }

    #[test]
    fn test_component_list_merges_env_paths() {
        let locator =
            ComponentLocator::from_component_list_with_env("compA::compB/", "/cli/", "/env:");
        assert_eq!(locator.components(), &["compA".to_string(), "compB".to_string()]);
        assert_eq!(locator.search_paths()[0], PathBuf::from("/cli"));
        assert_eq!(locator.search_paths()[4], PathBuf::from("/env"));
        assert_eq!(locator.search_paths().len(), 8);
    }

    #[test]
    fn test_find_duplicates_reports_repeats_only() {
        let component = |p: &str| ResolvedComponent {
            requested: p.to_string(),
            src_dir: PathBuf::from(p),
            build_system: BuildSystem::Cmake,
        };
        let duplicates = find_duplicates(&[component("/a"), component("/b"), component("/a")]);
        assert_eq!(duplicates, vec![PathBuf::from("/a")]);
    }
}
