//! Argument checks, resolution and project construction.

use std::sync::Arc;

use anyhow::Result;
use compforge_adapters::{Component, CppSdk, JavaSdk, PythonSdk, Sdk, Toolchain};
use compforge_core::build_system::BuildSystem;
use compforge_core::classifier::Classifier;
use compforge_core::config::BuildSettings;
use compforge_core::locator::{ComponentLocator, ResolvedComponent};

use crate::formatting::print_warning;

use super::BuildArgs;

pub(super) fn argument_warnings(args: &BuildArgs) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if args.clean_only {
        return warnings;
    }
    if args.cpp_sdk_src.is_none() {
        warnings.push("MPF C++ Component SDK source path was not provided, so it won't be built.");
    }
    if args.java_sdk_src.is_none() {
        warnings.push("MPF Java Component SDK source path was not provided, so it won't be built.");
    }
    if args.python_sdk_src.is_none() {
        warnings
            .push("MPF Python Component SDK source path was not provided, so it won't be built.");
    }
    match (&args.package_json, &args.components) {
        (Some(_), Some(_)) => warnings.push(
            "Both a JSON package file and a component list was specified. \
             Only components from the JSON package file will be built.",
        ),
        (None, None) => warnings.push("No components specified."),
        _ => {}
    }
    warnings
}

pub(super) fn print_argument_warnings(args: &BuildArgs) {
    for warning in argument_warnings(args) {
        print_warning(warning);
    }
}

/// Resolves the requested components. A package file takes precedence over
/// a component list.
pub(super) fn locate_components(
    args: &BuildArgs,
    classifier: &Classifier,
) -> Result<Vec<ResolvedComponent>> {
    let locator = match (&args.package_json, &args.components) {
        (Some(package_json), _) => ComponentLocator::from_manifest(package_json)?,
        (None, Some(components)) => ComponentLocator::from_component_list(
            components,
            args.component_search_path.as_deref().unwrap_or_default(),
        ),
        (None, None) => return Ok(Vec::new()),
    };
    Ok(locator.locate(classifier)?)
}

/// Verifies the tools needed by the SDKs and resolved components, once.
pub(super) fn verify_toolchain(
    args: &BuildArgs,
    resolved: &[ResolvedComponent],
    settings: &BuildSettings,
) -> Result<Toolchain> {
    let mut required: Vec<BuildSystem> = resolved.iter().map(|r| r.build_system).collect();
    if args.python_sdk_src.is_some() {
        required.push(BuildSystem::Pip);
    }
    Ok(Toolchain::verify(&required, &settings.tools)?)
}

pub(super) fn create_sdks(
    args: &BuildArgs,
    settings: &Arc<BuildSettings>,
    toolchain: &Toolchain,
) -> Result<Vec<Sdk>> {
    let mut sdks = Vec::new();
    if let Some(src) = &args.cpp_sdk_src {
        sdks.push(Sdk::Cpp(CppSdk::new(src, Arc::clone(settings))?));
    }
    if let Some(src) = &args.java_sdk_src {
        sdks.push(Sdk::Java(JavaSdk::new(src, Arc::clone(settings))?));
    }
    if let Some(src) = &args.python_sdk_src {
        let pip = toolchain
            .pip()
            .ok_or_else(|| anyhow::anyhow!("pip was not verified for the Python SDK"))?;
        sdks.push(Sdk::Python(PythonSdk::new(src, Arc::clone(settings), pip)?));
    }
    Ok(sdks)
}

pub(super) fn create_components(
    resolved: &[ResolvedComponent],
    settings: &Arc<BuildSettings>,
    toolchain: &Toolchain,
) -> Result<Vec<Component>> {
    let components = resolved
        .iter()
        .map(|r| Component::create(r, Arc::clone(settings), toolchain))
        .collect::<compforge_core::Result<Vec<_>>>()?;
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_warnings_for_missing_inputs() {
        let args = BuildArgs::default();
        let warnings = argument_warnings(&args);
        assert_eq!(warnings.len(), 4);
        assert!(warnings.contains(&"No components specified."));
    }

    #[test]
    fn test_manifest_and_list_warning() {
        let args = BuildArgs {
            cpp_sdk_src: Some(PathBuf::from("cpp")),
            java_sdk_src: Some(PathBuf::from("java")),
            python_sdk_src: Some(PathBuf::from("python")),
            package_json: Some(PathBuf::from("package.json")),
            components: Some("A:B".to_string()),
            ..BuildArgs::default()
        };
        let warnings = argument_warnings(&args);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Both a JSON package file and a component list"));
    }

    #[test]
    fn test_no_warnings_when_only_cleaning() {
        let args = BuildArgs {
            clean_only: true,
            ..BuildArgs::default()
        };
        assert!(argument_warnings(&args).is_empty());
    }

    #[test]
    fn test_nothing_requested_resolves_nothing() {
        let classifier = Classifier::new();
        assert!(locate_components(&BuildArgs::default(), &classifier)
            .unwrap()
            .is_empty());
    }
}
