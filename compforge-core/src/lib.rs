//! Core library for component resolution, build scheduling and packaging.

pub mod adapter;
pub mod archive;
pub mod build_system;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod paths;
pub mod project;
pub mod tool;

pub use adapter::BuildToolAdapter;
pub use archive::{copy_packages, list_component_packages, tar_directory, PackageArchive};
pub use build_system::{BuildSystem, LANG_DIRS};
pub use builder::{BuildSummary, Parallelism, ProjectBuilder};
pub use classifier::Classifier;
pub use config::{BuildSettings, ForgeConfig, Tools};
pub use error::{BuildFailure, Error, Result};
pub use locator::{ComponentLocator, ResolvedComponent};
pub use project::{BuildOutcome, Project};
pub use tool::ToolCommand;
