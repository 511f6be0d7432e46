//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

use crate::build_system::BuildSystem;

/// A single project failure observed while draining a build wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub src_dir: PathBuf,
    pub message: String,
}

impl std::fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "An error occurred while trying to build {}: {}.",
            self.src_dir.display(),
            self.message
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON file: {0}")]
    ManifestParse(String),

    #[error("JSON file does not contain a mapping for the key named: \"{0}\"")]
    ManifestMissingKey(&'static str),

    #[error("A component listed in the JSON file does not contain a key named \"path\"")]
    ManifestEntryMissingPath,

    #[error("The following components were not found: {}", .0.join(", "))]
    ComponentsNotFound(Vec<String>),

    #[error("The following components were listed more than once: {}", join_paths(.0))]
    DuplicateComponents(Vec<PathBuf>),

    #[error(
        "Unable to build {role} because {} does not appear to be a {} project.",
        .path.display(),
        .kind.tool_name()
    )]
    NotAProject {
        role: &'static str,
        kind: BuildSystem,
        path: PathBuf,
    },

    #[error("Unable to build {role} because {} does not contain a setup.py file.", .path.display())]
    MissingSetupPy { role: &'static str, path: PathBuf },

    #[error("{tool} version {required} or greater is required, but found: {found}")]
    ToolVersion {
        tool: String,
        required: u32,
        found: String,
    },

    #[error("Failed to run {command}: {source}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' returned non-zero exit status {}", format_status(.status))]
    ToolFailed {
        command: String,
        status: Option<i32>,
    },

    #[error("Failed to write archive {}: {message}", .path.display())]
    Archive { path: PathBuf, message: String },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to start build workers: {0}")]
    WorkerPool(String),

    #[error("{0}")]
    Build(BuildFailure),

    #[error("{}", join_failures(.0))]
    BuildFailures(Vec<BuildFailure>),

    #[error("Build interrupted; {} project(s) were not started: {}", .0.len(), join_paths(.0))]
    Cancelled(Vec<PathBuf>),
}

fn format_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_failures(failures: &[BuildFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, Error>;
