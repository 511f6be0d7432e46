//! Shared path utilities for search paths and build directories.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Suffix appended to every per-project build directory name.
pub const BUILD_DIR_SUFFIX: &str = "-build";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:([A-Za-z0-9_]+)|\{([^}]*)\})")
        .expect("environment variable pattern is valid")
});

/// Splits a colon-separated path list.
///
/// Empty segments are dropped, trailing slashes are removed from every
/// segment except the root path itself, and a leading `~` is expanded to the
/// home directory.
pub fn split_path_list(paths: &str) -> Vec<PathBuf> {
    paths
        .split(':')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let trimmed = if segment == "/" {
                segment
            } else {
                segment.trim_end_matches('/')
            };
            // A run of slashes collapses to the root.
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
            expand_tilde(trimmed)
        })
        .collect()
}

/// Expands a leading `~` or `~/` to the current user's home directory.
///
/// Paths without a leading tilde, and paths when no home directory is known,
/// are returned unchanged.
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Replaces `$NAME` and `${NAME}` with the value of the environment variable.
///
/// References to unset variables are left as written.
pub fn expand_env_vars(path: &str) -> Cow<'_, str> {
    ENV_VAR_RE.replace_all(path, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    })
}

/// Expands environment variables, then a leading `~`.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.to_str() {
        Some(text) => expand_tilde(expand_env_vars(text).as_ref()),
        None => expand_tilde(path),
    }
}

/// Makes `path` absolute against the working directory without touching the
/// filesystem. Environment variables and a leading `~` are expanded first.
pub fn absolutize(path: impl AsRef<Path>) -> PathBuf {
    let path = expand_path(path);
    let joined = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    };
    normalize(&joined)
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Derives the build directory for a project from its absolute source path.
///
/// The leading separator is stripped and every remaining `/` becomes `-`.
pub fn generate_build_path(base_build_dir: &Path, src_dir: &Path) -> PathBuf {
    let src = src_dir.to_string_lossy();
    let without_leading = src.strip_prefix('/').unwrap_or(&src);
    let name = format!("{}{}", without_leading.replace('/', "-"), BUILD_DIR_SUFFIX);
    base_build_dir.join(name)
}

/// Returns the final path component, ignoring trailing separators.
pub fn leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().trim_end_matches('/').to_string())
}
