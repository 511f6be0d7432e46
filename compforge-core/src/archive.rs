//! Component package archives.
//!
//! Every component contributes `.tar.gz` packages whose single root
//! directory is named after the component's source directory.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use rustc_hash::FxHashSet;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::paths::leaf_name;

/// Directory, relative to a build or output root, that holds packages.
pub const PACKAGES_DIR: &str = "plugin-packages";

/// File extension of component packages.
pub const PACKAGE_EXTENSION: &str = "tar.gz";

/// Lists the packages in `<dir>/plugin-packages`, sorted by path.
pub fn list_component_packages(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir
        .join(PACKAGES_DIR)
        .join(format!("*.{}", PACKAGE_EXTENSION));
    let pattern_str = pattern.to_string_lossy();

    let mut packages = Vec::new();
    let entries = glob::glob(&pattern_str).map_err(|e| Error::Archive {
        path: pattern.clone(),
        message: format!("invalid package pattern: {}", e),
    })?;
    for entry in entries {
        match entry {
            Ok(path) => packages.push(path),
            Err(e) => warn!("glob error: {}", e),
        }
    }
    packages.sort();
    Ok(packages)
}

/// Copies packages into `output_dir`, returning the destination paths.
///
/// A package that already lives in `output_dir` is left where it is.
pub fn copy_packages(packages: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(packages.len());
    for package in packages {
        let file_name = package.file_name().ok_or_else(|| Error::Archive {
            path: package.clone(),
            message: "package path has no file name".to_string(),
        })?;
        let target = output_dir.join(file_name);
        if is_same_file(package, &target) {
            debug!(package = %package.display(), "Package already in output directory");
        } else {
            fs::copy(package, &target)?;
            debug!(from = %package.display(), to = %target.display(), "Copied package");
        }
        copied.push(target);
    }
    Ok(copied)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Writes `<output_dir>/<leaf>.tar.gz` containing `input_dir` under the root
/// directory `<leaf>`.
pub fn tar_directory(input_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let leaf = leaf_name(input_dir);
    let archive_path = output_dir.join(format!("{}.{}", leaf, PACKAGE_EXTENSION));
    let mut archive = PackageArchive::create(&archive_path)?;
    archive.append_path(input_dir, Path::new(&leaf))?;
    archive.finish()
}

/// A gzip-compressed tar archive that keeps only the first entry added at
/// any in-archive path.
///
/// Entries are written to a temporary file next to the destination, which is
/// renamed into place by [`PackageArchive::finish`]. Dropping the archive
/// without finishing it removes the temporary file, so a failed build never
/// leaves a truncated package behind.
pub struct PackageArchive {
    path: PathBuf,
    builder: tar::Builder<GzEncoder<NamedTempFile>>,
    excluded: Vec<PathBuf>,
    seen: FxHashSet<String>,
}

impl PackageArchive {
    pub fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(dir)
            .map_err(|e| archive_error(path, e))?;

        // Neither the package being written nor a stale copy of it may end up
        // inside itself when the destination lies under an archived directory.
        let mut excluded = Vec::with_capacity(2);
        if let Ok(partial) = fs::canonicalize(file.path()) {
            excluded.push(partial);
        }
        if let (Ok(dir), Some(file_name)) = (fs::canonicalize(dir), path.file_name()) {
            excluded.push(dir.join(file_name));
        }

        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder.follow_symlinks(false);
        Ok(Self {
            path: path.to_path_buf(),
            builder,
            excluded,
            seen: FxHashSet::default(),
        })
    }

    /// Adds a file or, recursively, a directory under `arcname`.
    ///
    /// Entries whose in-archive path was already added are skipped.
    pub fn append_path(&mut self, src: &Path, arcname: &Path) -> Result<()> {
        let canonical_src = fs::canonicalize(src).map_err(|e| Error::Archive {
            path: self.path.clone(),
            message: format!("{}: {}", src.display(), e),
        })?;

        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Archive {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
            let relative = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
            if self.excluded.contains(&canonical_src.join(relative)) {
                debug!(entry = %entry.path().display(), "Skipping the archive being written");
                continue;
            }

            let name = if relative.as_os_str().is_empty() {
                arcname.to_path_buf()
            } else {
                arcname.join(relative)
            };

            if !self.seen.insert(archive_key(&name)) {
                debug!(entry = %name.display(), "Skipping duplicate archive entry");
                continue;
            }

            let result = if entry.file_type().is_dir() {
                self.builder.append_dir(&name, entry.path())
            } else {
                self.builder.append_path_with_name(entry.path(), &name)
            };
            result.map_err(|e| archive_error(&self.path, e))?;
        }
        Ok(())
    }

    /// Flushes the archive, moves it to its destination and returns the path.
    pub fn finish(self) -> Result<PathBuf> {
        let path = self.path;
        let encoder = self
            .builder
            .into_inner()
            .map_err(|e| archive_error(&path, e))?;
        let file = encoder.finish().map_err(|e| archive_error(&path, e))?;
        file.persist(&path).map_err(|e| archive_error(&path, e.error))?;
        Ok(path)
    }
}

fn archive_key(name: &Path) -> String {
    name.to_string_lossy().trim_end_matches('/').to_string()
}

fn archive_error(path: &Path, err: std::io::Error) -> Error {
    Error::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
