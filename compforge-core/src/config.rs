//! TOML configuration and run settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::archive::PACKAGES_DIR;
use crate::builder::Parallelism;
use crate::error::{Error, Result};
use crate::paths::{absolutize, expand_path};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "compforge.toml";

/// Environment variable overriding the SDK install location.
pub const SDK_INSTALL_PATH_ENV: &str = "MPF_SDK_INSTALL_PATH";

/// SDK install location used when nothing else is configured.
pub const DEFAULT_SDK_INSTALL_PATH: &str = "~/mpf-sdk-install";

/// Programs used to drive the native build tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub cmake: String,
    pub make: String,
    pub mvn: String,
    pub pip: String,
    pub python: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            cmake: "cmake3".to_string(),
            make: "make".to_string(),
            mvn: "mvn".to_string(),
            pip: "pip".to_string(),
            python: "python".to_string(),
        }
    }
}

/// Contents of `compforge.toml`.
///
/// ```toml
/// sdk_install_path = "/opt/mpf-sdk"
/// default_parallel = 4
///
/// [tools]
/// cmake = "cmake"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub tools: Tools,
    /// SDK install root. `MPF_SDK_INSTALL_PATH` takes precedence.
    pub sdk_install_path: Option<String>,
    /// Simultaneous builds when `--parallel` is not given. Zero is unbounded.
    pub default_parallel: Option<usize>,
    /// Make jobs when `--jobs` is not given. Zero is unbounded.
    pub default_jobs: Option<usize>,
}

impl ForgeConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content, path)
    }

    /// Loads `path` if given, otherwise `compforge.toml` in the working
    /// directory when it exists, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parallelism(&self) -> Parallelism {
        to_limit(self.default_parallel)
    }

    pub fn jobs(&self) -> Parallelism {
        to_limit(self.default_jobs)
    }

    /// SDK install root from the environment, then this file, then the
    /// built-in default.
    pub fn sdk_install_path(&self) -> PathBuf {
        let env = std::env::var(SDK_INSTALL_PATH_ENV).ok();
        resolve_sdk_install_path(env.as_deref(), self.sdk_install_path.as_deref())
    }
}

fn to_limit(value: Option<usize>) -> Parallelism {
    match value {
        Some(0) => Parallelism::Unbounded,
        Some(n) => Parallelism::Limited(n),
        None => Parallelism::Limited(1),
    }
}

fn resolve_sdk_install_path(env: Option<&str>, configured: Option<&str>) -> PathBuf {
    let raw = env
        .filter(|v| !v.is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_SDK_INSTALL_PATH);
    expand_path(raw)
}

/// Settings shared by every project of a run.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Absolute build root.
    pub build_dir: PathBuf,
    /// Jobs forwarded to `make`.
    pub make_jobs: Parallelism,
    pub sdk_install_path: PathBuf,
    pub tools: Tools,
}

impl BuildSettings {
    pub fn new(build_dir: impl AsRef<Path>, make_jobs: Parallelism, config: &ForgeConfig) -> Self {
        Self {
            build_dir: absolutize(build_dir),
            make_jobs,
            sdk_install_path: config.sdk_install_path(),
            tools: config.tools.clone(),
        }
    }

    /// Shared directory receiving every finished component package.
    pub fn plugin_output_dir(&self) -> PathBuf {
        self.build_dir.join(PACKAGES_DIR)
    }

    fn python_sdk_root(&self) -> PathBuf {
        self.sdk_install_path.join("python")
    }

    /// Wheel cache shared by the Python SDK and Python components.
    pub fn sdk_wheelhouse(&self) -> PathBuf {
        self.python_sdk_root().join("wheelhouse")
    }

    /// Install target for the Python SDK packages.
    pub fn sdk_installed_packages(&self) -> PathBuf {
        self.python_sdk_root().join("site-packages")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = ForgeConfig::from_toml(
            r#"
default_parallel = 0

[tools]
cmake = "cmake"
"#,
            Path::new("compforge.toml"),
        )
        .unwrap();
        assert_eq!(config.tools.cmake, "cmake");
        assert_eq!(config.tools.make, "make");
        assert_eq!(config.parallelism(), Parallelism::Unbounded);
        assert_eq!(config.jobs(), Parallelism::Limited(1));
    }

    #[test]
    fn test_invalid_config() {
        let err = ForgeConfig::from_toml("default_parallel = \"x\"", Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_sdk_install_precedence() {
        assert_eq!(
            resolve_sdk_install_path(Some("/env"), Some("/file")),
            PathBuf::from("/env")
        );
        assert_eq!(
            resolve_sdk_install_path(Some(""), Some("/file")),
            PathBuf::from("/file")
        );
        assert!(resolve_sdk_install_path(None, None).ends_with("mpf-sdk-install"));
    }

    #[test]
    fn test_settings_paths() {
        let settings = BuildSettings {
            build_dir: PathBuf::from("/b"),
            make_jobs: Parallelism::Limited(1),
            sdk_install_path: PathBuf::from("/sdk"),
            tools: Tools::default(),
        };
        assert_eq!(settings.plugin_output_dir(), PathBuf::from("/b/plugin-packages"));
        assert_eq!(settings.sdk_wheelhouse(), PathBuf::from("/sdk/python/wheelhouse"));
        assert_eq!(
            settings.sdk_installed_packages(),
            PathBuf::from("/sdk/python/site-packages")
        );
    }
}
