//! Resolved packaging configuration.
//!
//! [`Config::from_settings`] is the only place defaults are applied. A
//! missing option never fails; it falls back to the documented default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::consts::DEFAULT_SCHEMA_DIR;
use crate::prune::EnginePatterns;
use crate::service::CustomSettings;

/// Package manager used to add and remove the generator dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
  #[default]
  Npm,
  Yarn,
}

impl PackageManager {
  pub fn as_str(&self) -> &'static str {
    match self {
      PackageManager::Npm => "npm",
      PackageManager::Yarn => "yarn",
    }
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("unsupported package manager '{0}', expected npm or yarn")]
  UnsupportedPackageManager(String),
}

impl FromStr for PackageManager {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "npm" => Ok(PackageManager::Npm),
      "yarn" => Ok(PackageManager::Yarn),
      other => Err(ConfigError::UnsupportedPackageManager(other.to_string())),
    }
  }
}

/// How the schema directory is made available in a build directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
  #[default]
  Copy,
  Link,
}

/// Fully resolved configuration for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
  pub package_manager: PackageManager,
  /// Root the schema directory is read from.
  pub schema_path: PathBuf,
  /// Root the per-unit build directories live under.
  pub output_path: PathBuf,
  /// Install the generator as a temporary dev dependency.
  pub install_deps: bool,
  pub use_symlink: bool,
  pub ignore_functions: Vec<String>,
  /// Generate the client in remote-proxy mode.
  pub data_proxy: bool,
  /// Name of the schema directory, both at the source and in build dirs.
  pub schema_dir_name: String,
  pub engine_patterns: EnginePatterns,
}

impl Config {
  /// Defaults for a service rooted at `service_root`.
  pub fn with_service_root(service_root: &Path) -> Self {
    Self {
      package_manager: PackageManager::default(),
      schema_path: service_root.to_path_buf(),
      output_path: service_root.to_path_buf(),
      install_deps: true,
      use_symlink: false,
      ignore_functions: Vec::new(),
      data_proxy: false,
      schema_dir_name: DEFAULT_SCHEMA_DIR.to_string(),
      engine_patterns: EnginePatterns::default(),
    }
  }

  /// Resolve the manifest's `custom` settings against `service_root`.
  ///
  /// Relative `prismaPath` and `outputPath` values are taken relative to the
  /// service root.
  pub fn from_settings(custom: &CustomSettings, service_root: &Path) -> Result<Self, ConfigError> {
    let mut config = Self::with_service_root(service_root);

    if let Some(packager) = custom.webpack.as_ref().and_then(|w| w.packager.as_deref()) {
      config.package_manager = packager.parse()?;
    }

    let Some(prisma) = custom.prisma.as_ref() else {
      return Ok(config);
    };

    if let Some(path) = &prisma.prisma_path {
      config.schema_path = service_root.join(path);
    }
    if let Some(path) = &prisma.output_path {
      config.output_path = service_root.join(path);
    }
    if let Some(install_deps) = prisma.install_deps {
      config.install_deps = install_deps;
    }
    if let Some(use_symlink) = prisma.use_sym_link {
      config.use_symlink = use_symlink;
    }
    if let Some(ignore) = &prisma.ignore_functions {
      config.ignore_functions = ignore.clone();
    }
    if let Some(data_proxy) = prisma.data_proxy {
      config.data_proxy = data_proxy;
    }
    if let Some(name) = prisma.schema_dir_name.as_ref().filter(|n| !n.is_empty()) {
      config.schema_dir_name = name.clone();
    }
    if let Some(patterns) = &prisma.engine_patterns {
      config.engine_patterns = EnginePatterns::new(patterns.clone());
    }

    Ok(config)
  }

  pub fn schema_mode(&self) -> SchemaMode {
    if self.use_symlink { SchemaMode::Link } else { SchemaMode::Copy }
  }

  /// The schema directory copied or linked into every build directory.
  pub fn schema_source(&self) -> PathBuf {
    self.schema_path.join(&self.schema_dir_name)
  }
}
