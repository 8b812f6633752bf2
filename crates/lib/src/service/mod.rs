//! Service manifest loading.
//!
//! The host build tool describes the service in a `serverless.yml`. Only the
//! keys the packaging hook needs are read; everything else (handlers, events,
//! variables) is ignored.

mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub use types::*;

/// Errors that can occur when loading a service manifest.
#[derive(Debug, Error)]
pub enum ServiceError {
  /// Failed to read the manifest file.
  #[error("failed to read service manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The manifest is not valid YAML or has the wrong shape.
  #[error("failed to parse service manifest: {0}")]
  Parse(#[source] serde_yaml::Error),

  /// A function key is not a string.
  #[error("function names must be strings, got {0}")]
  InvalidFunctionName(String),

  /// A boolean setting holds text that is neither `true` nor `false`.
  #[error("{key} must be true or false, got '{value}'")]
  InvalidFlag { key: &'static str, value: String },

  /// A function entry has the wrong shape.
  #[error("invalid definition for function '{name}': {source}")]
  InvalidFunction {
    name: String,
    #[source]
    source: serde_yaml::Error,
  },
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
  service: Option<String>,
  #[serde(default)]
  provider: RawProvider,
  #[serde(default)]
  package: RawPackage,
  #[serde(default)]
  functions: Option<serde_yaml::Mapping>,
  #[serde(default)]
  custom: Option<CustomSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProvider {
  runtime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
  individually: Option<RawFlag>,
}

/// A boolean that may still be written as text, e.g. an unresolved
/// `${param:...}` variable.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFlag {
  Bool(bool),
  Text(String),
}

/// Whether `value` still holds a `${...}` variable the host did not resolve.
fn is_unresolved(value: &str) -> bool {
  value.contains("${")
}

fn packaging_flag(raw: Option<RawFlag>) -> Result<bool, ServiceError> {
  let text = match raw {
    None => return Ok(false),
    Some(RawFlag::Bool(flag)) => return Ok(flag),
    Some(RawFlag::Text(text)) => text,
  };

  match text.trim() {
    "true" => Ok(true),
    "false" => Ok(false),
    value if is_unresolved(value) => {
      warn!(value = %value, "package.individually is an unresolved variable, packaging the service as one bundle");
      Ok(false)
    }
    _ => Err(ServiceError::InvalidFlag {
      key: "package.individually",
      value: text,
    }),
  }
}

fn warn_unresolved_runtime(function: Option<&str>, runtime: Option<&str>) {
  if let Some(runtime) = runtime.filter(|r| is_unresolved(r)) {
    warn!(
      function = function.unwrap_or("-"),
      runtime = %runtime,
      "runtime is an unresolved variable and is matched literally"
    );
  }
}

#[derive(Debug, Default, Deserialize)]
struct RawFunction {
  runtime: Option<String>,
  image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawImage {
  Named(String),
  Object { uri: Option<String> },
}

impl From<Option<RawImage>> for ImageRef {
  fn from(raw: Option<RawImage>) -> Self {
    match raw {
      Some(RawImage::Named(name)) => ImageRef::Named(name),
      Some(RawImage::Object { uri: Some(uri) }) => ImageRef::Uri(uri),
      Some(RawImage::Object { uri: None }) | None => ImageRef::None,
    }
  }
}

impl ServiceManifest {
  /// Load a manifest from a YAML file.
  pub fn load(path: &Path) -> Result<Self, ServiceError> {
    let content = fs::read_to_string(path).map_err(|source| ServiceError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded service manifest");
    Self::from_yaml_str(&content)
  }

  /// Parse a manifest from YAML text. An empty document is an empty service.
  pub fn from_yaml_str(content: &str) -> Result<Self, ServiceError> {
    let raw: Option<RawManifest> = serde_yaml::from_str(content).map_err(ServiceError::Parse)?;
    let raw = raw.unwrap_or_default();

    let mut functions = Vec::new();
    for (key, value) in raw.functions.unwrap_or_default() {
      let name = match key {
        serde_yaml::Value::String(name) => name,
        other => return Err(ServiceError::InvalidFunctionName(format!("{:?}", other))),
      };

      let def: RawFunction = if value.is_null() {
        RawFunction::default()
      } else {
        serde_yaml::from_value(value).map_err(|source| ServiceError::InvalidFunction {
          name: name.clone(),
          source,
        })?
      };

      warn_unresolved_runtime(Some(name.as_str()), def.runtime.as_deref());
      functions.push(FunctionDescriptor {
        name,
        runtime: def.runtime,
        image: def.image.into(),
      });
    }

    warn_unresolved_runtime(None, raw.provider.runtime.as_deref());

    Ok(Self {
      service: raw.service,
      provider_runtime: raw.provider.runtime,
      individually: packaging_flag(raw.package.individually)?,
      functions,
      custom: raw.custom.unwrap_or_default(),
    })
  }
}
