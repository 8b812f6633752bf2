//! Service manifest types.
//!
//! These mirror the subset of a `serverless.yml` the packaging hook reads:
//! the function registry, the provider default runtime, the per-function
//! packaging flag and the `custom` settings block.

use serde::{Deserialize, Serialize};

/// Container image reference of a function.
///
/// Functions with a `Uri` or `Named` image are pre-built and never packaged
/// by the hook. An image object without a `uri` is built by the host from a
/// local Dockerfile and maps to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum ImageRef {
  #[default]
  None,
  Uri(String),
  Named(String),
}

impl ImageRef {
  /// Whether the image is supplied from outside the service.
  pub fn is_external(&self) -> bool {
    !matches!(self, ImageRef::None)
  }
}

/// One entry of the function registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
  pub name: String,
  pub runtime: Option<String>,
  pub image: ImageRef,
}

impl FunctionDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
    self.runtime = Some(runtime.into());
    self
  }

  pub fn with_image(mut self, image: ImageRef) -> Self {
    self.image = image;
    self
  }
}

/// `custom.webpack` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpackSettings {
  pub packager: Option<String>,
}

/// `custom.prisma` settings. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrismaSettings {
  pub prisma_path: Option<String>,
  pub output_path: Option<String>,
  pub install_deps: Option<bool>,
  pub use_sym_link: Option<bool>,
  pub ignore_functions: Option<Vec<String>>,
  pub data_proxy: Option<bool>,
  pub schema_dir_name: Option<String>,
  pub engine_patterns: Option<Vec<String>>,
}

/// The manifest's `custom` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSettings {
  #[serde(default)]
  pub webpack: Option<WebpackSettings>,
  #[serde(default)]
  pub prisma: Option<PrismaSettings>,
}

/// A parsed service manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceManifest {
  pub service: Option<String>,
  /// Provider-level default runtime.
  pub provider_runtime: Option<String>,
  /// `package.individually`.
  pub individually: bool,
  /// Function registry in manifest order.
  pub functions: Vec<FunctionDescriptor>,
  pub custom: CustomSettings,
}
