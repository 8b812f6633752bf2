//! Function selection.
//!
//! Decides which build directories a packaging run touches: either the single
//! service bundle, or every function that is packaged individually, runs on a
//! node runtime and is not built from an external container image.

use serde::Serialize;
use tracing::debug;

use crate::consts::{DEFAULT_RUNTIME, NODE_RUNTIME_MARKER, SERVICE_UNIT};
use crate::service::FunctionDescriptor;

/// The units processed by one packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "functions", rename_all = "lowercase")]
pub enum Selection {
  /// The service is packaged as one bundle.
  Service,
  /// Per-function packaging; qualifying function names in registry order.
  Functions(Vec<String>),
}

impl Selection {
  /// Names of the build directories to process, in order.
  pub fn units(&self) -> Vec<&str> {
    match self {
      Selection::Service => vec![SERVICE_UNIT],
      Selection::Functions(names) => names.iter().map(String::as_str).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Selection::Functions(names) if names.is_empty())
  }
}

/// Whether a runtime identifier denotes a node runtime.
pub fn is_node_runtime(runtime: &str) -> bool {
  runtime.contains(NODE_RUNTIME_MARKER)
}

/// The runtime a function actually runs on.
pub fn effective_runtime<'a>(function: &'a FunctionDescriptor, provider_runtime: Option<&'a str>) -> &'a str {
  function
    .runtime
    .as_deref()
    .or(provider_runtime)
    .unwrap_or(DEFAULT_RUNTIME)
}

/// Select the units to process.
pub fn select_functions(
  individually: bool,
  functions: &[FunctionDescriptor],
  provider_runtime: Option<&str>,
  ignore: &[String],
) -> Selection {
  if !individually {
    return Selection::Service;
  }

  let selected = functions
    .iter()
    .filter(|function| {
      if ignore.contains(&function.name) {
        debug!(function = %function.name, "skipping ignored function");
        return false;
      }
      if function.image.is_external() {
        debug!(function = %function.name, "skipping function with container image");
        return false;
      }
      let runtime = effective_runtime(function, provider_runtime);
      if !is_node_runtime(runtime) {
        debug!(function = %function.name, runtime = %runtime, "skipping non-node function");
        return false;
      }
      true
    })
    .map(|function| function.name.clone())
    .collect();

  Selection::Functions(selected)
}
