//! Packaging coordinator.
//!
//! [`plan`] turns a resolved [`Config`] and a [`ServiceManifest`] into an
//! ordered list of per-unit steps without touching anything. [`execute`]
//! carries the steps out, one unit at a time, and stops at the first failure.
//!
//! Each unit runs the fixed sequence
//! `install? -> materialize -> generate -> prune -> remove?`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, PackageManager, SchemaMode};
use crate::consts::{BUILD_ROOT_DIR, GENERATOR_PACKAGE};
use crate::exec::{CommandRunner, CommandSpec, ExecError};
use crate::prune::{EnginePatterns, PruneError, prune};
use crate::schema::{SchemaError, link_command, link_target, materialize};
use crate::select::{Selection, select_functions};
use crate::service::ServiceManifest;
use crate::{deps, generate};

/// Errors that abort a packaging run.
#[derive(Debug, Error)]
pub enum PackError {
  #[error("build directory for '{unit}' does not exist: {path}")]
  MissingBuildDir { unit: String, path: PathBuf },

  #[error("failed to plan schema for '{unit}': {source}")]
  Plan {
    unit: String,
    #[source]
    source: SchemaError,
  },

  #[error("failed to install {package} for '{unit}': {source}")]
  Install {
    unit: String,
    package: String,
    #[source]
    source: ExecError,
  },

  #[error("failed to materialize schema for '{unit}': {source}")]
  Schema {
    unit: String,
    #[source]
    source: SchemaError,
  },

  #[error("failed to generate client for '{unit}': {source}")]
  Generate {
    unit: String,
    #[source]
    source: ExecError,
  },

  #[error("failed to prune engines for '{unit}': {source}")]
  Prune {
    unit: String,
    #[source]
    source: PruneError,
  },

  #[error("failed to remove {package} for '{unit}': {source}")]
  Remove {
    unit: String,
    package: String,
    #[source]
    source: ExecError,
  },
}

/// One step of a unit's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum Step {
  Install {
    package_manager: PackageManager,
    command: CommandSpec,
  },
  Materialize {
    mode: SchemaMode,
    source: PathBuf,
    dir_name: String,
    target: PathBuf,
    /// The `ln` invocation in link mode.
    command: Option<CommandSpec>,
  },
  Generate {
    data_proxy: bool,
    command: CommandSpec,
  },
  Prune {
    patterns: EnginePatterns,
  },
  Remove {
    package_manager: PackageManager,
    command: CommandSpec,
  },
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Install { command, .. } | Step::Remove { command, .. } | Step::Generate { command, .. } => {
        write!(f, "{}", command)
      }
      Step::Materialize {
        command: Some(command), ..
      } => write!(f, "{}", command),
      Step::Materialize { source, target, .. } => {
        write!(f, "copy {} -> {}", source.display(), target.display())
      }
      Step::Prune { patterns } => write!(f, "prune {} engine pattern(s)", patterns.patterns().len()),
    }
  }
}

/// The steps for one build directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitPlan {
  pub unit: String,
  pub build_dir: PathBuf,
  pub steps: Vec<Step>,
}

/// Everything a packaging run will do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackPlan {
  pub selection: Selection,
  pub units: Vec<UnitPlan>,
}

/// Outcome of one processed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
  pub unit: String,
  pub build_dir: PathBuf,
  /// Engine artifacts deleted, relative to the build directory.
  pub deleted: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackReport {
  pub units: Vec<UnitReport>,
}

impl PackReport {
  pub fn deleted_count(&self) -> usize {
    self.units.iter().map(|u| u.deleted.len()).sum()
  }
}

/// Build directory of a unit.
pub fn build_dir(output_path: &Path, unit: &str) -> PathBuf {
  output_path.join(BUILD_ROOT_DIR).join(unit)
}

/// Compute the steps of a packaging run.
pub fn plan(config: &Config, manifest: &ServiceManifest) -> Result<PackPlan, PackError> {
  let selection = select_functions(
    manifest.individually,
    &manifest.functions,
    manifest.provider_runtime.as_deref(),
    &config.ignore_functions,
  );
  info!(units = ?selection.units(), "selected units");

  let source = config.schema_source();
  let mut units = Vec::new();

  for unit in selection.units() {
    let dir = build_dir(&config.output_path, unit);
    let mut steps = Vec::new();

    if config.install_deps {
      steps.push(Step::Install {
        package_manager: config.package_manager,
        command: deps::install_command(config.package_manager, GENERATOR_PACKAGE),
      });
    }

    let command = match config.schema_mode() {
      SchemaMode::Copy => None,
      SchemaMode::Link => {
        let relative = link_target(&dir, &source).map_err(|source| PackError::Plan {
          unit: unit.to_string(),
          source,
        })?;
        Some(link_command(&relative, &config.schema_dir_name))
      }
    };
    steps.push(Step::Materialize {
      mode: config.schema_mode(),
      source: source.clone(),
      dir_name: config.schema_dir_name.clone(),
      target: dir.join(&config.schema_dir_name),
      command,
    });

    steps.push(Step::Generate {
      data_proxy: config.data_proxy,
      command: generate::generate_command(config.data_proxy),
    });

    steps.push(Step::Prune {
      patterns: config.engine_patterns.clone(),
    });

    if config.install_deps {
      steps.push(Step::Remove {
        package_manager: config.package_manager,
        command: deps::remove_command(config.package_manager, GENERATOR_PACKAGE),
      });
    }

    units.push(UnitPlan {
      unit: unit.to_string(),
      build_dir: dir,
      steps,
    });
  }

  Ok(PackPlan { selection, units })
}

/// Carry out a plan. Units run strictly in order; the first failing step
/// aborts the run.
pub fn execute(plan: &PackPlan, runner: &mut dyn CommandRunner) -> Result<PackReport, PackError> {
  let mut report = PackReport::default();

  for unit_plan in &plan.units {
    report.units.push(execute_unit(unit_plan, runner)?);
  }

  Ok(report)
}

fn execute_unit(plan: &UnitPlan, runner: &mut dyn CommandRunner) -> Result<UnitReport, PackError> {
  let unit = plan.unit.as_str();
  let dir = plan.build_dir.as_path();

  if !dir.is_dir() {
    return Err(PackError::MissingBuildDir {
      unit: unit.to_string(),
      path: dir.to_path_buf(),
    });
  }

  info!(unit = %unit, dir = %dir.display(), "packaging unit");
  let mut deleted = Vec::new();

  for step in &plan.steps {
    match step {
      Step::Install { command, .. } => {
        deps::install(runner, command, dir).map_err(|source| PackError::Install {
          unit: unit.to_string(),
          package: GENERATOR_PACKAGE.to_string(),
          source,
        })?;
      }
      Step::Materialize {
        source,
        dir_name,
        command,
        ..
      } => {
        materialize(runner, unit, dir, source, dir_name, command.as_ref()).map_err(|source| PackError::Schema {
          unit: unit.to_string(),
          source,
        })?;
      }
      Step::Generate { command, .. } => {
        generate::generate(runner, command, dir).map_err(|source| PackError::Generate {
          unit: unit.to_string(),
          source,
        })?;
      }
      Step::Prune { patterns } => {
        info!(unit = %unit, "pruning unused engines");
        deleted = prune(dir, patterns).map_err(|source| PackError::Prune {
          unit: unit.to_string(),
          source,
        })?;
      }
      Step::Remove { command, .. } => {
        deps::remove(runner, command, dir).map_err(|source| PackError::Remove {
          unit: unit.to_string(),
          package: GENERATOR_PACKAGE.to_string(),
          source,
        })?;
      }
    }
  }

  Ok(UnitReport {
    unit: unit.to_string(),
    build_dir: dir.to_path_buf(),
    deleted,
  })
}

/// Plan and execute in one go. This is the hook's entry point.
pub fn run(config: &Config, manifest: &ServiceManifest, runner: &mut dyn CommandRunner) -> Result<PackReport, PackError> {
  let plan = plan(config, manifest)?;
  execute(&plan, runner)
}
