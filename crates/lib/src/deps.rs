//! Temporary generator dependency.
//!
//! When enabled, the generator package is added as a dev dependency of a
//! build directory before generation and removed again once the engines are
//! pruned.

use std::path::Path;

use tracing::info;

use crate::config::PackageManager;
use crate::exec::{CommandRunner, CommandSpec, ExecError};

pub fn install_command(pm: PackageManager, package: &str) -> CommandSpec {
  match pm {
    PackageManager::Npm => CommandSpec::new("npm", ["install", "-D", package]),
    PackageManager::Yarn => CommandSpec::new("yarn", ["add", "-D", package]),
  }
}

pub fn remove_command(pm: PackageManager, package: &str) -> CommandSpec {
  CommandSpec::new(pm.as_str(), ["remove", package])
}

/// Run a planned [`install_command`] in `build_dir`.
pub fn install(runner: &mut dyn CommandRunner, command: &CommandSpec, build_dir: &Path) -> Result<(), ExecError> {
  info!(cmd = %command, dir = %build_dir.display(), "installing dev dependency");
  runner.run(command, build_dir)?;
  Ok(())
}

/// Run a planned [`remove_command`] in `build_dir`.
pub fn remove(runner: &mut dyn CommandRunner, command: &CommandSpec, build_dir: &Path) -> Result<(), ExecError> {
  info!(cmd = %command, dir = %build_dir.display(), "removing dev dependency");
  runner.run(command, build_dir)?;
  Ok(())
}
