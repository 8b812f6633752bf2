//! Client generation.

use std::path::Path;

use tracing::info;

use crate::consts::{DATA_PROXY_FLAG, GENERATOR_PACKAGE};
use crate::exec::{CommandRunner, CommandSpec, ExecError};

/// `npx prisma generate`, with `--data-proxy` in remote-proxy mode.
pub fn generate_command(data_proxy: bool) -> CommandSpec {
  let mut cmd = CommandSpec::new("npx", [GENERATOR_PACKAGE, "generate"]);
  if data_proxy {
    cmd.args.push(DATA_PROXY_FLAG.to_string());
  }
  cmd
}

/// Run a planned [`generate_command`] inside `build_dir`.
pub fn generate(runner: &mut dyn CommandRunner, command: &CommandSpec, build_dir: &Path) -> Result<String, ExecError> {
  info!(cmd = %command, dir = %build_dir.display(), "generating client");
  runner.run(command, build_dir)
}
