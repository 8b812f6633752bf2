//! External command execution.
//!
//! Every subprocess the hook issues (package manager, generator, `ln`) goes
//! through a [`CommandRunner`]. Commands are blocking and always scoped to an
//! explicit working directory; the parent process never changes its own.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be started.
  #[error("failed to spawn '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  /// The program exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}{}", format_stderr(.stderr))]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn format_stderr(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{}", stderr)
  }
}

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
}

impl CommandSpec {
  pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      program: program.into(),
      args: args.into_iter().map(Into::into).collect(),
    }
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Runs external commands on behalf of the pipeline.
pub trait CommandRunner {
  /// Run `cmd` with `cwd` as working directory and return its trimmed stdout.
  ///
  /// A non-zero exit status must be reported as [`ExecError::Failed`].
  fn run(&mut self, cmd: &CommandSpec, cwd: &Path) -> Result<String, ExecError>;
}

/// Runs commands as real child processes, inheriting the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&mut self, cmd: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
    debug!(cmd = %cmd, cwd = %cwd.display(), "spawning process");

    let (program, args) = invocation(cmd);
    let output = Command::new(program)
      .args(args)
      .current_dir(cwd)
      .output()
      .map_err(|source| ExecError::Spawn {
        cmd: cmd.to_string(),
        source,
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }

    if !output.status.success() {
      return Err(ExecError::Failed {
        cmd: cmd.to_string(),
        code: output.status.code(),
        stderr,
      });
    }

    Ok(stdout)
  }
}

/// Program and arguments actually spawned for `cmd`.
///
/// On Windows `npm`, `npx` and `yarn` are `.cmd` shims that only a shell can
/// start, so every command goes through `cmd.exe /C`. Elsewhere the program
/// is spawned directly.
fn invocation(cmd: &CommandSpec) -> (&str, Vec<&str>) {
  #[cfg(windows)]
  {
    let mut args = vec!["/C", cmd.program.as_str()];
    args.extend(cmd.args.iter().map(String::as_str));
    ("cmd.exe", args)
  }

  #[cfg(not(windows))]
  {
    (cmd.program.as_str(), cmd.args.iter().map(String::as_str).collect())
  }
}
