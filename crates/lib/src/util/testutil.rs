//! Test utilities for slsprisma-lib.

use std::path::{Path, PathBuf};

use crate::exec::{CommandRunner, CommandSpec, ExecError};

/// A runner that records every command instead of spawning it.
///
/// Commands whose rendered form equals `fail_on` report a non-zero exit.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  pub calls: Vec<(String, PathBuf)>,
  pub fail_on: Option<String>,
}

impl RecordingRunner {
  pub fn failing_on(cmd: &str) -> Self {
    Self {
      calls: Vec::new(),
      fail_on: Some(cmd.to_string()),
    }
  }

  /// Rendered commands in call order.
  pub fn commands(&self) -> Vec<&str> {
    self.calls.iter().map(|(cmd, _)| cmd.as_str()).collect()
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&mut self, cmd: &CommandSpec, cwd: &Path) -> Result<String, ExecError> {
    let rendered = cmd.to_string();
    self.calls.push((rendered.clone(), cwd.to_path_buf()));

    if self.fail_on.as_deref() == Some(rendered.as_str()) {
      return Err(ExecError::Failed {
        cmd: rendered,
        code: Some(1),
        stderr: String::new(),
      });
    }
    Ok(String::new())
  }
}

/// Create an empty file, including missing parent directories.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, b"").unwrap();
  path
}
