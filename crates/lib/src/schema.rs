//! Schema materialization.
//!
//! The generator reads the schema from a directory next to the code it
//! generates into, so every build directory gets the schema directory either
//! as a recursive copy or as a relative symlink.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::exec::{CommandRunner, CommandSpec, ExecError};
use crate::util::paths::{absolutize, relative_path};

#[derive(Debug, Error)]
pub enum SchemaError {
  #[error("schema directory not found: {0}")]
  SourceMissing(PathBuf),

  #[error("failed to resolve {path}: {source}")]
  Resolve {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to copy {path}: {source}")]
  Copy {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to traverse schema directory {path}: {source}")]
  WalkDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to replace {path}: {source}")]
  Replace {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("symlinked schemas need `ln -s`, which this platform lacks; set useSymLink to false")]
  LinkUnsupported,

  #[error("failed to link schema: {0}")]
  Link(#[from] ExecError),
}

/// Path from `build_dir` to `source`, both resolved against the process
/// working directory when relative.
pub fn link_target(build_dir: &Path, source: &Path) -> Result<PathBuf, SchemaError> {
  let resolve = |path: &Path| {
    absolutize(path).map_err(|source| SchemaError::Resolve {
      path: path.to_path_buf(),
      source,
    })
  };
  Ok(relative_path(&resolve(build_dir)?, &resolve(source)?))
}

/// `ln -s <relative> <dir_name>`.
pub fn link_command(relative: &Path, dir_name: &str) -> CommandSpec {
  CommandSpec::new(
    "ln",
    ["-s".to_string(), relative.to_string_lossy().into_owned(), dir_name.to_string()],
  )
}

/// Make `build_dir/<dir_name>` provide the contents of `source`.
///
/// `link` is the planned `ln -s` invocation (see [`link_command`]); without
/// one the schema is copied.
pub fn materialize(
  runner: &mut dyn CommandRunner,
  unit: &str,
  build_dir: &Path,
  source: &Path,
  dir_name: &str,
  link: Option<&CommandSpec>,
) -> Result<(), SchemaError> {
  match link {
    None => {
      info!(unit = %unit, "copying schema");
      copy_schema(source, &build_dir.join(dir_name))
    }
    Some(command) => {
      info!(unit = %unit, cmd = %command, "linking schema");
      ensure_link_supported()?;
      remove_entry(&build_dir.join(dir_name))?;
      runner.run(command, build_dir)?;
      Ok(())
    }
  }
}

fn ensure_link_supported() -> Result<(), SchemaError> {
  if cfg!(windows) {
    Err(SchemaError::LinkUnsupported)
  } else {
    Ok(())
  }
}

/// Recursively copy `source` into `target`, overwriting existing files.
///
/// A symlink left at `target` by an earlier link-mode run is replaced by a
/// real directory.
pub fn copy_schema(source: &Path, target: &Path) -> Result<(), SchemaError> {
  if !source.is_dir() {
    return Err(SchemaError::SourceMissing(source.to_path_buf()));
  }

  if fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink()) {
    remove_entry(target)?;
  }

  for entry in WalkDir::new(source).follow_links(true) {
    let entry = entry.map_err(|e| SchemaError::WalkDir {
      path: source.to_path_buf(),
      source: e,
    })?;

    let rel = entry.path().strip_prefix(source).unwrap_or(entry.path());
    let dest = target.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&dest).map_err(|e| SchemaError::Copy {
        path: dest.clone(),
        source: e,
      })?;
    } else {
      debug!(from = %entry.path().display(), to = %dest.display(), "copying schema file");
      fs::copy(entry.path(), &dest).map_err(|e| SchemaError::Copy {
        path: entry.path().to_path_buf(),
        source: e,
      })?;
    }
  }

  Ok(())
}

/// Remove a file, symlink or directory. A missing entry is not an error.
fn remove_entry(path: &Path) -> Result<(), SchemaError> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => {
      return Err(SchemaError::Replace {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  let result = if metadata.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };

  match result {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(SchemaError::Replace {
      path: path.to_path_buf(),
      source: e,
    }),
  }
}
