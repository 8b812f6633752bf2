//! Lexical path helpers.
//!
//! Neither function touches the filesystem, so they work for build
//! directories and schema sources that are not created yet.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components.
///
/// `..` at the root stays at the root; leading `..` of a relative path are
/// kept.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match normalized.components().next_back() {
        Some(Component::Normal(_)) => {
          normalized.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => normalized.push(".."),
      },
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}

/// Make `path` absolute against the process working directory, then normalize.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
  if path.is_absolute() {
    Ok(normalize(path))
  } else {
    Ok(normalize(&std::env::current_dir()?.join(path)))
  }
}

/// Compute the path that leads from directory `from` to `to`.
///
/// Both paths must be absolute (or both relative to the same base) and are
/// normalized first. Returns `.` when they are equal.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
  let from = normalize(from);
  let to = normalize(to);

  let from_parts: Vec<_> = from.components().collect();
  let to_parts: Vec<_> = to.components().collect();

  let common = from_parts
    .iter()
    .zip(to_parts.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut relative = PathBuf::new();
  for _ in common..from_parts.len() {
    relative.push("..");
  }
  for part in &to_parts[common..] {
    relative.push(part.as_os_str());
  }

  if relative.as_os_str().is_empty() {
    relative.push(".");
  }
  relative
}
