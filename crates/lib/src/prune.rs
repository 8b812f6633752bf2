//! Native engine pruning.
//!
//! The generator downloads query, migration and formatter engines for every
//! platform it knows about. Only the deployment target's variant is kept; the
//! rest is deleted from the build directory so the function bundle stays
//! small.
//!
//! Patterns are matched against `/`-separated paths relative to the build
//! directory and applied in order: plain patterns add matches, `!` patterns
//! remove earlier matches. `*` never crosses a `/`; `**` does.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Engines removed from every build directory. `-rhel` variants are kept.
pub const DEFAULT_ENGINE_PATTERNS: &[&str] = &[
  "node_modules/.prisma/client/libquery_engine*",
  "!node_modules/.prisma/client/libquery_engine-rhel*",
  "node_modules/prisma/libquery_engine*",
  "!node_modules/prisma/libquery_engine-rhel*",
  "node_modules/@prisma/engines/libquery_engine*",
  "!node_modules/@prisma/engines/libquery_engine-rhel*",
  "node_modules/@prisma/engines/migration-engine*",
  "!node_modules/@prisma/engines/migration-engine-rhel*",
  "node_modules/@prisma/engines/prisma-fmt*",
  "!node_modules/@prisma/engines/prisma-fmt-rhel*",
  "node_modules/@prisma/engines/introspection-engine*",
  "!node_modules/@prisma/engines/introspection-engine-rhel*",
  "node_modules/prisma/engines/**",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

#[derive(Debug, Error)]
pub enum PruneError {
  #[error("invalid engine pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("failed to scan {path}: {source}")]
  WalkDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to delete {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Ordered engine pattern table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnginePatterns(Vec<String>);

impl Default for EnginePatterns {
  fn default() -> Self {
    Self(DEFAULT_ENGINE_PATTERNS.iter().map(|p| p.to_string()).collect())
  }
}

struct Rule {
  exclude: bool,
  base: PathBuf,
  pattern: Pattern,
}

impl EnginePatterns {
  pub fn new(patterns: Vec<String>) -> Self {
    Self(patterns)
  }

  pub fn patterns(&self) -> &[String] {
    &self.0
  }

  fn compile(&self) -> Result<Vec<Rule>, PruneError> {
    self
      .0
      .iter()
      .map(|raw| {
        let (exclude, glob) = match raw.strip_prefix('!') {
          Some(rest) => (true, rest),
          None => (false, raw.as_str()),
        };
        // A trailing `**` names everything below a directory, files included.
        let glob = if glob == "**" || glob.ends_with("/**") {
          format!("{}/*", glob)
        } else {
          glob.to_string()
        };
        let pattern = Pattern::new(&glob).map_err(|source| PruneError::Pattern {
          pattern: raw.clone(),
          source,
        })?;
        Ok(Rule {
          exclude,
          base: literal_base(&glob),
          pattern,
        })
      })
      .collect()
  }

  /// Resolve the table against `build_dir`.
  ///
  /// Returns the matching files and symlinks as sorted paths relative to
  /// `build_dir`.
  pub fn resolve(&self, build_dir: &Path) -> Result<Vec<PathBuf>, PruneError> {
    let rules = self.compile()?;

    let mut bases: Vec<&Path> = rules.iter().filter(|r| !r.exclude).map(|r| r.base.as_path()).collect();
    bases.sort();
    bases.dedup();

    let mut candidates = BTreeSet::new();
    for base in bases {
      let root = build_dir.join(base);
      if !root.is_dir() {
        continue;
      }
      for entry in WalkDir::new(&root) {
        let entry = entry.map_err(|source| PruneError::WalkDir {
          path: root.clone(),
          source,
        })?;
        if entry.file_type().is_dir() {
          continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(build_dir) {
          candidates.insert(to_slash(rel));
        }
      }
    }

    let mut matched = BTreeSet::new();
    for rule in &rules {
      if rule.exclude {
        matched.retain(|path: &String| !rule.pattern.matches_with(path, MATCH_OPTIONS));
      } else {
        matched.extend(
          candidates
            .iter()
            .filter(|path| rule.pattern.matches_with(path, MATCH_OPTIONS))
            .cloned(),
        );
      }
    }

    Ok(matched.into_iter().map(PathBuf::from).collect())
  }
}

/// Delete every engine matched by `patterns` under `build_dir`.
///
/// Returns the deleted paths relative to `build_dir`. An artifact that is
/// already gone counts as deleted.
pub fn prune(build_dir: &Path, patterns: &EnginePatterns) -> Result<Vec<PathBuf>, PruneError> {
  let unused = patterns.resolve(build_dir)?;
  if unused.is_empty() {
    debug!(dir = %build_dir.display(), "no unused engines");
    return Ok(unused);
  }

  delete_artifacts(build_dir, &unused)?;
  Ok(unused)
}

/// Delete `artifacts`, given relative to `build_dir`. One that is already
/// gone is skipped.
pub fn delete_artifacts(build_dir: &Path, artifacts: &[PathBuf]) -> Result<(), PruneError> {
  for artifact in artifacts {
    info!(engine = %artifact.display(), "removing unused engine");
    let path = build_dir.join(artifact);
    match fs::remove_file(&path) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(engine = %artifact.display(), "engine already removed");
      }
      Err(source) => return Err(PruneError::Remove { path, source }),
    }
  }
  Ok(())
}

/// The leading directory components of a glob that contain no wildcard.
fn literal_base(glob: &str) -> PathBuf {
  let parts: Vec<&str> = glob.split('/').collect();
  parts[..parts.len() - 1]
    .iter()
    .copied()
    .take_while(|part| !part.contains(['*', '?', '[']))
    .collect::<Vec<_>>()
    .join("/")
    .into()
}

fn to_slash(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
