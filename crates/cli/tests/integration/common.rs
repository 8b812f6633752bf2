//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Stand-in for `npm` and `yarn`: records its arguments.
#[cfg(unix)]
const FAKE_PACKAGE_MANAGER: &str = r#"#!/bin/sh
echo "$(basename "$0") $*" >> "$TOOLCHAIN_LOG"
"#;

/// Stand-in for `npx`: records its arguments and, on `prisma generate`,
/// leaves a client and engines for two platforms behind.
#[cfg(unix)]
const FAKE_NPX: &str = r#"#!/bin/sh
echo "npx $*" >> "$TOOLCHAIN_LOG"
if [ ! -f prisma/schema.prisma ]; then
  echo "Could not find a schema.prisma file" >&2
  exit 1
fi
mkdir -p node_modules/.prisma/client node_modules/@prisma/engines
echo "module.exports = {}" > node_modules/.prisma/client/index.js
touch node_modules/.prisma/client/libquery_engine-darwin-arm64.dylib.node
touch node_modules/.prisma/client/libquery_engine-rhel-openssl-1.0.x.so.node
touch node_modules/@prisma/engines/migration-engine-darwin-arm64
touch node_modules/@prisma/engines/migration-engine-rhel-openssl-1.0.x
"#;

/// Isolated service directory.
///
/// Each test gets its own temporary directory holding the manifest, the
/// schema, the build directories and a fake toolchain.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create from a fixture manifest.
  ///
  /// Copies the fixture to `serverless.yml` and adds a schema directory.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file("serverless.yml", &fixture_content(name));
    env.write_file("prisma/schema.prisma", "generator client { provider = \"prisma-client-js\" }");
    env
  }

  /// Write a file relative to the service directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Create the build directory webpack would have produced for `unit`.
  pub fn build_dir(&self, unit: &str) -> PathBuf {
    let p = self.root().join(".webpack").join(unit);
    std::fs::create_dir_all(&p).unwrap();
    p
  }

  /// Commands the fake toolchain received, one per line.
  pub fn toolchain_log(&self) -> String {
    std::fs::read_to_string(self.temp.path().join("toolchain.log")).unwrap_or_default()
  }

  /// Get a pre-configured Command for the slsprisma binary.
  ///
  /// Points `--service-dir` at the test directory and puts the fake
  /// `npm`/`npx` first on `PATH` (unix only).
  pub fn slsprisma_cmd(&self, subcommand: &str) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("slsprisma");
    cmd.arg(subcommand).arg("--service-dir").arg(self.temp.path());

    #[cfg(unix)]
    {
      let bin = self.install_toolchain();
      let path = std::env::var_os("PATH").unwrap_or_default();
      let mut dirs = vec![bin];
      dirs.extend(std::env::split_paths(&path));
      cmd.env("PATH", std::env::join_paths(dirs).unwrap());
      cmd.env("TOOLCHAIN_LOG", self.temp.path().join("toolchain.log"));
    }

    cmd
  }

  #[cfg(unix)]
  fn install_toolchain(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = self.temp.path().join("toolchain-bin");
    std::fs::create_dir_all(&bin).unwrap();
    for (name, script) in [("npm", FAKE_PACKAGE_MANAGER), ("yarn", FAKE_PACKAGE_MANAGER), ("npx", FAKE_NPX)] {
      let path = bin.join(name);
      std::fs::write(&path, script).unwrap();
      std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    bin
  }
}

/// Whether `path` exists relative to `root`.
pub fn exists(root: &Path, relative: &str) -> bool {
  root.join(relative).exists()
}
