//! Pack command integration tests.
//!
//! These run the real binary against a fake `npm`/`yarn`/`npx` on `PATH`.
#![cfg(unix)]

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, exists};

#[test]
#[serial]
fn pack_processes_node_functions() {
  let env = TestEnv::from_fixture("individual.yml");
  let apple = env.build_dir("apple");

  env
    .slsprisma_cmd("pack")
    .assert()
    .success()
    .stdout(predicate::str::contains("Packaged apple"))
    .stdout(predicate::str::contains("Engines removed: 2"));

  assert_eq!(
    env.toolchain_log(),
    "npm install -D prisma\nnpx prisma generate\nnpm remove prisma\n"
  );
  assert!(exists(&apple, "prisma/schema.prisma"));
  assert!(exists(&apple, "node_modules/.prisma/client/index.js"));
  assert!(exists(&apple, "node_modules/.prisma/client/libquery_engine-rhel-openssl-1.0.x.so.node"));
  assert!(exists(&apple, "node_modules/@prisma/engines/migration-engine-rhel-openssl-1.0.x"));
  assert!(!exists(&apple, "node_modules/.prisma/client/libquery_engine-darwin-arm64.dylib.node"));
  assert!(!exists(&apple, "node_modules/@prisma/engines/migration-engine-darwin-arm64"));
}

#[test]
#[serial]
fn pack_uses_yarn_and_data_proxy_for_the_bundle() {
  let env = TestEnv::from_fixture("yarn_proxy.yml");
  let bundle = env.build_dir("service");

  env
    .slsprisma_cmd("pack")
    .assert()
    .success()
    .stdout(predicate::str::contains("Packaged service"));

  assert_eq!(
    env.toolchain_log(),
    "yarn add -D prisma\nnpx prisma generate --data-proxy\nyarn remove prisma\n"
  );
  assert!(exists(&bundle, "prisma/schema.prisma"));
}

#[test]
#[serial]
fn pack_can_skip_dependency_install() {
  let env = TestEnv::from_fixture("bundle.yml");
  env.write_file(
    "serverless.yml",
    "service: shop\ncustom:\n  prisma:\n    installDeps: false\n",
  );
  env.build_dir("service");

  env.slsprisma_cmd("pack").assert().success();

  assert_eq!(env.toolchain_log(), "npx prisma generate\n");
}

#[test]
#[serial]
fn pack_with_nothing_selected_succeeds() {
  let env = TestEnv::from_fixture("all_ignored.yml");

  env
    .slsprisma_cmd("pack")
    .assert()
    .success()
    .stdout(predicate::str::contains("No functions to package"));

  assert_eq!(env.toolchain_log(), "");
}

#[test]
#[serial]
fn pack_missing_build_dir_fails() {
  let env = TestEnv::from_fixture("individual.yml");

  env
    .slsprisma_cmd("pack")
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));

  assert_eq!(env.toolchain_log(), "");
}

#[test]
#[serial]
fn pack_reports_generator_failure() {
  let env = TestEnv::from_fixture("individual.yml");
  env.build_dir("apple");
  std::fs::remove_file(env.root().join("prisma/schema.prisma")).unwrap();
  env.write_file("prisma/README.md", "schema lives elsewhere");

  env
    .slsprisma_cmd("pack")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to generate client for 'apple'"));

  // The dev dependency is left installed when generation fails.
  assert_eq!(env.toolchain_log(), "npm install -D prisma\nnpx prisma generate\n");
}

#[test]
#[serial]
fn pack_json_lists_deleted_engines() {
  let env = TestEnv::from_fixture("individual.yml");
  env.build_dir("apple");

  env
    .slsprisma_cmd("pack")
    .arg("--format")
    .arg("json")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"deleted\""))
    .stdout(predicate::str::contains("migration-engine-darwin-arm64"));
}

#[test]
#[serial]
fn pack_links_schema_when_configured() {
  let env = TestEnv::from_fixture("bundle.yml");
  env.write_file("serverless.yml", "custom:\n  prisma:\n    useSymLink: true\n");
  let bundle = env.build_dir("service");

  env.slsprisma_cmd("pack").assert().success();

  let link = bundle.join("prisma");
  assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
  assert_eq!(std::fs::read_link(&link).unwrap(), std::path::PathBuf::from("../../prisma"));
}

#[test]
#[serial]
fn pack_twice_is_repeatable() {
  let env = TestEnv::from_fixture("individual.yml");
  env.build_dir("apple");

  env.slsprisma_cmd("pack").assert().success();
  env.slsprisma_cmd("pack").assert().success();

  assert_eq!(env.toolchain_log().lines().count(), 6);
}
