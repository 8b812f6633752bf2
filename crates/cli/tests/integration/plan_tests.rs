//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_selected_functions_and_steps() {
  let env = TestEnv::from_fixture("individual.yml");

  env
    .slsprisma_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("per-function (1 selected)"))
    .stdout(predicate::str::contains("apple ("))
    .stdout(predicate::str::contains("npm install -D prisma"))
    .stdout(predicate::str::contains("npx prisma generate"))
    .stdout(predicate::str::contains("npm remove prisma"))
    .stdout(predicate::str::contains("bag (").not())
    .stdout(predicate::str::contains("cat (").not());
}

#[test]
fn plan_runs_nothing() {
  let env = TestEnv::from_fixture("individual.yml");
  let apple = env.build_dir("apple");

  env.slsprisma_cmd("plan").assert().success();

  assert_eq!(env.toolchain_log(), "");
  assert!(!apple.join("prisma").exists());
}

#[test]
fn plan_does_not_require_build_dirs() {
  let env = TestEnv::from_fixture("bundle.yml");

  env
    .slsprisma_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("service bundle"));
}

#[test]
fn plan_json_output() {
  let env = TestEnv::from_fixture("individual.yml");

  env
    .slsprisma_cmd("plan")
    .arg("--format")
    .arg("json")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"mode\": \"functions\""))
    .stdout(predicate::str::contains("\"apple\""));
}

#[test]
fn plan_shows_symlink_command() {
  let env = TestEnv::from_fixture("bundle.yml");
  env.write_file("serverless.yml", "custom:\n  prisma:\n    useSymLink: true\n");

  env
    .slsprisma_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("ln -s ../../prisma prisma"));
}

#[test]
fn plan_with_explicit_config_path() {
  let env = TestEnv::from_fixture("bundle.yml");

  env
    .slsprisma_cmd("plan")
    .arg("--config")
    .arg(super::common::fixture_path("all_ignored.yml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("No functions to package"));
}

#[test]
fn unknown_packager_is_rejected_rather_than_treated_as_yarn() {
  let env = TestEnv::from_fixture("bad_packager.yml");

  env
    .slsprisma_cmd("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unsupported package manager 'pnpm'"));
}
