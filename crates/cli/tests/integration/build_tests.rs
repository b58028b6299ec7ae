use predicates::prelude::*;

use super::common::{CONFIG, IMAGE, TestEnv};

#[test]
fn up_to_date_config_does_nothing() {
  let env = TestEnv::new(CONFIG);
  env.mark_built();
  let marker = std::fs::read(env.marker_path()).unwrap();

  env
    .occ_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Kernel is up to date"));

  assert_eq!(env.config(), CONFIG);
  assert_eq!(std::fs::read(env.marker_path()).unwrap(), marker);
  assert!(env.docker_calls().is_empty());
}

#[test]
fn add_without_symbols_is_a_no_op_when_up_to_date() {
  let env = TestEnv::new(CONFIG);
  env.mark_built();

  env
    .occ_cmd()
    .arg("--add")
    .assert()
    .success()
    .stdout(predicate::str::contains("Kernel is up to date"));

  assert_eq!(env.config(), CONFIG);
  assert!(env.docker_calls().is_empty());
}

#[test]
fn malformed_config_fails() {
  let env = TestEnv::new("mainBuild: [unclosed\n");

  env
    .occ_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse"));

  assert!(env.docker_calls().is_empty());
}

#[cfg(unix)]
#[test]
fn first_run_builds_in_container() {
  let env = TestEnv::new(CONFIG);

  env
    .occ_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Kernel rebuilt"))
    .stdout(predicate::str::contains("no previous build"));

  let calls = env.docker_calls();
  assert_eq!(calls.len(), 2);
  assert_eq!(calls[0], format!("pull {}", IMAGE));
  assert!(calls[1].starts_with(&format!("run --rm -v {}:/src -u ", env.root().display())));
  assert!(calls[1].ends_with(&format!("--workdir /src/build {} /src/build/opencascade.yaml", IMAGE)));

  assert_eq!(std::fs::read_to_string(env.marker_path()).unwrap(), env.config_hash());
}

#[cfg(unix)]
#[test]
fn second_run_skips_build() {
  let env = TestEnv::new(CONFIG);
  env.occ_cmd().assert().success();
  let config = env.config();

  env
    .occ_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Kernel is up to date"));

  assert_eq!(env.docker_calls().len(), 2);
  assert_eq!(env.config(), config);
}

#[cfg(unix)]
#[test]
fn add_merges_sorted_symbols_and_rebuilds() {
  let env = TestEnv::new(CONFIG);
  env.mark_built();

  env
    .occ_cmd()
    .args(["--add", "gp_Vec", "BRepPrimAPI_MakeBox", "gp_Vec"])
    .assert()
    .success()
    .stdout(predicate::str::contains("symbols added"))
    .stdout(predicate::str::contains("Added: gp_Vec"));

  assert_eq!(
    env.config(),
    "mainBuild:\n  name: \"opencascade.js\"\n  bindings:\n    - symbol: \"BRepPrimAPI_MakeBox\"\n    - symbol: \"gp_Pnt\"\n    - symbol: \"gp_Vec\"\n  emccFlags:\n    - \"-O3\"\n"
  );
  assert_eq!(env.docker_calls().len(), 2);
  assert_eq!(std::fs::read_to_string(env.marker_path()).unwrap(), env.config_hash());
}

#[cfg(unix)]
#[test]
fn failed_build_keeps_marker_unwritten() {
  let env = TestEnv::new(CONFIG);

  env
    .occ_cmd()
    .env("FAKE_DOCKER_EXIT", "2")
    .assert()
    .failure()
    .stderr(predicate::str::contains("command failed"));

  assert!(!env.marker_path().exists());
  assert_eq!(env.docker_calls().len(), 1);
}
