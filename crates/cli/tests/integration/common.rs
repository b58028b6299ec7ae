//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use occ_build_lib::util::hash::hash_file;
use tempfile::TempDir;

pub const IMAGE: &str = "donalffons/opencascade.js:2.0.0-beta.b5ff984";

/// Hand-written build configuration, before the tool normalizes it.
pub const CONFIG: &str = r#"mainBuild:
  name: opencascade.js
  bindings:
    - symbol: gp_Pnt
    - symbol: BRepPrimAPI_MakeBox
  emccFlags:
    - -O3
"#;

/// Isolated project directory.
///
/// Holds `build/opencascade.yaml` and, on unix, a fake `docker` on `PATH`
/// that records its arguments instead of building anything.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new(config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("build")).unwrap();
    std::fs::write(temp.path().join("build").join("opencascade.yaml"), config).unwrap();
    let env = Self { temp };
    #[cfg(unix)]
    env.install_fake_docker();
    env
  }

  /// Project root as the bind mount sees it.
  pub fn root(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn config_path(&self) -> PathBuf {
    self.temp.path().join("build").join("opencascade.yaml")
  }

  pub fn marker_path(&self) -> PathBuf {
    self.temp.path().join("build").join("version")
  }

  pub fn config(&self) -> String {
    std::fs::read_to_string(self.config_path()).unwrap()
  }

  pub fn config_hash(&self) -> String {
    hash_file(&self.config_path()).unwrap().0
  }

  /// Record the current configuration as already built.
  pub fn mark_built(&self) {
    std::fs::write(self.marker_path(), self.config_hash()).unwrap();
  }

  fn bin_dir(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  fn docker_log(&self) -> PathBuf {
    self.temp.path().join("docker.log")
  }

  /// Invocations of the fake docker, one argument string per call.
  pub fn docker_calls(&self) -> Vec<String> {
    match std::fs::read_to_string(self.docker_log()) {
      Ok(content) => content.lines().map(str::to_string).collect(),
      Err(_) => Vec::new(),
    }
  }

  #[cfg(unix)]
  fn install_fake_docker(&self) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(self.bin_dir()).unwrap();
    let docker = self.bin_dir().join("docker");
    let script = "#!/bin/sh\necho \"$@\" >> \"$FAKE_DOCKER_LOG\"\nexit \"${FAKE_DOCKER_EXIT:-0}\"\n";
    std::fs::write(&docker, script).unwrap();
    std::fs::set_permissions(&docker, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Get a pre-configured Command for the occ-build binary.
  ///
  /// Runs in the project directory with the fake docker first on `PATH`:
  /// - `FAKE_DOCKER_LOG`: where the fake records its arguments
  /// - `FAKE_DOCKER_EXIT`: exit code of the fake (defaults to 0)
  pub fn occ_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("occ-build");
    let path = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![self.bin_dir()];
    paths.extend(std::env::split_paths(&path));
    cmd.current_dir(self.temp.path());
    cmd.env("PATH", std::env::join_paths(paths).unwrap());
    cmd.env("FAKE_DOCKER_LOG", self.docker_log());
    cmd.env_remove("FAKE_DOCKER_EXIT");
    cmd
  }
}
