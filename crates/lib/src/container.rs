//! Containerized kernel build.
//!
//! The kernel is compiled inside a pinned build image. The project root is
//! bind-mounted at `/src`, the container runs as the invoking user so build
//! outputs stay owned by them, and the configuration file is passed as the
//! build target.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::CONTAINER_MOUNT;
use crate::settings::BuildSettings;

/// Errors that can occur while running the container build.
#[derive(Debug, Error)]
pub enum ContainerError {
  /// The runtime could not be started.
  #[error("failed to run `{cmd}`: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  /// A step exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CommandFailed { cmd: String, code: Option<i32> },

  /// The project root could not be resolved for mounting.
  #[error("failed to resolve project root {}: {source}", .path.display())]
  Root {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A path handed to the container is not inside the mounted root.
  #[error("{} is outside the project root", .path.display())]
  OutsideRoot { path: PathBuf },
}

/// Runs the kernel build.
pub trait BuildRunner {
  fn build(&self, settings: &BuildSettings) -> Result<(), ContainerError>;
}

/// Builds the kernel by pulling and running the build image.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerBuild;

impl BuildRunner for ContainerBuild {
  fn build(&self, settings: &BuildSettings) -> Result<(), ContainerError> {
    run_step(&settings.runtime, &pull_args(settings), &settings.root)?;
    run_step(&settings.runtime, &run_args(settings)?, &settings.root)
  }
}

/// Arguments for fetching the build image.
pub fn pull_args(settings: &BuildSettings) -> Vec<String> {
  vec!["pull".to_string(), settings.image.clone()]
}

/// Arguments for running the build image against the configuration.
pub fn run_args(settings: &BuildSettings) -> Result<Vec<String>, ContainerError> {
  let root = dunce::canonicalize(&settings.root).map_err(|source| ContainerError::Root {
    path: settings.root.clone(),
    source,
  })?;
  let workdir = container_path(settings, &settings.kernel_dir)?;
  let target = container_path(settings, &settings.config_path)?;

  let mut args = vec![
    "run".to_string(),
    "--rm".to_string(),
    "-v".to_string(),
    format!("{}:{}", root.display(), CONTAINER_MOUNT),
  ];
  if let Some(user) = user_arg() {
    args.push("-u".to_string());
    args.push(user);
  }
  args.extend(["--workdir".to_string(), workdir, settings.image.clone(), target]);
  Ok(args)
}

/// Where `path` appears inside the container.
fn container_path(settings: &BuildSettings, path: &Path) -> Result<String, ContainerError> {
  let outside = || ContainerError::OutsideRoot {
    path: path.to_path_buf(),
  };

  let relative = settings.relative_to_root(path).ok_or_else(outside)?;
  let mut mounted = CONTAINER_MOUNT.to_string();
  for component in relative.components() {
    match component {
      Component::Normal(part) => {
        mounted.push('/');
        mounted.push_str(&part.to_string_lossy());
      }
      Component::CurDir => {}
      _ => return Err(outside()),
    }
  }
  Ok(mounted)
}

/// `uid:gid` of the current process.
#[cfg(unix)]
fn user_arg() -> Option<String> {
  let uid = rustix::process::getuid().as_raw();
  let gid = rustix::process::getgid().as_raw();
  Some(format!("{}:{}", uid, gid))
}

#[cfg(not(unix))]
fn user_arg() -> Option<String> {
  None
}

fn run_step(runtime: &str, args: &[String], cwd: &Path) -> Result<(), ContainerError> {
  let cmd = format!("{} {}", runtime, args.join(" "));
  info!(cmd = %cmd, "running container step");

  let status = Command::new(runtime)
    .args(args)
    .current_dir(cwd)
    .status()
    .map_err(|source| ContainerError::Spawn {
      cmd: cmd.clone(),
      source,
    })?;

  if !status.success() {
    return Err(ContainerError::CommandFailed {
      cmd,
      code: status.code(),
    });
  }

  debug!(cmd = %cmd, "container step finished");
  Ok(())
}
