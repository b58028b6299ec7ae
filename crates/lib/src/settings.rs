//! Build settings.
//!
//! Every path and external reference the orchestration touches lives here, so
//! callers pass them explicitly instead of reading ambient state.

use std::path::{Path, PathBuf};

use crate::consts::{BUILD_IMAGE, CONFIG_FILENAME, CONTAINER_RUNTIME, KERNEL_DIR, VERSION_FILENAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
  /// Project root; bind-mounted into the build container.
  pub root: PathBuf,
  /// Build configuration document.
  pub config_path: PathBuf,
  /// Version marker file.
  pub marker_path: PathBuf,
  /// Kernel source directory, the container's working directory.
  pub kernel_dir: PathBuf,
  /// Container runtime executable.
  pub runtime: String,
  /// Build image reference.
  pub image: String,
}

impl BuildSettings {
  /// Settings for a project rooted at `root`, using the release defaults.
  pub fn with_root(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let kernel_dir = root.join(KERNEL_DIR);
    Self {
      config_path: kernel_dir.join(CONFIG_FILENAME),
      marker_path: kernel_dir.join(VERSION_FILENAME),
      kernel_dir,
      root,
      runtime: CONTAINER_RUNTIME.to_string(),
      image: BUILD_IMAGE.to_string(),
    }
  }

  /// Path of `path` relative to the project root, if it lives under it.
  pub fn relative_to_root<'a>(&self, path: &'a Path) -> Option<&'a Path> {
    path.strip_prefix(&self.root).ok()
  }
}

impl Default for BuildSettings {
  /// Release defaults relative to the current directory.
  fn default() -> Self {
    Self::with_root(".")
  }
}
