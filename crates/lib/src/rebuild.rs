//! Rebuild decision and version marker.
//!
//! The version marker is a plain text file holding the content hash of the
//! build configuration as of the last successful build. A rebuild is needed
//! whenever the marker is missing or disagrees with the configuration on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::util::hash::{ContentHash, HashError, hash_file};

/// Errors that can occur while deciding whether to rebuild.
#[derive(Debug, Error)]
pub enum RebuildError {
  /// The build configuration could not be hashed.
  #[error("failed to hash build configuration: {0}")]
  Hash(#[from] HashError),

  /// The marker exists but could not be read.
  #[error("failed to read version marker {}: {source}", .path.display())]
  ReadMarker {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The marker could not be written.
  #[error("failed to write version marker {}: {source}", .path.display())]
  WriteMarker {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Outcome of comparing the configuration against the version marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildDecision {
  /// Whether the configuration differs from the last successful build.
  pub needs_rebuild: bool,
  /// Hash of the configuration as it is now.
  pub hash: ContentHash,
  /// Whether a marker was found at all.
  pub marker_present: bool,
}

/// The persisted hash of the last successfully built configuration.
#[derive(Debug, Clone)]
pub struct VersionMarker {
  path: PathBuf,
}

impl VersionMarker {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the stored hash.
  ///
  /// Returns `Ok(None)` if no marker has been written yet.
  pub fn load(&self) -> Result<Option<String>, RebuildError> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(content.trim().to_string())),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(source) => Err(RebuildError::ReadMarker {
        path: self.path.clone(),
        source,
      }),
    }
  }

  /// Persist `hash` as the new marker.
  ///
  /// Writes to a sibling temp file and renames it over the marker.
  pub fn store(&self, hash: &ContentHash) -> Result<(), RebuildError> {
    let write_err = |source| RebuildError::WriteMarker {
      path: self.path.clone(),
      source,
    };

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut temp_name = self.path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, hash.as_str()).map_err(write_err)?;
    fs::rename(&temp_path, &self.path).map_err(write_err)?;

    debug!(path = %self.path.display(), hash = %hash, "version marker written");
    Ok(())
  }
}

/// Decide whether the configuration at `config_path` needs a rebuild.
///
/// Pure read and compare; nothing is written.
pub fn decide(config_path: &Path, marker_path: &Path) -> Result<RebuildDecision, RebuildError> {
  let hash = hash_file(config_path)?;
  let stored = VersionMarker::new(marker_path).load()?;

  let needs_rebuild = stored.as_deref() != Some(hash.as_str());
  debug!(
    config = %config_path.display(),
    hash = %hash,
    stored = ?stored,
    needs_rebuild,
    "rebuild decision"
  );

  Ok(RebuildDecision {
    needs_rebuild,
    hash,
    marker_present: stored.is_some(),
  })
}
