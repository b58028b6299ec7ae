//! Rebuild orchestration.
//!
//! Decides whether the kernel is stale, merges requested symbols into the
//! build configuration, runs the build and records the configuration hash:
//!
//! 1. hash the configuration and compare it with the version marker
//! 2. stop if nothing changed and no symbols were requested
//! 3. merge symbols (possibly none, which still normalizes the file)
//! 4. build
//! 5. store the hash of the configuration the build consumed
//!
//! A failed build leaves the marker untouched, so the next run retries.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, merge_symbols};
use crate::container::{BuildRunner, ContainerError};
use crate::rebuild::{RebuildError, VersionMarker, decide};
use crate::settings::BuildSettings;
use crate::util::hash::{ContentHash, hash_file};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
  #[error("rebuild check failed: {0}")]
  Rebuild(#[from] RebuildError),

  #[error("build configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("kernel build failed: {0}")]
  Build(#[from] ContainerError),
}

/// Why a rebuild was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
  /// New symbols were requested.
  SymbolsAdded,
  /// No previous build was recorded.
  MissingMarker,
  /// The configuration changed since the last build.
  ConfigChanged,
}

impl fmt::Display for RebuildReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RebuildReason::SymbolsAdded => write!(f, "symbols added"),
      RebuildReason::MissingMarker => write!(f, "no previous build"),
      RebuildReason::ConfigChanged => write!(f, "configuration changed"),
    }
  }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
  /// Nothing to do; no file was written and no build ran.
  UpToDate { hash: ContentHash },
  /// The kernel was rebuilt and the marker updated to `hash`.
  Rebuilt {
    hash: ContentHash,
    reason: RebuildReason,
    /// Requested symbols that were not already bound.
    added: Vec<String>,
  },
}

/// Bring the kernel up to date with its configuration.
pub fn run(
  settings: &BuildSettings,
  new_symbols: &[String],
  runner: &dyn BuildRunner,
) -> Result<RunOutcome, RunError> {
  let decision = decide(&settings.config_path, &settings.marker_path)?;

  let reason = if !new_symbols.is_empty() {
    RebuildReason::SymbolsAdded
  } else if !decision.marker_present {
    RebuildReason::MissingMarker
  } else if decision.needs_rebuild {
    RebuildReason::ConfigChanged
  } else {
    info!(hash = %decision.hash, "kernel is up to date");
    return Ok(RunOutcome::UpToDate { hash: decision.hash });
  };

  info!(%reason, "rebuilding kernel");

  let added = merge_symbols(&settings.config_path, new_symbols)?;
  let hash = hash_file(&settings.config_path).map_err(RebuildError::from)?;
  if hash != decision.hash {
    debug!(before = %decision.hash, after = %hash, "build configuration rewritten");
  }

  runner.build(settings)?;

  VersionMarker::new(&settings.marker_path).store(&hash)?;
  info!(hash = %hash, "kernel build recorded");

  Ok(RunOutcome::Rebuilt { hash, reason, added })
}
