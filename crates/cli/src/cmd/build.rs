//! Implementation of the default `occ-build` command.
//!
//! Checks the kernel build configuration in the current directory against the
//! version marker and rebuilds the kernel when it is stale.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use occ_build_lib::container::ContainerBuild;
use occ_build_lib::run::{RunOutcome, run};
use occ_build_lib::settings::BuildSettings;

use crate::output::{format_duration, print_info, print_stat, print_success, truncate_hash};

/// Execute the build command.
///
/// `new_symbols` are merged into the configuration first; a non-empty list
/// always triggers a rebuild.
pub fn cmd_build(new_symbols: &[String]) -> Result<()> {
  let start = Instant::now();

  let root = std::env::current_dir().context("Failed to determine current directory")?;
  let settings = BuildSettings::with_root(root);
  debug!(root = %settings.root.display(), image = %settings.image, "checking kernel build");

  let outcome = run(&settings, new_symbols, &ContainerBuild)
    .with_context(|| format!("Failed to build kernel from {}", settings.config_path.display()))?;

  match outcome {
    RunOutcome::UpToDate { hash } => {
      print_info("Kernel is up to date");
      print_stat("Config hash", truncate_hash(hash.as_str()));
    }
    RunOutcome::Rebuilt { hash, reason, added } => {
      println!();
      print_success("Kernel rebuilt");
      print_stat("Reason", &reason.to_string());
      if !added.is_empty() {
        print_stat("Added", &added.join(", "));
      }
      print_stat("Config hash", truncate_hash(hash.as_str()));
      print_stat("Duration", &format_duration(start.elapsed()));
    }
  }

  Ok(())
}
