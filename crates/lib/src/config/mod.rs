//! Kernel build configuration.
//!
//! The configuration is a YAML document whose `mainBuild.bindings` list names
//! the symbols exported from the compiled kernel:
//!
//! ```yaml
//! mainBuild:
//!   name: "opencascade.js"
//!   bindings:
//!     - symbol: "BRepPrimAPI_MakeBox"
//!     - symbol: "gp_Pnt"
//! ```
//!
//! Only the bindings are interpreted. Every other key is carried through a
//! rewrite untouched, in its original order.

pub mod collate;
pub mod emit;

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, info};

/// A single exported symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
  pub symbol: String,
}

impl Binding {
  pub fn new(symbol: impl Into<String>) -> Self {
    Self { symbol: symbol.into() }
  }
}

/// Errors that can occur while loading or rewriting the build configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The file is not valid YAML.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// The document lacks a well-formed `mainBuild.bindings` list.
  #[error("invalid build configuration {}: {source}", .path.display())]
  Schema {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  /// Failed to serialize the bindings back into the document.
  #[error("failed to serialize bindings: {0}")]
  Serialize(#[source] serde_yaml::Error),

  /// Failed to write the configuration file.
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Schema {
  main_build: MainBuildSchema,
}

#[derive(Deserialize)]
struct MainBuildSchema {
  bindings: Vec<Binding>,
}

/// A loaded build configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  path: PathBuf,
  document: Value,
  bindings: Vec<Binding>,
}

impl BuildConfig {
  /// Load and validate the configuration at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(path, &content)
  }

  fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
    let document: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    let schema: Schema = serde_yaml::from_str(content).map_err(|source| ConfigError::Schema {
      path: path.to_path_buf(),
      source,
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      document,
      bindings: schema.main_build.bindings,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn bindings(&self) -> &[Binding] {
    &self.bindings
  }

  /// Append `new_symbols`, then deduplicate and sort the bindings.
  ///
  /// Returns the symbols that were not already present.
  pub fn add_symbols(&mut self, new_symbols: &[String]) -> Vec<String> {
    let known: HashSet<&str> = self.bindings.iter().map(|b| b.symbol.as_str()).collect();
    let mut seen = HashSet::new();
    let added: Vec<String> = new_symbols
      .iter()
      .filter(|s| !known.contains(s.as_str()) && seen.insert(s.as_str()))
      .cloned()
      .collect();

    let new: Vec<Binding> = new_symbols.iter().map(Binding::new).collect();
    self.bindings = merge_bindings(std::mem::take(&mut self.bindings), new);
    added
  }

  /// Render the document with the current bindings.
  pub fn render(&self) -> Result<String, ConfigError> {
    let mut document = self.document.clone();
    let bindings = serde_yaml::to_value(&self.bindings).map_err(ConfigError::Serialize)?;
    if let Some(Value::Mapping(main_build)) = document.get_mut("mainBuild") {
      main_build.insert(Value::String("bindings".to_string()), bindings);
    }
    Ok(emit::to_string(&document))
  }

  /// Overwrite the file this configuration was loaded from.
  ///
  /// Writes to a sibling temp file and renames it into place.
  pub fn save(&self) -> Result<(), ConfigError> {
    let content = self.render()?;
    let write_err = |source| ConfigError::Write {
      path: self.path.clone(),
      source,
    };

    let mut temp_name = self.path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, &content).map_err(write_err)?;
    fs::rename(&temp_path, &self.path).map_err(write_err)?;

    debug!(path = %self.path.display(), bindings = self.bindings.len(), "build configuration written");
    Ok(())
  }
}

/// Merge `new` into `existing`.
///
/// Keeps the first binding for each symbol (existing entries come first, so
/// they win over new duplicates) and sorts the result in collation order.
pub fn merge_bindings(existing: Vec<Binding>, new: Vec<Binding>) -> Vec<Binding> {
  let mut seen = HashSet::new();
  let mut merged: Vec<Binding> = existing
    .into_iter()
    .chain(new)
    .filter(|b| seen.insert(b.symbol.clone()))
    .collect();
  merged.sort_by(|a, b| collate::compare(&a.symbol, &b.symbol));
  merged
}

/// Merge `new_symbols` into the configuration at `config_path` and rewrite it.
///
/// The file is rewritten even when nothing is added, which normalizes
/// ordering and quoting.
pub fn merge_symbols(config_path: &Path, new_symbols: &[String]) -> Result<Vec<String>, ConfigError> {
  let mut config = BuildConfig::load(config_path)?;
  let added = config.add_symbols(new_symbols);
  if !added.is_empty() {
    info!(symbols = ?added, "adding bindings");
  }
  config.save()?;
  Ok(added)
}
