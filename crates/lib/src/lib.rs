//! occ-build-lib: rebuild logic for the OpenCascade.js kernel
//!
//! This crate provides the pieces of an incremental kernel build:
//! - `rebuild`: content-hash comparison against the version marker
//! - `config`: the YAML build configuration and its symbol bindings
//! - `container`: the containerized build itself
//! - `run`: the orchestration tying them together

pub mod config;
pub mod consts;
pub mod container;
pub mod rebuild;
pub mod run;
pub mod settings;
pub mod util;
