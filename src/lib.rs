//! Resolve a layered deployment configuration into the final, per-instance environment of a
//! deployment.
//!
//! A single YAML document declares defaults, environments and the instances of each
//! environment. Resolving it ([`config::load`]) validates the structure, merges the settings of
//! each instance with its environment and the global ones, and injects the variables and
//! secrets every deployment receives.

#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod vault;

pub use error::{Error, Result};
