//! Configuration management for the marginalia comment engine.
//!
//! Loads `marginalia.yaml` layered under `MARGINALIA_*` environment
//! variables and provides typed access to the settings.

pub mod config;

pub use config::{ConfigError, MarginaliaConfig, load_config, save_config};
