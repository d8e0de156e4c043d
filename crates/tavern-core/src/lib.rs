//! # tavern-core
//!
//! Configuration, paths, and shared errors for the tavern NPC demo.
//!
//! - **Configuration**: a [`TavernConfig`] built once at startup from defaults,
//!   an optional json5 file, and environment overrides, then handed to every
//!   client constructor
//! - **Utilities**: path resolution and environment helpers

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

pub use config::{ConfigBuilder, DimensionPolicy, NpcConfig, OllamaConfig, RagConfig, TavernConfig};
pub use error::ConfigError;
