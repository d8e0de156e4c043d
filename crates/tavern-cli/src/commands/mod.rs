//! CLI command implementations.

pub mod build;
pub mod chat;
pub mod config;
pub mod query;
