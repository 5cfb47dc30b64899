//! Configuration for the pixelsprite editor and CLI
//!
//! Provides types and parsing for `pxs.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
