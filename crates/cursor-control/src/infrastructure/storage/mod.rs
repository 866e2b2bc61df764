//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the demo's TOML settings from an explicit
//! path or the platform-appropriate directory, falls back to defaults when
//! no file exists yet, and writes the effective settings back on request.

pub mod config;
