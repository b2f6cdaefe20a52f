//! tsalias CLI - keeps `tsconfig.json` and `vite.config.ts` path aliases in
//! sync.
//!
//! This crate is the command-line front end of `tsalias-core`. It layers
//! configuration from `tsalias.toml`, `TSALIAS_*` environment variables and
//! flags, runs the setup and reports what changed.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions and validation
//! - [`commands`] - command implementations
//! - [`config`] - figment-layered configuration
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
