//! Command implementations for the tsalias CLI.
//!
//! - [`init`] - apply path aliases to a project
//!
//! Each command module provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod init;

pub use init::execute as init_execute;
