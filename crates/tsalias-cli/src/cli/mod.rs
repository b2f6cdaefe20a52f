//! Command-line interface definition for tsalias.
//!
//! # Command Structure
//!
//! - `tsalias init` - add path aliases to `tsconfig.json` and `vite.config.ts`

mod commands;
mod validation;

use clap::Parser;

pub use commands::{Command, InitArgs};
pub use validation::{parse_alias, parse_package_manager, AliasArg};

/// tsalias - TypeScript path aliases for Vite projects
#[derive(Parser, Debug)]
#[command(
    name = "tsalias",
    version,
    about = "Set up TypeScript path aliases for Vite projects",
    long_about = "tsalias keeps the path aliases of tsconfig.json and vite.config.ts in sync.\n\
                  It merges aliases into the compiler options, injects a matching resolve.alias\n\
                  block into the Vite config and installs @types/node when it is missing.\n\
                  Running it again on a configured project changes nothing."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or CI systems.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
