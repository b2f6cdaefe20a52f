//! tsalias CLI - path alias setup for TypeScript + Vite projects.
//!
//! Parses arguments, initializes logging and colors, then dispatches the
//! requested command.

use clap::Parser;
use miette::Result;
use tsalias_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Init(init_args) => commands::init_execute(init_args),
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
