use clap::{Args, Subcommand};
use std::path::PathBuf;
use tsalias_core::PackageManager;

use super::validation::{parse_alias, parse_package_manager, AliasArg};

/// Available tsalias commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add path aliases to tsconfig.json and vite.config.ts
    ///
    /// Applies the built-in `@/*` -> `./src/*` alias plus any configured or
    /// `--alias` entries. Files that already carry the aliases are left
    /// byte-for-byte untouched.
    Init(InitArgs),
}

/// Arguments for the init command
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Project root containing package.json
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Extra alias, repeatable
    ///
    /// Example: `--alias '~components/*=./src/components/*'`. Several paths
    /// can be given separated by commas. An entry for `@/*` replaces the
    /// built-in one.
    #[arg(
        short,
        long = "alias",
        value_name = "PATTERN=PATH[,PATH...]",
        value_parser = parse_alias
    )]
    pub aliases: Vec<AliasArg>,

    /// Directory used as `baseUrl` and as the Vite `root` alias target
    #[arg(long, value_name = "DIR")]
    pub base_url: Option<String>,

    /// Never run the package manager
    #[arg(long)]
    pub no_install: bool,

    /// Package manager to use instead of lock-file detection
    #[arg(long, value_name = "MANAGER", value_parser = parse_package_manager)]
    pub package_manager: Option<PackageManager>,

    /// Path to tsalias.toml
    ///
    /// If not provided, tsalias.toml in the project root is used when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
