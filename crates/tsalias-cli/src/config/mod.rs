//! Configuration for the tsalias CLI.
//!
//! Sources, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. `tsalias.toml` in the project root, or the file given with `--config`
//! 3. `TSALIAS_*` environment variables (`TSALIAS_BASE_URL=app`)
//! 4. Command-line flags
//!
//! ```toml
//! base_url = "src"
//! package_manager = "pnpm"
//!
//! [aliases]
//! "~components/*" = ["./src/components/*"]
//! ```

mod loading;

use serde::{Deserialize, Serialize};
use tsalias_core::install::TYPES_PACKAGE;
use tsalias_core::tsconfig::{DEFAULT_BASE_URL, TSCONFIG_FILE};
use tsalias_core::vite::VITE_CONFIG_FILE;
use tsalias_core::{AliasMap, PackageManager, SetupOptions};

/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "tsalias.toml";

/// Prefix of the environment variables layered over the config file.
pub const ENV_PREFIX: &str = "TSALIAS_";

/// Fully resolved tsalias configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsaliasConfig {
    /// Aliases applied on top of the built-in `@/*` entry
    pub aliases: AliasMap,

    /// `baseUrl` and Vite `root` directory
    pub base_url: String,

    /// Compiler-options file name, relative to the project root
    pub tsconfig: String,

    /// Build config file name, relative to the project root
    pub vite_config: String,

    /// Install the type declarations package when it is missing
    pub install: bool,

    pub types_package: String,

    /// Overrides lock-file detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
}

impl Default for TsaliasConfig {
    fn default() -> Self {
        Self {
            aliases: AliasMap::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            tsconfig: TSCONFIG_FILE.to_string(),
            vite_config: VITE_CONFIG_FILE.to_string(),
            install: true,
            types_package: TYPES_PACKAGE.to_string(),
            package_manager: None,
        }
    }
}

impl TsaliasConfig {
    /// Options for the core setup run.
    pub fn setup_options(&self) -> SetupOptions {
        SetupOptions {
            base_url: self.base_url.clone(),
            tsconfig_file: self.tsconfig.clone(),
            vite_config_file: self.vite_config.clone(),
            install: self.install,
            types_package: self.types_package.clone(),
            package_manager: self.package_manager,
        }
    }
}
