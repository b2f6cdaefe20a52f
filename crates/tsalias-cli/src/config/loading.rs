use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use tracing::debug;
use tsalias_core::PackageManager;

use crate::cli::InitArgs;
use crate::config::{TsaliasConfig, CONFIG_FILE, ENV_PREFIX};
use crate::error::{ConfigError, Result};

/// Flags that were actually given. Absent fields leave lower layers alone.
#[derive(Debug, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    install: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_manager: Option<PackageManager>,
}

impl From<&InitArgs> for CliOverrides {
    fn from(args: &InitArgs) -> Self {
        Self {
            base_url: args.base_url.clone(),
            install: args.no_install.then_some(false),
            package_manager: args.package_manager,
        }
    }
}

impl TsaliasConfig {
    /// Load configuration for the project at `root`.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// `--alias` entries are appended after extraction, in flag order, so they
    /// override file aliases with the same pattern.
    pub fn load(root: &Path, args: &InitArgs) -> Result<Self> {
        let config_file = Self::config_file(root, args.config.as_deref())?;

        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = &config_file {
            debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(args)));

        let mut config: Self = figment.extract().map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
            hint: match &config_file {
                Some(path) => format!(
                    "Check {} and {}* variables for syntax and field types",
                    path.display(),
                    ENV_PREFIX
                ),
                None => format!("Check {}* variables for field types", ENV_PREFIX),
            },
        })?;

        for alias in &args.aliases {
            config.aliases.insert(alias.pattern.clone(), alias.paths.clone());
        }

        Ok(config)
    }

    /// `--config` must exist; the root `tsalias.toml` is optional.
    fn config_file(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(ConfigError::NotFound(path.to_path_buf()).into()),
            None => {
                let default_path = root.join(CONFIG_FILE);
                Ok(default_path.is_file().then_some(default_path))
            }
        }
    }
}
