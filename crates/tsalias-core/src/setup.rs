//! Orchestration of the alias setup pipelines.
//!
//! # Process
//!
//! 1. Load `package.json` (fatal when missing or malformed)
//! 2. Install the companion type declarations if needed
//! 3. Merge the aliases into `tsconfig.json`
//! 4. Patch `vite.config.ts`
//!
//! Steps run in order and the first error aborts the rest. A patcher skip is
//! reported in the [`SetupReport`], not as an error.

use std::path::Path;

use tracing::info;

use crate::alias::AliasMap;
use crate::error::Result;
use crate::install::{DependencyInstaller, InstallOutcome, PackageManager, TYPES_PACKAGE};
use crate::manifest::PackageManifest;
use crate::runtime::{CommandRunner, Runtime};
use crate::tsconfig::{MergeOutcome, TsConfigMerger, DEFAULT_BASE_URL, TSCONFIG_FILE};
use crate::vite::{PatchOutcome, ViteConfigPatcher, VITE_CONFIG_FILE};

/// Knobs for a setup run.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// `baseUrl` for tsconfig and the `root` directory in the build config
    pub base_url: String,
    pub tsconfig_file: String,
    pub vite_config_file: String,
    /// Run the package manager when the companion package is missing
    pub install: bool,
    pub types_package: String,
    /// Skip lock-file detection
    pub package_manager: Option<PackageManager>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tsconfig_file: TSCONFIG_FILE.to_string(),
            vite_config_file: VITE_CONFIG_FILE.to_string(),
            install: true,
            types_package: TYPES_PACKAGE.to_string(),
            package_manager: None,
        }
    }
}

/// Outcome of every step of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub aliases: AliasMap,
    pub install: InstallOutcome,
    pub tsconfig: MergeOutcome,
    pub vite: PatchOutcome,
}

impl SetupReport {
    /// True when the build config was left alone because of its shape.
    pub fn needs_manual_update(&self) -> bool {
        matches!(self.vite, PatchOutcome::Skipped { .. })
    }
}

/// Runs the setup against injected capabilities.
#[derive(Debug)]
pub struct AliasSetup<'a> {
    runtime: &'a dyn Runtime,
    runner: &'a dyn CommandRunner,
    options: SetupOptions,
}

impl<'a> AliasSetup<'a> {
    pub fn new(runtime: &'a dyn Runtime, runner: &'a dyn CommandRunner, options: SetupOptions) -> Self {
        Self {
            runtime,
            runner,
            options,
        }
    }

    /// Apply `aliases` (on top of the built-in `@/*` entry) to the project at
    /// `root`.
    pub fn run(&self, root: &Path, aliases: &AliasMap) -> Result<SetupReport> {
        let aliases = AliasMap::with_builtin(aliases);
        aliases.validate()?;

        let manifest = PackageManifest::load(self.runtime, root)?;
        info!(
            "Setting up path aliases for {} in {}",
            manifest.display_name(root),
            root.display()
        );

        let install = if self.options.install {
            DependencyInstaller::new()
                .with_package(self.options.types_package.clone())
                .with_manager(self.options.package_manager)
                .ensure(self.runtime, self.runner, root, &manifest)?
        } else {
            info!("Dependency installation disabled");
            InstallOutcome::Disabled
        };

        let tsconfig = TsConfigMerger::new()
            .with_file_name(self.options.tsconfig_file.clone())
            .with_base_url(self.options.base_url.clone())
            .apply(self.runtime, root, &aliases)?;

        let vite = ViteConfigPatcher::new()
            .with_file_name(self.options.vite_config_file.clone())
            .with_base_dir(self.options.base_url.clone())
            .apply(self.runtime, root, &aliases)?;

        Ok(SetupReport {
            aliases,
            install,
            tsconfig,
            vite,
        })
    }
}

/// Convenience wrapper running against the real filesystem and processes.
pub fn add_aliases(root: &Path, aliases: &AliasMap, options: SetupOptions) -> Result<SetupReport> {
    use crate::runtime::{NativeCommandRunner, NativeRuntime};

    AliasSetup::new(&NativeRuntime, &NativeCommandRunner, options).run(root, aliases)
}
