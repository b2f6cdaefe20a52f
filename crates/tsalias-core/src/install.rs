//! Companion dependency installation.
//!
//! The alias configuration written by the patcher uses `path` and
//! `__dirname`, so the project needs Node type declarations. When
//! `package.json` does not declare them, the detected package manager is
//! asked to install them as a dev dependency.
//!
//! Only the type-declaration package is installed. The tool never adds itself
//! to the target project.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, SetupError};
use crate::manifest::PackageManifest;
use crate::runtime::{CommandRunner, CommandSpec, Runtime};

/// Default companion package.
pub const TYPES_PACKAGE: &str = "@types/node";

/// Output fragments that mean the dependency is already in place.
const ALREADY_SATISFIED_MARKERS: &[&str] = &["up to date", "already installed", "already satisfied"];

/// Package manager used for the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Detect package manager from lock files.
    ///
    /// Detection order (highest priority first):
    /// 1. `pnpm-lock.yaml` → pnpm
    /// 2. `yarn.lock` → yarn
    /// 3. `bun.lockb` / `bun.lock` → bun
    /// 4. Default to npm (also covers package-lock.json)
    pub fn detect(runtime: &dyn Runtime, project_dir: &Path) -> Self {
        if runtime.exists(&project_dir.join("pnpm-lock.yaml")) {
            PackageManager::Pnpm
        } else if runtime.exists(&project_dir.join("yarn.lock")) {
            PackageManager::Yarn
        } else if runtime.exists(&project_dir.join("bun.lockb"))
            || runtime.exists(&project_dir.join("bun.lock"))
        {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    /// Get the command name for this package manager.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Arguments that add a dev dependency.
    pub fn add_dev_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm => &["install", "--save-dev"],
            PackageManager::Yarn => &["add", "--dev"],
            PackageManager::Pnpm => &["add", "--save-dev"],
            PackageManager::Bun => &["add", "--dev"],
        }
    }

    /// Full command adding `package` as a dev dependency of `project_dir`.
    pub fn add_dev_command(&self, package: &str, project_dir: &Path) -> CommandSpec {
        self.add_dev_args()
            .iter()
            .fold(CommandSpec::new(self.command(), project_dir), |spec, arg| spec.arg(*arg))
            .arg(package)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!(
                "unknown package manager '{}' (expected npm, yarn, pnpm or bun)",
                other
            )),
        }
    }
}

/// What happened to the companion dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// `package.json` already declares it.
    Present,
    Installed { manager: PackageManager },
    /// The install command failed, but the dependency turned out to be in
    /// place.
    AlreadySatisfied { manager: PackageManager },
    /// Installation turned off by configuration.
    Disabled,
}

#[derive(Debug, Clone)]
pub struct DependencyInstaller {
    package: String,
    manager: Option<PackageManager>,
}

impl Default for DependencyInstaller {
    fn default() -> Self {
        Self {
            package: TYPES_PACKAGE.to_string(),
            manager: None,
        }
    }
}

impl DependencyInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Use this manager instead of lock-file detection.
    pub fn with_manager(mut self, manager: Option<PackageManager>) -> Self {
        self.manager = manager;
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Install the companion package unless `manifest` already declares it.
    ///
    /// # Errors
    ///
    /// `SubprocessFailure` when the package manager cannot be spawned or exits
    /// unsuccessfully, unless the failure is recognized as benign: the output
    /// says the dependency is already satisfied, or a re-read of
    /// `package.json` shows it declared.
    pub fn ensure(
        &self,
        runtime: &dyn Runtime,
        runner: &dyn CommandRunner,
        root: &Path,
        manifest: &PackageManifest,
    ) -> Result<InstallOutcome> {
        if manifest.has_dependency(&self.package) {
            info!("{} is already declared in package.json", self.package);
            return Ok(InstallOutcome::Present);
        }

        let manager = self
            .manager
            .unwrap_or_else(|| PackageManager::detect(runtime, root));
        let command = manager.add_dev_command(&self.package, root);
        info!("Installing {} as a dev dependency ({})", self.package, command);

        let failure = match runner.run(&command) {
            Ok(output) if output.success() => {
                debug!("{}", output.combined());
                info!("{} installed", self.package);
                return Ok(InstallOutcome::Installed { manager });
            }
            Ok(output) => {
                let text = output.combined();
                if is_already_satisfied(&text) {
                    warn!(
                        "`{}` reported {}, but {} is already satisfied; continuing",
                        command,
                        output.status_text(),
                        self.package
                    );
                    return Ok(InstallOutcome::AlreadySatisfied { manager });
                }
                SetupError::SubprocessFailure {
                    command: command.to_string(),
                    status: output.status_text(),
                    output: text,
                }
            }
            Err(e) => SetupError::SubprocessFailure {
                command: command.to_string(),
                status: format!("failed to start: {}", e),
                output: String::new(),
            },
        };

        // A failing manager may still have recorded the dependency.
        match PackageManifest::load(runtime, root) {
            Ok(reloaded) if reloaded.has_dependency(&self.package) => {
                warn!(
                    "`{}` failed, but package.json now declares {}; continuing",
                    command, self.package
                );
                Ok(InstallOutcome::AlreadySatisfied { manager })
            }
            _ => Err(failure),
        }
    }
}

fn is_already_satisfied(output: &str) -> bool {
    let lower = output.to_lowercase();
    ALREADY_SATISFIED_MARKERS.iter().any(|marker| lower.contains(marker))
}
