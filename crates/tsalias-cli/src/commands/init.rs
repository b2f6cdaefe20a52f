//! Init command implementation.
//!
//! Applies the configured path aliases to `tsconfig.json` and
//! `vite.config.ts` of one project.

use std::path::{Path, PathBuf};

use tracing::debug;
use tsalias_core::alias::sentinel;
use tsalias_core::{
    AliasSetup, CommandRunner, InstallOutcome, MergeOutcome, NativeCommandRunner, NativeRuntime,
    PatchOutcome, Runtime, SetupReport,
};

use crate::cli::InitArgs;
use crate::config::TsaliasConfig;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the init command.
///
/// # Process
///
/// 1. Resolve the project root
/// 2. Layer configuration (defaults, tsalias.toml, env, flags)
/// 3. Run the setup pipelines
/// 4. Report what changed
///
/// A build config that cannot be patched automatically produces a warning,
/// not an error.
pub fn execute(args: InitArgs) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let config = TsaliasConfig::load(&root, &args)?;

    ui::info(&format!("Configuring path aliases in {}", root.display()));

    let report = run(&root, &config, &NativeRuntime, &NativeCommandRunner)?;
    print_report(&summarize(&report, &config));
    Ok(())
}

/// Run the setup for `root` against the given capabilities.
pub fn run(
    root: &Path,
    config: &TsaliasConfig,
    runtime: &dyn Runtime,
    runner: &dyn CommandRunner,
) -> Result<SetupReport> {
    debug!("Configured aliases: {:?}", config.aliases);
    let report = AliasSetup::new(runtime, runner, config.setup_options()).run(root, &config.aliases)?;
    Ok(report)
}

/// Absolute project root: `--root` relative to the working directory, or the
/// working directory itself.
fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let root = match root {
        Some(path) => cwd.join(path),
        None => cwd,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Info(String),
    Warning(String),
}

/// Turn a report into user-facing status lines.
pub fn summarize(report: &SetupReport, config: &TsaliasConfig) -> Vec<Status> {
    let mut lines = Vec::new();

    match &report.install {
        InstallOutcome::Present | InstallOutcome::Disabled => {}
        InstallOutcome::Installed { manager } => lines.push(Status::Success(format!(
            "Installed {} with {}",
            config.types_package, manager
        ))),
        InstallOutcome::AlreadySatisfied { manager } => lines.push(Status::Info(format!(
            "{} is already installed ({} reported a failure)",
            config.types_package, manager
        ))),
    }

    lines.push(match report.tsconfig {
        MergeOutcome::Created => Status::Success(format!("Created {}", config.tsconfig)),
        MergeOutcome::Updated => Status::Success(format!("Updated {}", config.tsconfig)),
        MergeOutcome::Unchanged => {
            Status::Info(format!("{} already has the aliases", config.tsconfig))
        }
    });

    match &report.vite {
        PatchOutcome::Created => {
            lines.push(Status::Success(format!("Created {}", config.vite_config)))
        }
        PatchOutcome::Updated => lines.push(Status::Success(format!(
            "Added resolve.alias to {}",
            config.vite_config
        ))),
        PatchOutcome::AlreadyConfigured => lines.push(Status::Info(format!(
            "{} already has the aliases",
            config.vite_config
        ))),
        PatchOutcome::Skipped { reason } => {
            lines.push(Status::Warning(format!(
                "Manual update required for {}: {}",
                config.vite_config, reason
            )));
            let wanted = report
                .aliases
                .iter()
                .map(|(pattern, paths)| {
                    format!("'{}' -> {}", sentinel(pattern), paths.first().map_or("", String::as_str))
                })
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(Status::Info(format!("Add to resolve.alias: {}", wanted)));
        }
    }

    if !report.needs_manual_update() {
        let names = report
            .aliases
            .iter()
            .map(|(pattern, _)| pattern.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Status::Success(format!("Path aliases ready: {}", names)));
    }

    lines
}

fn print_report(lines: &[Status]) {
    for line in lines {
        match line {
            Status::Success(message) => ui::success(message),
            Status::Info(message) => ui::info(message),
            Status::Warning(message) => ui::warning(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsalias_core::runtime::CommandOutput;
    use tsalias_core::test_utils::{MemoryRuntime, RecordingRunner};
    use tsalias_core::{AliasMap, PackageManager, SetupError, SkipReason};

    fn project(manifest: &str) -> MemoryRuntime {
        let runtime = MemoryRuntime::new();
        runtime.insert("/web/package.json", manifest);
        runtime
    }

    #[test]
    fn test_run_applies_config_aliases() {
        let runtime = project(r#"{"devDependencies": {"@types/node": "*"}}"#);
        let runner = RecordingRunner::new();
        let mut config = TsaliasConfig::default();
        config
            .aliases
            .insert("~ui/*", vec!["./src/ui/*".to_string()]);

        let report = run(Path::new("/web"), &config, &runtime, &runner).unwrap();

        assert_eq!(report.aliases.len(), 2);
        let tsconfig = runtime.get("/web/tsconfig.json").unwrap();
        assert!(tsconfig.contains("\"~ui/*\""));
        let vite = runtime.get("/web/vite.config.ts").unwrap();
        assert!(vite.contains("'~ui': path.resolve(__dirname, 'src/ui'),"));
    }

    #[test]
    fn test_run_uses_configured_manager() {
        let runtime = project("{}");
        let runner = RecordingRunner::new();
        let config = TsaliasConfig {
            package_manager: Some(PackageManager::Pnpm),
            ..TsaliasConfig::default()
        };

        let report = run(Path::new("/web"), &config, &runtime, &runner).unwrap();

        assert_eq!(
            report.install,
            InstallOutcome::Installed {
                manager: PackageManager::Pnpm
            }
        );
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "pnpm");
    }

    #[test]
    fn test_run_propagates_setup_errors() {
        let runtime = project("{}");
        let runner = RecordingRunner::new().respond(CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "ERR_PNPM_FETCH_404".to_string(),
        });

        let err = run(Path::new("/web"), &TsaliasConfig::default(), &runtime, &runner).unwrap_err();

        assert!(matches!(
            err,
            CliError::Setup(SetupError::SubprocessFailure { .. })
        ));
    }

    #[test]
    fn test_summary_for_fresh_project() {
        let report = SetupReport {
            aliases: AliasMap::builtin(),
            install: InstallOutcome::Installed {
                manager: PackageManager::Npm,
            },
            tsconfig: MergeOutcome::Created,
            vite: PatchOutcome::Updated,
        };

        let lines = summarize(&report, &TsaliasConfig::default());

        assert_eq!(
            lines,
            vec![
                Status::Success("Installed @types/node with npm".to_string()),
                Status::Success("Created tsconfig.json".to_string()),
                Status::Success("Added resolve.alias to vite.config.ts".to_string()),
                Status::Success("Path aliases ready: @/*".to_string()),
            ]
        );
    }

    #[test]
    fn test_summary_for_configured_project() {
        let report = SetupReport {
            aliases: AliasMap::builtin(),
            install: InstallOutcome::Present,
            tsconfig: MergeOutcome::Unchanged,
            vite: PatchOutcome::AlreadyConfigured,
        };

        let lines = summarize(&report, &TsaliasConfig::default());

        assert_eq!(lines[0], Status::Info("tsconfig.json already has the aliases".to_string()));
        assert_eq!(
            lines[1],
            Status::Info("vite.config.ts already has the aliases".to_string())
        );
    }

    #[test]
    fn test_summary_warns_on_skip() {
        let report = SetupReport {
            aliases: AliasMap::builtin(),
            install: InstallOutcome::Disabled,
            tsconfig: MergeOutcome::Updated,
            vite: PatchOutcome::Skipped {
                reason: SkipReason::NoFactoryCall,
            },
        };

        let lines = summarize(&report, &TsaliasConfig::default());

        assert!(matches!(
            &lines[1],
            Status::Warning(message) if message.starts_with("Manual update required for vite.config.ts")
        ));
        assert_eq!(
            lines[2],
            Status::Info("Add to resolve.alias: '@' -> ./src/*".to_string())
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_resolve_root_rejects_missing_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = resolve_root(Some(&missing)).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_resolve_root_keeps_absolute_path() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(temp.path())).unwrap(), temp.path());
    }
}
