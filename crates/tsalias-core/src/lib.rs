//! Idempotent path-alias setup for TypeScript + Vite projects.
//!
//! Given a project root and an alias map (`"@/*"` → `["./src/*"]` by default),
//! the setup makes `tsconfig.json` and `vite.config.ts` agree on the aliases
//! without duplicating or corrupting what is already there.
//!
//! # Architecture
//!
//! - [`tsconfig`] - JSON Config Merger for the compiler-options document
//! - [`vite`] - Source Config Patcher for the build config (regex heuristics)
//! - [`manifest`] - `package.json` loading
//! - [`install`] - companion `@types/node` installation via the package manager
//! - [`runtime`] - file and subprocess capabilities injected into every step
//! - [`setup`] - orchestration with early abort
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tsalias_core::{add_aliases, AliasMap, SetupOptions};
//!
//! let report = add_aliases(Path::new("."), &AliasMap::new(), SetupOptions::default())?;
//! println!("tsconfig: {:?}, vite: {:?}", report.tsconfig, report.vite);
//! # Ok::<(), tsalias_core::SetupError>(())
//! ```

pub mod alias;
pub mod error;
pub mod install;
pub mod manifest;
pub mod runtime;
pub mod setup;
pub mod tsconfig;
pub mod vite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alias::AliasMap;
pub use error::{Result, SetupError};
pub use install::{InstallOutcome, PackageManager};
pub use runtime::{CommandRunner, NativeCommandRunner, NativeRuntime, Runtime};
pub use setup::{add_aliases, AliasSetup, SetupOptions, SetupReport};
pub use tsconfig::MergeOutcome;
pub use vite::{PatchOutcome, SkipReason};
