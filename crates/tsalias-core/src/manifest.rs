//! `package.json` access.
//!
//! The manifest is only read: the setup needs to know whether the project
//! root is a Node project and whether the type declarations are declared.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SetupError};
use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    pub fn path(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILE)
    }

    /// Load `package.json` from the project root.
    ///
    /// # Errors
    ///
    /// - `MissingManifest` if the file does not exist
    /// - `MalformedJson` if it is not a JSON object with string-valued
    ///   dependency tables
    pub fn load(runtime: &dyn Runtime, root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let contents = runtime
            .read_to_string(&path)?
            .ok_or_else(|| SetupError::MissingManifest(path.clone()))?;

        let manifest: Self = serde_json::from_str(&contents)
            .map_err(|source| SetupError::MalformedJson { path, source })?;
        debug!(
            "package.json parsed ({} dependencies, {} devDependencies)",
            manifest.dependencies.len(),
            manifest.dev_dependencies.len()
        );
        Ok(manifest)
    }

    /// Project name for log lines, falling back to the root directory name.
    pub fn display_name(&self, root: &Path) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.display().to_string()),
        }
    }

    /// Whether `name` is declared in `devDependencies` or `dependencies`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dev_dependencies.contains_key(name) || self.dependencies.contains_key(name)
    }
}
