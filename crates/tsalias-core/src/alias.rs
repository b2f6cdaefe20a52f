//! Alias map shared by both config pipelines.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Alias applied when the caller supplies nothing for it.
pub const DEFAULT_ALIAS: &str = "@/*";

/// Resolution path of [`DEFAULT_ALIAS`].
pub const DEFAULT_ALIAS_PATH: &str = "./src/*";

/// Ordered mapping from alias pattern (`"@/*"`) to its resolution paths
/// (`["./src/*"]`).
///
/// Insertion order is preserved so that generated output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap(IndexMap<String, Vec<String>>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in `{"@/*": ["./src/*"]}` map.
    pub fn builtin() -> Self {
        let mut map = Self::new();
        map.insert(DEFAULT_ALIAS, vec![DEFAULT_ALIAS_PATH.to_string()]);
        map
    }

    /// Built-in entry first, then every entry of `overrides` on top of it.
    ///
    /// An override for `@/*` replaces the built-in list entirely but keeps the
    /// first position.
    pub fn with_builtin(overrides: &AliasMap) -> Self {
        let mut map = Self::builtin();
        for (pattern, paths) in overrides.iter() {
            map.insert(pattern.clone(), paths.to_vec());
        }
        map
    }

    /// Insert or replace an alias, returning the previous resolution list.
    pub fn insert(&mut self, pattern: impl Into<String>, paths: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(pattern.into(), paths)
    }

    pub fn get(&self, pattern: &str) -> Option<&[String]> {
        self.0.get(pattern).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[String])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Check that every entry can be written into both config files.
    ///
    /// Patterns and paths end up inside single-quoted TypeScript strings and
    /// inside the brace-delimited alias body the detector scans, so quotes,
    /// backslashes, braces and control characters are rejected.
    pub fn validate(&self) -> Result<()> {
        for (pattern, paths) in self.iter() {
            let invalid = |reason: &str| SetupError::InvalidAlias {
                pattern: pattern.clone(),
                reason: reason.to_string(),
            };

            if sentinel(pattern).is_empty() {
                return Err(invalid("alias name is empty"));
            }
            if has_unsafe_chars(pattern) {
                return Err(invalid("alias contains a quote, backslash, brace or control character"));
            }
            if paths.is_empty() {
                return Err(invalid("no resolution paths given"));
            }
            if paths.iter().any(|p| p.trim().is_empty() || has_unsafe_chars(p)) {
                return Err(invalid("resolution path is empty or contains a quote, backslash, brace or control character"));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Vec<String>)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn has_unsafe_chars(s: &str) -> bool {
    s.contains(['\'', '"', '\\', '{', '}']) || s.chars().any(char::is_control)
}

/// Alias name as the bundler sees it: `"@/*"` becomes `@`.
pub fn sentinel(pattern: &str) -> &str {
    let trimmed = pattern.strip_suffix("/*").unwrap_or(pattern);
    trimmed.strip_suffix('/').unwrap_or(trimmed)
}

/// Directory a resolution path points at: `"./src/*"` becomes `src`.
///
/// A path naming the project root itself (`"./*"`, `"*"`, `"./"`) becomes `.`.
pub fn target_dir(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path.strip_suffix("/*").unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() || path == "*" {
        "."
    } else {
        path
    }
}
