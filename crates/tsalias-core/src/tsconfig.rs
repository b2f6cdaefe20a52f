//! JSON Config Merger for `tsconfig.json`.
//!
//! Loads the compiler-options document (or starts from `{}`), makes sure
//! `compilerOptions.baseUrl` and `compilerOptions.paths` declare the aliases,
//! and rewrites the file pretty-printed with 2-space indentation.
//!
//! Merge rules:
//! - `baseUrl` is only set when absent, `null` or empty. A user-chosen base is
//!   never overwritten.
//! - `paths[alias]` is replaced by the supplied list. Lists are not
//!   concatenated.
//! - Every other key keeps its value and position.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::alias::AliasMap;
use crate::error::{Result, SetupError};
use crate::runtime::Runtime;

pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Default `compilerOptions.baseUrl`.
pub const DEFAULT_BASE_URL: &str = "src";

/// What the merger did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
    /// Every alias was already declared; nothing was written.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct TsConfigMerger {
    file_name: String,
    base_url: String,
}

impl Default for TsConfigMerger {
    fn default() -> Self {
        Self {
            file_name: TSCONFIG_FILE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl TsConfigMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different file name inside the project root.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// `baseUrl` written when the document has none.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }

    /// Merge `aliases` into the compiler-options file under `root`.
    ///
    /// # Errors
    ///
    /// - `MalformedJson` if the existing file is not valid JSON
    /// - `UnexpectedShape` if the document or `compilerOptions` is not an object
    /// - `Io` on read or write failure
    pub fn apply(&self, runtime: &dyn Runtime, root: &Path, aliases: &AliasMap) -> Result<MergeOutcome> {
        let path = self.path(root);

        let (mut document, existed) = match runtime.read_to_string(&path)? {
            Some(contents) => {
                debug!("Parsing {}", path.display());
                let value = serde_json::from_str::<Value>(&contents).map_err(|source| {
                    SetupError::MalformedJson {
                        path: path.clone(),
                        source,
                    }
                })?;
                (value, Some(contents))
            }
            None => {
                info!("{} not found, creating a new one", self.file_name);
                (Value::Object(Map::new()), None)
            }
        };

        let changed = merge_compiler_options(&mut document, aliases, &self.base_url)
            .map_err(|field| SetupError::UnexpectedShape {
                path: path.clone(),
                field,
            })?;

        let rendered = render(&document, &path)?;
        match existed {
            Some(original) if !changed || original == rendered => {
                debug!("{} already declares every alias", self.file_name);
                Ok(MergeOutcome::Unchanged)
            }
            Some(_) => {
                runtime.write(&path, &rendered)?;
                info!("Aliases added to {}", self.file_name);
                Ok(MergeOutcome::Updated)
            }
            None => {
                runtime.write(&path, &rendered)?;
                info!("Created {} with alias paths", self.file_name);
                Ok(MergeOutcome::Created)
            }
        }
    }
}

/// Merge `aliases` into a parsed compiler-options document.
///
/// Returns whether the document changed. On a shape error returns the
/// dotted name of the offending field.
pub fn merge_compiler_options(
    document: &mut Value,
    aliases: &AliasMap,
    base_url: &str,
) -> std::result::Result<bool, String> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| "(root)".to_string())?;
    let mut changed = false;

    let options = object_entry(root, "compilerOptions", &mut changed)
        .ok_or_else(|| "compilerOptions".to_string())?;

    let needs_base = match options.get("baseUrl") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if needs_base {
        debug!("Setting compilerOptions.baseUrl to '{}'", base_url);
        options.insert("baseUrl".to_string(), Value::String(base_url.to_string()));
        changed = true;
    }

    let paths = object_entry(options, "paths", &mut changed)
        .ok_or_else(|| "compilerOptions.paths".to_string())?;

    for (pattern, targets) in aliases.iter() {
        let value = Value::Array(targets.iter().cloned().map(Value::String).collect());
        if paths.get(pattern.as_str()) != Some(&value) {
            debug!("Mapping '{}' to {:?}", pattern, targets);
            paths.insert(pattern.clone(), value);
            changed = true;
        }
    }

    Ok(changed)
}

/// Get `map[key]` as an object, creating it when absent or `null`.
/// Returns `None` when the key holds a non-object value.
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
    changed: &mut bool,
) -> Option<&'a mut Map<String, Value>> {
    let slot = map.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Object(Map::new());
        *changed = true;
    }
    slot.as_object_mut()
}

fn render(document: &Value, path: &Path) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|source| SetupError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryRuntime;
    use serde_json::json;

    fn aliases(entries: &[(&str, &str)]) -> AliasMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    #[test]
    fn empty_document_gets_defaults() {
        let mut doc = json!({});
        let changed = merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap();
        assert!(changed);
        assert_eq!(
            doc,
            json!({"compilerOptions": {"baseUrl": "src", "paths": {"@/*": ["./src/*"]}}})
        );
    }

    #[test]
    fn existing_base_and_paths_are_preserved() {
        let mut doc = json!({
            "compilerOptions": {"baseUrl": "app", "paths": {"#lib/*": ["./lib/*"]}}
        });
        merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap();
        assert_eq!(doc["compilerOptions"]["baseUrl"], "app");
        assert_eq!(doc["compilerOptions"]["paths"]["#lib/*"], json!(["./lib/*"]));
        assert_eq!(doc["compilerOptions"]["paths"]["@/*"], json!(["./src/*"]));
    }

    #[test]
    fn empty_base_url_is_defaulted() {
        let mut doc = json!({"compilerOptions": {"baseUrl": ""}});
        merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap();
        assert_eq!(doc["compilerOptions"]["baseUrl"], "src");
    }

    #[test]
    fn null_sections_are_replaced() {
        let mut doc = json!({"compilerOptions": {"paths": null}});
        merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap();
        assert_eq!(doc["compilerOptions"]["paths"]["@/*"], json!(["./src/*"]));
    }

    #[test]
    fn colliding_alias_list_is_replaced_not_appended() {
        let mut doc = json!({
            "compilerOptions": {"baseUrl": ".", "paths": {"@/*": ["./old/*", "./other/*"]}}
        });
        merge_compiler_options(&mut doc, &aliases(&[("@/*", "./src/*")]), "src").unwrap();
        assert_eq!(doc["compilerOptions"]["paths"]["@/*"], json!(["./src/*"]));
    }

    #[test]
    fn unrelated_keys_keep_their_order() {
        let mut doc = json!({
            "extends": "./base.json",
            "compilerOptions": {"strict": true, "target": "ES2020"},
            "include": ["src"]
        });
        merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap();
        let top: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(top, vec!["extends", "compilerOptions", "include"]);
        let options: Vec<_> = doc["compilerOptions"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(options, vec!["strict", "target", "baseUrl", "paths"]);
    }

    #[test]
    fn second_merge_is_a_fixed_point() {
        let mut doc = json!({"compilerOptions": {"paths": {"~/*": ["./x/*"]}}});
        let map = aliases(&[("@/*", "./src/*"), ("#lib/*", "./lib/*")]);
        assert!(merge_compiler_options(&mut doc, &map, "src").unwrap());
        let snapshot = doc.clone();
        assert!(!merge_compiler_options(&mut doc, &map, "src").unwrap());
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn non_object_shapes_are_rejected() {
        let mut doc = json!([]);
        assert_eq!(
            merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap_err(),
            "(root)"
        );

        let mut doc = json!({"compilerOptions": "strict"});
        assert_eq!(
            merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap_err(),
            "compilerOptions"
        );

        let mut doc = json!({"compilerOptions": {"paths": ["@"]}});
        assert_eq!(
            merge_compiler_options(&mut doc, &AliasMap::builtin(), "src").unwrap_err(),
            "compilerOptions.paths"
        );
    }

    #[test]
    fn apply_creates_missing_file() {
        let runtime = MemoryRuntime::new();
        let outcome = TsConfigMerger::new()
            .apply(&runtime, Path::new("/app"), &AliasMap::builtin())
            .unwrap();

        assert_eq!(outcome, MergeOutcome::Created);
        let written = runtime.get("/app/tsconfig.json").unwrap();
        assert_eq!(
            written,
            "{\n  \"compilerOptions\": {\n    \"baseUrl\": \"src\",\n    \"paths\": {\n      \"@/*\": [\n        \"./src/*\"\n      ]\n    }\n  }\n}"
        );
    }

    #[test]
    fn apply_twice_writes_once() {
        let runtime = MemoryRuntime::new();
        runtime.insert("/app/tsconfig.json", r#"{"compilerOptions": {"strict": true}}"#);
        let merger = TsConfigMerger::new();
        let root = Path::new("/app");

        assert_eq!(
            merger.apply(&runtime, root, &AliasMap::builtin()).unwrap(),
            MergeOutcome::Updated
        );
        let first = runtime.get("/app/tsconfig.json").unwrap();
        assert_eq!(
            merger.apply(&runtime, root, &AliasMap::builtin()).unwrap(),
            MergeOutcome::Unchanged
        );
        assert_eq!(runtime.get("/app/tsconfig.json").unwrap(), first);
        assert_eq!(runtime.writes().len(), 1);
    }

    #[test]
    fn apply_rejects_malformed_json_without_writing() {
        let runtime = MemoryRuntime::new();
        runtime.insert("/app/tsconfig.json", "{ \"compilerOptions\": { // comment\n } }");

        let err = TsConfigMerger::new()
            .apply(&runtime, Path::new("/app"), &AliasMap::builtin())
            .unwrap_err();

        assert!(matches!(err, SetupError::MalformedJson { .. }));
        assert!(runtime.writes().is_empty());
    }

    #[test]
    fn apply_uses_configured_base_and_file_name() {
        let runtime = MemoryRuntime::new();
        TsConfigMerger::new()
            .with_file_name("tsconfig.app.json")
            .with_base_url(".")
            .apply(&runtime, Path::new("/app"), &AliasMap::builtin())
            .unwrap();

        let written: Value =
            serde_json::from_str(&runtime.get("/app/tsconfig.app.json").unwrap()).unwrap();
        assert_eq!(written["compilerOptions"]["baseUrl"], ".");
    }

    #[test]
    fn apply_reports_unexpected_shape_with_path() {
        let runtime = MemoryRuntime::new();
        runtime.insert("/app/tsconfig.json", r#"{"compilerOptions": 3}"#);

        let err = TsConfigMerger::new()
            .apply(&runtime, Path::new("/app"), &AliasMap::builtin())
            .unwrap_err();

        match err {
            SetupError::UnexpectedShape { path, field } => {
                assert_eq!(path, PathBuf::from("/app/tsconfig.json"));
                assert_eq!(field, "compilerOptions");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
