//! Source Config Patcher for `vite.config.ts`.
//!
//! This is a text patcher, not a parser. The file format is one well-known
//! template, so detection and insertion rely on a handful of regular
//! expressions:
//!
//! | Pattern | Purpose |
//! |---|---|
//! | `resolve\s*:\s*\{[^}]*?alias\s*:\s*\{(?P<body>[^}]*)\}` | existing alias block; an alias is present when `body` contains its sentinel |
//! | `\bresolve\s*:\s*\{` | any `resolve` object, which an injected block would collide with |
//! | `defineConfig\s*\(\s*\{` | the configuration-factory call; the block goes right after its `{` |
//!
//! When several factory calls exist, the first textual occurrence wins.
//!
//! Outcomes:
//! - file absent: a complete template is written
//! - every alias already declared: nothing is written, so a second run is
//!   byte-identical
//! - no factory call, or a `resolve` object without the aliases: the file is
//!   left untouched and the step is reported as skipped
//! - otherwise: missing preamble lines are prepended and the resolve block is
//!   inserted as the first property of the factory argument

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::alias::{sentinel, target_dir, AliasMap};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::tsconfig::DEFAULT_BASE_URL;

pub const VITE_CONFIG_FILE: &str = "vite.config.ts";

static ALIAS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resolve\s*:\s*\{[^}]*?alias\s*:\s*\{(?P<body>[^}]*)\}")
        .expect("alias block pattern is valid")
});

static RESOLVE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bresolve\s*:\s*\{").expect("resolve key pattern is valid"));

static FACTORY_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"defineConfig\s*\(\s*\{").expect("factory call pattern is valid")
});

static PATH_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(?:\*\s+as\s+)?path\s+from\s+['"](?:node:)?path['"]"#)
        .expect("path import pattern is valid")
});

static ALIAS_OPTIONS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(?:type\s+)?\{[^}]*\bAliasOptions\b[^}]*\}\s*from\s*['"]vite['"]"#)
        .expect("AliasOptions import pattern is valid")
});

static ROOT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:const|let|var)\s+root\s*=").expect("root declaration pattern is valid")
});

static ROOT_RESOLVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:const|let|var)\s+root\s*=\s*path\.resolve\(\s*__dirname\s*,\s*['"](?P<dir>[^'"]*)['"]\s*\)"#,
    )
    .expect("root resolve pattern is valid")
});

const ALIAS_OPTIONS_IMPORT_LINE: &str = "import type { AliasOptions } from 'vite';";
const PATH_IMPORT_LINE: &str = "import path from 'path';";

/// Why the patcher left an existing file alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `defineConfig({` call to anchor the insertion on.
    NoFactoryCall,
    /// A `resolve` object exists but does not declare these aliases.
    ConflictingResolve { missing: Vec<String> },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFactoryCall => {
                write!(f, "no `defineConfig({{ ... }})` call found")
            }
            SkipReason::ConflictingResolve { missing } => write!(
                f,
                "a `resolve` block already exists without alias(es) {}",
                missing
                    .iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// What the patcher did to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Created,
    Updated,
    AlreadyConfigured,
    /// Unsupported file shape. Not fatal; the file is untouched.
    Skipped { reason: SkipReason },
}

/// Result of patching source text in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchDecision {
    AlreadyConfigured,
    Patched(String),
    Skip(SkipReason),
}

/// What an existing `root` binding in the build config points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootBinding {
    Absent,
    /// `path.resolve(__dirname, '<base>')`, reusable for base aliases.
    Base,
    /// Anything else. The injected block must not refer to it.
    Foreign,
}

/// One `'<sentinel>': <expression>` line of the alias object.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AliasEntry {
    sentinel: String,
    expression: String,
    uses_root: bool,
}

#[derive(Debug, Clone)]
pub struct ViteConfigPatcher {
    file_name: String,
    base_dir: String,
}

impl Default for ViteConfigPatcher {
    fn default() -> Self {
        Self {
            file_name: VITE_CONFIG_FILE.to_string(),
            base_dir: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ViteConfigPatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Directory bound to `root` in the generated code.
    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }

    /// Ensure the build config under `root` declares `aliases`.
    pub fn apply(&self, runtime: &dyn Runtime, root: &Path, aliases: &AliasMap) -> Result<PatchOutcome> {
        let path = self.path(root);

        let Some(source) = runtime.read_to_string(&path)? else {
            info!("Creating {}", self.file_name);
            runtime.write(&path, &self.template(aliases))?;
            return Ok(PatchOutcome::Created);
        };

        match self.patch(&source, aliases) {
            PatchDecision::AlreadyConfigured => {
                info!("Alias configuration already exists in {}", self.file_name);
                Ok(PatchOutcome::AlreadyConfigured)
            }
            PatchDecision::Patched(patched) => {
                runtime.write(&path, &patched)?;
                info!("{} updated with alias configuration", self.file_name);
                Ok(PatchOutcome::Updated)
            }
            PatchDecision::Skip(reason) => {
                warn!("Leaving {} untouched: {}", self.file_name, reason);
                Ok(PatchOutcome::Skipped { reason })
            }
        }
    }

    /// Decide how `source` must change to declare `aliases`.
    pub fn patch(&self, source: &str, aliases: &AliasMap) -> PatchDecision {
        let sentinels: Vec<&str> = aliases.iter().map(|(pattern, _)| sentinel(pattern)).collect();

        if let Some(caps) = ALIAS_BLOCK.captures(source) {
            let body = caps.name("body").map_or("", |m| m.as_str());
            let missing: Vec<String> = sentinels
                .iter()
                .filter(|s| !body.contains(**s))
                .map(|s| s.to_string())
                .collect();
            if missing.is_empty() {
                return PatchDecision::AlreadyConfigured;
            }
            return PatchDecision::Skip(SkipReason::ConflictingResolve { missing });
        }

        if !FACTORY_CALL.is_match(source) {
            return PatchDecision::Skip(SkipReason::NoFactoryCall);
        }

        if RESOLVE_KEY.is_match(source) {
            return PatchDecision::Skip(SkipReason::ConflictingResolve {
                missing: sentinels.iter().map(|s| s.to_string()).collect(),
            });
        }

        let binding = self.root_binding(source);
        debug!("Existing root binding: {:?}", binding);
        let entries = self.entries(aliases, binding != RootBinding::Foreign);
        let mut patched = self.preamble(source, &entries, binding);
        patched.push_str(source);

        // The preamble never contains the anchor, so the first match is still
        // the first call of the original text.
        let Some(anchor) = FACTORY_CALL.find(&patched) else {
            return PatchDecision::Skip(SkipReason::NoFactoryCall);
        };
        let at = anchor.end();
        debug!("Inserting resolve block at byte {}", at);

        let block = format!("\n  {}", resolve_block(&entries));
        patched.insert_str(at, &block);
        PatchDecision::Patched(patched)
    }

    /// Complete config file for a project without one.
    pub fn template(&self, aliases: &AliasMap) -> String {
        let entries = self.entries(aliases, true);
        let mut out = String::new();
        out.push_str(ALIAS_OPTIONS_IMPORT_LINE);
        out.push('\n');
        out.push_str("import { defineConfig } from 'vite';\n");
        out.push_str("import react from '@vitejs/plugin-react';\n");
        out.push_str(PATH_IMPORT_LINE);
        out.push_str("\n\n");
        if entries.iter().any(|e| e.uses_root) {
            out.push_str(&self.root_decl());
            out.push_str("\n\n");
        }
        out.push_str("// https://vite.dev/config/\n");
        out.push_str("export default defineConfig({\n");
        out.push_str("  plugins: [react()],\n");
        out.push_str("  ");
        out.push_str(&resolve_block(&entries));
        out.push('\n');
        out.push_str("});\n");
        out
    }

    /// Alias entries; base-directory aliases refer to `root` only when
    /// `root_allowed`.
    fn entries(&self, aliases: &AliasMap, root_allowed: bool) -> Vec<AliasEntry> {
        let base = target_dir(&self.base_dir);
        aliases
            .iter()
            .map(|(pattern, paths)| {
                let dir = paths.first().map_or(".", |p| target_dir(p));
                let uses_root = root_allowed && dir == base;
                let expression = if uses_root {
                    "root".to_string()
                } else {
                    format!("path.resolve(__dirname, '{}')", dir)
                };
                AliasEntry {
                    sentinel: sentinel(pattern).to_string(),
                    expression,
                    uses_root,
                }
            })
            .collect()
    }

    fn root_decl(&self) -> String {
        format!("const root = path.resolve(__dirname, '{}');", target_dir(&self.base_dir))
    }

    fn root_binding(&self, source: &str) -> RootBinding {
        let Some(decl) = ROOT_DECL.find(source) else {
            return RootBinding::Absent;
        };
        let base = target_dir(&self.base_dir);
        match ROOT_RESOLVE.captures(source) {
            Some(caps)
                if caps.get(0).is_some_and(|m| m.start() == decl.start())
                    && caps.name("dir").is_some_and(|d| target_dir(d.as_str()) == base) =>
            {
                RootBinding::Base
            }
            _ => RootBinding::Foreign,
        }
    }

    /// Lines `source` lacks for the injected block to compile.
    fn preamble(&self, source: &str, entries: &[AliasEntry], binding: RootBinding) -> String {
        let needs_root = entries.iter().any(|e| e.uses_root) && binding == RootBinding::Absent;
        let needs_path = (needs_root || entries.iter().any(|e| !e.uses_root))
            && !PATH_IMPORT.is_match(source);

        let mut out = String::new();
        if !ALIAS_OPTIONS_IMPORT.is_match(source) {
            out.push_str(ALIAS_OPTIONS_IMPORT_LINE);
            out.push('\n');
        }
        if needs_path {
            out.push_str(PATH_IMPORT_LINE);
            out.push('\n');
        }
        if needs_root {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.root_decl());
            out.push_str("\n\n");
        }
        out
    }
}

/// `resolve: { alias: { ... } as AliasOptions },` indented for a property of
/// the top-level config object. The first line carries no indentation.
fn resolve_block(entries: &[AliasEntry]) -> String {
    let mut out = String::from("resolve: {\n    alias: {\n");
    for entry in entries {
        out.push_str(&format!("      '{}': {},\n", entry.sentinel, entry.expression));
    }
    out.push_str("    } as AliasOptions,\n  },");
    out
}
