//! In-memory test doubles for [`Runtime`] and [`CommandRunner`].
//!
//! Only compiled for tests and with the `test-utils` feature.
//!
//! ```rust,ignore
//! use std::path::Path;
//! use tsalias_core::runtime::Runtime;
//! use tsalias_core::test_utils::MemoryRuntime;
//!
//! let runtime = MemoryRuntime::new();
//! runtime.insert("/app/package.json", "{}");
//! assert!(runtime.exists(Path::new("/app/package.json")));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Result, SetupError};
use crate::runtime::{CommandOutput, CommandRunner, CommandSpec, Runtime};

/// Shared in-memory filesystem. Clones see the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuntime {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
    writes: Rc<RefCell<Vec<PathBuf>>>,
    read_only: Rc<RefCell<Vec<PathBuf>>>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), contents.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Every path written through [`Runtime::write`], in order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.read_only.borrow_mut().push(path.into());
    }
}

impl Runtime for MemoryRuntime {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.get(path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.read_only.borrow().iter().any(|p| p == path) {
            return Err(SetupError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        self.writes.borrow_mut().push(path.to_path_buf());
        self.insert(path, contents);
        Ok(())
    }
}

/// A file write performed when a scripted command runs.
#[derive(Debug, Clone)]
struct SideEffect {
    runtime: MemoryRuntime,
    path: PathBuf,
    contents: String,
}

/// Command runner that records invocations and replays scripted results.
///
/// With nothing scripted every command succeeds with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    responses: RefCell<VecDeque<io::Result<CommandOutput>>>,
    effects: RefCell<VecDeque<SideEffect>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next command.
    pub fn respond(self, output: CommandOutput) -> Self {
        self.responses.borrow_mut().push_back(Ok(output));
        self
    }

    /// Queue a spawn failure for the next command.
    pub fn fail_to_spawn(self, kind: io::ErrorKind) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(io::Error::new(kind, "spawn failed")));
        self
    }

    /// Write a file into `runtime` when the next command runs, the way a
    /// package manager edits package.json.
    pub fn and_write(
        self,
        runtime: &MemoryRuntime,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        self.effects.borrow_mut().push_back(SideEffect {
            runtime: runtime.clone(),
            path: path.into(),
            contents: contents.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());
        if let Some(effect) = self.effects.borrow_mut().pop_front() {
            effect.runtime.insert(effect.path, effect.contents);
        }
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_files() {
        let a = MemoryRuntime::new();
        let b = a.clone();
        a.write(Path::new("/x"), "1").unwrap();
        assert_eq!(b.get("/x").as_deref(), Some("1"));
        assert_eq!(b.writes(), vec![PathBuf::from("/x")]);
    }

    #[test]
    fn denied_write_fails() {
        let runtime = MemoryRuntime::new();
        runtime.deny_writes("/x");
        assert!(runtime.write(Path::new("/x"), "1").is_err());
        assert!(runtime.get("/x").is_none());
    }

    #[test]
    fn runner_defaults_to_success() {
        let runner = RecordingRunner::new();
        let out = runner.run(&CommandSpec::new("npm", "/app")).unwrap();
        assert!(out.success());
        assert_eq!(runner.calls().len(), 1);
    }
}
