//! Platform capabilities used by the setup pipelines.
//!
//! The pipelines never touch `std::fs` or `std::process` directly. They go
//! through [`Runtime`] for file access and [`CommandRunner`] for the package
//! manager, so tests can swap in the in-memory doubles from
//! [`test_utils`](crate::test_utils).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, SetupError};

/// File access capability.
pub trait Runtime: fmt::Debug {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a UTF-8 file, returning `None` when it does not exist.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the whole file in a single write.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Runtime backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl Runtime for NativeRuntime {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SetupError::io(path, e)),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).map_err(|e| SetupError::io(path, e))
    }
}

/// A subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, for diagnostics and pattern checks.
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Subprocess capability.
pub trait CommandRunner: fmt::Debug {
    /// Run to completion. `Err` means the process could not be spawned.
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCommandRunner;

impl CommandRunner for NativeCommandRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        let program = program_name(&command.program, cfg!(windows));
        let output = Command::new(program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Executable to spawn for `program`. Node package managers ship as `.cmd`
/// shims on Windows, except bun which installs a native `bun.exe`.
fn program_name(program: &str, windows: bool) -> String {
    if windows && program != "bun" {
        format!("{}.cmd", program)
    } else {
        program.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn native_read_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let result = NativeRuntime
            .read_to_string(&temp.path().join("nope.json"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn native_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tsconfig.json");
        NativeRuntime.write(&path, "{}").unwrap();
        assert!(NativeRuntime.exists(&path));
        assert_eq!(NativeRuntime.read_to_string(&path).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn native_write_into_missing_dir_is_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("tsconfig.json");
        let err = NativeRuntime.write(&path, "{}").unwrap_err();
        assert!(matches!(err, SetupError::Io { .. }));
    }

    #[test]
    fn windows_programs_use_cmd_shims_except_bun() {
        assert_eq!(program_name("npm", true), "npm.cmd");
        assert_eq!(program_name("pnpm", true), "pnpm.cmd");
        assert_eq!(program_name("yarn", true), "yarn.cmd");
        assert_eq!(program_name("bun", true), "bun");
        assert_eq!(program_name("npm", false), "npm");
        assert_eq!(program_name("bun", false), "bun");
    }

    #[test]
    fn command_spec_display() {
        let spec = CommandSpec::new("npm", "/app")
            .arg("install")
            .arg("--save-dev")
            .arg("@types/node");
        assert_eq!(spec.to_string(), "npm install --save-dev @types/node");
    }

    #[test]
    fn combined_output_skips_empty_streams() {
        let out = CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(out.combined(), "boom");
        assert!(!out.success());
        assert_eq!(out.status_text(), "exit status: 1");
    }
}
