//! Error types for the alias setup pipelines.
//!
//! Every variant here is fatal for the invocation. A build config file with an
//! unrecognized shape is not an error: the patcher reports it through
//! [`PatchOutcome::Skipped`](crate::vite::PatchOutcome::Skipped) instead.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("package.json not found: {}", .0.display())]
    MissingManifest(PathBuf),

    #[error("invalid JSON in {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON parsed, but a value the merger must edit has the wrong type.
    #[error("unexpected value for '{field}' in {}: expected an object", .path.display())]
    UnexpectedShape { path: PathBuf, field: String },

    #[error("invalid alias '{pattern}': {reason}")]
    InvalidAlias { pattern: String, reason: String },

    #[error("`{command}` failed ({status})")]
    SubprocessFailure {
        command: String,
        /// Exit status description, or the spawn error when the process never ran.
        status: String,
        output: String,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SetupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short actionable hint shown under the diagnostic.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingManifest(_) => {
                Some("Run tsalias from the root of a Node project or pass --root <dir>")
            }
            Self::MalformedJson { .. } => {
                Some("Fix the JSON syntax (comments and trailing commas are not accepted)")
            }
            Self::UnexpectedShape { .. } => {
                Some("compilerOptions and compilerOptions.paths must be JSON objects")
            }
            Self::InvalidAlias { .. } => Some("Aliases look like '@/*' mapped to './src/*'"),
            Self::SubprocessFailure { .. } => Some(
                "Install @types/node manually, or rerun with --no-install to skip this step",
            ),
            Self::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_names_path() {
        let err = SetupError::MissingManifest(PathBuf::from("/app/package.json"));
        assert!(err.to_string().contains("/app/package.json"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn malformed_json_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SetupError::MalformedJson {
            path: PathBuf::from("tsconfig.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid JSON in tsconfig.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn subprocess_failure_mentions_command() {
        let err = SetupError::SubprocessFailure {
            command: "npm install --save-dev @types/node".to_string(),
            status: "exit status: 1".to_string(),
            output: "E404".to_string(),
        };
        assert!(err.to_string().contains("npm install --save-dev @types/node"));
        assert!(err.to_string().contains("exit status: 1"));
    }
}
