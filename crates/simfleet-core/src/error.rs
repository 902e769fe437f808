//! Error types for the fleet launcher core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while synthesizing or launching a fleet.
///
/// Each variant names the stage it belongs to so a failure can be
/// diagnosed without re-running (validate / template / track / write /
/// launch).
#[derive(Error, Debug)]
pub enum Error {
    /// Position count does not match the requested robot count.
    #[error("validate: expected {expected} position values for {robots} robots, got {actual}")]
    Validation {
        expected: usize,
        actual: usize,
        robots: usize,
    },

    /// World identifier is empty.
    #[error("validate: world name must not be empty")]
    EmptyWorld,

    /// Base template exists but cannot be read (absence is auto-healed,
    /// not an error).
    #[error("template: failed to read base template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run-state file cannot be created, read or appended to. Fatal:
    /// losing run identity corrupts the audit trail.
    #[error("track: failed to update run state {path}: {source}")]
    StateTracking {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generated manifest cannot be written.
    #[error("write: failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compose binary could not be spawned (not installed, not in PATH,
    /// or not executable).
    #[error("launch: failed to spawn `{program}`: {source}")]
    LaunchSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Compose ran but reported a non-zero exit status.
    #[error("launch: compose exited with status {code}")]
    LaunchExit { code: i32 },
}

impl Error {
    /// Exit code to propagate to the shell for this error.
    ///
    /// A compose failure carries the orchestrator's own exit code through
    /// unchanged; every other failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::LaunchExit { code } => *code,
            _ => 1,
        }
    }
}

/// Result type for fleet launcher operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_carries_counts() {
        let err = Error::Validation {
            expected: 6,
            actual: 3,
            robots: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("6"));
        assert!(msg.contains("3"));
        assert!(msg.starts_with("validate:"));
    }

    #[test]
    fn test_launch_exit_propagates_code() {
        let err = Error::LaunchExit { code: 14 };
        assert_eq!(err.exit_code(), 14);
    }

    #[test]
    fn test_other_errors_exit_one() {
        assert_eq!(Error::EmptyWorld.exit_code(), 1);
    }
}
