//! External compose invocation.
//!
//! The launcher's whole contract with the container runtime is the
//! argument vector and the propagated exit status. A failed launch is
//! reported, never retried: restarting a partially started fleet needs
//! operator judgment.

use crate::error::{Error, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Argument vector handed to the compose binary.
pub fn compose_args(manifest_path: &Path, detached: bool) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        manifest_path.display().to_string(),
        "up".to_string(),
    ];
    if detached {
        args.push("-d".to_string());
    }
    args
}

/// Hand the generated manifest to the compose runtime and wait for it.
///
/// Blocks until the orchestrator exits (foreground) or detaches (`-d`).
/// Spawn failure and a non-zero exit are distinct errors; the exit code
/// is carried through for the caller to propagate.
pub async fn launch(compose_bin: &str, manifest_path: &Path, detached: bool) -> Result<()> {
    let args = compose_args(manifest_path, detached);
    info!(program = %compose_bin, manifest = %manifest_path.display(), detached, "launch: invoking compose");

    let status = Command::new(compose_bin)
        .args(&args)
        .status()
        .await
        .map_err(|source| Error::LaunchSpawn {
            program: compose_bin.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::LaunchExit {
            code: status.code().unwrap_or(-1),
        })
    }
}
