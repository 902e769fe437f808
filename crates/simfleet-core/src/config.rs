//! Launcher configuration and derived paths.

use crate::run_state::RunIdStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the run-state audit log inside the runs directory.
const STATE_FILE_NAME: &str = "runs.txt";

/// Suffix appended to the run id to form the manifest file name.
const MANIFEST_SUFFIX: &str = "compose.yaml";

/// Externally supplied configuration for one launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Directory holding generated manifests and the run-state file.
    pub runs_dir: PathBuf,

    /// Base template merged verbatim at the head of every manifest.
    /// Auto-created empty when absent.
    pub template_path: PathBuf,

    /// Compose binary to invoke.
    pub compose_bin: String,

    /// Anchor name for shared per-service defaults in the template.
    pub defaults_anchor: String,

    /// Run identity strategy.
    pub strategy: RunIdStrategy,

    /// Pass `-d` so compose detaches instead of staying in the foreground.
    pub detached: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            runs_dir: PathBuf::from("runs"),
            template_path: PathBuf::from("base_docker_compose.yml"),
            compose_bin: "docker-compose".to_string(),
            defaults_anchor: "common".to_string(),
            strategy: RunIdStrategy::Timestamped,
            detached: false,
        }
    }
}

impl LaunchConfig {
    /// Path of the append-only run-state file.
    pub fn state_file_path(&self) -> PathBuf {
        self.runs_dir.join(STATE_FILE_NAME)
    }

    /// Path of the manifest generated for `run_id`.
    pub fn manifest_path(&self, run_id: &str) -> PathBuf {
        self.runs_dir.join(format!("{run_id}.{MANIFEST_SUFFIX}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = LaunchConfig::default();
        assert_eq!(config.state_file_path(), PathBuf::from("runs/runs.txt"));
        assert_eq!(config.compose_bin, "docker-compose");
    }

    #[test]
    fn test_manifest_path_derives_from_run_id() {
        let config = LaunchConfig::default();
        assert_eq!(
            config.manifest_path("current"),
            PathBuf::from("runs/current.compose.yaml")
        );
        assert_eq!(
            config.manifest_path("2024-03-09_14-30-05"),
            PathBuf::from("runs/2024-03-09_14-30-05.compose.yaml")
        );
    }
}
