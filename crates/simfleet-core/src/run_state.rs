//! Run identity and the persisted audit trail.
//!
//! The tracker is the only component that touches the run-state file.
//! Invocations are assumed sequential per working directory; concurrent
//! launchers against one runs directory would need advisory locking on
//! top of this.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Run id token used by the sentinel strategy.
pub const SENTINEL_RUN_ID: &str = "current";

/// Timestamped run ids are formatted to second precision.
const RUN_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// How run identity is derived for one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunIdStrategy {
    /// Run id is the capture time to second precision. Unique across
    /// runs, so generated manifests accumulate on disk; retention is an
    /// external policy, never pruned here.
    Timestamped,

    /// Run id is the fixed token `current`. One well-known manifest
    /// path, overwritten on each launch; trades history for idempotent
    /// tooling integration.
    Sentinel,
}

impl RunIdStrategy {
    /// Derive the run id for a launch captured at `now`.
    pub fn run_id(&self, now: DateTime<Utc>) -> String {
        match self {
            RunIdStrategy::Timestamped => now.format(RUN_ID_FORMAT).to_string(),
            RunIdStrategy::Sentinel => SENTINEL_RUN_ID.to_string(),
        }
    }
}

/// Persisted identity for one launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub world: String,
    pub robot_count: usize,
}

impl RunRecord {
    /// The audit line appended to the run log for this record.
    pub fn audit_line(&self) -> String {
        format!("{} {} {}", self.run_id, self.world, self.robot_count)
    }
}

/// Exclusive owner of the on-disk run-state file.
#[derive(Debug, Clone)]
pub struct RunTracker {
    state_path: PathBuf,
}

impl RunTracker {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Record a launch captured at the current time.
    pub fn record(
        &self,
        strategy: RunIdStrategy,
        world: &str,
        robot_count: usize,
    ) -> Result<RunRecord> {
        self.record_at(strategy, world, robot_count, Utc::now())
    }

    /// Record a launch at a fixed timestamp (used for deterministic tests).
    ///
    /// Creates the state file on first use and appends one audit line;
    /// existing history is never clobbered. Any I/O failure is fatal —
    /// the audit trail must not silently lose runs.
    pub fn record_at(
        &self,
        strategy: RunIdStrategy,
        world: &str,
        robot_count: usize,
        timestamp: DateTime<Utc>,
    ) -> Result<RunRecord> {
        let record = RunRecord {
            run_id: strategy.run_id(timestamp),
            world: world.to_string(),
            robot_count,
        };

        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.state_path)
            .map_err(|source| self.io_error(source))?;
        writeln!(file, "{}", record.audit_line()).map_err(|source| self.io_error(source))?;

        Ok(record)
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::StateTracking {
            path: self.state_path.clone(),
            source,
        }
    }
}
