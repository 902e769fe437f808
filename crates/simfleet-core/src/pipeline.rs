//! Launch pipeline orchestration.
//!
//! Fully sequential: validate, expand the topology, record the run,
//! render and write the manifest, then hand it to compose. Nothing is
//! written before validation passes, and no process is spawned before
//! tracking succeeds.

use crate::config::LaunchConfig;
use crate::error::Result;
use crate::launcher;
use crate::manifest;
use crate::params::SimParams;
use crate::run_state::{RunRecord, RunTracker};
use crate::topology::build_topology;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

/// Result of manifest synthesis for one run.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    /// Identity recorded for this run.
    pub record: RunRecord,

    /// Where the manifest was written.
    pub manifest_path: PathBuf,

    /// SHA-256 of the rendered document. Identical parameters and
    /// template always reproduce the same digest.
    pub manifest_digest: String,

    /// Number of service blocks in the manifest.
    pub service_count: usize,
}

/// Sequential launch orchestrator.
pub struct LaunchPipeline;

impl LaunchPipeline {
    /// Synthesize the manifest for this run without launching anything.
    ///
    /// This is the dry-run surface: after it returns, the manifest is on
    /// disk and the run is recorded, but compose has not been invoked.
    pub fn plan(config: &LaunchConfig, params: &SimParams) -> Result<LaunchReport> {
        Self::plan_at(config, params, Utc::now())
    }

    /// Synthesize at a fixed capture time (used for deterministic tests).
    pub fn plan_at(
        config: &LaunchConfig,
        params: &SimParams,
        timestamp: DateTime<Utc>,
    ) -> Result<LaunchReport> {
        params.validate()?;
        info!(world = %params.world, robots = params.robot_count, "validate: parameters ok");

        let services = build_topology(params);
        info!(services = services.len(), "build: topology expanded");

        let tracker = RunTracker::new(config.state_file_path());
        let record = tracker.record_at(
            config.strategy,
            &params.world,
            params.robot_count,
            timestamp,
        )?;
        info!(run_id = %record.run_id, "track: run recorded");

        let template = manifest::load_or_create_template(&config.template_path)?;
        let document = manifest::render(&services, &template, &config.defaults_anchor);
        let digest = manifest::manifest_digest(&document);

        let manifest_path = config.manifest_path(&record.run_id);
        manifest::write_manifest(&manifest_path, &document)?;
        info!(
            manifest = %manifest_path.display(),
            digest = %digest,
            "write: manifest generated"
        );

        Ok(LaunchReport {
            record,
            manifest_path,
            manifest_digest: digest,
            service_count: services.len(),
        })
    }

    /// Synthesize the manifest, then hand it to the compose runtime.
    ///
    /// The compose exit status is propagated through the error; this
    /// core never retries a failed launch.
    pub async fn up(config: &LaunchConfig, params: &SimParams) -> Result<LaunchReport> {
        let report = Self::plan(config, params)?;
        launcher::launch(&config.compose_bin, &report.manifest_path, config.detached).await?;
        info!(run_id = %report.record.run_id, "launch: compose finished");
        Ok(report)
    }
}
