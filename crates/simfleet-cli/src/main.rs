//! simfleet - multi-robot simulation fleet launcher
//!
//! Expands simulation parameters into a docker-compose topology and
//! hands the generated manifest to the compose runtime.
//!
//! ## Commands
//!
//! - `up`: generate the manifest and launch the fleet
//! - `plan`: generate the manifest without launching (dry run)
//! - `topology`: print the expanded service topology as JSON

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use simfleet_core::{
    Error, LaunchConfig, LaunchPipeline, RunIdStrategy, SimOptions, SimParams,
};
use std::path::PathBuf;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "simfleet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-robot simulation fleet launcher", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the manifest and launch the fleet
    Up {
        #[command(flatten)]
        sim: SimArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Detach compose (`up -d`) instead of staying in the foreground
        #[arg(short, long)]
        detach: bool,
    },

    /// Generate the manifest without launching anything
    Plan {
        #[command(flatten)]
        sim: SimArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the expanded service topology as JSON
    Topology {
        #[command(flatten)]
        sim: SimArgs,
    },
}

/// Simulation inputs shared by every subcommand.
#[derive(Args)]
struct SimArgs {
    /// Name of the world to simulate
    #[arg(short, long)]
    world: String,

    /// Number of robots to simulate
    #[arg(short = 'n', long = "robots")]
    robots: usize,

    /// Flat position list, three values (x y z) per robot
    #[arg(short, long, value_name = "POS", num_args = 0.., allow_negative_numbers = true)]
    positions: Vec<f64>,

    /// Launch RViz visualization (boolean-like: true/1/yes/on)
    #[arg(long, default_value = "false")]
    rviz: String,

    /// Exploration strategy (default strategy when omitted)
    #[arg(long)]
    explore: Option<String>,
}

impl SimArgs {
    fn to_params(&self) -> SimParams {
        let mut pairs = vec![("rviz", self.rviz.as_str())];
        if let Some(strategy) = &self.explore {
            pairs.push(("explore", strategy.as_str()));
        }
        SimParams::new(
            &self.world,
            self.robots,
            self.positions.clone(),
            SimOptions::from_pairs(pairs),
        )
    }
}

/// Launcher configuration shared by `up` and `plan`.
#[derive(Args)]
struct ConfigArgs {
    /// Directory for generated manifests and the run log
    #[arg(long, default_value = "runs")]
    runs_dir: PathBuf,

    /// Base compose template merged into every manifest
    #[arg(long, default_value = "base_docker_compose.yml")]
    template: PathBuf,

    /// Compose binary to invoke
    #[arg(long, default_value = "docker-compose")]
    compose_bin: String,

    /// Run identity strategy
    #[arg(long, value_enum, default_value_t = Strategy::Timestamped)]
    strategy: Strategy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Unique run id per launch; manifests accumulate
    Timestamped,

    /// Fixed `current` run id; one manifest path, overwritten
    Sentinel,
}

impl From<Strategy> for RunIdStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Timestamped => RunIdStrategy::Timestamped,
            Strategy::Sentinel => RunIdStrategy::Sentinel,
        }
    }
}

impl ConfigArgs {
    fn to_config(&self, detached: bool) -> LaunchConfig {
        LaunchConfig {
            runs_dir: self.runs_dir.clone(),
            template_path: self.template.clone(),
            compose_bin: self.compose_bin.clone(),
            strategy: self.strategy.into(),
            detached,
            ..LaunchConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    simfleet_core::init_tracing(cli.json, level);

    if let Err(err) = run(cli).await {
        error!("{err:#}");
        let code = err
            .downcast_ref::<Error>()
            .map(Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Up {
            sim,
            config,
            detach,
        } => cmd_up(&sim, &config.to_config(detach)).await,
        Commands::Plan { sim, config } => cmd_plan(&sim, &config.to_config(false)),
        Commands::Topology { sim } => cmd_topology(&sim),
    }
}

async fn cmd_up(sim: &SimArgs, config: &LaunchConfig) -> Result<()> {
    let report = LaunchPipeline::up(config, &sim.to_params()).await?;
    println!(
        "launched run {} ({} services) from {}",
        report.record.run_id,
        report.service_count,
        report.manifest_path.display()
    );
    Ok(())
}

fn cmd_plan(sim: &SimArgs, config: &LaunchConfig) -> Result<()> {
    let report = LaunchPipeline::plan(config, &sim.to_params())?;
    println!("manifest: {}", report.manifest_path.display());
    println!("digest: sha256:{}", report.manifest_digest);
    println!("services: {}", report.service_count);
    Ok(())
}

fn cmd_topology(sim: &SimArgs) -> Result<()> {
    let params = sim.to_params();
    params.validate()?;
    let services = simfleet_core::build_topology(&params);
    let rendered =
        serde_json::to_string_pretty(&services).context("failed to serialize topology")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_up_with_positions() {
        let cli = Cli::try_parse_from([
            "simfleet", "up", "-w", "warehouse", "-n", "2", "-p", "1", "2", "0", "3", "4", "0",
            "--rviz", "true", "--explore", "random", "--strategy", "sentinel",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Up { sim, config, .. } => {
                let params = sim.to_params();
                assert_eq!(params.world, "warehouse");
                assert_eq!(params.robot_count, 2);
                assert_eq!(params.positions.len(), 6);
                assert!(params.options.rviz);
                assert_eq!(params.options.explore_strategy.as_deref(), Some("random"));
                assert!(matches!(
                    config.to_config(false).strategy,
                    RunIdStrategy::Sentinel
                ));
            }
            _ => panic!("expected up subcommand"),
        }
    }

    #[test]
    fn test_parse_topology_defaults() {
        let cli = Cli::try_parse_from(["simfleet", "topology", "-w", "empty", "-n", "0"])
            .expect("parse failed");

        match cli.command {
            Commands::Topology { sim } => {
                let params = sim.to_params();
                assert_eq!(params.robot_count, 0);
                assert!(params.positions.is_empty());
                assert!(!params.options.rviz);
                assert!(params.options.explore_strategy.is_none());
            }
            _ => panic!("expected topology subcommand"),
        }
    }

    #[test]
    fn test_parse_negative_positions() {
        let cli = Cli::try_parse_from([
            "simfleet", "plan", "-w", "warehouse", "-n", "1", "-p", "-1.5", "2", "0",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Plan { sim, .. } => {
                assert_eq!(sim.to_params().positions, vec![-1.5, 2.0, 0.0]);
            }
            _ => panic!("expected plan subcommand"),
        }
    }
}
