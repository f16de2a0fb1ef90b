// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Drive a synthetic traffic pool from the command-line.
//!
//! See `lib.rs` for details.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use figment::providers::Serialized;
use gwr_track::builder::{TrackerConfig, setup_tracker};
use gwr_track::entity::{Entity, toplevel};
use gwr_track::{Tracker, error, info};
use gwr_traffic::config::TrafficConfig;
use gwr_traffic::pattern::TrafficPattern;
use gwr_traffic::pool::SyntheticPool;
use gwr_traffic::types::TrafficResult;
use serde::Serialize;
use sim_traffic::driver::{Driver, Summary};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Synthetic traffic pattern application")]
struct Cli {
    /// Enable logging to the console.
    #[arg(long, default_value = "false")]
    stdout: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,

    /// Set a regular expression for which entites should have logging level set
    /// to `--stdout-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    stdout_filter_regex: String,

    /// Write the log to this file rather than the console.
    #[arg(long)]
    log_file: Option<String>,

    /// TOML file containing the traffic configuration.
    #[arg(long)]
    conf_file: Option<PathBuf>,

    /// Number of generation cycles (injection epochs) to run.
    #[arg(long, default_value = "4")]
    cycles: usize,

    /// Percentage of the sends in a cycle that complete before the next one.
    #[arg(long, default_value = "75")]
    completion_percent: usize,

    #[command(flatten)]
    traffic: TrafficArgs,
}

/// Traffic settings that override the configuration file and environment.
#[derive(clap::Args, Serialize)]
struct TrafficArgs {
    /// The number of nodes in the network.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    num_nodes: Option<usize>,

    /// What traffic pattern to use.
    #[arg(long, value_enum)]
    #[serde(rename = "pattern", skip_serializing_if = "Option::is_none")]
    traffic_pattern: Option<TrafficPattern>,

    /// Node receiving all traffic for the hotspot pattern.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    hotspot: Option<usize>,

    /// Whether the hotspot node also sends to itself.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    hotspot_sends_to_self: Option<bool>,

    /// Whether uniform traffic may send to itself.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_self: Option<bool>,

    /// Seed for random number generator.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

fn setup_all_trackers(args: &Cli) -> Result<Tracker, String> {
    let config = TrackerConfig {
        enable: args.stdout || args.log_file.is_some(),
        level: args.stdout_level,
        filter_regex: &args.stdout_filter_regex,
        file: args.log_file.as_deref(),
    };
    setup_tracker(&config).map_err(|e| e.to_string())
}

fn create_config(args: &Cli) -> TrafficResult<TrafficConfig> {
    let figment = TrafficConfig::figment(args.conf_file.as_deref())?
        .merge(Serialized::defaults(&args.traffic));
    TrafficConfig::from_figment(&figment)
}

fn print_summary(top: &Entity, summary: &Summary, pool: &SyntheticPool) {
    info!(top ; "Pattern {}: {} sends over {} cycles.",
        pool.rule(), summary.num_injected, summary.num_cycles);
    if let Some((node, count)) = summary.busiest() {
        info!(top ; "Busiest node {node} received {count} (mean {:.2}).", summary.mean_ingress());
    }
    info!(top ; "{} cleared, {} stale completions ignored.",
        pool.num_cleared(), pool.num_lookup_misses());
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let tracker = match setup_all_trackers(&args) {
        Ok(tracker) => tracker,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let top = toplevel(&tracker, "top");

    let result = create_config(&args).and_then(|config| {
        info!(top ; "Using traffic pattern {} on {} nodes. Random seed {}",
            config.pattern, config.num_nodes, config.seed);
        let pool = SyntheticPool::new(&top, "pool", &config)?;
        Ok((config, pool))
    });

    let exit_code = match result {
        Ok((config, mut pool)) => {
            let mut driver = Driver::new(&top, "driver", args.completion_percent, config.seed);
            let summary = driver.run(&mut pool, args.cycles);
            print_summary(&top, &summary, &pool);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(top ; "{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    };

    tracker.shutdown();
    exit_code
}
