//! Drive Score Simulator - Main Entry Point
//!
//! Feeds a recorded or synthetic drive through the scoring engine, prints
//! every notification as a JSON line on stdout and finishes with a trip
//! summary. Logs go to stderr.

mod cli;
mod replay;
mod scenario;
mod settings;

use clap::Parser;
use cli::Cli;
use drive_score::{ChannelSink, ScoringEngine, Snapshot, TripSummary, Violation};
use metrics_exporter_prometheus::PrometheusBuilder;
use scenario::Scenario;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Notifications buffered between the engine and the printer task
const NOTIFICATION_BUFFER: usize = 1024;

/// End-of-trip report, the shape handed to coaching and storage
#[derive(Debug, Serialize)]
struct TripReport {
    duration_sec: f64,
    final_eco: Option<f64>,
    final_safety: Option<f64>,
    mean_eco: Option<f64>,
    mean_safety: Option<f64>,
    min_safety: Option<f64>,
    notifications: usize,
    violations: Vec<Violation>,
}

impl TripReport {
    fn new(summary: &TripSummary, notifications: usize) -> Self {
        Self {
            duration_sec: summary.duration(),
            final_eco: summary.latest_eco,
            final_safety: summary.latest_safety,
            mean_eco: summary.mean_eco(),
            mean_safety: summary.mean_safety(),
            min_safety: summary.min_safety,
            notifications,
            violations: summary.violations(),
        }
    }
}

fn init_logging(level: Level, json: bool) -> anyhow::Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.json_logs)?;

    info!("=== Drive Score Simulator v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = if cli.print_metrics {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    let config = settings::load_scoring_config(cli.config.as_deref(), &cli.preset.config())?;

    let snapshots: Vec<Snapshot> = match &cli.input {
        Some(path) => replay::read_snapshots(path)?,
        None => {
            info!(duration = cli.duration, "generating built-in scenario");
            Scenario::new(cli.duration).collect()
        }
    };
    if let Some(path) = &cli.record {
        replay::write_snapshots(path, &snapshots)?;
    }

    let (sink, mut rx) = ChannelSink::channel(NOTIFICATION_BUFFER);
    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        while let Some(notification) = rx.recv().await {
            println!("{}", serde_json::to_string(&notification)?);
            printed += 1;
        }
        Ok::<_, anyhow::Error>(printed)
    });

    let mut engine = ScoringEngine::with_sink(config, Box::new(sink));
    for snapshot in &snapshots {
        engine.ingest(snapshot);
        // Let the printer drain between samples
        tokio::task::yield_now().await;
    }

    let summary = engine.summary().clone();
    drop(engine);
    let printed = printer.await??;

    let report = TripReport::new(&summary, printed);
    info!(
        duration = report.duration_sec,
        mean_eco = ?report.mean_eco,
        mean_safety = ?report.mean_safety,
        "trip complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(handle) = metrics {
        println!("{}", handle.render());
    }

    Ok(())
}
