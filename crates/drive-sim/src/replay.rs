//! JSON-lines snapshot replay and recording
//!
//! Each line holds a timestamp and any subset of signals. Signals missing
//! from a line keep their previous value, the way a bus decoder only
//! refreshes the channels it just received.

use anyhow::{bail, Context};
use drive_score::{Snapshot, SnapshotUpdate};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    timestamp: f64,
    #[serde(flatten)]
    update: SnapshotUpdate,
}

/// Parse snapshots from JSON-lines text
pub fn parse_snapshots(reader: impl BufRead) -> anyhow::Result<Vec<Snapshot>> {
    let mut current = Snapshot::default();
    let mut snapshots = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: ReplayRecord = serde_json::from_str(line)
            .with_context(|| format!("invalid snapshot on line {line_no}"))?;
        if let Some(previous) = snapshots.last().map(|s: &Snapshot| s.timestamp) {
            if record.timestamp < previous {
                bail!(
                    "timestamp {} on line {line_no} goes backwards (previous {previous})",
                    record.timestamp
                );
            }
        }

        current.apply(record.timestamp, &record.update);
        snapshots.push(current.clone());
    }

    debug!(count = snapshots.len(), "parsed replay snapshots");
    Ok(snapshots)
}

/// Load snapshots from a JSON-lines file
pub fn read_snapshots(path: &Path) -> anyhow::Result<Vec<Snapshot>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let snapshots = parse_snapshots(BufReader::new(file))?;
    info!(path = %path.display(), count = snapshots.len(), "loaded replay");
    Ok(snapshots)
}

/// Write snapshots as JSON lines, readable by [`read_snapshots`]
pub fn write_snapshots(path: &Path, snapshots: &[Snapshot]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for snapshot in snapshots {
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = snapshots.len(), "recorded snapshots");
    Ok(())
}
