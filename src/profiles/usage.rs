//! Usage event log
//!
//! Append-only JSON-lines log of profile activity, one event per line.
//! Lives at `<data dir>/usage.jsonl`; malformed lines are skipped on read.

use crate::types::{UsageAction, UsageEvent};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the usage log inside the data directory
pub fn log_path(data_root: &Path) -> PathBuf {
    data_root.join("usage.jsonl")
}

/// Append a single event to the log
pub fn append_event(path: &Path, event: &UsageEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }

    let line = serde_json::to_string(event).context("Failed to serialize usage event")?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open usage log {:?}", path))?;
    writeln!(file, "{}", line)
        .with_context(|| format!("Failed to append to usage log {:?}", path))?;

    Ok(())
}

/// Record an event stamped with the current time
pub fn record(path: &Path, profile: &str, action: UsageAction) -> Result<()> {
    append_event(
        path,
        &UsageEvent {
            timestamp: Local::now(),
            profile: profile.to_string(),
            action,
        },
    )
}

/// Load all events from the log
///
/// A missing log is an empty history, not an error.
pub fn load_events(path: &Path) -> Result<Vec<UsageEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read usage log {:?}", path))?;

    let mut events = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<UsageEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed usage log line");
            }
        }
    }

    Ok(events)
}
