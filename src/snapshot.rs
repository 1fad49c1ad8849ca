//! Persisted run-to-run state: the flight snapshot and the error marker.
//!
//! Both live as small JSON files under the state directory. A missing file
//! is a normal first run and loads as the empty default; an unreadable or
//! corrupt file is a hard error, because silently starting from empty state
//! would re-fire every alert. Writes go to a sibling temp file and are
//! renamed into place so a crash mid-write leaves the previous file intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::offer::FlightKey;

/// Per-key state carried between runs. `urgency_alert_sent` only ever goes
/// false -> true while the key stays listed; it resets by the key dropping
/// out of the snapshot and reappearing in a later listing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightState {
    pub last_known_price: u32,
    #[serde(default)]
    pub urgency_alert_sent: bool,
}

/// Mapping of flight identity to last-known state. Replaced wholesale on
/// every successful run — never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub flights: BTreeMap<FlightKey, FlightState>,
}

impl Snapshot {
    pub fn get(&self, key: &FlightKey) -> Option<&FlightState> {
        self.flights.get(key)
    }

    pub fn insert(&mut self, key: FlightKey, state: FlightState) {
        self.flights.insert(key, state);
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

/// Throttle state for upstream-fetch failures, independent lifecycle from
/// the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMarker {
    pub last_error_notification_date: Option<NaiveDate>,
}

fn load_json_or<T>(path: &Path, empty: T) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(empty),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn persist_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    let tmp = path.with_extension("tmp");
    let body = serde_json::to_vec_pretty(value).context("serializing state")?;
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("replacing {} with {}", path.display(), tmp.display()))
}

/// File-backed store for the [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Empty snapshot when the file does not exist yet (first run).
    pub fn load(&self) -> Result<Snapshot> {
        load_json_or(&self.path, Snapshot::default())
    }

    pub fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        persist_json(&self.path, snapshot)
    }
}

/// File-backed store for the [`ErrorMarker`].
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<ErrorMarker> {
        load_json_or(&self.path, ErrorMarker::default())
    }

    pub fn persist(&self, marker: &ErrorMarker) -> Result<()> {
        persist_json(&self.path, marker)
    }
}
