//! Operator configuration.
//!
//! Routing parameters, the tracked date labels, the price threshold, and
//! scheduling come from a TOML file (`config/watch.toml` by default,
//! overridable via `WATCH_CONFIG_PATH`). SMTP credentials stay in the
//! environment — see `notify::email`. The loaded value is immutable for
//! the process lifetime and gets passed explicitly into the decision
//! components; nothing reads ambient state at decision time.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::engine::TrackedDateFilter;

const ENV_PATH: &str = "WATCH_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/watch.toml";

/// Query parameters selecting which listing to watch.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub airport: String,
    pub destination: String,
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    pub route: RouteConfig,
    /// Raw combined date/time labels to price-watch, verbatim as they
    /// appear on the listing page.
    pub tracked_dates: Vec<String>,
    /// Whole euros.
    pub price_threshold: u32,
    /// Alert recipients.
    pub recipients: Vec<String>,
    #[serde(default = "default_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_interval_secs() -> u64 {
    3600
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

impl WatchConfig {
    /// Load from `$WATCH_CONFIG_PATH`, falling back to `config/watch.toml`.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        Self::load_from(Path::new(DEFAULT_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::parse(&content)
    }

    fn parse(s: &str) -> Result<Self> {
        let mut cfg: WatchConfig = toml::from_str(s).context("parsing watch config")?;
        cfg.tracked_dates = clean_list(cfg.tracked_dates);
        cfg.recipients = clean_list(cfg.recipients);
        if cfg.recipients.is_empty() {
            return Err(anyhow!("watch config lists no recipients"));
        }
        Ok(cfg)
    }

    /// The per-run gating input for the decision engine.
    pub fn tracked_filter(&self) -> TrackedDateFilter {
        TrackedDateFilter::new(self.tracked_dates.iter().cloned(), self.price_threshold)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("snapshot.json")
    }

    pub fn marker_path(&self) -> PathBuf {
        self.state_dir.join("error_marker.json")
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|x| x == t) {
            out.push(t.to_string());
        }
    }
    out
}
