//! Download history
//!
//! Every completed flow appends one JSON line with the resolved asset id and
//! a timestamp. The history is write-mostly; `zen-dl history` reads it back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::flow::DownloadLog;
use crate::release::AssetId;
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub asset: AssetId,
    pub downloaded_at: DateTime<Utc>,
}

/// File-backed [`DownloadLog`].
pub struct DownloadHistory<'r, R: Runtime> {
    runtime: &'r R,
    path: PathBuf,
}

impl<'r, R: Runtime> DownloadHistory<'r, R> {
    pub fn new(runtime: &'r R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn append(&self, record: &DownloadRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !self.runtime.exists(parent) {
                self.runtime
                    .create_dir_all(parent)
                    .with_context(|| format!("Failed to create history directory {:?}", parent))?;
            }
        }

        let mut line = serde_json::to_string(record).context("Failed to serialize download record")?;
        line.push('\n');
        self.runtime
            .append(&self.path, line.as_bytes())
            .with_context(|| format!("Failed to write download history {:?}", self.path))
    }

    /// All readable records, oldest first. A missing file is an empty history.
    #[tracing::instrument(skip(self))]
    pub fn entries(&self) -> Result<Vec<DownloadRecord>> {
        if !self.runtime.exists(&self.path) {
            debug!("No download history at {:?}", self.path);
            return Ok(Vec::new());
        }

        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read download history {:?}", self.path))?;

        let mut records = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping malformed history line {} in {:?}: {}",
                    number + 1,
                    self.path,
                    e
                ),
            }
        }
        Ok(records)
    }
}

impl<R: Runtime> DownloadLog for DownloadHistory<'_, R> {
    fn record(&self, asset: &AssetId) {
        let record = DownloadRecord {
            asset: asset.clone(),
            downloaded_at: Utc::now(),
        };
        if let Err(e) = self.append(&record) {
            warn!("Could not record download of {}: {:#}", asset, e);
        }
    }
}
