use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

const APP_DIR: &str = "zen-dl";
const HISTORY_FILE: &str = "downloads.jsonl";

/// Where downloaded files go: the user's download directory, else home,
/// else the current directory.
#[tracing::instrument(skip(runtime))]
pub fn default_output_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if let Some(dir) = runtime.download_dir() {
        return Ok(dir);
    }
    if let Some(home) = runtime.home_dir() {
        debug!("No download directory; using home {:?}", home);
        return Ok(home);
    }
    runtime.current_dir()
}

/// `<data dir>/zen-dl/downloads.jsonl`, falling back to `~/.zen-dl/`.
#[tracing::instrument(skip(runtime))]
pub fn default_history_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let dir = match runtime.data_dir() {
        Some(data) => data.join(APP_DIR),
        None => runtime
            .home_dir()
            .context("Could not find a data or home directory for the download history")?
            .join(format!(".{}", APP_DIR)),
    };
    Ok(dir.join(HISTORY_FILE))
}
