//! Cache gate and snapshot file I/O.
//!
//! The gate decides, per acquisition call, whether to serve a previous
//! snapshot or fetch afresh:
//!
//! | `cached` | snapshot on disk | Result |
//! |----------|------------------|--------|
//! | `true`   | present          | snapshot contents, no network |
//! | `true`   | absent           | [`Error::CacheMissing`], no network |
//! | `false`  | either           | fresh fetch, written over the snapshot |
//!
//! A present snapshot is trusted as-is: there is no staleness check and no
//! merging with fresh results.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::utils::{ensure_writable_dir, looks_truncated};
use std::future::Future;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Serve `path` when `cached` is set, otherwise run `fetch` and persist its
/// result to `path`.
///
/// A failed fetch writes nothing and leaves any existing snapshot alone.
#[instrument(level = "info", skip_all, fields(path = %path.display(), cached = cached))]
pub async fn load_or_fetch<F, Fut>(path: &Path, cached: bool, fetch: F) -> Result<Table>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Table>>,
{
    if cached {
        if !fs::try_exists(path).await? {
            warn!("Cache requested but no snapshot exists");
            return Err(Error::CacheMissing {
                path: path.to_path_buf(),
            });
        }
        let table = read_snapshot(path).await?;
        info!(rows = table.len(), "Served articles from cache");
        return Ok(table);
    }

    let table = fetch().await?;
    write_snapshot(&table, path).await?;
    Ok(table)
}

/// Read a snapshot file into a [`Table`].
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn read_snapshot(path: &Path) -> Result<Table> {
    let json = fs::read_to_string(path).await?;
    Table::from_json_str(&json).inspect_err(|e| {
        if let Error::Json(inner) = e {
            if looks_truncated(inner) {
                error!(error = %inner, "Snapshot ends early; it was probably cut off mid-write");
            }
        }
    })
}

/// Serialize `table` to `path`, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = table.len()))]
pub async fn write_snapshot(table: &Table, path: &Path) -> Result<()> {
    let json = table.to_json_string()?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_writable_dir(dir).await?;
    }
    fs::write(path, json).await?;
    info!("Wrote snapshot");
    Ok(())
}
