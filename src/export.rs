//! Export Module
//!
//! Writes a full, unpaginated dataset to disk as a JSON document. The file
//! is written to a temporary sibling and renamed into place, so a failed or
//! cancelled export never leaves partial output at the destination.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dataset::{Dataset, DatasetError};

/// Bytes written between cancellation checks
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot serialize export document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("export to {} was cancelled", .0.display())]
    Cancelled(PathBuf),

    #[error("export file has an unexpected shape: {0}")]
    Malformed(#[from] DatasetError),
}

// == Export Record ==
/// Summary of one completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub destination_path: PathBuf,
    pub byte_size: u64,
    pub item_count: usize,
    pub generated_at: DateTime<Utc>,
}

// == Export Document ==
/// On-disk layout of an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub generated_at: DateTime<Utc>,
    pub item_count: usize,
    pub data: Value,
}

impl ExportDocument {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            generated_at: Utc::now(),
            item_count: dataset.len(),
            data: dataset.to_json(),
        }
    }

    /// Rebuilds the exported dataset.
    pub fn into_dataset(self) -> Result<Dataset, DatasetError> {
        Dataset::from_json(self.data)
    }
}

// == Export ==
/// Writes `dataset` to `destination`, replacing any existing file.
pub fn export(dataset: &Dataset, destination: &Path) -> Result<ExportRecord, ExportError> {
    write_export(dataset, destination, &CancellationToken::new())
}

/// Runs the export on the blocking pool, aborting between chunks once
/// `cancel` fires. A cancelled export removes its temporary file.
///
/// Dropping the returned future before it completes cancels `cancel`.
pub async fn export_cancellable(
    dataset: Arc<Dataset>,
    destination: PathBuf,
    cancel: CancellationToken,
) -> Result<ExportRecord, ExportError> {
    let path = destination.clone();
    let worker_cancel = cancel.clone();
    let guard = cancel.drop_guard();
    let result =
        tokio::task::spawn_blocking(move || write_export(&dataset, &destination, &worker_cancel))
            .await;
    guard.disarm();
    result
        .map_err(|err| ExportError::Io {
            path,
            source: io::Error::new(io::ErrorKind::Other, err),
        })?
}

fn write_export(
    dataset: &Dataset,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<ExportRecord, ExportError> {
    let document = ExportDocument::new(dataset);
    let bytes = serde_json::to_vec_pretty(&document)?;

    let io_error = |source: io::Error| ExportError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent).map_err(io_error)?;

    for chunk in bytes.chunks(CHUNK_SIZE) {
        if cancel.is_cancelled() {
            warn!(path = %destination.display(), "export cancelled");
            return Err(ExportError::Cancelled(destination.to_path_buf()));
        }
        staged.write_all(chunk).map_err(io_error)?;
    }
    if cancel.is_cancelled() {
        warn!(path = %destination.display(), "export cancelled");
        return Err(ExportError::Cancelled(destination.to_path_buf()));
    }

    staged.as_file().sync_all().map_err(io_error)?;
    staged
        .persist(destination)
        .map_err(|err| io_error(err.error))?;

    info!(
        path = %destination.display(),
        bytes = bytes.len(),
        items = document.item_count,
        "dataset exported"
    );

    Ok(ExportRecord {
        destination_path: destination.to_path_buf(),
        byte_size: bytes.len() as u64,
        item_count: document.item_count,
        generated_at: document.generated_at,
    })
}

/// Reads an export file back.
pub fn read_export(path: &Path) -> Result<ExportDocument, ExportError> {
    let bytes = std::fs::read(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}
