pub(crate) mod local;
pub(crate) mod questions;
pub(crate) mod results;
pub(crate) mod settings;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: path.display().to_string(), source }
}

/// Read a whole JSON document. `Ok(None)` when the file does not exist yet.
pub(super) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(path, err)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Malformed { path: path.display().to_string(), source })
}

/// Replace a JSON document wholesale: write a sibling temp file, then rename
/// over the target so readers never observe a half-written file.
pub(super) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| io_error(path, err))?;
    }

    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| StoreError::Malformed { path: path.display().to_string(), source })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(|err| io_error(&tmp, err))?;
    tokio::fs::rename(&tmp, path).await.map_err(|err| io_error(path, err))?;

    Ok(())
}
