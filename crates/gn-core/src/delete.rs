//! Delete workflow — remove a series' backing file, then its registry entry.
//!
//! The order is fixed: the registry entry is removed only after the file is
//! confirmed gone. A failure at any step leaves the registry untouched, so
//! the registry never forgets a series whose file still exists.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::registry::Registry;

/// Why a delete did not happen.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("no datasource named {0:?} is registered")]
    NotRegistered(String),

    #[error("datasource {0:?} has no backing file")]
    NoBackingFile(String),

    #[error("backing file {} does not exist", .0.display())]
    FileMissing(PathBuf),

    #[error("failed to remove {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Delete the datasource called `name` from disk and from `registry`.
///
/// On success returns the path of the removed file. If the registry entry
/// has already been removed by a concurrent caller once the file is gone,
/// the delete still counts as successful.
pub async fn try_delete(registry: &Registry, name: &str) -> Result<PathBuf, DeleteError> {
    let ds = registry
        .find_by_name(name)
        .ok_or_else(|| DeleteError::NotRegistered(name.to_string()))?;
    if ds.filename.is_empty() {
        return Err(DeleteError::NoBackingFile(ds.name));
    }

    let path = PathBuf::from(ds.filename);
    remove_backing_file(&path).await?;

    if !registry.remove_by_name(name) {
        tracing::debug!(name, "registry entry already removed by a concurrent delete");
    }
    Ok(path)
}

/// Boolean form of [`try_delete`]; failures are logged and reported as `false`.
pub async fn delete_datasource(registry: &Registry, name: &str) -> bool {
    match try_delete(registry, name).await {
        Ok(path) => {
            tracing::info!(name, path = %path.display(), "deleted datasource");
            true
        }
        Err(err) => {
            tracing::warn!(name, error = %err, "datasource delete failed");
            false
        }
    }
}

async fn remove_backing_file(path: &Path) -> Result<(), DeleteError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(DeleteError::FileMissing(path.to_path_buf()))
        }
        Err(source) => Err(DeleteError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
