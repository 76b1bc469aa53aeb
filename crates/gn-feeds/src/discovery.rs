//! File discovery — expand configured log path patterns into concrete files.
//!
//! Runs once at startup. Files that appear later are not picked up.

use std::collections::HashSet;
use std::path::PathBuf;

use glob::glob;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid log file pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Expand every pattern and return the matching files, deduplicated, in
/// first-seen order. Patterns matching nothing contribute nothing.
pub fn discover<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = glob(pattern).map_err(|e| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let before = paths.len();
        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(pattern, error = %err, "skipping unreadable glob match");
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }

        if paths.len() == before {
            tracing::debug!(pattern, "log file pattern matched no new files");
        }
    }

    Ok(paths)
}
