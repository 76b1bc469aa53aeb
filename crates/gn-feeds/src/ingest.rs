//! Ingestion supervisor — discovery, one tail task per file, and the single
//! fatal error channel.
//!
//! Every discovered file is opened before any task is spawned, so files that
//! cannot be opened are known (and logged) up front and do not affect the
//! others. Once running, the first tail error from any task is delivered on
//! the fatal channel and the caller is expected to shut the process down.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use gn_core::{classify_line, IngestStats, LineOutcome, Registry};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::discovery::{discover, DiscoveryError};
use crate::tail::{TailError, TailSource};

/// Terminal condition of the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Tail(#[from] TailError),

    #[error("no log file could be tailed")]
    NoSources,

    #[error("all tail sources stopped")]
    Stopped,
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Fallback wake-up interval when no filesystem event arrives.
    pub poll_interval: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
        }
    }
}

type FatalSlot = Arc<Mutex<Option<oneshot::Sender<IngestError>>>>;

/// Running pipeline. Dropping it aborts every tail task.
pub struct Ingestion {
    sources: Vec<PathBuf>,
    handles: Vec<JoinHandle<()>>,
    fatal: oneshot::Receiver<IngestError>,
}

impl Ingestion {
    /// Files being tailed.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Resolve with the first fatal error. Never resolves while every source
    /// is healthy. Call at most once.
    pub async fn wait(&mut self) -> IngestError {
        (&mut self.fatal).await.unwrap_or(IngestError::Stopped)
    }

    pub fn shutdown(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl Drop for Ingestion {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Discover files matching `patterns` and start tailing each of them into
/// `registry`.
///
/// Only an invalid pattern is an error here; every runtime failure,
/// including "nothing could be tailed", arrives through [`Ingestion::wait`].
pub async fn start_ingestion<S: AsRef<str>>(
    patterns: &[S],
    registry: Arc<Registry>,
    stats: Arc<IngestStats>,
    options: IngestOptions,
) -> Result<Ingestion, DiscoveryError> {
    let (tx, fatal) = oneshot::channel();
    let slot: FatalSlot = Arc::new(Mutex::new(Some(tx)));

    let mut sources = Vec::new();
    let mut handles = Vec::new();
    for path in discover(patterns)? {
        let source = match TailSource::open(&path, options.poll_interval).await {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "log file not tailed");
                continue;
            }
        };
        sources.push(path);
        handles.push(tokio::spawn(run_source(
            source,
            Arc::clone(&registry),
            Arc::clone(&stats),
            Arc::clone(&slot),
        )));
    }

    if sources.is_empty() {
        report_fatal(&slot, IngestError::NoSources);
    } else {
        tracing::info!(count = sources.len(), "ingestion started");
    }

    Ok(Ingestion {
        sources,
        handles,
        fatal,
    })
}

/// Feed one raw line through the parser into the registry. Returns `true`
/// when a new datasource was registered.
pub fn ingest_line(line: &str, registry: &Registry, stats: &IngestStats) -> bool {
    stats.record_line();
    let ds = match classify_line(line) {
        LineOutcome::Record(ds) => ds,
        LineOutcome::NoMatch | LineOutcome::InvalidName => {
            stats.record_miss();
            return false;
        }
    };

    let name = ds.name.clone();
    if !registry.insert(ds) {
        return false;
    }
    stats.record_datasource();
    tracing::info!(name = %name, total = registry.len(), "new datasource");
    true
}

async fn run_source(
    mut source: TailSource,
    registry: Arc<Registry>,
    stats: Arc<IngestStats>,
    fatal: FatalSlot,
) {
    loop {
        match source.next_line().await {
            Ok(line) => {
                ingest_line(&line, &registry, &stats);
            }
            Err(err) => {
                tracing::error!(path = %source.path().display(), error = %err, "tailing failed");
                report_fatal(&fatal, err.into());
                return;
            }
        }
    }
}

fn report_fatal(slot: &FatalSlot, err: IngestError) {
    let sender = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(tx) = sender {
        // The receiver may already be gone during shutdown.
        let _ = tx.send(err);
    }
}
