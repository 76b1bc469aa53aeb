//! gn-web — HTTP surface for graphite-news.
//!
//! A thin axum layer over the registry: it serialises snapshots, forwards
//! explicit delete requests to the delete workflow and serves the dashboard.
//! Nothing here holds the registry lock across I/O.

pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use gn_core::{IngestStats, Registry};

pub use routes::router;

/// Settings the HTTP layer reads but never changes.
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// UI auto-refresh hint in milliseconds, passed through to the browser.
    pub json_pull_interval_ms: u64,
    pub graphite_url: String,
    pub allow_delete: bool,
    pub assets_dir: PathBuf,
}

impl From<&gn_core::config::ServerConfig> for WebSettings {
    fn from(cfg: &gn_core::config::ServerConfig) -> Self {
        Self {
            json_pull_interval_ms: cfg.json_pull_interval_ms,
            graphite_url: cfg.graphite_url.clone(),
            allow_delete: cfg.allow_delete,
            assets_dir: cfg.assets_dir.clone(),
        }
    }
}

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub stats: Arc<IngestStats>,
    pub settings: Arc<WebSettings>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, stats: Arc<IngestStats>, settings: WebSettings) -> Self {
        Self {
            registry,
            stats,
            settings: Arc::new(settings),
        }
    }
}

/// Serve the dashboard on an already bound listener until the server fails.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "serving UI on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
