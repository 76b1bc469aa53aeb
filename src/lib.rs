//! graphite-news — shows which new metric series carbon has created.
//!
//! Tails one or more carbon `creates.log` files, keeps the most recently
//! created series in a bounded in-memory registry and serves them to a small
//! dashboard. The layers live in their own crates and are re-exported here so
//! integration tests can reach them through one dependency.
//!
//! # Architecture
//!
//! ```text
//! creates.log ──► gn-feeds (discover, tail) ──► gn-core (parse, Registry) ◄── gn-web
//! ```
//!
//! A fatal tailing error ends [`run`], and with it the process. There is no
//! degraded mode that keeps serving a registry nobody is feeding.

pub use gn_core as core;
pub use gn_feeds as feeds;
pub use gn_web as web;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use gn_core::{config::Config, IngestStats, Registry};
use gn_feeds::{start_ingestion, IngestOptions};
use gn_web::{AppState, WebSettings};

/// Start ingestion and the HTTP server, then wait until one of them fails or
/// the process is interrupted.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let registry = Arc::new(Registry::new(config.ingest.max_state));
    let stats = Arc::new(IngestStats::new());

    let mut ingestion = start_ingestion(
        &config.ingest.log_files,
        Arc::clone(&registry),
        Arc::clone(&stats),
        IngestOptions {
            poll_interval: Duration::from_millis(config.ingest.poll_interval_ms),
        },
    )
    .await
    .context("invalid log file pattern")?;

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("failed to listen on {}", config.server.listen))?;
    let state = AppState::new(registry, stats, WebSettings::from(&config.server));
    let mut server = tokio::spawn(gn_web::serve(listener, state));

    tracing::info!("Graphite News -- showing which new metrics are available");

    let outcome = tokio::select! {
        err = ingestion.wait() => Outcome::Ingestion(err),
        res = &mut server => Outcome::Server(res),
        _ = tokio::signal::ctrl_c() => Outcome::Interrupted,
    };
    server.abort();
    ingestion.shutdown();

    match outcome {
        Outcome::Ingestion(err) => Err(anyhow::Error::new(err).context("ingestion stopped")),
        Outcome::Server(Ok(Ok(()))) => anyhow::bail!("HTTP server exited"),
        Outcome::Server(Ok(Err(err))) => Err(err.context("HTTP server failed")),
        Outcome::Server(Err(join)) => Err(anyhow::Error::new(join).context("HTTP server task failed")),
        Outcome::Interrupted => {
            tracing::info!("interrupted; shutting down");
            Ok(())
        }
    }
}

enum Outcome {
    Ingestion(gn_feeds::IngestError),
    Server(Result<anyhow::Result<()>, tokio::task::JoinError>),
    Interrupted,
}
