//! File ingestion integration harness.
//!
//! # What this covers
//!
//! - **Backfill then follow**: lines already in `creates.log` are ingested
//!   when tailing starts, later appends are picked up.
//! - **Glob expansion**: every file matched by a pattern is tailed.
//! - **Rotation**: a rotated log keeps feeding the registry.
//! - **Startup tolerance**: a pattern matching nothing does not stop the
//!   other sources; nothing to tail at all is fatal.
//! - **Fail-fast**: a read error on a running source reaches the fatal
//!   channel.
//!
//! # What this does NOT cover
//!
//! - Files created after startup (discovery runs once)
//!
//! # Running
//!
//! ```sh
//! cargo test --test ingest_harness
//! ```

mod common;
use common::*;

use graphite_news::core::{IngestStats, Registry};
use graphite_news::feeds::{start_ingestion, IngestError, IngestOptions, Ingestion, TailError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const ROOT: &str = "/opt/graphite/storage/whisper";

fn options() -> IngestOptions {
    IngestOptions {
        poll_interval: Duration::from_millis(20),
    }
}

fn append(path: &Path, lines: &[String]) {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

async fn start(patterns: &[String], registry: &Arc<Registry>) -> Ingestion {
    start_ingestion(
        patterns,
        Arc::clone(registry),
        Arc::new(IngestStats::new()),
        options(),
    )
    .await
    .unwrap()
}

/// Poll until the registry holds `n` records or five seconds pass.
async fn wait_for_len(registry: &Registry, n: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while registry.len() < n {
        assert!(
            tokio::time::Instant::now() < deadline,
            "registry stuck at {} of {n}",
            registry.len()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ---------------------------------------------------------------------------
// Basic tailing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn existing_lines_are_backfilled_then_appends_followed() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("creates.log");
    append(&log, &[creates_line(ROOT, "host/cpu"), "astt".to_string()]);

    let registry = Arc::new(Registry::default());
    let ingestion = start(&[log.display().to_string()], &registry).await;
    assert_eq!(ingestion.sources(), &[log.clone()]);

    wait_for_len(&registry, 1).await;
    assert!(registry.find_by_name("host.cpu").is_some());

    append(&log, &[creates_line(ROOT, "host/mem"), creates_line(ROOT, "host/cpu")]);
    wait_for_len(&registry, 2).await;
    assert_eq!(resident_names(&registry), vec!["host.cpu", "host.mem"]);
}

#[tokio::test]
async fn filename_points_at_the_whisper_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("creates.log");
    append(&log, &[creates_line(ROOT, "a/b/c")]);

    let registry = Arc::new(Registry::default());
    let _ingestion = start(&[log.display().to_string()], &registry).await;

    wait_for_len(&registry, 1).await;
    let ds = registry.find_by_name("a.b.c").unwrap();
    assert_eq!(ds.filename, format!("{ROOT}/a/b/c.wsp"));
    assert_eq!(ds.params, PARAMS);
}

// ---------------------------------------------------------------------------
// Glob and startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn glob_tails_every_matching_file() {
    let dir = tempfile::tempdir().unwrap();
    for (file, series) in [("a.log", "one"), ("b.log", "two"), ("c.log", "three")] {
        append(&dir.path().join(file), &[creates_line(ROOT, series)]);
    }

    let registry = Arc::new(Registry::default());
    let ingestion = start(
        &[
            format!("{}/*.log", dir.path().display()),
            format!("{}/missing-*.log", dir.path().display()),
        ],
        &registry,
    )
    .await;

    assert_eq!(ingestion.sources().len(), 3);
    wait_for_len(&registry, 3).await;
}

#[tokio::test]
async fn no_tailable_file_reports_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(Registry::default());
    let mut ingestion = start(&[format!("{}/creates.log", dir.path().display())], &registry).await;

    let err = tokio::time::timeout(Duration::from_secs(1), ingestion.wait())
        .await
        .expect("fatal error should be immediate");
    assert!(matches!(err, IngestError::NoSources));
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rotated_log_keeps_feeding() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("creates.log");
    append(&log, &[creates_line(ROOT, "before")]);

    let registry = Arc::new(Registry::default());
    let _ingestion = start(&[log.display().to_string()], &registry).await;
    wait_for_len(&registry, 1).await;

    std::fs::rename(&log, dir.path().join("creates.log.1")).unwrap();
    append(&log, &[creates_line(ROOT, "after")]);

    wait_for_len(&registry, 2).await;
    assert_eq!(resident_names(&registry), vec!["before", "after"]);
}

#[tokio::test]
async fn dropping_ingestion_stops_feeding() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("creates.log");
    append(&log, &[creates_line(ROOT, "first")]);

    let registry = Arc::new(Registry::default());
    let ingestion = start(&[log.display().to_string()], &registry).await;
    wait_for_len(&registry, 1).await;

    drop(ingestion);
    tokio::time::sleep(Duration::from_millis(50)).await;
    append(&log, &[creates_line(ROOT, "second")]);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.len(), 1);
}

// ---------------------------------------------------------------------------
// Fail-fast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn read_error_on_running_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("creates.log");
    append(&log, &[creates_line(ROOT, "first")]);

    let registry = Arc::new(Registry::default());
    let mut ingestion = start(&[log.display().to_string()], &registry).await;
    wait_for_len(&registry, 1).await;

    // The source reopens whatever now sits at the path; reading a directory fails.
    std::fs::rename(&log, dir.path().join("creates.log.1")).unwrap();
    std::fs::create_dir(&log).unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), ingestion.wait())
        .await
        .expect("read error should reach the fatal channel");
    match err {
        IngestError::Tail(TailError::Io { path, .. }) => assert_eq!(path, log),
        other => panic!("expected a tail I/O error, got {other:?}"),
    }
}
