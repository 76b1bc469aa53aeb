//! Ingestion counters shared by every tail source.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters updated by the ingestion pipeline.
#[derive(Debug, Default)]
pub struct IngestStats {
    input_lines: AtomicU64,
    datasources: AtomicU64,
    parse_misses: AtomicU64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self) {
        self.input_lines.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_datasource(&self) {
        self.datasources.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.parse_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn input_lines(&self) -> u64 {
        self.input_lines.load(Ordering::Relaxed)
    }

    pub fn datasources(&self) -> u64 {
        self.datasources.load(Ordering::Relaxed)
    }

    pub fn parse_misses(&self) -> u64 {
        self.parse_misses.load(Ordering::Relaxed)
    }

    /// Counter values keyed by their external names (`tail/input_lines`, ...).
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        BTreeMap::from([
            ("tail/input_lines", self.input_lines()),
            ("tail/datasources", self.datasources()),
            ("tail/parse_misses", self.parse_misses()),
        ])
    }
}
