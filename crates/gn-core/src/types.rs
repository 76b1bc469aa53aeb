//! Core types for gn-core — Graphite News.
//!
//! This module defines the [`Datasource`] record shared by every layer: the
//! line parser produces it, the registry stores it, the delete workflow and
//! the HTTP surface consume it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One metric series whose storage file was just created by the daemon.
///
/// Serialises to the externally visible JSON shape
/// `{"Name": .., "Create_date": .., "Params": ..}`. The backing `filename` is
/// never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datasource {
    /// Dot-delimited series name, e.g. `host.disk.free`.
    #[serde(rename = "Name")]
    pub name: String,
    /// Creation time taken from the log line. [`unknown_created_at`] when the
    /// embedded timestamp could not be parsed.
    #[serde(rename = "Create_date")]
    pub created_at: DateTime<Utc>,
    /// Free-form trailing metadata (retention / aggregation parameters).
    #[serde(rename = "Params")]
    pub params: String,
    /// Path of the backing storage file on disk.
    #[serde(skip)]
    pub filename: String,
}

impl Datasource {
    /// A record with only a name; the remaining fields are empty and the
    /// creation time is unknown.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: unknown_created_at(),
            params: String::new(),
            filename: String::new(),
        }
    }

    /// Whether `created_at` carries a real parsed timestamp.
    pub fn has_created_at(&self) -> bool {
        self.created_at != unknown_created_at()
    }
}

/// Returns `true` when `name` may be stored: non-empty and not ending in a dot.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.ends_with('.')
}

/// The zero timestamp, `0001-01-01T00:00:00Z`, used when a creation time is
/// missing or unparseable.
pub fn unknown_created_at() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
        .and_utc()
}
