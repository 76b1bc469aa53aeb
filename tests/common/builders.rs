//! Test builders — ergonomic constructors for `Datasource` fixtures.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use graphite_news::core::{Datasource, Registry};

/// Fluent builder for [`Datasource`] test fixtures.
pub struct DatasourceBuilder {
    ds: Datasource,
}

impl DatasourceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ds: Datasource::named(name),
        }
    }

    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.ds.params = params.into();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.ds.filename = filename.into();
        self
    }

    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.ds.created_at = ts;
        self
    }

    pub fn build(self) -> Datasource {
        self.ds
    }
}

/// Insert `series.0 .. series.{n-1}` in order.
pub fn fill_registry(registry: &Registry, n: usize) {
    for i in 0..n {
        registry.insert(Datasource::named(format!("series.{i}")));
    }
}

/// Resident names, oldest first.
pub fn resident_names(registry: &Registry) -> Vec<String> {
    registry.snapshot().into_iter().map(|ds| ds.name).collect()
}
