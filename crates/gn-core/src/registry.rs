//! Registry — bounded, deduplicated, insertion-ordered store of discovered
//! [`Datasource`] records.
//!
//! The registry is the single shared mutable resource of the process. Every
//! tail source inserts into it and every HTTP request reads from it, so all
//! access goes through one reader/writer lock around a contiguous `Vec`.
//! Readers only ever receive clones; nothing is serialised or written to disk
//! while the lock is held.
//!
//! # Invariants
//!
//! - at most `capacity` records are resident;
//! - no two resident records share a name (first insert wins);
//! - resident records keep insertion order, eviction drops from the front.
//!
//! Duplicate detection is a linear scan. At the default capacity of 100 this
//! is cheaper than maintaining a side index, but it does not scale to much
//! larger capacities.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{is_valid_name, Datasource};

/// Default number of resident records.
pub const DEFAULT_MAX_STATE: usize = 100;

/// Largest capacity the configuration accepts. Duplicate detection scans
/// every resident record, so the bound keeps inserts cheap.
pub const MAX_STATE_LIMIT: usize = 100_000;

/// Concurrency-safe store of the most recently discovered datasources.
#[derive(Debug)]
pub struct Registry {
    capacity: usize,
    vals: RwLock<Vec<Datasource>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATE)
    }
}

impl Registry {
    /// Create an empty registry holding at most `capacity` records. A zero
    /// capacity is treated as [`DEFAULT_MAX_STATE`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_MAX_STATE
        } else {
            capacity
        };
        Self {
            capacity,
            vals: RwLock::new(Vec::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `ds` unless its name is invalid or already resident.
    ///
    /// Returns `true` when the record was added. If the append pushes the
    /// count over capacity the oldest records are evicted.
    pub fn insert(&self, ds: Datasource) -> bool {
        if !is_valid_name(&ds.name) {
            return false;
        }

        let mut vals = self.write();
        if vals.iter().any(|resident| resident.name == ds.name) {
            return false;
        }
        vals.push(ds);
        if vals.len() > self.capacity {
            let excess = vals.len() - self.capacity;
            vals.drain(..excess);
        }
        true
    }

    /// Copy of every resident record, oldest first.
    pub fn snapshot(&self) -> Vec<Datasource> {
        self.read().clone()
    }

    /// Exact, case-sensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<Datasource> {
        self.read().iter().find(|ds| ds.name == name).cloned()
    }

    /// Remove the record called `name`, keeping the order of the rest.
    /// Returns `false` when nothing was removed.
    pub fn remove_by_name(&self, name: &str) -> bool {
        let mut vals = self.write();
        match vals.iter().position(|ds| ds.name == name) {
            Some(idx) => {
                vals.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every critical section leaves the Vec structurally valid, so a panic
    // in another holder does not invalidate the data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Datasource>> {
        self.vals.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Datasource>> {
        self.vals.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
