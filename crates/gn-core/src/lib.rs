//! gn-core — Graphite News core library.
//!
//! Everything with real invariants lives here: the [`Datasource`] record, the
//! pure line parser, the bounded deduplicating [`Registry`] and the delete
//! workflow. Feeds and the HTTP surface are thin layers on top.
//!
//! # Architecture
//!
//! ```text
//! Discovery ──► Tail source(s) ──► Parser ──► Registry ◄── HTTP (snapshot, delete)
//! ```
//!
//! One [`Registry`] is created at startup and handed to every component that
//! needs it; there is no global instance.

pub mod config;
pub mod delete;
pub mod parser;
pub mod registry;
pub mod stats;
pub mod types;

pub use delete::{delete_datasource, try_delete, DeleteError};
pub use parser::{classify_line, parse_line, LineOutcome};
pub use registry::{Registry, DEFAULT_MAX_STATE, MAX_STATE_LIMIT};
pub use stats::IngestStats;
pub use types::Datasource;
