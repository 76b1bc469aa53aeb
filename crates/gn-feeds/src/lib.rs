//! gn-feeds — log file sources for graphite-news.
//!
//! [`discovery`] expands the configured patterns once at startup, [`tail`]
//! follows each resulting file, and [`ingest`] wires them to the shared
//! [`gn_core::Registry`].

pub mod discovery;
pub mod ingest;
pub mod tail;

pub use discovery::{discover, DiscoveryError};
pub use ingest::{ingest_line, start_ingestion, IngestError, IngestOptions, Ingestion};
pub use tail::{TailError, TailSource};
