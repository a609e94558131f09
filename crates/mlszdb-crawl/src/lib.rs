//! Schema-inferring crawl of the MLSZ databank into a relational store.
//!
//! The crawl walks five levels (seasons, competitions, matches, match
//! details, players and their events), deriving each level's work list from
//! what the previous level left in the store. Tables are created from the
//! first record of each kind seen in a run; see
//! [`mlszdb_core::schema::TableDefinition`].

pub mod config;
pub mod cursor;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod retry;
pub mod writer;

pub use config::CrawlConfig;
pub use error::{CrawlError, Error, Level, Result};
pub use orchestrator::{CrawlOrchestrator, CrawlReport};
pub use registry::SchemaRegistry;
pub use retry::{RetryPolicy, RetryingFetcher};
pub use writer::RecordWriter;
