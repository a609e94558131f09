//! SQLite backend for the mlszdb loader.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. That thread is the
//! single writer: statements from concurrent callers queue up behind it.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
