//! The `Store` trait.
//!
//! Implemented by storage backends (e.g. `mlszdb-store-sqlite`). The crawl
//! crate only ever talks to this abstraction, so tests can run against an
//! in-memory backend.

use std::future::Future;

use crate::statement::{Row, Statement};

/// A relational store that accepts simple DDL/DML with nullable columns.
///
/// Statements are executed one at a time; every statement is its own
/// implicit unit of work. Implementations that cannot accept concurrent
/// writers must serialise statements internally.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Execute a DDL or DML statement, returning the number of rows changed.
  fn execute(
    &self,
    statement: Statement,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Run a query and return every row.
  fn query(
    &self,
    statement: Statement,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_;
}
