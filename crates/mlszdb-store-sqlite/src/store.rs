//! [`SqliteStore`]: the SQLite implementation of [`Store`].

use std::{path::Path, time::Duration};

use mlszdb_core::{
  statement::{Row, Statement},
  store::Store,
};
use tracing::debug;

use crate::{
  Result,
  encode::{decode_value, encode_value},
};

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a database at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  async fn configure(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection, flushing any pending work on its thread.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// `(name, declared type)` for every column of `table`, in column order.
  /// Types are lower-cased, as SQLite may report them in either case.
  /// Empty if the table does not exist.
  pub async fn table_columns(&self, table: &str) -> Result<Vec<(String, String)>> {
    let table = table.to_owned();
    let columns = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
        let rows = stmt
          .query_map(rusqlite::params![table], |row| {
            let declared: String = row.get(1)?;
            Ok((row.get(0)?, declared.to_ascii_lowercase()))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(columns)
  }

  /// Names of every user table, sorted.
  pub async fn table_names(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;

  async fn execute(&self, statement: Statement) -> Result<usize> {
    let (sql, params) = statement.into_parts();
    debug!(%sql, params = params.len(), "execute");
    let params: Vec<_> = params.into_iter().map(encode_value).collect();

    let changed = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(changed)
      })
      .await?;
    Ok(changed)
  }

  async fn query(&self, statement: Statement) -> Result<Vec<Row>> {
    let (sql, params) = statement.into_parts();
    debug!(%sql, params = params.len(), "query");
    let params: Vec<_> = params.into_iter().map(encode_value).collect();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let width = stmt.column_count();
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            (0..width)
              .map(|i| row.get_ref(i).map(decode_value))
              .collect::<rusqlite::Result<Row>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}
