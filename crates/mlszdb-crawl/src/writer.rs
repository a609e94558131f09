//! [`RecordWriter`]: one record, one `INSERT`.

use std::sync::Arc;

use mlszdb_core::{
  extract::value_of,
  schema::{FieldSource, ForeignKeys, TableDefinition},
  statement::Statement,
  store::Store,
};
use serde_json::{Map, Value};

use crate::{Error, Result};

pub struct RecordWriter<S> {
  store: Arc<S>,
}

impl<S> Clone for RecordWriter<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: Store> RecordWriter<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Insert `record` into `table`.
  ///
  /// Inferred columns are pulled from the record, foreign-key columns from
  /// `foreign_keys`. A column the record lacks is a schema mismatch and
  /// nothing is written; there is no partial row.
  pub async fn insert(
    &self,
    table: &TableDefinition,
    record: &Map<String, Value>,
    foreign_keys: &ForeignKeys,
  ) -> Result<()> {
    let kind = table.kind();
    let values = table
      .fields()
      .iter()
      .map(|field| match field.source {
        FieldSource::Inferred => value_of(field, record),
        FieldSource::ForeignKey => foreign_keys
          .value(&field.name)
          .cloned()
          .ok_or_else(|| mlszdb_core::Error::MissingField(field.name.clone())),
      })
      .collect::<mlszdb_core::Result<Vec<_>>>()
      .map_err(|source| Error::SchemaMismatch { kind, source })?;

    self
      .store
      .execute(Statement::insert(table, values))
      .await
      .map_err(|e| Error::store(kind, e))?;
    Ok(())
  }
}
