//! [`SchemaRegistry`]: one table definition per entity kind per run.

use std::{collections::HashMap, sync::Arc};

use mlszdb_core::{
  entity::EntityKind,
  schema::{ForeignKeys, TableDefinition},
  statement::Statement,
  store::Store,
  value::Decoded,
};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::{Error, Result};

type Slot = Arc<OnceCell<Arc<TableDefinition>>>;

/// Lazily creates and remembers the table for each entity kind.
///
/// The first caller for a kind creates the table; concurrent callers for the
/// same kind wait on that creation instead of issuing their own DDL. A
/// definition never changes once created.
#[derive(Default)]
pub struct SchemaRegistry {
  tables: Mutex<HashMap<EntityKind, Slot>>,
}

impl SchemaRegistry {
  pub fn new() -> Self { Self::default() }

  /// Return the table for `kind`, creating it from `sample` on first use.
  ///
  /// Creation drops any existing table of that name first. On later calls
  /// `sample` and `foreign_keys` are ignored.
  pub async fn ensure_table<S: Store>(
    &self,
    store: &S,
    kind: EntityKind,
    sample: &Map<String, Value>,
    foreign_keys: &ForeignKeys,
  ) -> Result<Arc<TableDefinition>> {
    let slot = self.tables.lock().await.entry(kind).or_default().clone();
    let table = slot
      .get_or_try_init(|| create_table(store, kind, sample, foreign_keys))
      .await?;
    Ok(Arc::clone(table))
  }

  /// The table for `kind`, if one has been created this run.
  pub async fn get(&self, kind: EntityKind) -> Option<Arc<TableDefinition>> {
    let slot = self.tables.lock().await.get(&kind).cloned()?;
    slot.get().cloned()
  }
}

async fn create_table<S: Store>(
  store: &S,
  kind: EntityKind,
  sample: &Map<String, Value>,
  foreign_keys: &ForeignKeys,
) -> Result<Arc<TableDefinition>> {
  for (key, value) in sample {
    let decoded = Decoded::of(value);
    if matches!(decoded, Decoded::Object(_) | Decoded::Real(_)) {
      warn!(table = %kind, key, shape = decoded.describe(), "unsupported value; column dropped");
    }
  }

  let table = TableDefinition::from_sample(kind, sample, foreign_keys);

  store
    .execute(Statement::drop_table(kind.table_name()))
    .await
    .map_err(|e| Error::store(kind, e))?;
  store
    .execute(Statement::create_table(&table))
    .await
    .map_err(|e| Error::store(kind, e))?;

  debug!(
    table = %kind,
    columns = ?table.column_names().collect::<Vec<_>>(),
    "created table"
  );
  Ok(Arc::new(table))
}
