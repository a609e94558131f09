//! Structured SQL statements.
//!
//! Identifiers are always double-quoted and values are always bound as
//! positional parameters; no record content is ever spliced into SQL text.

use crate::{schema::TableDefinition, value::StorageValue};

/// One row read back from the store, in select-list order.
pub type Row = Vec<StorageValue>;

/// A SQL string plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  sql:    String,
  params: Vec<StorageValue>,
}

/// Quote an identifier for use in SQL, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

fn placeholders(count: usize) -> String {
  (1..=count)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ")
}

impl Statement {
  pub fn new(sql: impl Into<String>, params: Vec<StorageValue>) -> Self {
    Self { sql: sql.into(), params }
  }

  /// `DROP TABLE IF EXISTS`; never fails on an absent table.
  pub fn drop_table(table: &str) -> Self {
    Self::new(format!("DROP TABLE IF EXISTS {}", quote_ident(table)), Vec::new())
  }

  /// `CREATE TABLE` with one nullable, untyped-by-constraint column per
  /// field, in field order.
  pub fn create_table(table: &TableDefinition) -> Self {
    let columns = table
      .fields()
      .iter()
      .map(|f| format!("{} {}", quote_ident(&f.name), f.storage_type.sql_type()))
      .collect::<Vec<_>>()
      .join(", ");
    Self::new(
      format!("CREATE TABLE {} ({columns})", quote_ident(table.table_name())),
      Vec::new(),
    )
  }

  /// A single-row `INSERT` whose column list is the table's full field list.
  /// `values` must be in field order.
  pub fn insert(table: &TableDefinition, values: Vec<StorageValue>) -> Self {
    let columns = table
      .column_names()
      .map(quote_ident)
      .collect::<Vec<_>>()
      .join(", ");
    Self::new(
      format!(
        "INSERT INTO {} ({columns}) VALUES ({})",
        quote_ident(table.table_name()),
        placeholders(values.len()),
      ),
      values,
    )
  }

  pub fn sql(&self) -> &str { &self.sql }

  pub fn params(&self) -> &[StorageValue] { &self.params }

  pub fn into_parts(self) -> (String, Vec<StorageValue>) { (self.sql, self.params) }
}
