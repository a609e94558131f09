//! Table definitions inferred from a first sample.
//!
//! A [`TableDefinition`] is built once per entity kind from the first record
//! of that kind seen in a run and is immutable afterwards. Keys that only
//! appear in later records are ignored; keys missing from later records are
//! a schema mismatch at insert time.

use serde_json::{Map, Value};

use crate::{
  entity::EntityKind,
  value::{StorageType, StorageValue, classify},
};

// ─── Field ───────────────────────────────────────────────────────────────────

/// Where a column's value comes from on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
  /// Pulled out of the record itself.
  Inferred,
  /// Supplied by the caller through [`ForeignKeys`].
  ForeignKey,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
  pub name:         String,
  pub storage_type: StorageType,
  /// Zero-based column position.
  pub position:     usize,
  pub source:       FieldSource,
}

// ─── Foreign keys ────────────────────────────────────────────────────────────

/// A caller-injected parent identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
  pub name:         String,
  pub storage_type: StorageType,
  pub value:        StorageValue,
}

/// Parent identifiers carried into a child table, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignKeys(Vec<ForeignKey>);

impl ForeignKeys {
  pub fn new() -> Self { Self::default() }

  /// Append an integer foreign key. A later entry with the same name
  /// replaces the earlier value in place.
  pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
    let name = name.into();
    let value = StorageValue::Integer(value);
    match self.0.iter_mut().find(|fk| fk.name == name) {
      Some(existing) => existing.value = value,
      None => self.0.push(ForeignKey {
        name,
        storage_type: StorageType::Integer,
        value,
      }),
    }
    self
  }

  pub fn iter(&self) -> impl Iterator<Item = &ForeignKey> { self.0.iter() }

  pub fn contains(&self, name: &str) -> bool { self.0.iter().any(|fk| fk.name == name) }

  pub fn value(&self, name: &str) -> Option<&StorageValue> {
    self.0.iter().find(|fk| fk.name == name).map(|fk| &fk.value)
  }
}

// ─── TableDefinition ─────────────────────────────────────────────────────────

/// The immutable shape of one entity kind's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
  kind:   EntityKind,
  fields: Vec<Field>,
}

impl TableDefinition {
  /// Infer a definition from `sample`.
  ///
  /// Keys are visited in the sample's own order; unclassifiable values are
  /// skipped. Foreign-key fields follow the inferred fields. An inferred key
  /// with the same name as a foreign key is left out so the caller's value
  /// is the one stored.
  pub fn from_sample(
    kind: EntityKind,
    sample: &Map<String, Value>,
    foreign_keys: &ForeignKeys,
  ) -> Self {
    let inferred = sample
      .iter()
      .filter(|(key, _)| !foreign_keys.contains(key))
      .filter_map(|(key, value)| {
        classify(value).map(|storage_type| (key.clone(), storage_type, FieldSource::Inferred))
      });

    let injected = foreign_keys
      .iter()
      .map(|fk| (fk.name.clone(), fk.storage_type, FieldSource::ForeignKey));

    let fields = inferred
      .chain(injected)
      .enumerate()
      .map(|(position, (name, storage_type, source))| Field {
        name,
        storage_type,
        position,
        source,
      })
      .collect();

    Self { kind, fields }
  }

  pub fn kind(&self) -> EntityKind { self.kind }

  pub fn table_name(&self) -> &'static str { self.kind.table_name() }

  /// All fields in column order.
  pub fn fields(&self) -> &[Field] { &self.fields }

  pub fn column_names(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|f| f.name.as_str())
  }

  pub fn field(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|f| f.name == name)
  }
}
