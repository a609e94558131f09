//! Pull storage-ready values out of a record for a given field.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  schema::Field,
  value::{Decoded, StorageType, StorageValue},
};

/// Extract the value of `field` from `record`.
///
/// Date fields yield the wall-clock sub-value verbatim; no zone conversion
/// or reformatting is applied. Plain fields yield the decoded scalar, with
/// booleans as `0`/`1`. `null` is stored as SQL `NULL` for every type.
///
/// Column types are frozen from the first sample, so later records may carry
/// a different shape under the same key. Such values are kept rather than
/// rejected: a scalar is stored as itself, anything else as its JSON text.
/// Only a missing key is an error ([`Error::MissingField`]).
pub fn value_of(field: &Field, record: &Map<String, Value>) -> Result<StorageValue> {
  let value = record
    .get(&field.name)
    .ok_or_else(|| Error::MissingField(field.name.clone()))?;

  Ok(match (field.storage_type, Decoded::of(value)) {
    (StorageType::Date, Decoded::Date { wall_clock, .. }) => scalar(wall_clock),
    _ => scalar(value),
  })
}

fn scalar(value: &Value) -> StorageValue {
  match Decoded::of(value) {
    Decoded::Null => StorageValue::Null,
    Decoded::Integer(i) => StorageValue::Integer(i),
    Decoded::Bool(b) => StorageValue::Integer(i64::from(b)),
    Decoded::Real(r) => StorageValue::Real(r),
    Decoded::Text(s) => StorageValue::Text(s.to_owned()),
    Decoded::Date { .. } | Decoded::Array(_) | Decoded::Object(_) => {
      StorageValue::Text(value.to_string())
    }
  }
}
