//! Conversions between [`StorageValue`] and rusqlite's value types.

use mlszdb_core::value::StorageValue;
use rusqlite::types::{Value, ValueRef};

pub fn encode_value(value: StorageValue) -> Value {
  match value {
    StorageValue::Null => Value::Null,
    StorageValue::Integer(i) => Value::Integer(i),
    StorageValue::Real(r) => Value::Real(r),
    StorageValue::Text(s) => Value::Text(s),
  }
}

/// Blobs are never written by the loader; if one is read back it is
/// surfaced as lossy text.
pub fn decode_value(value: ValueRef<'_>) -> StorageValue {
  match value {
    ValueRef::Null => StorageValue::Null,
    ValueRef::Integer(i) => StorageValue::Integer(i),
    ValueRef::Real(r) => StorageValue::Real(r),
    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
      StorageValue::Text(String::from_utf8_lossy(bytes).into_owned())
    }
  }
}
