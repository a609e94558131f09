//! Decoded JSON values and the storage types they map onto.
//!
//! [`Decoded`] is a closed view over a [`serde_json::Value`]; every decision
//! about what a JSON value "is" goes through it, and [`classify`] is the only
//! place a shape is turned into a column type.
//!
//! Two coercions here are specific to the upstream databank payloads rather
//! than general JSON-to-SQL rules, and are kept as-is because downstream
//! tables depend on the resulting column types:
//!
//! - booleans are stored as integers `0`/`1`;
//! - `null` in a first sample yields a `text` column.
//!
//! Nested objects that are not date-shaped are not representable and are
//! dropped from the table.

use serde_json::{Map, Number, Value};

/// Key holding the wall-clock part of a date-shaped object.
pub const DATE_KEY: &str = "date";
/// Key holding the zone of a date-shaped object.
pub const ZONE_KEY: &str = "timezone";

// ─── Decoded ─────────────────────────────────────────────────────────────────

/// A borrowed, closed classification of a decoded JSON value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded<'a> {
  Integer(i64),
  /// Any number that does not fit an `i64`.
  Real(f64),
  Text(&'a str),
  Bool(bool),
  /// An object exposing both [`DATE_KEY`] and [`ZONE_KEY`].
  Date {
    wall_clock: &'a Value,
    zone:       &'a Value,
  },
  Array(&'a [Value]),
  Object(&'a Map<String, Value>),
  Null,
}

impl<'a> Decoded<'a> {
  pub fn of(value: &'a Value) -> Self {
    match value {
      Value::Null => Self::Null,
      Value::Bool(b) => Self::Bool(*b),
      Value::Number(n) => decode_number(n),
      Value::String(s) => Self::Text(s),
      Value::Array(items) => Self::Array(items),
      Value::Object(map) => match (map.get(DATE_KEY), map.get(ZONE_KEY)) {
        (Some(wall_clock), Some(zone)) => Self::Date { wall_clock, zone },
        _ => Self::Object(map),
      },
    }
  }

  /// Short name of the shape, for diagnostics.
  pub fn describe(&self) -> &'static str {
    match self {
      Self::Integer(_) => "integer",
      Self::Real(r) if r.is_finite() && r.fract() == 0.0 => "integer outside the i64 range",
      Self::Real(_) => "non-integral number",
      Self::Text(_) => "string",
      Self::Bool(_) => "boolean",
      Self::Date { .. } => "date object",
      Self::Array(_) => "array",
      Self::Object(_) => "object",
      Self::Null => "null",
    }
  }
}

fn decode_number(n: &Number) -> Decoded<'_> {
  match n.as_i64() {
    Some(i) => Decoded::Integer(i),
    None => Decoded::Real(n.as_f64().unwrap_or(f64::NAN)),
  }
}

// ─── Storage types ───────────────────────────────────────────────────────────

/// The column type a field is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
  Integer,
  Text,
  /// Stored as text; the extractor pulls the wall-clock sub-value.
  Date,
}

impl StorageType {
  /// The type keyword used in `CREATE TABLE`.
  pub fn sql_type(self) -> &'static str {
    match self {
      Self::Integer => "integer",
      Self::Text | Self::Date => "text",
    }
  }
}

/// Classify a JSON value into a column type, or `None` if it does not
/// become a column of the record's own table.
///
/// Arrays are child collections crawled separately. Non-date objects and
/// numbers that do not fit an `i64` (fractions, or integers beyond its range)
/// are unsupported shapes and are omitted.
pub fn classify(value: &Value) -> Option<StorageType> {
  match Decoded::of(value) {
    Decoded::Integer(_) | Decoded::Bool(_) => Some(StorageType::Integer),
    Decoded::Text(_) | Decoded::Null => Some(StorageType::Text),
    Decoded::Date { .. } => Some(StorageType::Date),
    Decoded::Real(_) | Decoded::Array(_) | Decoded::Object(_) => None,
  }
}

// ─── Storage values ──────────────────────────────────────────────────────────

/// A value ready to be bound to a statement parameter, or read back from a
/// row.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl StorageValue {
  /// Interpret the value as an integer. Numeric text is accepted because the
  /// upstream API is inconsistent about quoting identifiers.
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Integer(i) => Some(*i),
      Self::Text(s) => s.trim().parse().ok(),
      Self::Null | Self::Real(_) => None,
    }
  }
}

impl From<i64> for StorageValue {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<&str> for StorageValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for StorageValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

/// Read an integer out of a JSON value, accepting numeric strings.
pub fn integer_of(value: &Value) -> Option<i64> {
  match Decoded::of(value) {
    Decoded::Integer(i) => Some(i),
    Decoded::Text(s) => s.trim().parse().ok(),
    _ => None,
  }
}
