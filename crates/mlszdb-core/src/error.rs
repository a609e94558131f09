//! Error types for `mlszdb-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The table expects a column the record does not carry.
  #[error("record has no value for column {0:?}")]
  MissingField(String),


  #[error("expected a JSON object, found {0}")]
  NotAnObject(&'static str),

  #[error("expected a JSON array under {key:?}, found {found}")]
  NotAnArray { key: String, found: &'static str },

  #[error("payload has no key {0:?}")]
  MissingKey(String),

  #[error("expected an integer under {key:?}, found {found}")]
  NotAnInteger { key: String, found: &'static str },

  #[error("invalid JSON: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
