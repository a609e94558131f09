//! Navigation helpers over response bodies.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  value::{Decoded, integer_of},
};

/// Parse a response body, keeping object keys in document order.
pub fn parse(body: &str) -> Result<Value> { Ok(serde_json::from_str(body)?) }

/// View `value` as an object.
pub fn object(value: &Value) -> Result<&Map<String, Value>> {
  value
    .as_object()
    .ok_or_else(|| Error::NotAnObject(Decoded::of(value).describe()))
}

/// Take ownership of `value` as an object.
pub fn into_object(value: Value) -> Result<Map<String, Value>> {
  match value {
    Value::Object(map) => Ok(map),
    other => Err(Error::NotAnObject(Decoded::of(&other).describe())),
  }
}

/// The array stored under `key` in `parent`.
pub fn array<'a>(parent: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
  let value = parent
    .get(key)
    .ok_or_else(|| Error::MissingKey(key.to_owned()))?;
  value
    .as_array()
    .map(Vec::as_slice)
    .ok_or_else(|| Error::NotAnArray {
      key:   key.to_owned(),
      found: Decoded::of(value).describe(),
    })
}

/// Like [`array`], but an absent key or `null` reads as empty.
pub fn optional_array<'a>(parent: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
  match parent.get(key) {
    None | Some(Value::Null) => Ok(&[]),
    Some(_) => array(parent, key),
  }
}

/// The integer stored under `key` in `parent`; numeric strings are accepted.
pub fn integer(parent: &Map<String, Value>, key: &str) -> Result<i64> {
  let value = parent
    .get(key)
    .ok_or_else(|| Error::MissingKey(key.to_owned()))?;
  integer_of(value).ok_or_else(|| Error::NotAnInteger {
    key:   key.to_owned(),
    found: Decoded::of(value).describe(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_keeps_key_order() {
    let root = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<_> = object(&root).unwrap().keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
  }

  #[test]
  fn empty_body_is_a_json_error() {
    assert!(matches!(parse(""), Err(Error::Json(_))));
  }

  #[test]
  fn array_reports_missing_and_wrong_shapes() {
    let root = parse(r#"{"evad":[{"evadkod":15}],"nev":"x","ures":null}"#).unwrap();
    let root = object(&root).unwrap();

    assert_eq!(array(root, "evad").unwrap().len(), 1);
    assert!(matches!(array(root, "verseny"), Err(Error::MissingKey(_))));
    assert!(matches!(array(root, "nev"), Err(Error::NotAnArray { found: "string", .. })));
    assert!(optional_array(root, "verseny").unwrap().is_empty());
    assert!(optional_array(root, "ures").unwrap().is_empty());
  }

  #[test]
  fn integer_tells_absent_from_unusable() {
    let root = parse(r#"{"mezszam":"9","kapus":1,"ures":null,"nev":"x"}"#).unwrap();
    let root = object(&root).unwrap();

    assert_eq!(integer(root, "mezszam").unwrap(), 9);
    assert_eq!(integer(root, "kapus").unwrap(), 1);
    assert!(matches!(integer(root, "csere"), Err(Error::MissingKey(_))));
    assert!(matches!(integer(root, "ures"), Err(Error::NotAnInteger { found: "null", .. })));
    assert!(matches!(integer(root, "nev"), Err(Error::NotAnInteger { found: "string", .. })));
  }
}
