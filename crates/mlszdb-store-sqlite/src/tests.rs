//! Integration tests for `SqliteStore` against an in-memory database.

use mlszdb_core::{
  entity::EntityKind,
  schema::{ForeignKeys, TableDefinition},
  statement::Statement,
  store::Store,
  value::StorageValue,
};
use serde_json::json;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn season_table() -> TableDefinition {
  let sample = json!({ "evadkod": 15, "evadnev": "2020/21", "akutalis": 1 });
  TableDefinition::from_sample(EntityKind::Season, sample.as_object().unwrap(), &ForeignKeys::new())
}

// ─── DDL ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn drop_table_if_exists_is_idempotent() {
  let s = store().await;
  s.execute(Statement::drop_table("season")).await.unwrap();
  s.execute(Statement::drop_table("season")).await.unwrap();
  assert!(s.table_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn table_columns_reports_types_in_lower_case() {
  let s = store().await;
  s.execute(Statement::new("CREATE TABLE \"t\" (\"a\" INTEGER, \"b\" Text)", vec![]))
    .await
    .unwrap();

  let columns = s.table_columns("t").await.unwrap();
  assert_eq!(
    columns,
    [("a".to_string(), "integer".to_string()), ("b".to_string(), "text".to_string())]
  );
}

#[tokio::test]
async fn create_table_uses_declared_types() {
  let s = store().await;
  s.execute(Statement::create_table(&season_table())).await.unwrap();

  let columns = s.table_columns("season").await.unwrap();
  assert_eq!(
    columns,
    [
      ("evadkod".to_string(), "integer".to_string()),
      ("evadnev".to_string(), "text".to_string()),
      ("akutalis".to_string(), "integer".to_string()),
    ]
  );
}

#[tokio::test]
async fn creating_a_table_twice_fails() {
  let s = store().await;
  s.execute(Statement::create_table(&season_table())).await.unwrap();
  assert!(s.execute(Statement::create_table(&season_table())).await.is_err());
}

#[tokio::test]
async fn keyword_and_hyphenated_table_names_work() {
  let s = store().await;
  for kind in [EntityKind::Match, EntityKind::MatchDetail, EntityKind::PlayerEvent] {
    let sample = json!({ "id": 1 });
    let table = TableDefinition::from_sample(kind, sample.as_object().unwrap(), &ForeignKeys::new());
    s.execute(Statement::create_table(&table)).await.unwrap();
  }
  assert_eq!(
    s.table_names().await.unwrap(),
    ["match", "match-detail", "player-event"]
  );
}

// ─── DML ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_query_round_trip_values() {
  let s = store().await;
  let table = season_table();
  s.execute(Statement::create_table(&table)).await.unwrap();

  let changed = s
    .execute(Statement::insert(
      &table,
      vec![StorageValue::Integer(15), "2020/21".into(), StorageValue::Integer(1)],
    ))
    .await
    .unwrap();
  assert_eq!(changed, 1);

  s.execute(Statement::insert(
    &table,
    vec![StorageValue::Integer(14), StorageValue::Null, StorageValue::Integer(0)],
  ))
  .await
  .unwrap();

  let rows = s
    .query(Statement::new(
      "SELECT evadkod, evadnev, akutalis FROM season ORDER BY evadkod",
      vec![],
    ))
    .await
    .unwrap();
  assert_eq!(
    rows,
    [
      vec![StorageValue::Integer(14), StorageValue::Null, StorageValue::Integer(0)],
      vec![StorageValue::Integer(15), "2020/21".into(), StorageValue::Integer(1)],
    ]
  );
}

#[tokio::test]
async fn query_binds_parameters() {
  let s = store().await;
  let table = season_table();
  s.execute(Statement::create_table(&table)).await.unwrap();
  for code in [13, 14, 15] {
    s.execute(Statement::insert(
      &table,
      vec![StorageValue::Integer(code), "x".into(), StorageValue::Integer(0)],
    ))
    .await
    .unwrap();
  }

  let rows = s
    .query(Statement::new(
      "SELECT evadkod FROM season WHERE evadkod >= ?1 ORDER BY evadkod DESC",
      vec![StorageValue::Integer(14)],
    ))
    .await
    .unwrap();
  assert_eq!(rows, [vec![StorageValue::Integer(15)], vec![StorageValue::Integer(14)]]);
}

#[tokio::test]
async fn insert_into_missing_table_is_an_error() {
  let s = store().await;
  let err = s
    .execute(Statement::insert(
      &season_table(),
      vec![StorageValue::Integer(1), "x".into(), StorageValue::Integer(0)],
    ))
    .await;
  assert!(err.is_err());
}

#[tokio::test]
async fn close_consumes_the_store() {
  let s = store().await;
  s.execute(Statement::create_table(&season_table())).await.unwrap();
  s.close().await.unwrap();
}
