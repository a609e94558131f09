//! Read-back queries that turn one level's output into the next level's
//! work list.
//!
//! There is no persisted crawl state; the store itself is the cursor.

use mlszdb_core::{
  entity::EntityKind,
  statement::{Statement, quote_ident},
  store::Store,
  value::StorageValue,
};

use crate::{Error, Result, config::{PayloadKeys, fk}};

/// The round count to crawl for a competition, and the season it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentRound {
  pub season: i64,
  pub round:  i64,
}

/// Every distinct season code in the season table, ascending.
///
/// Rows whose code is not an integer are skipped.
pub async fn season_codes<S: Store>(store: &S, keys: &PayloadKeys) -> Result<Vec<i64>> {
  let kind = EntityKind::Season;
  let code = quote_ident(&keys.season_code);
  let sql = format!(
    "SELECT DISTINCT {code} FROM {} ORDER BY {code}",
    quote_ident(kind.table_name())
  );
  let rows = store
    .query(Statement::new(sql, vec![]))
    .await
    .map_err(|e| Error::store(kind, e))?;

  Ok(
    rows
      .iter()
      .filter_map(|row| row.first().and_then(StorageValue::as_i64))
      .collect(),
  )
}

/// The current round of `competition_id`, taken from the row with the
/// largest season among rows for that competition.
///
/// A `NULL` round reads as zero rounds.
pub async fn current_round<S: Store>(
  store: &S,
  keys: &PayloadKeys,
  competition_id: i64,
) -> Result<Option<CurrentRound>> {
  let kind = EntityKind::Competition;
  let sql = format!(
    "SELECT {season}, {round} FROM {table} WHERE {id} = ?1 ORDER BY {season} DESC LIMIT 1",
    season = quote_ident(fk::SEASON),
    round = quote_ident(&keys.current_round),
    table = quote_ident(kind.table_name()),
    id = quote_ident(&keys.competition_id),
  );
  let rows = store
    .query(Statement::new(sql, vec![competition_id.into()]))
    .await
    .map_err(|e| Error::store(kind, e))?;

  let Some(row) = rows.first() else {
    return Ok(None);
  };
  let bad = |what: &str, value: &StorageValue| Error::Cursor {
    kind,
    message: format!("competition {competition_id} has non-integer {what} {value:?}"),
  };

  let season = row.first().unwrap_or(&StorageValue::Null);
  let season = season.as_i64().ok_or_else(|| bad("season", season))?;
  let round = match row.get(1).unwrap_or(&StorageValue::Null) {
    StorageValue::Null => 0,
    other => other.as_i64().ok_or_else(|| bad("current round", other))?,
  };
  Ok(Some(CurrentRound { season, round }))
}

/// Match ids of `competition_id` in `season` where `team_id` plays at home
/// or away, in the order the matches were stored.
pub async fn team_matches<S: Store>(
  store: &S,
  keys: &PayloadKeys,
  competition_id: i64,
  season: i64,
  team_id: i64,
) -> Result<Vec<i64>> {
  let kind = EntityKind::Match;
  let sql = format!(
    "SELECT {id} FROM {table}
     WHERE {competition} = ?1 AND {season} = ?2 AND ({home} = ?3 OR {away} = ?3)
     GROUP BY {id}
     ORDER BY MIN(rowid)",
    id = quote_ident(&keys.match_id),
    table = quote_ident(kind.table_name()),
    competition = quote_ident(fk::COMPETITION_ID),
    season = quote_ident(fk::SEASON),
    home = quote_ident(&keys.home_team_id),
    away = quote_ident(&keys.away_team_id),
  );
  let params = vec![competition_id.into(), season.into(), team_id.into()];
  let rows = store
    .query(Statement::new(sql, params))
    .await
    .map_err(|e| Error::store(kind, e))?;

  rows
    .iter()
    .map(|row| {
      let value = row.first().unwrap_or(&StorageValue::Null);
      value.as_i64().ok_or_else(|| Error::Cursor {
        kind,
        message: format!("match id {value:?} is not an integer"),
      })
    })
    .collect()
}
