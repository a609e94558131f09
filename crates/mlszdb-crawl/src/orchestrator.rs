//! [`CrawlOrchestrator`]: drives fetch, parse, register and write across the
//! five crawl levels.
//!
//! Levels run strictly in order, and each one reads its work list back from
//! the store after the previous level's writes have completed. Within a
//! level, up to [`CrawlConfig::concurrency`] requests may be in flight, but
//! responses are processed one at a time in request order, so the first
//! record of a kind is the same whatever the concurrency.

use std::{collections::BTreeMap, pin::pin, sync::Arc};

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt as _, stream};
use mlszdb_core::{
  entity::EntityKind,
  fetch::{ALL, ApiRequest, Fetcher, param},
  payload,
  schema::ForeignKeys,
  statement::Statement,
  store::Store,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
  CrawlConfig, CrawlError, Error, Level, Result, SchemaRegistry,
  config::fk,
  cursor::{self, CurrentRound},
  writer::RecordWriter,
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct CrawlReport {
  pub started_at:  DateTime<Utc>,
  pub finished_at: Option<DateTime<Utc>>,
  /// Levels that ran to completion, in order.
  pub completed:   Vec<Level>,
  pub fetches:     usize,
  /// Rows inserted per table.
  pub rows:        BTreeMap<EntityKind, usize>,
}

impl CrawlReport {
  fn start() -> Self {
    Self {
      started_at:  Utc::now(),
      finished_at: None,
      completed:   Vec::new(),
      fetches:     0,
      rows:        BTreeMap::new(),
    }
  }

  fn record(&mut self, kind: EntityKind) { *self.rows.entry(kind).or_default() += 1; }

  pub fn rows_for(&self, kind: EntityKind) -> usize {
    self.rows.get(&kind).copied().unwrap_or(0)
  }
}

/// A match-detail payload kept in memory for the player level.
struct FetchedDetail {
  match_id: i64,
  url:      String,
  payload:  Map<String, Value>,
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct CrawlOrchestrator<S, F> {
  store:    Arc<S>,
  fetcher:  F,
  config:   CrawlConfig,
  registry: SchemaRegistry,
  writer:   RecordWriter<S>,
}

impl<S: Store, F: Fetcher> CrawlOrchestrator<S, F> {
  pub fn new(store: Arc<S>, fetcher: F, config: CrawlConfig) -> Self {
    let writer = RecordWriter::new(Arc::clone(&store));
    Self {
      store,
      fetcher,
      config,
      registry: SchemaRegistry::new(),
      writer,
    }
  }

  /// Run every level.
  pub async fn run(&self) -> Result<CrawlReport, CrawlError> { self.run_until(Level::Players).await }

  /// Drop every owned table, then run levels in order up to and including
  /// `last`. The first failure aborts the run; tables written so far are
  /// left as they are.
  pub async fn run_until(&self, last: Level) -> Result<CrawlReport, CrawlError> {
    let mut report = CrawlReport::start();
    self
      .drop_tables()
      .await
      .map_err(|e| CrawlError::new(Level::Seasons, e))?;

    let mut details = Vec::new();
    for level in Level::ALL.into_iter().take_while(|level| *level <= last) {
      info!("reading {level}");
      let outcome = match level {
        Level::Seasons => self.load_seasons(&mut report).await,
        Level::Competitions => self.load_competitions(&mut report).await,
        Level::Matches => self.load_matches(&mut report).await,
        Level::MatchDetails => self
          .load_match_details(&mut report)
          .await
          .map(|fetched| details = fetched),
        Level::Players => self.load_players(&details, &mut report).await,
      };
      outcome.map_err(|e| CrawlError::new(level, e))?;
      report.completed.push(level);
    }

    report.finished_at = Some(Utc::now());
    Ok(report)
  }

  async fn drop_tables(&self) -> Result<()> {
    for kind in EntityKind::ALL {
      self
        .store
        .execute(Statement::drop_table(kind.table_name()))
        .await
        .map_err(|e| Error::store(kind, e))?;
    }
    Ok(())
  }

  // ── Levels ──────────────────────────────────────────────────────────────

  async fn load_seasons(&self, report: &mut CrawlReport) -> Result<()> {
    let kind = EntityKind::Season;
    let request = self.filter_request(ALL);
    let body = self.fetch(kind, &request).await?;
    report.fetches += 1;

    let root = parse(kind, &request, &body)?;
    let root = payload::object(&root).map_err(malformed(kind, &request))?;
    let seasons = payload::array(root, &self.config.keys.seasons).map_err(malformed(kind, &request))?;
    for season in seasons {
      let season = payload::object(season).map_err(malformed(kind, &request))?;
      self.store_record(kind, season, &ForeignKeys::new(), report).await?;
    }
    info!(seasons = report.rows_for(kind), "seasons loaded");
    Ok(())
  }

  async fn load_competitions(&self, report: &mut CrawlReport) -> Result<()> {
    let kind = EntityKind::Competition;
    if self.registry.get(EntityKind::Season).await.is_none() {
      info!("no seasons stored; skipping competitions");
      return Ok(());
    }
    let codes = cursor::season_codes(&*self.store, &self.config.keys).await?;
    debug!(?codes, "season codes");

    let requests = codes.into_iter().map(move |code| (code, self.filter_request(code)));
    let mut responses = pin!(self.fetch_each(kind, requests));
    while let Some((season, request, body)) = responses.next().await {
      report.fetches += 1;
      let root = parse(kind, &request, &body?)?;
      let root = payload::object(&root).map_err(malformed(kind, &request))?;
      let competitions = payload::array(root, &self.config.keys.competitions)
        .map_err(malformed(kind, &request))?;

      let fks = ForeignKeys::new().with(fk::SEASON, season);
      for competition in competitions {
        let competition = payload::object(competition).map_err(malformed(kind, &request))?;
        self.store_record(kind, competition, &fks, report).await?;
      }
    }
    info!(competitions = report.rows_for(kind), "competitions loaded");
    Ok(())
  }

  async fn load_matches(&self, report: &mut CrawlReport) -> Result<()> {
    let kind = EntityKind::Match;
    let competition_id = self.config.competition_id;
    let CurrentRound { season, round: rounds } = self.current_round().await?;
    info!(competition_id, season, rounds, "crawling rounds");

    let requests = (1..=rounds).map(move |round| {
      let request = ApiRequest::new(&self.config.endpoints.matches)
        .param(param::COMPETITION, competition_id)
        .param(param::SEASON, season)
        .param(param::ROUND, round)
        .param(param::TEAM, "")
        .param(param::ORGANIZATION, self.config.organization);
      (round, request)
    });
    let mut responses = pin!(self.fetch_each(kind, requests));
    while let Some((round, request, body)) = responses.next().await {
      report.fetches += 1;
      let root = parse(kind, &request, &body?)?;
      let root = payload::object(&root).map_err(malformed(kind, &request))?;
      let matches = payload::array(root, &self.config.keys.matches).map_err(malformed(kind, &request))?;

      let fks = ForeignKeys::new()
        .with(fk::COMPETITION_ID, competition_id)
        .with(fk::ROUND, round)
        .with(fk::SEASON, season);
      for record in matches {
        let record = payload::object(record).map_err(malformed(kind, &request))?;
        self.store_record(kind, record, &fks, report).await?;
      }
    }
    info!(matches = report.rows_for(kind), "matches loaded");
    Ok(())
  }

  async fn load_match_details(&self, report: &mut CrawlReport) -> Result<Vec<FetchedDetail>> {
    let kind = EntityKind::MatchDetail;
    if self.registry.get(EntityKind::Match).await.is_none() {
      info!("no matches stored; skipping match details");
      return Ok(Vec::new());
    }

    let CurrentRound { season, .. } = self.current_round().await?;
    let match_ids = cursor::team_matches(
      &*self.store,
      &self.config.keys,
      self.config.competition_id,
      season,
      self.config.team_id,
    )
    .await?;
    info!(team_id = self.config.team_id, matches = match_ids.len(), "crawling match details");

    let requests = match_ids.into_iter().map(move |match_id| {
      let request = ApiRequest::new(&self.config.endpoints.match_detail).param(param::ITEM, match_id);
      (match_id, request)
    });
    let mut details = Vec::new();
    let mut responses = pin!(self.fetch_each(kind, requests));
    while let Some((match_id, request, body)) = responses.next().await {
      report.fetches += 1;
      let root = parse(kind, &request, &body?)?;
      let detail = payload::into_object(root).map_err(malformed(kind, &request))?;
      self.store_record(kind, &detail, &ForeignKeys::new(), report).await?;
      details.push(FetchedDetail { match_id, url: request.to_string(), payload: detail });
    }
    Ok(details)
  }

  async fn load_players(&self, details: &[FetchedDetail], report: &mut CrawlReport) -> Result<()> {
    let keys = &self.config.keys;
    for detail in details {
      let bad_roster = |source: mlszdb_core::Error| Error::Parse {
        kind: EntityKind::Player,
        url: detail.url.clone(),
        source,
      };

      for group in &keys.roster_groups {
        let roster = match detail.payload.get(group) {
          Some(Value::Null) => &[][..],
          _ => payload::array(&detail.payload, group).map_err(bad_roster)?,
        };

        for player in roster {
          let player = payload::object(player).map_err(bad_roster)?;
          let events = payload::optional_array(player, &keys.player_events).map_err(bad_roster)?;

          let player_fks = ForeignKeys::new().with(fk::MATCH_ID, detail.match_id);
          self.store_record(EntityKind::Player, player, &player_fks, report).await?;
          if events.is_empty() {
            continue;
          }

          // The shirt number only keys the events, so a player without events
          // may lack one.
          let number = payload::integer(player, &keys.player_number).map_err(bad_roster)?;
          let event_fks = player_fks.with(fk::PLAYER_NUMBER, number);
          for event in events {
            let event = payload::object(event).map_err(bad_roster)?;
            self.store_record(EntityKind::PlayerEvent, event, &event_fks, report).await?;
          }
        }
      }
    }
    info!(
      players = report.rows_for(EntityKind::Player),
      events = report.rows_for(EntityKind::PlayerEvent),
      "players and events loaded"
    );
    Ok(())
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  fn filter_request(&self, season: i64) -> ApiRequest {
    ApiRequest::new(&self.config.endpoints.filter)
      .param(param::SEASON_ID, season)
      .param(param::COMPETITION, ALL)
      .param(param::ORGANIZATION, self.config.organization)
  }

  async fn current_round(&self) -> Result<CurrentRound> {
    let competition_id = self.config.competition_id;
    let not_found = || Error::Cursor {
      kind:    EntityKind::Competition,
      message: format!("competition {competition_id} not found in any season"),
    };
    if self.registry.get(EntityKind::Competition).await.is_none() {
      return Err(not_found());
    }
    cursor::current_round(&*self.store, &self.config.keys, competition_id)
      .await?
      .ok_or_else(not_found)
  }

  async fn store_record(
    &self,
    kind: EntityKind,
    record: &Map<String, Value>,
    foreign_keys: &ForeignKeys,
    report: &mut CrawlReport,
  ) -> Result<()> {
    let table = self
      .registry
      .ensure_table(&*self.store, kind, record, foreign_keys)
      .await?;
    self.writer.insert(&table, record, foreign_keys).await?;
    report.record(kind);
    Ok(())
  }

  async fn fetch(&self, kind: EntityKind, request: &ApiRequest) -> Result<String> {
    debug!(%request, "fetch");
    self
      .fetcher
      .fetch(request)
      .await
      .map_err(|e| Error::Transport {
        kind,
        url: request.to_string(),
        source: Box::new(e),
      })
  }

  /// Fetch each request, at most `concurrency` at a time, yielding results
  /// in request order.
  fn fetch_each<'a, T, I>(
    &'a self,
    kind: EntityKind,
    requests: I,
  ) -> impl Stream<Item = (T, ApiRequest, Result<String>)> + 'a
  where
    T: 'a,
    I: IntoIterator<Item = (T, ApiRequest)>,
    I::IntoIter: 'a,
  {
    stream::iter(requests)
      .map(move |(tag, request)| async move {
        let body = self.fetch(kind, &request).await;
        (tag, request, body)
      })
      .buffered(self.config.concurrency.max(1))
  }
}

fn parse(kind: EntityKind, request: &ApiRequest, body: &str) -> Result<Value> {
  payload::parse(body).map_err(malformed(kind, request))
}

fn malformed(kind: EntityKind, request: &ApiRequest) -> impl Fn(mlszdb_core::Error) -> Error + '_ {
  move |source| Error::Parse { kind, url: request.to_string(), source }
}
