//! Error types for `mlszdb-crawl`.

use std::{fmt, str::FromStr};

use mlszdb_core::entity::EntityKind;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ─── Levels ──────────────────────────────────────────────────────────────────

/// One stage of the crawl. Levels always run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
  Seasons,
  Competitions,
  Matches,
  MatchDetails,
  Players,
}

impl Level {
  pub const ALL: [Level; 5] = [
    Self::Seasons,
    Self::Competitions,
    Self::Matches,
    Self::MatchDetails,
    Self::Players,
  ];

  /// The name accepted by [`FromStr`].
  pub fn name(self) -> &'static str {
    match self {
      Self::Seasons => "seasons",
      Self::Competitions => "competitions",
      Self::Matches => "matches",
      Self::MatchDetails => "match-details",
      Self::Players => "players",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|level| level.name() == s)
      .ok_or_else(|| {
        let names: Vec<_> = Self::ALL.iter().map(|l| l.name()).collect();
        format!("unknown level {s:?}; expected one of {}", names.join(", "))
      })
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failure while crawling one entity kind. None of these are retried by
/// the orchestrator.
#[derive(Debug, Error)]
pub enum Error {
  /// The request could not be completed.
  #[error("fetching {url} for {kind} failed: {source}")]
  Transport {
    kind:   EntityKind,
    url:    String,
    #[source]
    source: BoxError,
  },

  /// The response is not JSON, or lacks an expected object or array.
  #[error("malformed {kind} response from {url}: {source}")]
  Parse {
    kind:   EntityKind,
    url:    String,
    #[source]
    source: mlszdb_core::Error,
  },

  /// A record lacks a column of the table created from the first sample of
  /// its kind.
  #[error("{kind} record does not match its table: {source}")]
  SchemaMismatch {
    kind:   EntityKind,
    #[source]
    source: mlszdb_core::Error,
  },

  #[error("store error on table {kind}: {source}")]
  Store {
    kind:   EntityKind,
    #[source]
    source: BoxError,
  },

  /// The store does not hold what a later level needs to derive its work.
  #[error("cannot continue from {kind}: {message}")]
  Cursor { kind: EntityKind, message: String },
}

impl Error {
  pub(crate) fn store<E>(kind: EntityKind, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store { kind, source: Box::new(source) }
  }

  /// The entity kind being crawled when the error occurred.
  pub fn kind(&self) -> EntityKind {
    match self {
      Self::Transport { kind, .. }
      | Self::Parse { kind, .. }
      | Self::SchemaMismatch { kind, .. }
      | Self::Store { kind, .. }
      | Self::Cursor { kind, .. } => *kind,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error a run ends with: what failed, and where in the crawl.
#[derive(Debug, Error)]
#[error("crawl aborted at level {level} ({kind}): {source}")]
pub struct CrawlError {
  pub level:  Level,
  pub kind:   EntityKind,
  #[source]
  pub source: Error,
}

impl CrawlError {
  pub fn new(level: Level, source: Error) -> Self {
    Self { level, kind: source.kind(), source }
  }
}
