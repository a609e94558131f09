//! Crawl configuration.
//!
//! Everything except the competition and team of interest has a default
//! matching the public databank interface, so a config file normally only
//! names those two.

use serde::Deserialize;

/// Names of the synthetic foreign-key columns injected into child tables.
pub mod fk {
  pub const SEASON: &str = "season";
  pub const COMPETITION_ID: &str = "competition_id";
  pub const ROUND: &str = "round";
  pub const MATCH_ID: &str = "match_id";
  pub const PLAYER_NUMBER: &str = "player_number";
}

/// The MLSZ organisation id on the databank interface.
pub const MLSZ_ORGANIZATION: i64 = 24;

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
  /// Competition whose rounds and matches are crawled.
  pub competition_id: i64,
  /// Team whose matches get detail, player and event rows.
  pub team_id:        i64,
  #[serde(default = "default_organization")]
  pub organization:   i64,
  /// Requests in flight at once within a level. `1` is strictly sequential.
  #[serde(default = "default_concurrency")]
  pub concurrency:    usize,
  #[serde(default)]
  pub endpoints:      Endpoints,
  #[serde(default)]
  pub keys:           PayloadKeys,
}

fn default_organization() -> i64 { MLSZ_ORGANIZATION }

fn default_concurrency() -> usize { 1 }

impl CrawlConfig {
  pub fn new(competition_id: i64, team_id: i64) -> Self {
    Self {
      competition_id,
      team_id,
      organization: default_organization(),
      concurrency: default_concurrency(),
      endpoints: Endpoints::default(),
      keys: PayloadKeys::default(),
    }
  }
}

/// Interface scripts, relative to the fetcher's base URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
  /// Seasons (with the "all" sentinel) and per-season competitions.
  pub filter:       String,
  pub matches:      String,
  pub match_detail: String,
}

impl Default for Endpoints {
  fn default() -> Self {
    Self {
      filter:       "getDataToFilter.php".into(),
      matches:      "getMatches.php".into(),
      match_detail: "getMatchDetail.php".into(),
    }
  }
}

/// Key names the crawl reads out of response payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayloadKeys {
  pub seasons:          String,
  pub season_code:      String,
  pub competitions:     String,
  pub competition_id:   String,
  pub current_round:    String,
  pub matches:          String,
  pub match_id:         String,
  pub home_team_id:     String,
  pub away_team_id:     String,
  /// Home starters, home substitutes, away starters, away substitutes.
  pub roster_groups:    Vec<String>,
  pub player_number:    String,
  pub player_events:    String,
}

impl Default for PayloadKeys {
  fn default() -> Self {
    Self {
      seasons:        "evad".into(),
      season_code:    "evadkod".into(),
      competitions:   "verseny".into(),
      competition_id: "verseny_id".into(),
      current_round:  "aktualis_fordulo".into(),
      matches:        "merkozesek".into(),
      match_id:       "merkozes_id".into(),
      home_team_id:   "hazai_csapat_id".into(),
      away_team_id:   "vendeg_csapat_id".into(),
      roster_groups:  ["hazai_kezdo", "hazai_csere", "vendeg_kezdo", "vendeg_csere"]
        .map(String::from)
        .to_vec(),
      player_number:  "mezszam".into(),
      player_events:  "esemenyek".into(),
    }
  }
}
