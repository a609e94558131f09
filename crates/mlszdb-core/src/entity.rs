//! Entity kinds crawled from the databank API.
//!
//! Every kind maps 1:1 onto a table whose name is [`EntityKind::table_name`].

use std::fmt;

/// A logical record type discovered from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
  Season,
  Competition,
  Match,
  MatchDetail,
  Player,
  PlayerEvent,
}

impl EntityKind {
  /// Every kind, in the order the crawl first writes them.
  pub const ALL: [EntityKind; 6] = [
    Self::Season,
    Self::Competition,
    Self::Match,
    Self::MatchDetail,
    Self::Player,
    Self::PlayerEvent,
  ];

  pub fn table_name(self) -> &'static str {
    match self {
      Self::Season => "season",
      Self::Competition => "competition",
      Self::Match => "match",
      Self::MatchDetail => "match-detail",
      Self::Player => "player",
      Self::PlayerEvent => "player-event",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table_name())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn table_names_are_distinct() {
    let names: HashSet<_> = EntityKind::ALL.iter().map(|kind| kind.table_name()).collect();
    assert_eq!(names.len(), EntityKind::ALL.len());
    assert_eq!(EntityKind::MatchDetail.to_string(), "match-detail");
  }
}
