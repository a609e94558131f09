//! The `Fetcher` trait and the requests it serves.

use std::{fmt, future::Future};

/// Query-string keys understood by the databank interface.
pub mod param {
  /// Competition id; [`ALL`](super::ALL) means every competition.
  pub const COMPETITION: &str = "verseny";
  /// Season id on the filter endpoint; [`ALL`](super::ALL) means every season.
  pub const SEASON_ID: &str = "szezon_id";
  /// Season id on the match endpoints.
  pub const SEASON: &str = "evad";
  pub const ORGANIZATION: &str = "szervezet";
  pub const ROUND: &str = "fordulo";
  /// Team filter; usually sent empty.
  pub const TEAM: &str = "csapat";
  /// Match id on the match-detail endpoint.
  pub const ITEM: &str = "item";
}

/// Sentinel id meaning "all".
pub const ALL: i64 = -1;

/// A GET against one interface endpoint, relative to the fetcher's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
  endpoint: String,
  params:   Vec<(&'static str, String)>,
}

impl ApiRequest {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self { endpoint: endpoint.into(), params: Vec::new() }
  }

  pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
    self.params.push((key, value.to_string()));
    self
  }

  pub fn endpoint(&self) -> &str { &self.endpoint }

  pub fn params(&self) -> &[(&'static str, String)] { &self.params }
}

impl fmt::Display for ApiRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.endpoint)?;
    for (i, (key, value)) in self.params.iter().enumerate() {
      let sep = if i == 0 { '?' } else { '&' };
      write!(f, "{sep}{key}={value}")?;
    }
    Ok(())
  }
}

/// Fetches the raw body of an [`ApiRequest`].
///
/// Failures to connect, time-outs and non-success responses are reported as
/// errors; the body is otherwise returned verbatim.
pub trait Fetcher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch<'a>(
    &'a self,
    request: &'a ApiRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_renders_a_relative_url() {
    let req = ApiRequest::new("getMatches.php")
      .param(param::COMPETITION, 17)
      .param(param::ROUND, 3)
      .param(param::TEAM, "");
    assert_eq!(req.to_string(), "getMatches.php?verseny=17&fordulo=3&csapat=");
    assert_eq!(req.params()[1], (param::ROUND, "3".to_owned()));
  }
}
