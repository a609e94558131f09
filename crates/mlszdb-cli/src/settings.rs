//! Runtime settings: config file, then environment, then command-line flags.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use mlszdb_crawl::{CrawlConfig, RetryPolicy};
use serde::Deserialize;

use crate::Cli;

/// Everything the binary needs, deserialised from the merged sources.
#[derive(Debug, Deserialize)]
pub struct Settings {
  #[serde(default = "default_database")]
  pub database: PathBuf,
  #[serde(default)]
  pub http:     HttpConfig,
  #[serde(default)]
  pub retry:    RetryConfig,
  pub crawl:    CrawlConfig,
}

fn default_database() -> PathBuf { PathBuf::from("mlszdb.db") }

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
  pub base_url:             String,
  pub connect_timeout_secs: u64,
  pub timeout_secs:         u64,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      base_url:             "http://www.mlsz.hu/wp-content/plugins/mlszDatabank/interfaces".into(),
      connect_timeout_secs: 10,
      timeout_secs:         60,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  /// Retries per failed fetch; `0` means a failed fetch aborts immediately.
  pub retries:          u32,
  pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
  fn default() -> Self { Self { retries: 0, initial_delay_ms: 500 } }
}

impl RetryConfig {
  pub fn policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_retries: self.retries,
      initial_delay: Duration::from_millis(self.initial_delay_ms),
      ..RetryPolicy::default()
    }
  }
}

impl Settings {
  /// Merge the config file named by `cli`, `MLSZDB_*` environment variables
  /// (nested keys joined with `__`, e.g. `MLSZDB_CRAWL__TEAM_ID`), and any
  /// flags given on the command line, in increasing priority.
  pub fn load(cli: &Cli) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(cli.config.clone()).required(false))
      .add_source(
        config::Environment::with_prefix("MLSZDB")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .set_override_option(
        "database",
        cli.database.as_ref().map(|p| p.to_string_lossy().into_owned()),
      )?
      .set_override_option("http.base_url", cli.base_url.clone())?
      .set_override_option("crawl.competition_id", cli.competition)?
      .set_override_option("crawl.team_id", cli.team)?
      .set_override_option("crawl.concurrency", cli.concurrency.map(|n| n as u64))?
      .set_override_option("retry.retries", cli.retries.map(u64::from))?
      .build()
      .context("failed to read configuration")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("invalid configuration (crawl.competition_id and crawl.team_id are required)")?;
    settings.database = expand_tilde(&settings.database);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tilde_expands_only_at_the_start() {
    let plain = Path::new("data/mlszdb.db");
    assert_eq!(expand_tilde(plain), plain);
    assert_eq!(expand_tilde(Path::new("a/~/b")), Path::new("a/~/b"));
  }

  #[test]
  fn retry_config_builds_a_policy() {
    let policy = RetryConfig { retries: 3, initial_delay_ms: 250 }.policy();
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.initial_delay, Duration::from_millis(250));
  }
}
