//! [`HttpFetcher`]: the reqwest-backed [`Fetcher`].

use std::time::Duration;

use anyhow::Context as _;
use mlszdb_core::fetch::{ApiRequest, Fetcher};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::settings::HttpConfig;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("server answered {0}")]
  Status(StatusCode),
}

/// Fetches interface endpoints relative to a base URL.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpFetcher {
  client:   Client,
  base_url: String,
}

impl HttpFetcher {
  pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
    })
  }

  fn url(&self, endpoint: &str) -> String { format!("{}/{}", self.base_url, endpoint) }
}

impl Fetcher for HttpFetcher {
  type Error = FetchError;

  async fn fetch(&self, request: &ApiRequest) -> Result<String, FetchError> {
    let resp = self
      .client
      .get(self.url(request.endpoint()))
      .query(request.params())
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(FetchError::Status(resp.status()));
    }
    Ok(resp.text().await?)
  }
}
