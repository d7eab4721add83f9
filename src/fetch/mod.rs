// src/fetch/mod.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{cache::TtlCache, config::Config, error::DataUnavailable, table::Table};

pub mod csv;

/// A loaded table plus where and when it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
}

/// Fetches the configured CSV export, caching it for the freshness window.
pub struct Loader {
    client: Client,
    url: String,
    ttl: Duration,
    cache: TtlCache<Dataset>,
}

impl Loader {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(
            http_client(config)?,
            &config.data_url,
            config.cache_ttl(),
        ))
    }

    pub fn with_client(client: Client, url: &str, ttl: Duration) -> Self {
        Self {
            client,
            url: url.to_string(),
            ttl,
            cache: TtlCache::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cached dataset if fresh, otherwise a new fetch.
    pub async fn load(&self) -> Result<Arc<Dataset>, DataUnavailable> {
        self.cache
            .get_or_fetch(&self.url, self.ttl, || fetch_dataset(&self.client, &self.url))
            .await
    }

    /// Forget the cached dataset; the next `load` goes to the network.
    pub async fn invalidate(&self) {
        info!(url = %self.url, "invalidating cached dataset");
        self.cache.invalidate().await;
    }
}

/// HTTP client with the configured timeout and gzip support.
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")
}

/// Download `url`, decode it as UTF-8 and parse it into a table.
#[tracing::instrument(level = "info", skip(client))]
pub async fn fetch_dataset(client: &Client, url: &str) -> Result<Dataset, DataUnavailable> {
    let start = Instant::now();

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|source| DataUnavailable::Request {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        warn!(%status, "source answered with an error status");
        return Err(DataUnavailable::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|source| DataUnavailable::Request {
            url: url.to_string(),
            source,
        })?;
    let text = String::from_utf8(bytes.to_vec())?;
    let table = csv::parse_csv(&text)?;

    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        bytes = bytes.len(),
        elapsed = ?start.elapsed(),
        "fetched dataset"
    );

    Ok(Dataset {
        table,
        source_url: url.to_string(),
        fetched_at: Utc::now(),
    })
}
