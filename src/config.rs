use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::Path, time::Duration};
use url::Url;

use crate::{
    columns::ColumnLabels,
    i18n::{Locale, Theme},
};

/// Published CSV export of the land-use classification sheet.
pub const DEFAULT_DATA_URL: &str = "https://docs.google.com/spreadsheets/d/1YQmkQzvpoFUBxXLuc9QWsgRqmRn3YZOBED6UmCuqsXk/export?format=csv";

/// Runtime settings: defaults, then an optional YAML file, then environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_url: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
    pub default_locale: Locale,
    pub default_theme: Theme,
    pub columns: ColumnLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            cache_ttl_secs: 600,
            request_timeout_secs: 30,
            bind: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            default_locale: Locale::default(),
            default_theme: Theme::default(),
            columns: ColumnLabels::default(),
        }
    }
}

impl Config {
    /// Load from `CONFIG_PATH` (if set) and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config `{}`", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config `{}`", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Override fields from `DATA_URL`, `CACHE_TTL_SECS`, `REQUEST_TIMEOUT_SECS`,
    /// `BIND`, `PORT` and `LOG_LEVEL` as reported by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("DATA_URL") {
            self.data_url = v;
        }
        if let Some(v) = lookup("CACHE_TTL_SECS") {
            self.cache_ttl_secs = v
                .parse()
                .with_context(|| format!("CACHE_TTL_SECS `{}`", v))?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS `{}`", v))?;
        }
        if let Some(v) = lookup("BIND") {
            self.bind = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = v.parse().with_context(|| format!("PORT `{}`", v))?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.data_url)
            .with_context(|| format!("data_url `{}`", self.data_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("data_url must be http(s), got `{}`", url.scheme());
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("bind address `{}:{}`", self.bind, self.port))
    }
}
