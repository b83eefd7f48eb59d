//! Fetches a source table over HTTP so it can join the pipeline like a file.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::retry::{is_retryable_http_error, is_retryable_network_error, retry_async, Attempt, RetryConfig};
use crate::config::Config;
use crate::logging;
use crate::merge::SourceRole;
use crate::pipeline::SourceText;

pub const REMOTE_SOURCE: &str = "remote";

pub struct RemoteSource {
    client: Client,
    url: Url,
    retry: RetryConfig,
}

impl RemoteSource {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let url = parse_source_url(url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            url,
            retry: RetryConfig::default(),
        })
    }

    /// `None` when no remote source is configured.
    pub fn from_config(cfg: &Config) -> Result<Option<Self>> {
        match &cfg.remote_url {
            Some(url) => Ok(Some(Self::new(url, cfg.remote_timeout_secs)?)),
            None => Ok(None),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Body of the configured URL. Server errors and timeouts are retried;
    /// other 4xx responses fail at once.
    pub async fn fetch_text(&self) -> Result<String> {
        let url = self.url.as_str();
        let client = &self.client;
        let text = retry_async(&self.retry, "remote_fetch", || async move {
            let resp = match client.get(url).send().await {
                Ok(r) => r,
                Err(e) if is_retryable_network_error(&e) => return Attempt::Retry(e.into()),
                Err(e) => return Attempt::Fatal(e.into()),
            };
            let status = resp.status();
            if !status.is_success() {
                logging::log_fetch(url, status.as_str(), 0);
                let err = anyhow!("GET {} returned {}", url, status);
                return if is_retryable_http_error(status.as_u16()) {
                    Attempt::Retry(err)
                } else {
                    Attempt::Fatal(err)
                };
            }
            match resp.text().await {
                Ok(body) => Attempt::Done(body),
                Err(e) => Attempt::Retry(e.into()),
            }
        })
        .await?;
        logging::log_fetch(url, "200", text.len());
        Ok(text)
    }

    /// Fetch and wrap as a series source; the shape is detected later.
    pub async fn fetch_source(&self) -> Result<SourceText> {
        let text = self.fetch_text().await?;
        Ok(SourceText {
            name: REMOTE_SOURCE.to_string(),
            text,
            shape: None,
            role: SourceRole::Series,
        })
    }
}

/// Only http(s) URLs with a host are accepted.
pub fn parse_source_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid source url: {}", raw))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        other => Err(anyhow!("unsupported source url scheme: {}", other)),
    }
}
