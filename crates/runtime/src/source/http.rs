//! HTTP implementations of the source traits.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{DataSource, ImageProbe, Result, SourceError};

/// Sheet and config endpoints over HTTP.
pub struct HttpDataSource {
    creatures_url: String,
    moves_url: String,
    config_url: String,
    http_client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(
        creatures_url: impl Into<String>,
        moves_url: impl Into<String>,
        config_url: impl Into<String>,
    ) -> Self {
        Self {
            creatures_url: creatures_url.into(),
            moves_url: moves_url.into(),
            config_url: config_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("Fetching {}", url);

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn get_rows(&self, url: &str) -> Result<Vec<Value>> {
        match self.get_json(url).await? {
            Value::Array(rows) => Ok(rows),
            _ => Err(SourceError::NotRows(url.to_string())),
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn creature_rows(&self) -> Result<Vec<Value>> {
        self.get_rows(&self.creatures_url).await
    }

    async fn move_rows(&self) -> Result<Vec<Value>> {
        self.get_rows(&self.moves_url).await
    }

    async fn config_document(&self) -> Result<Value> {
        // Cache-busting query so intermediaries never serve a stale document.
        let separator = if self.config_url.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}t={}",
            self.config_url,
            separator,
            Utc::now().timestamp_millis()
        );
        self.get_json(&url).await
    }
}

/// Probes images with `HEAD` requests.
#[derive(Clone, Default)]
pub struct HttpImageProbe {
    http_client: reqwest::Client,
}

impl HttpImageProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.http_client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!("Image probe for {} failed: {}", url, err);
                false
            }
        }
    }
}
