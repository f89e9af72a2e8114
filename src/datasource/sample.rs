//! Bundled sample dataset fetched over HTTP.

use super::{SourceError, TradeSource};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Sample trade history served as a static asset, same CSV layout as uploads.
#[derive(Debug, Clone)]
pub struct SampleDataSource {
    client: Client,
    url: String,
    max_elapsed: Duration,
}

impl SampleDataSource {
    pub fn new(url: String) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: String) -> Self {
        Self {
            client,
            url,
            max_elapsed: Duration::from_secs(30),
        }
    }

    /// Cap on total retry time.
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_text(&self) -> Result<String, SourceError> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        };

        retry(backoff, || async {
            debug!(url = %self.url, "fetching sample data");
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(SourceError::Network(e.to_string())))?;

            let status = response.status();
            if status == 429 || status.is_server_error() {
                return Err(backoff::Error::transient(SourceError::Http {
                    status: status.as_u16(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(SourceError::Http {
                    status: status.as_u16(),
                }));
            }

            response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(SourceError::Network(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl TradeSource for SampleDataSource {
    fn name(&self) -> String {
        self.url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.url)
            .to_string()
    }

    async fn load(&self) -> Result<String, SourceError> {
        self.fetch_text().await
    }
}
