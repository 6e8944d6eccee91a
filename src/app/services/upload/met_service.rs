//! Collection service client
//!
//! Submission happens in two steps: the header-only projection registers the
//! series, then the full time series delivers the observations.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use super::TimeSeriesSubmitter;
use super::authenticator::Authenticator;
use crate::app::models::TimeSeries;
use crate::config::{AuthMode, UpstreamConfig};
use crate::{Error, Result};

/// Production submitter backed by the collection service's HTTP API
#[derive(Debug, Clone)]
pub struct MetServiceClient {
    client: Client,
    authenticator: Authenticator,
    create_url: String,
    put_url: String,
}

impl MetServiceClient {
    /// Create a new client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let authenticator = Authenticator::for_mode(config.auth_mode)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("boatload/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {e}")))?;

        debug!(
            "Collection service at {} using {} authentication",
            config.base_url,
            authenticator.mode()
        );

        Ok(Self {
            client,
            authenticator,
            create_url: config.create_url(),
            put_url: config.put_url(),
        })
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.authenticator.mode()
    }

    pub fn create_url(&self) -> &str {
        &self.create_url
    }

    pub fn put_url(&self) -> &str {
        &self.put_url
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<()> {
        let request = self.authenticator.authenticate(self.client.post(url))?;
        let response = request.json(body).send().await?;
        check_status(response).await
    }
}

/// Map a non-2xx response to an upstream submission error
async fn check_status(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    Err(Error::upstream_submission(Some(status.as_u16()), message))
}

#[async_trait]
impl TimeSeriesSubmitter for MetServiceClient {
    async fn submit(&self, time_series: &TimeSeries) -> Result<()> {
        debug!(
            "Registering {} series at {}",
            time_series.entries.len(),
            self.create_url
        );
        self.post_json(&self.create_url, &time_series.headers_only())
            .await?;

        debug!(
            "Submitting {} observations to {}",
            time_series.observation_count(),
            self.put_url
        );
        self.post_json(&self.put_url, time_series).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resolves_urls() {
        let config = UpstreamConfig {
            base_url: "http://collector.local:9000/".to_string(),
            ..UpstreamConfig::default()
        };

        let client = MetServiceClient::new(&config).unwrap();
        assert_eq!(client.auth_mode(), AuthMode::Development);
        assert_eq!(
            client.create_url(),
            "http://collector.local:9000/api/v1/timeseries/create"
        );
        assert_eq!(
            client.put_url(),
            "http://collector.local:9000/api/v1/timeseries/put"
        );
    }

    #[test]
    fn test_new_rejects_production_auth() {
        let config = UpstreamConfig {
            auth_mode: AuthMode::Production,
            ..UpstreamConfig::default()
        };

        let result = MetServiceClient::new(&config);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_submit_unreachable_upstream_fails() {
        // Port 9 on loopback is the discard service and is normally closed
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..UpstreamConfig::default()
        };
        let client = MetServiceClient::new(&config).unwrap();

        let result = client.submit(&TimeSeries::new("glider", Vec::new())).await;
        assert!(matches!(result, Err(Error::UpstreamSubmission { .. })));
    }
}
