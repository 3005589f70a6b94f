use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{HealthIndicator, IndicatorResult};

/// Pings an outbound URL, up when it answers with a success status
pub struct HttpHealthIndicator {
    key: String,
    url: String,
    client: Client,
}

impl HttpHealthIndicator {
    pub fn new(
        key: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(HttpHealthIndicator {
            key: key.into(),
            url: url.into(),
            client: Client::builder()
                .user_agent(concat!("scaffold-health/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()?,
        })
    }
}

#[async_trait]
impl HealthIndicator for HttpHealthIndicator {
    fn key(&self) -> &str {
        &self.key
    }

    async fn check(&self) -> IndicatorResult {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match response {
            Ok(response) => IndicatorResult::up().with("status_code", response.status().as_u16()),
            Err(err) => {
                tracing::warn!("{} ping to {} failed: {err}", self.key, self.url);

                let result = IndicatorResult::down(err.to_string());
                match err.status() {
                    Some(status) => result.with("status_code", status.as_u16()),
                    None => result,
                }
            }
        }
    }
}
