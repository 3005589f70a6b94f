use std::{sync::Arc, time::Duration};

use futures::future::join_all;

use crate::{
    DiskHealthIndicator, HealthCheckResult, HealthIndicator, HttpHealthIndicator,
    MemoryHealthIndicator, ResourceProbe,
};

/// A set of indicators evaluated together
pub struct HealthCheck {
    indicators: Vec<Box<dyn HealthIndicator>>,
}

impl HealthCheck {
    pub fn new(indicators: Vec<Box<dyn HealthIndicator>>) -> Self {
        HealthCheck { indicators }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.indicators.iter().map(|indicator| indicator.key())
    }

    /// Run every indicator concurrently and aggregate the results
    pub async fn run(&self) -> HealthCheckResult {
        let results = join_all(self.indicators.iter().map(|indicator| async move {
            (indicator.key().to_owned(), indicator.check().await)
        }))
        .await;

        let result = HealthCheckResult::from_results(results);
        if !result.is_healthy() {
            tracing::warn!(
                "Health check failed: {}",
                result.error.keys().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        result
    }
}

/// The health checks exposed by the API
pub struct HealthChecks {
    /// Every resource check
    pub full: HealthCheck,
    /// Whether the service can accept traffic
    pub readiness: HealthCheck,
    /// Whether the process is still running properly
    pub liveness: HealthCheck,
}

impl HealthChecks {
    pub fn from_settings(
        settings: &scaffold_config::Health,
        probe: Arc<dyn ResourceProbe>,
    ) -> reqwest::Result<Self> {
        let heap = || -> Box<dyn HealthIndicator> {
            Box::new(MemoryHealthIndicator::heap(
                "memory_heap",
                settings.heap_threshold_bytes(),
                probe.clone(),
            ))
        };

        Ok(HealthChecks {
            full: HealthCheck::new(vec![
                heap(),
                Box::new(MemoryHealthIndicator::rss(
                    "memory_rss",
                    settings.rss_threshold_bytes(),
                    probe.clone(),
                )),
                Box::new(DiskHealthIndicator::new(
                    "storage",
                    &settings.disk_path,
                    settings.disk_threshold_percent,
                    probe.clone(),
                )),
            ]),
            readiness: HealthCheck::new(vec![Box::new(HttpHealthIndicator::new(
                "network",
                &settings.ping_url,
                Duration::from_millis(settings.ping_timeout_ms),
            )?)]),
            liveness: HealthCheck::new(vec![heap()]),
        })
    }
}
