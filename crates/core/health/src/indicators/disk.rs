use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::{probe::read_blocking, HealthIndicator, IndicatorResult, ResourceProbe};

/// Flags the filesystem holding `path` once too much of it is in use
pub struct DiskHealthIndicator {
    key: String,
    path: PathBuf,
    threshold_percent: f64,
    probe: Arc<dyn ResourceProbe>,
}

impl DiskHealthIndicator {
    /// `threshold_percent` is a fraction, `0.8` allows up to 80% usage
    pub fn new(
        key: impl Into<String>,
        path: impl Into<PathBuf>,
        threshold_percent: f64,
        probe: Arc<dyn ResourceProbe>,
    ) -> Self {
        DiskHealthIndicator {
            key: key.into(),
            path: path.into(),
            threshold_percent,
            probe,
        }
    }
}

#[async_trait]
impl HealthIndicator for DiskHealthIndicator {
    fn key(&self) -> &str {
        &self.key
    }

    async fn check(&self) -> IndicatorResult {
        let path = self.path.clone();
        let Some(usage) = read_blocking(&self.probe, move |probe| probe.disk_usage(&path)).await
        else {
            return IndicatorResult::down(format!(
                "No disk is mounted at {}",
                self.path.display()
            ));
        };

        let Some(used) = usage.used_fraction() else {
            return IndicatorResult::down(format!(
                "Disk at {} reports no capacity",
                self.path.display()
            ));
        };

        let result = if used > self.threshold_percent {
            tracing::warn!(
                "{} over threshold: {:.1}% used at {}",
                self.key,
                used * 100.0,
                self.path.display()
            );

            IndicatorResult::down("Used disk storage exceeded the set threshold")
        } else {
            IndicatorResult::up()
        };

        result
            .with("total", usage.total)
            .with("available", usage.available)
            .with("used_percent", used)
            .with("threshold_percent", self.threshold_percent)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{mpsc, Arc, Mutex},
    };

    use crate::{
        indicators::test_probe::FixedProbe, DiskHealthIndicator, DiskUsage, HealthIndicator,
        ResourceProbe,
    };

    /// Holds every disk reading until the test releases it
    struct GatedProbe {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl ResourceProbe for GatedProbe {
        fn heap_used(&self) -> Option<u64> {
            None
        }

        fn resident_set(&self) -> Option<u64> {
            None
        }

        fn disk_usage(&self, _path: &Path) -> Option<DiskUsage> {
            self.gate.lock().unwrap().recv().ok()?;
            Some(DiskUsage {
                total: 100,
                available: 50,
            })
        }
    }

    fn indicator(disk: Option<DiskUsage>) -> DiskHealthIndicator {
        DiskHealthIndicator::new(
            "storage",
            "/",
            0.8,
            Arc::new(FixedProbe {
                disk,
                ..Default::default()
            }),
        )
    }

    #[tokio::test]
    async fn usage_below_threshold_is_up() {
        let result = indicator(Some(DiskUsage {
            total: 100,
            available: 30,
        }))
        .check()
        .await;

        assert!(result.is_up());
        assert_eq!(result.details["total"], 100);
    }

    #[tokio::test]
    async fn usage_at_threshold_is_up() {
        let result = indicator(Some(DiskUsage {
            total: 100,
            available: 20,
        }))
        .check()
        .await;

        assert!(result.is_up());
    }

    #[tokio::test]
    async fn usage_above_threshold_is_down() {
        let result = indicator(Some(DiskUsage {
            total: 100,
            available: 19,
        }))
        .check()
        .await;

        assert!(!result.is_up());
        assert_eq!(
            result.message.as_deref(),
            Some("Used disk storage exceeded the set threshold")
        );
    }

    #[tokio::test]
    async fn missing_disk_is_down() {
        assert!(!indicator(None).check().await.is_up());
    }

    #[tokio::test]
    async fn slow_reading_leaves_runtime_free() {
        let (release, gate) = mpsc::channel();
        let indicator = DiskHealthIndicator::new(
            "storage",
            "/",
            0.8,
            Arc::new(GatedProbe {
                gate: Mutex::new(gate),
            }),
        );

        // Single-threaded runtime: a reading taken on the worker would never
        // let this task run again to release it
        let check = tokio::spawn(async move { indicator.check().await });
        tokio::task::yield_now().await;
        release.send(()).unwrap();

        assert!(check.await.unwrap().is_up());
    }

    #[tokio::test]
    async fn zero_capacity_is_down() {
        let result = indicator(Some(DiskUsage {
            total: 0,
            available: 0,
        }))
        .check()
        .await;

        assert!(!result.is_up());
    }
}
