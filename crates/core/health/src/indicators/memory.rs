use std::sync::Arc;

use async_trait::async_trait;

use crate::{probe::read_blocking, HealthIndicator, IndicatorResult, ResourceProbe};

/// Which memory reading to compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemoryKind {
    Heap,
    ResidentSet,
}

impl MemoryKind {
    fn label(&self) -> &'static str {
        match self {
            MemoryKind::Heap => "heap",
            MemoryKind::ResidentSet => "rss",
        }
    }
}

/// Flags the process once its memory usage goes above a threshold
pub struct MemoryHealthIndicator {
    key: String,
    kind: MemoryKind,
    threshold: u64,
    probe: Arc<dyn ResourceProbe>,
}

impl MemoryHealthIndicator {
    pub fn heap(key: impl Into<String>, threshold: u64, probe: Arc<dyn ResourceProbe>) -> Self {
        MemoryHealthIndicator {
            key: key.into(),
            kind: MemoryKind::Heap,
            threshold,
            probe,
        }
    }

    pub fn rss(key: impl Into<String>, threshold: u64, probe: Arc<dyn ResourceProbe>) -> Self {
        MemoryHealthIndicator {
            key: key.into(),
            kind: MemoryKind::ResidentSet,
            threshold,
            probe,
        }
    }
}

#[async_trait]
impl HealthIndicator for MemoryHealthIndicator {
    fn key(&self) -> &str {
        &self.key
    }

    async fn check(&self) -> IndicatorResult {
        let kind = self.kind;
        let used = read_blocking(&self.probe, move |probe| match kind {
            MemoryKind::Heap => probe.heap_used(),
            MemoryKind::ResidentSet => probe.resident_set(),
        })
        .await;

        let label = self.kind.label();
        match used {
            None => IndicatorResult::up()
                .with_message(format!("Used {label} is not available on this platform"))
                .with("threshold", self.threshold),
            Some(used) if used > self.threshold => {
                tracing::warn!(
                    "{} over threshold: {used} > {} bytes",
                    self.key,
                    self.threshold
                );

                IndicatorResult::down(format!("Used {label} exceeded the set threshold"))
                    .with("used", used)
                    .with("threshold", self.threshold)
            }
            Some(used) => IndicatorResult::up()
                .with("used", used)
                .with("threshold", self.threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        indicators::test_probe::FixedProbe, HealthIndicator, IndicatorStatus,
        MemoryHealthIndicator,
    };

    fn probe(heap: Option<u64>, rss: Option<u64>) -> Arc<FixedProbe> {
        Arc::new(FixedProbe {
            heap,
            rss,
            disk: None,
        })
    }

    #[tokio::test]
    async fn heap_below_threshold_is_up() {
        let indicator = MemoryHealthIndicator::heap("memory_heap", 100, probe(Some(99), None));
        let result = indicator.check().await;

        assert_eq!(result.status, IndicatorStatus::Up);
        assert_eq!(result.details["used"], 99);
    }

    #[tokio::test]
    async fn heap_at_threshold_is_up() {
        let indicator = MemoryHealthIndicator::heap("memory_heap", 100, probe(Some(100), None));
        assert!(indicator.check().await.is_up());
    }

    #[tokio::test]
    async fn heap_above_threshold_is_down() {
        let indicator = MemoryHealthIndicator::heap("memory_heap", 100, probe(Some(101), None));
        let result = indicator.check().await;

        assert_eq!(result.status, IndicatorStatus::Down);
        assert_eq!(
            result.message.as_deref(),
            Some("Used heap exceeded the set threshold")
        );
    }

    #[tokio::test]
    async fn rss_reads_resident_set_not_heap() {
        let indicator =
            MemoryHealthIndicator::rss("memory_rss", 100, probe(Some(1), Some(1_000)));

        assert_eq!(indicator.key(), "memory_rss");
        assert!(!indicator.check().await.is_up());
    }

    #[tokio::test]
    async fn missing_reading_does_not_fail() {
        let indicator = MemoryHealthIndicator::rss("memory_rss", 100, probe(None, None));
        let result = indicator.check().await;

        assert!(result.is_up());
        assert!(result.message.is_some());
    }
}
