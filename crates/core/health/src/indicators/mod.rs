use async_trait::async_trait;

use crate::IndicatorResult;

mod disk;
mod http;
mod memory;

pub use disk::DiskHealthIndicator;
pub use http::HttpHealthIndicator;
pub use memory::MemoryHealthIndicator;

/// A single named health check
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Key the result is reported under
    fn key(&self) -> &str;

    /// Take a reading and compare it against the indicator's threshold
    async fn check(&self) -> IndicatorResult;
}
