//! Health indicators for readiness and liveness probes.
//!
//! Each [`HealthIndicator`] produces an `up`/`down` result under its own key;
//! a [`HealthCheck`] runs a set of them and folds the results into a single
//! [`HealthCheckResult`] which is `error` as soon as one indicator is down.

mod allocator;
mod check;
mod indicators;
mod probe;
mod result;

pub use allocator::{allocated_bytes, TrackingAllocator};
pub use check::{HealthCheck, HealthChecks};
pub use indicators::*;
pub use probe::{DiskUsage, ResourceProbe, SystemProbe};
pub use result::{HealthCheckResult, HealthStatus, IndicatorResult, IndicatorStatus};
