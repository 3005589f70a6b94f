use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State of a single indicator
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStatus {
    Up,
    Down,
}

/// Outcome of a single indicator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndicatorResult {
    pub status: IndicatorStatus,

    /// Explanation for a down (or degraded) result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Indicator specific readings such as `used` and `threshold`
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl IndicatorResult {
    pub fn up() -> Self {
        IndicatorResult {
            status: IndicatorStatus::Up,
            message: None,
            details: BTreeMap::new(),
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        IndicatorResult {
            status: IndicatorStatus::Down,
            message: Some(message.into()),
            details: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_owned(), value.into());
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == IndicatorStatus::Up
    }
}

/// Aggregate state of a health check
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Result of running a set of indicators
///
/// `info` holds the indicators that are up, `error` the ones that are down
/// and `details` every indicator regardless of state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub info: BTreeMap<String, IndicatorResult>,
    pub error: BTreeMap<String, IndicatorResult>,
    pub details: BTreeMap<String, IndicatorResult>,
}

impl HealthCheckResult {
    pub fn from_results(results: impl IntoIterator<Item = (String, IndicatorResult)>) -> Self {
        let mut info = BTreeMap::new();
        let mut error = BTreeMap::new();
        let mut details = BTreeMap::new();

        for (key, result) in results {
            if result.is_up() {
                info.insert(key.clone(), result.clone());
            } else {
                error.insert(key.clone(), result.clone());
            }

            details.insert(key, result);
        }

        HealthCheckResult {
            status: if error.is_empty() {
                HealthStatus::Ok
            } else {
                HealthStatus::Error
            },
            info,
            error,
            details,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_check_is_healthy() {
        let result = HealthCheckResult::from_results(Vec::<(String, IndicatorResult)>::new());
        assert!(result.is_healthy());
        assert!(result.details.is_empty());
    }

    #[test]
    fn single_down_indicator_fails_the_aggregate() {
        let result = HealthCheckResult::from_results([
            ("memory_heap".to_owned(), IndicatorResult::up()),
            ("storage".to_owned(), IndicatorResult::down("full")),
        ]);

        assert_eq!(result.status, HealthStatus::Error);
        assert!(result.info.contains_key("memory_heap"));
        assert!(result.error.contains_key("storage"));
        assert_eq!(result.details.len(), 2);
    }

    #[test]
    fn serialises_in_probe_format() {
        let result = HealthCheckResult::from_results([(
            "memory_rss".to_owned(),
            IndicatorResult::up().with("used", 10).with("threshold", 20),
        )]);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["info"]["memory_rss"]["status"], "up");
        assert_eq!(value["info"]["memory_rss"]["used"], 10);
        assert_eq!(value["details"]["memory_rss"]["threshold"], 20);
        assert!(value["info"]["memory_rss"].get("message").is_none());
        assert_eq!(value["error"], serde_json::json!({}));
    }
}
