use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{
    chart::{AxisType, ChartPalette},
    errors::ChartError,
};

/// Fixed-delay retry for transport failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, delay_ms: 2_000 }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }
}

/// DOM ids the notification service looks up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartElements {
    pub chart: String,
    pub error: String,
    /// Shown instead of the chart when the backend has no data.
    pub fallback: Option<String>,
}

impl Default for ChartElements {
    fn default() -> Self {
        Self {
            chart: "graph-symbol-price".to_string(),
            error: "graph-symbol-price-error".to_string(),
            fallback: None,
        }
    }
}

/// Runtime configuration, usually passed from JavaScript as a plain object.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Empty means same origin.
    pub backend_url: String,
    pub mode: String,
    pub poll_interval_ms: u32,
    pub retry: RetryPolicy,
    pub y_axis: AxisType,
    pub elements: ChartElements,
    pub palette: ChartPalette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            mode: "live".to_string(),
            poll_interval_ms: 5_000,
            retry: RetryPolicy::default(),
            y_axis: AxisType::Linear,
            elements: ChartElements::default(),
            palette: ChartPalette::default(),
        }
    }
}

impl ChartConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.poll_interval_ms == 0 {
            return Err(ChartError::InvalidConfig("poll_interval_ms must be positive".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ChartError::InvalidConfig("retry.max_attempts must be at least 1".to_string()));
        }
        if self.mode.trim().is_empty() {
            return Err(ChartError::InvalidConfig("mode cannot be empty".to_string()));
        }
        if self.y_axis == AxisType::Date {
            return Err(ChartError::InvalidConfig("y_axis cannot be a date axis".to_string()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            ChartConfig::from_json(r#"{"poll_interval_ms": 1000, "retry": {"max_attempts": 5}}"#).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 2_000);
        assert_eq!(config.mode, "live");
        assert_eq!(config.palette, ChartPalette::default());
    }

    #[test]
    fn rejects_zero_attempts_and_zero_interval() {
        assert!(ChartConfig::from_json(r#"{"retry": {"max_attempts": 0}}"#).is_err());
        assert!(ChartConfig::from_json(r#"{"poll_interval_ms": 0}"#).is_err());
        assert!(ChartConfig::from_json(r#"{"y_axis": "date"}"#).is_err());
        assert!(ChartConfig::from_json(r#"{"y_axis": "log"}"#).is_ok());
    }
}
