use serde::Serialize;
use std::fmt;

use crate::annotation::PropertyEntry;
use crate::core::{CommandError, Result};

/// The thread pool settings a command may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadPoolPropertyKey {
    CoreSize,
    MaxQueueSize,
    KeepAliveTimeMinutes,
    MetricsRollingStatisticalWindowBuckets,
    QueueSizeRejectionThreshold,
    MetricsRollingStatisticalWindowInMilliseconds,
}

impl ThreadPoolPropertyKey {
    pub const ALL: [ThreadPoolPropertyKey; 6] = [
        Self::CoreSize,
        Self::MaxQueueSize,
        Self::KeepAliveTimeMinutes,
        Self::MetricsRollingStatisticalWindowBuckets,
        Self::QueueSizeRejectionThreshold,
        Self::MetricsRollingStatisticalWindowInMilliseconds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreSize => "coreSize",
            Self::MaxQueueSize => "maxQueueSize",
            Self::KeepAliveTimeMinutes => "keepAliveTimeMinutes",
            Self::MetricsRollingStatisticalWindowBuckets => {
                "metricsRollingStatisticalWindowBuckets"
            }
            Self::QueueSizeRejectionThreshold => "queueSizeRejectionThreshold",
            Self::MetricsRollingStatisticalWindowInMilliseconds => {
                "metricsRollingStatisticalWindowInMilliseconds"
            }
        }
    }

    /// Exact, case-sensitive match on the declared name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for ThreadPoolPropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay of thread pool settings. `None` keeps the engine default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    core_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_queue_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive_time_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_rolling_statistical_window_buckets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue_size_rejection_threshold: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_rolling_statistical_window_in_milliseconds: Option<i32>,
}

impl ThreadPoolProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map declared entries onto an overlay.
    ///
    /// Each key sets an independent field, so order does not matter and a
    /// repeated key keeps its last value. The first unknown name or
    /// non-integer value aborts the whole mapping.
    pub fn from_entries(entries: &[PropertyEntry]) -> Result<Self> {
        let mut properties = Self::new();
        for entry in entries {
            let key = ThreadPoolPropertyKey::from_name(&entry.name)
                .ok_or_else(|| CommandError::UnsupportedProperty(entry.name.clone()))?;
            let value = entry.value.parse::<i32>().map_err(|err| CommandError::InvalidValue {
                name: entry.name.clone(),
                value: entry.value.clone(),
                reason: err.to_string(),
            })?;
            properties.set(key, value);
        }
        Ok(properties)
    }

    pub fn set(&mut self, key: ThreadPoolPropertyKey, value: i32) {
        *self.slot_mut(key) = Some(value);
    }

    pub fn get(&self, key: ThreadPoolPropertyKey) -> Option<i32> {
        match key {
            ThreadPoolPropertyKey::CoreSize => self.core_size,
            ThreadPoolPropertyKey::MaxQueueSize => self.max_queue_size,
            ThreadPoolPropertyKey::KeepAliveTimeMinutes => self.keep_alive_time_minutes,
            ThreadPoolPropertyKey::MetricsRollingStatisticalWindowBuckets => {
                self.metrics_rolling_statistical_window_buckets
            }
            ThreadPoolPropertyKey::QueueSizeRejectionThreshold => {
                self.queue_size_rejection_threshold
            }
            ThreadPoolPropertyKey::MetricsRollingStatisticalWindowInMilliseconds => {
                self.metrics_rolling_statistical_window_in_milliseconds
            }
        }
    }

    fn slot_mut(&mut self, key: ThreadPoolPropertyKey) -> &mut Option<i32> {
        match key {
            ThreadPoolPropertyKey::CoreSize => &mut self.core_size,
            ThreadPoolPropertyKey::MaxQueueSize => &mut self.max_queue_size,
            ThreadPoolPropertyKey::KeepAliveTimeMinutes => &mut self.keep_alive_time_minutes,
            ThreadPoolPropertyKey::MetricsRollingStatisticalWindowBuckets => {
                &mut self.metrics_rolling_statistical_window_buckets
            }
            ThreadPoolPropertyKey::QueueSizeRejectionThreshold => {
                &mut self.queue_size_rejection_threshold
            }
            ThreadPoolPropertyKey::MetricsRollingStatisticalWindowInMilliseconds => {
                &mut self.metrics_rolling_statistical_window_in_milliseconds
            }
        }
    }

    pub fn with_core_size(mut self, value: i32) -> Self {
        self.core_size = Some(value);
        self
    }

    pub fn with_max_queue_size(mut self, value: i32) -> Self {
        self.max_queue_size = Some(value);
        self
    }

    pub fn with_keep_alive_time_minutes(mut self, value: i32) -> Self {
        self.keep_alive_time_minutes = Some(value);
        self
    }

    pub fn with_metrics_rolling_statistical_window_buckets(mut self, value: i32) -> Self {
        self.metrics_rolling_statistical_window_buckets = Some(value);
        self
    }

    pub fn with_queue_size_rejection_threshold(mut self, value: i32) -> Self {
        self.queue_size_rejection_threshold = Some(value);
        self
    }

    pub fn with_metrics_rolling_statistical_window_in_milliseconds(mut self, value: i32) -> Self {
        self.metrics_rolling_statistical_window_in_milliseconds = Some(value);
        self
    }

    /// Overridden keys with their values, in declaration order of the keys.
    pub fn overrides(&self) -> Vec<(ThreadPoolPropertyKey, i32)> {
        ThreadPoolPropertyKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides().is_empty()
    }
}

/// Overlay for a declaration, or `None` when nothing was declared.
pub fn map_thread_pool_properties(
    entries: &[PropertyEntry],
) -> Result<Option<ThreadPoolProperties>> {
    if entries.is_empty() {
        return Ok(None);
    }
    ThreadPoolProperties::from_entries(entries).map(Some)
}
