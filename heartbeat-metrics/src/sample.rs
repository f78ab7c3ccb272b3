// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The wire sample emitted by the native collector, one JSON object per
//! line on its stdout. Samples are immutable once decoded; consumers that
//! need history copy the scalar fields into their own windows.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Lines longer than this are rejected before JSON parsing so hostile
/// input cannot make the decoder allocate without bound.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("line exceeds {MAX_LINE_BYTES} bytes ({0} bytes)")]
    LineTooLong(usize),
    #[error("invalid sample json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Utilization of a single core. Order is stable across samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreUsage {
    pub core_id: u32,
    pub usage_percent: f64,
}

/// One system-metric sample, produced once per collection tick.
///
/// Percent-typed fields are nominally in [0, 100]; out-of-range values are
/// accepted as-is since the collector is treated as ground truth. The alert
/// booleans are opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Seconds since epoch, UTC.
    pub timestamp: i64,
    pub cpu_usage_percent: f64,
    #[serde(default)]
    pub cpu_cores: Vec<CoreUsage>,
    pub memory_total_mb: f64,
    pub memory_used_mb: f64,
    pub memory_free_mb: f64,
    pub memory_available_mb: f64,
    pub memory_usage_percent: f64,
    #[serde(default)]
    pub swap_total_mb: f64,
    #[serde(default)]
    pub swap_used_mb: f64,
    #[serde(default)]
    pub cpu_spike_detected: bool,
    #[serde(default)]
    pub memory_leak_suspected: bool,
}

impl SystemMetrics {
    /// Decode one collector stdout line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        if line.len() > MAX_LINE_BYTES {
            return Err(DecodeError::LineTooLong(line.len()));
        }
        Ok(serde_json::from_str(line)?)
    }

    /// Whether the host has swap configured at all.
    pub fn has_swap(&self) -> bool {
        self.swap_total_mb > 0.0
    }

    /// Swap utilization in percent, 0 when no swap is configured.
    pub fn swap_percent(&self) -> f64 {
        if self.has_swap() {
            (self.swap_used_mb / self.swap_total_mb) * 100.0
        } else {
            0.0
        }
    }

    /// True when the collector flagged either alert condition.
    pub fn is_alerting(&self) -> bool {
        self.cpu_spike_detected || self.memory_leak_suspected
    }

    /// RFC 3339 timestamp with millisecond precision, e.g.
    /// `2023-11-14T22:13:20.000Z`.
    pub fn timestamp_rfc3339(&self) -> String {
        match DateTime::from_timestamp(self.timestamp, 0) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => format!("<invalid timestamp {}>", self.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r#"{
            "timestamp": 1700000000,
            "cpu_usage_percent": 12.5,
            "cpu_cores": [
                {"core_id": 0, "usage_percent": 10.0},
                {"core_id": 1, "usage_percent": 15.0}
            ],
            "memory_total_mb": 8192,
            "memory_used_mb": 2048,
            "memory_free_mb": 6144,
            "memory_available_mb": 6144,
            "memory_usage_percent": 25.0,
            "swap_total_mb": 1024,
            "swap_used_mb": 256,
            "cpu_spike_detected": false,
            "memory_leak_suspected": false
        }"#
        .to_string()
    }

    #[test]
    fn decodes_full_sample() {
        let m = SystemMetrics::decode(&sample_json()).unwrap();
        assert_eq!(m.timestamp, 1700000000);
        assert_eq!(m.cpu_usage_percent, 12.5);
        assert_eq!(m.cpu_cores.len(), 2);
        assert_eq!(m.cpu_cores[1].core_id, 1);
        assert!(m.has_swap());
        assert_eq!(m.swap_percent(), 25.0);
        assert!(!m.is_alerting());
    }

    #[test]
    fn missing_cores_and_alerts_default() {
        let m = SystemMetrics::decode(
            r#"{"timestamp": 1, "cpu_usage_percent": 5.0,
                "memory_total_mb": 100, "memory_used_mb": 10,
                "memory_free_mb": 90, "memory_available_mb": 90,
                "memory_usage_percent": 10.0}"#,
        )
        .unwrap();
        assert!(m.cpu_cores.is_empty());
        assert!(!m.cpu_spike_detected);
        assert!(!m.memory_leak_suspected);
        assert!(!m.has_swap());
        assert_eq!(m.swap_percent(), 0.0);
    }

    #[test]
    fn out_of_range_percent_passes_through() {
        let m = SystemMetrics::decode(
            r#"{"timestamp": 1, "cpu_usage_percent": 120.5,
                "memory_total_mb": 100, "memory_used_mb": 10,
                "memory_free_mb": 90, "memory_available_mb": 90,
                "memory_usage_percent": 10.0}"#,
        )
        .unwrap();
        assert_eq!(m.cpu_usage_percent, 120.5);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            SystemMetrics::decode("not json at all"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            SystemMetrics::decode(r#"{"timestamp": "tomorrow"}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn rejects_oversized_line() {
        let line = "x".repeat(MAX_LINE_BYTES + 1);
        assert!(matches!(
            SystemMetrics::decode(&line),
            Err(DecodeError::LineTooLong(_))
        ));
    }

    #[test]
    fn round_trips_through_json() {
        let m = SystemMetrics::decode(&sample_json()).unwrap();
        let line = serde_json::to_string(&m).unwrap();
        let back = SystemMetrics::decode(&line).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn rfc3339_render() {
        let m = SystemMetrics::decode(&sample_json()).unwrap();
        assert_eq!(m.timestamp_rfc3339(), "2023-11-14T22:13:20.000Z");
    }
}
