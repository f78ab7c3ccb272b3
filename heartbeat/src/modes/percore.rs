// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use heartbeat_common::style::{bar, cpu_severity, paint};
use heartbeat_metrics::SystemMetrics;

use super::{draw_frame, Mode};

const BAR_WIDTH: usize = 20;

/// Horizontal per-core utilization bars, color-coded by the shared CPU
/// thresholds. Renders nothing when the sample carries no core data.
#[derive(Debug, Default)]
pub struct PerCoreMode;

impl PerCoreMode {
    pub fn new() -> Self {
        Self
    }

    fn render(sample: &SystemMetrics) -> Vec<String> {
        let mut lines = vec![
            format!(
                "PER-CORE HEATMAP — {} cores, overall {:.1}%",
                sample.cpu_cores.len(),
                sample.cpu_usage_percent
            ),
            String::new(),
        ];
        for core in &sample.cpu_cores {
            let gauge = paint(
                &bar(core.usage_percent, BAR_WIDTH),
                cpu_severity(core.usage_percent),
            );
            lines.push(format!(
                "core {:>2} [{gauge}] {:>5.1}%",
                core.core_id, core.usage_percent
            ));
        }
        lines
    }
}

#[async_trait]
impl Mode for PerCoreMode {
    fn label(&self) -> &'static str {
        "Per-Core Heatmap"
    }

    fn description(&self) -> &'static str {
        "horizontal per-core bars, color-coded by load"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        if sample.cpu_cores.is_empty() {
            return Ok(());
        }
        draw_frame(&Self::render(sample))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartbeat_metrics::CoreUsage;

    fn sample(cores: Vec<CoreUsage>) -> SystemMetrics {
        SystemMetrics {
            timestamp: 0,
            cpu_usage_percent: 42.0,
            cpu_cores: cores,
            memory_total_mb: 1000.0,
            memory_used_mb: 500.0,
            memory_free_mb: 500.0,
            memory_available_mb: 500.0,
            memory_usage_percent: 50.0,
            swap_total_mb: 0.0,
            swap_used_mb: 0.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        }
    }

    #[test]
    fn renders_one_row_per_core() {
        let lines = PerCoreMode::render(&sample(vec![
            CoreUsage { core_id: 0, usage_percent: 10.0 },
            CoreUsage { core_id: 1, usage_percent: 95.0 },
        ]));
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("core  0"));
        assert!(lines[3].contains("95.0%"));
    }

    #[tokio::test]
    async fn empty_core_list_is_suppressed() {
        let mut mode = PerCoreMode::new();
        // Must neither error nor draw.
        mode.on_metrics(&sample(vec![])).await.unwrap();
    }
}
