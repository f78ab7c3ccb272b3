// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use heartbeat_common::style::{cpu_severity, paint};
use heartbeat_metrics::{Scale, SlidingWindow, SystemMetrics};

use super::{print_line, Mode};

const SPARK_WIDTH: usize = 12;

/// One line per sample: a short CPU sparkline plus the headline numbers.
/// Designed for piping into `tee`, pagers, or tmux panes.
pub struct SparklineMode {
    cpu_window: SlidingWindow,
}

impl Default for SparklineMode {
    fn default() -> Self {
        Self::new()
    }
}

impl SparklineMode {
    pub fn new() -> Self {
        Self {
            cpu_window: SlidingWindow::new(SPARK_WIDTH),
        }
    }

    fn render_line(&self, sample: &SystemMetrics) -> String {
        let spark = paint(
            &self.cpu_window.sparkline(Scale::Percent),
            cpu_severity(sample.cpu_usage_percent),
        );
        let mut line = format!(
            "{spark} CPU {:.1}% | MEM {:.1}%",
            sample.cpu_usage_percent, sample.memory_usage_percent
        );
        if sample.has_swap() {
            line.push_str(&format!(
                " | SWAP {:.0}/{:.0}MB",
                sample.swap_used_mb, sample.swap_total_mb
            ));
        }
        line
    }
}

#[async_trait]
impl Mode for SparklineMode {
    fn label(&self) -> &'static str {
        "Sparkline Stream"
    }

    fn description(&self) -> &'static str {
        "one colored sparkline line per sample, pipe-friendly"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.cpu_window.push(sample.cpu_usage_percent);
        print_line(&self.render_line(sample))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cpu: f64, swap_total: f64) -> SystemMetrics {
        SystemMetrics {
            timestamp: 0,
            cpu_usage_percent: cpu,
            cpu_cores: vec![],
            memory_total_mb: 1000.0,
            memory_used_mb: 400.0,
            memory_free_mb: 600.0,
            memory_available_mb: 600.0,
            memory_usage_percent: 40.0,
            swap_total_mb: swap_total,
            swap_used_mb: swap_total / 2.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        }
    }

    #[test]
    fn swap_is_omitted_when_unconfigured() {
        let mut mode = SparklineMode::new();
        mode.cpu_window.push(10.0);
        assert!(!mode.render_line(&sample(10.0, 0.0)).contains("SWAP"));
        assert!(mode
            .render_line(&sample(10.0, 2048.0))
            .contains("SWAP 1024/2048MB"));
    }

    #[test]
    fn window_stays_at_spark_width() {
        let mut mode = SparklineMode::new();
        for i in 0..40 {
            mode.cpu_window.push(f64::from(i));
        }
        assert_eq!(mode.cpu_window.len(), SPARK_WIDTH);
    }
}
