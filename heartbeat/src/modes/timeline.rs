// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use heartbeat_metrics::{Scale, SlidingWindow, SystemMetrics};

use super::{draw_frame, Mode};

const HISTORY: usize = 60;

/// Block-sparkline history of CPU, memory, and swap utilization over the
/// last 60 samples.
pub struct TimelineMode {
    cpu: SlidingWindow,
    mem: SlidingWindow,
    swap: SlidingWindow,
}

impl Default for TimelineMode {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineMode {
    pub fn new() -> Self {
        Self {
            cpu: SlidingWindow::new(HISTORY),
            mem: SlidingWindow::new(HISTORY),
            swap: SlidingWindow::new(HISTORY),
        }
    }

    fn row(label: &str, window: &SlidingWindow) -> String {
        format!(
            "{label:<5} {}  min {} mean {} max {}",
            window.sparkline(Scale::Percent),
            stat(window.min()),
            stat(window.mean()),
            stat(window.max()),
        )
    }

    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let mut lines = vec![
            format!("TIMELINE — last {HISTORY} samples"),
            String::new(),
            Self::row("CPU", &self.cpu),
            Self::row("MEM", &self.mem),
        ];
        if sample.has_swap() {
            lines.push(Self::row("SWAP", &self.swap));
        }
        lines
    }
}

fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:5.1}"),
        None => "   --".to_string(),
    }
}

#[async_trait]
impl Mode for TimelineMode {
    fn label(&self) -> &'static str {
        "Timeline"
    }

    fn description(&self) -> &'static str {
        "sliding 60-sample sparklines with min/mean/max"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.cpu.push(sample.cpu_usage_percent);
        self.mem.push(sample.memory_usage_percent);
        self.swap.push(sample.swap_percent());
        draw_frame(&self.render(sample))?;
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
            memory_used_mb: 500.0,
            memory_free_mb: 500.0,
            memory_available_mb: 500.0,
            memory_usage_percent: 50.0,
            swap_total_mb: swap_total,
            swap_used_mb: swap_total / 4.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        }
    }

    #[tokio::test]
    async fn history_is_bounded_at_sixty() {
        let mut mode = TimelineMode::new();
        for i in 0..90 {
            mode.on_metrics(&sample(f64::from(i), 0.0)).await.unwrap();
        }
        assert_eq!(mode.cpu.len(), HISTORY);
        assert_eq!(mode.cpu.snapshot()[0], 30.0);
    }

    #[test]
    fn swap_row_tracks_current_sample() {
        let mut mode = TimelineMode::new();
        mode.cpu.push(10.0);
        mode.mem.push(50.0);
        mode.swap.push(25.0);
        assert_eq!(mode.render(&sample(10.0, 0.0)).len(), 4);
        assert_eq!(mode.render(&sample(10.0, 2048.0)).len(), 5);
    }
}
