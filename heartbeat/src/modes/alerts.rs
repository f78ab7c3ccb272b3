// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Silent on healthy samples; speaks only when the collector raises an
//! alert flag, plus a periodic one-line heartbeat so operators can tell
//! "quiet" from "dead".

use async_trait::async_trait;
use heartbeat_metrics::SystemMetrics;

use super::{print_line, Mode};

/// A "still healthy" line is emitted after this many consecutive healthy
/// samples, then the streak restarts.
const HEALTHY_HEARTBEAT_EVERY: u64 = 30;

const BOX_WIDTH: usize = 46;

pub struct AlertsMode {
    sample_count: u64,
    healthy_streak: u64,
}

impl Default for AlertsMode {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertsMode {
    pub fn new() -> Self {
        Self {
            sample_count: 0,
            healthy_streak: 0,
        }
    }

    fn render_alert(sample: &SystemMetrics) -> Vec<String> {
        let mut body = vec![format!("⚠ ALERT @ {}", sample.timestamp_rfc3339())];
        if sample.cpu_spike_detected {
            body.push(format!(
                "CPU spike detected ({:.1}%)",
                sample.cpu_usage_percent
            ));
        }
        if sample.memory_leak_suspected {
            body.push(format!(
                "Memory leak suspected ({:.1}% used)",
                sample.memory_usage_percent
            ));
        }

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format!("┌{}┐", "─".repeat(BOX_WIDTH)));
        for text in body {
            let pad = BOX_WIDTH.saturating_sub(display_width(&text) + 1);
            lines.push(format!("│ {text}{}│", " ".repeat(pad)));
        }
        lines.push(format!("└{}┘", "─".repeat(BOX_WIDTH)));
        lines
    }
}

// Close enough for box padding: wide glyphs (emoji and the like) count
// double, everything else single.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if (c as u32) > 0x2fff { 2 } else { 1 })
        .sum()
}

#[async_trait]
impl Mode for AlertsMode {
    fn label(&self) -> &'static str {
        "Alerts Only"
    }

    fn description(&self) -> &'static str {
        "silent while healthy, boxed alerts on spikes and leaks"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.sample_count += 1;
        if self.sample_count == 1 {
            print_line("🫀 metrics stream established")?;
        }

        if sample.is_alerting() {
            self.healthy_streak = 0;
            for line in Self::render_alert(sample) {
                print_line(&line)?;
            }
            return Ok(());
        }

        self.healthy_streak += 1;
        if self.healthy_streak == HEALTHY_HEARTBEAT_EVERY {
            print_line(&format!(
                "🟢 Stable — {HEALTHY_HEARTBEAT_EVERY} consecutive healthy samples"
            ))?;
            self.healthy_streak = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> SystemMetrics {
        SystemMetrics {
            timestamp: 1700000000,
            cpu_usage_percent: 10.0,
            cpu_cores: vec![],
            memory_total_mb: 1000.0,
            memory_used_mb: 100.0,
            memory_free_mb: 900.0,
            memory_available_mb: 900.0,
            memory_usage_percent: 10.0,
            swap_total_mb: 0.0,
            swap_used_mb: 0.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        }
    }

    fn spiking() -> SystemMetrics {
        SystemMetrics {
            cpu_usage_percent: 95.0,
            cpu_spike_detected: true,
            ..healthy()
        }
    }

    #[test]
    fn alert_box_names_the_condition() {
        let lines = AlertsMode::render_alert(&spiking());
        assert!(lines[0].starts_with('┌'));
        assert!(lines.iter().any(|l| l.contains("CPU spike detected (95.0%)")));
        assert!(lines.last().unwrap().starts_with('└'));
    }

    #[test]
    fn leak_and_spike_both_listed() {
        let sample = SystemMetrics {
            memory_leak_suspected: true,
            memory_usage_percent: 91.2,
            ..spiking()
        };
        let lines = AlertsMode::render_alert(&sample);
        assert!(lines.iter().any(|l| l.contains("CPU spike detected")));
        assert!(lines
            .iter()
            .any(|l| l.contains("Memory leak suspected (91.2% used)")));
    }

    #[tokio::test]
    async fn streak_resets_on_alert_and_after_heartbeat() {
        let mut mode = AlertsMode::new();
        for _ in 0..29 {
            mode.on_metrics(&healthy()).await.unwrap();
        }
        assert_eq!(mode.healthy_streak, 29);
        mode.on_metrics(&spiking()).await.unwrap();
        assert_eq!(mode.healthy_streak, 0);
        for _ in 0..30 {
            mode.on_metrics(&healthy()).await.unwrap();
        }
        // 30th healthy sample emits the heartbeat and restarts the streak.
        assert_eq!(mode.healthy_streak, 0);
    }
}
