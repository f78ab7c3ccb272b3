// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Rolling statistics over a 120-sample window, with cumulative anomaly
//! counters and per-sample deltas.

use async_trait::async_trait;
use heartbeat_metrics::{SlidingWindow, SystemMetrics};

use super::{draw_frame, Mode};

const WINDOW: usize = 120;

/// Deltas smaller than this render as steady.
const DELTA_EPSILON: f64 = 0.05;

pub struct StatsMode {
    cpu: SlidingWindow,
    mem: SlidingWindow,
    previous: Option<(f64, f64)>,
    sample_count: u64,
    spike_count: u64,
    leak_count: u64,
}

impl Default for StatsMode {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn trend_arrow(delta: f64) -> &'static str {
    if delta > DELTA_EPSILON {
        "↗"
    } else if delta < -DELTA_EPSILON {
        "↘"
    } else {
        "→"
    }
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "--".to_string(),
    }
}

impl StatsMode {
    pub fn new() -> Self {
        Self {
            cpu: SlidingWindow::new(WINDOW),
            mem: SlidingWindow::new(WINDOW),
            previous: None,
            sample_count: 0,
            spike_count: 0,
            leak_count: 0,
        }
    }

    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let (prev_cpu, prev_mem) = self
            .previous
            .unwrap_or((sample.cpu_usage_percent, sample.memory_usage_percent));
        let mut lines = vec![
            format!("STATS — rolling window of {WINDOW} samples"),
            String::new(),
            format!(
                "samples {:<8} spikes {:<6} leaks {}",
                self.sample_count, self.spike_count, self.leak_count
            ),
            format!(
                "CPU  now {:>5.1}% {}  avg {:>5}  min {:>5}  max {:>5}  stddev {:>5}",
                sample.cpu_usage_percent,
                trend_arrow(sample.cpu_usage_percent - prev_cpu),
                format_stat(self.cpu.mean()),
                format_stat(self.cpu.min()),
                format_stat(self.cpu.max()),
                format_stat(self.cpu.stddev()),
            ),
            format!(
                "MEM  now {:>5.1}% {}  avg {:>5}  min {:>5}  max {:>5}  stddev {:>5}",
                sample.memory_usage_percent,
                trend_arrow(sample.memory_usage_percent - prev_mem),
                format_stat(self.mem.mean()),
                format_stat(self.mem.min()),
                format_stat(self.mem.max()),
                format_stat(self.mem.stddev()),
            ),
        ];
        if sample.has_swap() {
            lines.push(format!(
                "SWAP {:>5.1}%    ({:.0}/{:.0} MB)",
                sample.swap_percent(),
                sample.swap_used_mb,
                sample.swap_total_mb
            ));
        }
        lines
    }
}

#[async_trait]
impl Mode for StatsMode {
    fn label(&self) -> &'static str {
        "Rolling Stats"
    }

    fn description(&self) -> &'static str {
        "rolling avg/min/max/stddev with anomaly counters and deltas"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.sample_count += 1;
        if sample.cpu_spike_detected {
            self.spike_count += 1;
        }
        if sample.memory_leak_suspected {
            self.leak_count += 1;
        }
        self.cpu.push(sample.cpu_usage_percent);
        self.mem.push(sample.memory_usage_percent);
        draw_frame(&self.render(sample))?;
        self.previous = Some((sample.cpu_usage_percent, sample.memory_usage_percent));
        Ok(())
    }
}
