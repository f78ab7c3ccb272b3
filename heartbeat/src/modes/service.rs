// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One ANSI-free line per sample, for service logs and journald. Every
//! 20th sample carries a quote from a fixed rotating catalog.

use async_trait::async_trait;
use heartbeat_common::style::status_symbol;
use heartbeat_common::term::strip_ansi;
use heartbeat_metrics::SystemMetrics;

use super::{print_line, Mode};
use crate::lifeline::LifelineAnimator;

const QUOTE_EVERY: u64 = 20;

const QUOTES: [&str; 8] = [
    "Uptime is a habit, not an accident.",
    "Slow is smooth, smooth is fast.",
    "Every great incident review starts with a good log line.",
    "The quietest dashboards guard the loudest systems.",
    "Measure twice, page once.",
    "A healthy heartbeat is the best alert there is.",
    "Capacity planning is kindness to your future self.",
    "Trust the data, question the vibes.",
];

pub struct ServiceMode {
    animator: LifelineAnimator,
    sample_count: u64,
    quote_index: usize,
}

impl Default for ServiceMode {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMode {
    pub fn new() -> Self {
        Self {
            animator: LifelineAnimator::new(),
            sample_count: 0,
            quote_index: 0,
        }
    }

    fn render_line(&self, sample: &SystemMetrics) -> String {
        let lifeline = strip_ansi(&self.animator.sparkline_wave(16));
        format!(
            "[{}] {} CPU: {:.1}% | MEM: {:.1}% | {}",
            sample.timestamp_rfc3339(),
            status_symbol(sample.cpu_usage_percent, sample.memory_usage_percent),
            sample.cpu_usage_percent,
            sample.memory_usage_percent,
            lifeline,
        )
    }

    fn next_quote(&mut self) -> &'static str {
        let quote = QUOTES[self.quote_index % QUOTES.len()];
        self.quote_index += 1;
        quote
    }
}

#[async_trait]
impl Mode for ServiceMode {
    fn label(&self) -> &'static str {
        "Service Log"
    }

    fn description(&self) -> &'static str {
        "one plain line per sample, ANSI-free, for service logs"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.sample_count += 1;
        self.animator
            .advance(sample.cpu_usage_percent, sample.memory_usage_percent);
        print_line(&self.render_line(sample))?;
        if self.sample_count % QUOTE_EVERY == 0 {
            let quote = self.next_quote();
            print_line(&format!("    ~ {quote}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SystemMetrics {
        SystemMetrics {
            timestamp: 1700000000,
            cpu_usage_percent: 12.5,
            cpu_cores: vec![],
            memory_total_mb: 8192.0,
            memory_used_mb: 2048.0,
            memory_free_mb: 6144.0,
            memory_available_mb: 6144.0,
            memory_usage_percent: 25.0,
            swap_total_mb: 0.0,
            swap_used_mb: 0.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        }
    }

    #[test]
    fn line_shape_for_trivial_sample() {
        let mode = ServiceMode::new();
        let line = mode.render_line(&sample());
        assert!(line.starts_with("[2023-11-14T22:13:20.000Z]"));
        assert!(line.contains("🟢"));
        assert!(line.contains("CPU: 12.5%"));
        assert!(line.contains("MEM: 25.0%"));
        assert!(!line.contains('\u{1b}'));
    }

    #[test]
    fn quotes_rotate_through_catalog() {
        let mut mode = ServiceMode::new();
        let first = mode.next_quote();
        for _ in 0..QUOTES.len() - 1 {
            mode.next_quote();
        }
        assert_eq!(mode.next_quote(), first);
    }
}
