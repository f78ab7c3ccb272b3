// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use heartbeat_common::style::{bar, cpu_severity, mem_severity, paint, status_symbol};
use heartbeat_metrics::{CoreUsage, SystemMetrics};

use super::{draw_frame, Mode};
use crate::lifeline::LifelineAnimator;

const TOP_CORES: usize = 3;

/// The ECG dashboard squeezed into a handful of lines for narrow
/// terminals: lifeline, the two headline gauges, and the busiest cores.
pub struct CompactMode {
    animator: LifelineAnimator,
}

impl Default for CompactMode {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactMode {
    pub fn new() -> Self {
        Self {
            animator: LifelineAnimator::new(),
        }
    }

    fn top_cores(sample: &SystemMetrics) -> Vec<&CoreUsage> {
        let mut cores: Vec<&CoreUsage> = sample.cpu_cores.iter().collect();
        cores.sort_by(|a, b| {
            b.usage_percent
                .partial_cmp(&a.usage_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        cores.truncate(TOP_CORES);
        cores
    }

    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let cpu = sample.cpu_usage_percent;
        let mem = sample.memory_usage_percent;
        let mut lines = vec![
            format!(
                "{} heartbeat {} {}",
                self.animator.heart(),
                status_symbol(cpu, mem),
                self.animator.sparkline_wave(24)
            ),
            format!("CPU {:>5.1}% {}", cpu, paint(&bar(cpu, 16), cpu_severity(cpu))),
            format!("MEM {:>5.1}% {}", mem, paint(&bar(mem, 16), mem_severity(mem))),
        ];
        if sample.has_swap() {
            lines.push(format!(
                "SWP {:>5.1}% {}",
                sample.swap_percent(),
                bar(sample.swap_percent(), 16)
            ));
        }
        for core in Self::top_cores(sample) {
            lines.push(format!(
                "  core {:>2} {:>5.1}%",
                core.core_id, core.usage_percent
            ));
        }
        if sample.is_alerting() {
            lines.push("⚠ alert flagged by collector".to_string());
        }
        lines
    }
}

#[async_trait]
impl Mode for CompactMode {
    fn label(&self) -> &'static str {
        "Compact Dashboard"
    }

    fn description(&self) -> &'static str {
        "small dashboard for narrow terminals, top-3 cores"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.animator
            .advance(sample.cpu_usage_percent, sample.memory_usage_percent);
        draw_frame(&self.render(sample))?;
        Ok(())
    }
}
