// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The full-screen ECG dashboard: banner, animated ECG strip, pulsing
//! heart, overall and per-core CPU, memory, swap, and an alerts box.

use async_trait::async_trait;
use heartbeat_common::style::{
    bar, cpu_severity, mem_severity, paint, status_symbol, Severity,
};
use heartbeat_metrics::SystemMetrics;

use super::{draw_frame, Mode};
use crate::lifeline::LifelineAnimator;

const STRIP_WIDTH: usize = 60;
const CORES_PER_ROW: usize = 4;

pub struct EcgMode {
    animator: LifelineAnimator,
}

impl Default for EcgMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EcgMode {
    pub fn new() -> Self {
        Self {
            animator: LifelineAnimator::new(),
        }
    }

    fn core_grid(sample: &SystemMetrics) -> Vec<String> {
        let mut lines = Vec::new();
        for row in sample.cpu_cores.chunks(CORES_PER_ROW) {
            let cells: Vec<String> = row
                .iter()
                .map(|core| {
                    paint(
                        &format!("[{:>2}] {:>5.1}%", core.core_id, core.usage_percent),
                        cpu_severity(core.usage_percent),
                    )
                })
                .collect();
            lines.push(format!("  {}", cells.join("   ")));
        }
        lines
    }

    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let cpu = sample.cpu_usage_percent;
        let mem = sample.memory_usage_percent;

        let mut lines = vec![
            "━━━ H E A R T B E A T ━━━".to_string(),
            String::new(),
            format!("  {}", self.animator.ecg(STRIP_WIDTH, cpu)),
            format!("  {}", self.animator.gradient(STRIP_WIDTH)),
            String::new(),
            format!(
                "  {} {}  [{}]",
                self.animator.heart(),
                sample.timestamp_rfc3339(),
                status_symbol(cpu, mem)
            ),
            String::new(),
            format!(
                "  CPU {:>5.1}%  {}",
                cpu,
                paint(&bar(cpu, 30), cpu_severity(cpu))
            ),
        ];
        lines.extend(Self::core_grid(sample));
        lines.push(String::new());
        lines.push(format!(
            "  MEM {:>5.1}%  {}  {:.0}/{:.0} MB",
            mem,
            paint(&bar(mem, 30), mem_severity(mem)),
            sample.memory_used_mb,
            sample.memory_total_mb
        ));
        if sample.has_swap() {
            lines.push(format!(
                "  SWP {:>5.1}%  {}  {:.0}/{:.0} MB",
                sample.swap_percent(),
                bar(sample.swap_percent(), 30),
                sample.swap_used_mb,
                sample.swap_total_mb
            ));
        }
        if sample.is_alerting() {
            lines.push(String::new());
            if sample.cpu_spike_detected {
                lines.push(paint(
                    &format!("  ⚠ CPU spike detected ({cpu:.1}%)"),
                    Severity::Red,
                ));
            }
            if sample.memory_leak_suspected {
                lines.push(paint(
                    &format!("  ⚠ Memory leak suspected ({mem:.1}% used)"),
                    Severity::Red,
                ));
            }
        }
        lines
    }
}

#[async_trait]
impl Mode for EcgMode {
    fn label(&self) -> &'static str {
        "ECG Dashboard"
    }

    fn description(&self) -> &'static str {
        "full-screen ECG dashboard with per-core grid and alerts"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.animator
            .advance(sample.cpu_usage_percent, sample.memory_usage_percent);
        draw_frame(&self.render(sample))?;
        Ok(())
    }
}
