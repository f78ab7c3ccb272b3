// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-place windowed rendering: a fixed-height region at the cursor
//! position at startup, redrawn on every sample with cursor save/restore
//! so it can run above other terminal activity. Requires exclusive stdout
//! while active; interleaved writers will fight over the cursor.

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use heartbeat_common::style::{bar, status_symbol};
use heartbeat_common::term;
use heartbeat_common::{Logger, Meta};
use heartbeat_metrics::SystemMetrics;

use super::Mode;
use crate::lifeline::LifelineAnimator;

const REGION_HEIGHT: u16 = 13;
const BOX_WIDTH: usize = 40;

pub struct WindowMode {
    logger: Arc<dyn Logger>,
    animator: LifelineAnimator,
    region_top: u16,
}

impl WindowMode {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            animator: LifelineAnimator::new(),
            region_top: 1,
        }
    }

    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let cpu = sample.cpu_usage_percent;
        let mem = sample.memory_usage_percent;
        let mut lines = vec![
            format!("┌─ heartbeat {}┐", "─".repeat(BOX_WIDTH.saturating_sub(13))),
            format!(
                "│ {} {}  {}",
                self.animator.heart(),
                sample.timestamp_rfc3339(),
                status_symbol(cpu, mem)
            ),
            format!("│ {}", self.animator.sparkline_wave(BOX_WIDTH - 4)),
            String::from("│"),
            format!("│ CPU {cpu:>5.1}% [{}]", bar(cpu, 16)),
            format!("│ MEM {mem:>5.1}% [{}]", bar(mem, 16)),
        ];
        if sample.has_swap() {
            lines.push(format!(
                "│ SWP {:>5.1}% [{}]",
                sample.swap_percent(),
                bar(sample.swap_percent(), 16)
            ));
        }
        lines.push(String::from("│"));
        lines.push(format!(
            "│ cores: {}   spike: {}   leak: {}",
            sample.cpu_cores.len(),
            if sample.cpu_spike_detected { "YES" } else { "no" },
            if sample.memory_leak_suspected { "YES" } else { "no" },
        ));
        lines.push(format!("│ frame {}", self.animator.frame()));

        // The region is fixed height: pad with bare borders, keep the
        // bottom border last.
        while lines.len() < REGION_HEIGHT as usize - 1 {
            lines.push(String::from("│"));
        }
        lines.truncate(REGION_HEIGHT as usize - 1);
        lines.push(format!("└{}┘", "─".repeat(BOX_WIDTH)));
        lines
    }

    fn redraw(&self, lines: &[String]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        term::save_cursor(&mut out)?;
        for (offset, line) in lines.iter().enumerate() {
            term::move_to(&mut out, self.region_top + offset as u16, 1)?;
            term::clear_line(&mut out)?;
            write!(out, "{line}")?;
        }
        term::restore_cursor(&mut out)?;
        out.flush()
    }
}

#[async_trait]
impl Mode for WindowMode {
    fn label(&self) -> &'static str {
        "Window"
    }

    fn description(&self) -> &'static str {
        "in-place 13-line region redrawn beside other output"
    }

    async fn on_start(&mut self) -> anyhow::Result<()> {
        // Reserve the region so the redraws never scroll the scrollback.
        {
            let mut out = io::stdout().lock();
            for _ in 0..REGION_HEIGHT {
                writeln!(out)?;
            }
            out.flush()?;
        }
        match term::cursor_row() {
            Ok(row) => self.region_top = row.saturating_sub(REGION_HEIGHT).max(1),
            Err(err) => {
                self.logger.log_warning(
                    "cursor position unavailable, rendering from the top",
                    Some(&Meta::new().kv("error", err)),
                );
                self.region_top = 1;
            }
        }
        Ok(())
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        self.animator
            .advance(sample.cpu_usage_percent, sample.memory_usage_percent);
        self.redraw(&self.render(sample))?;
        Ok(())
    }
}
