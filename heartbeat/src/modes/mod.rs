// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The pluggable consumers of the sample stream.
//!
//! Exactly one mode is active per run. Each mode owns its own state
//! (windows, frame counters, anomaly counters); there is no module-level
//! mutable state anywhere in the catalog. Lifecycle: `on_start` → ordered
//! `on_metrics` calls → `on_shutdown` exactly once. A mode surfaces
//! failures through its `Result`s and never aborts the pipeline.

pub mod alerts;
pub mod compact;
pub mod cycle;
pub mod decorative;
pub mod ecg;
pub mod percore;
pub mod raw;
pub mod server;
pub mod service;
pub mod sparkline;
pub mod stats;
pub mod timeline;
pub mod window;

use std::io::{self, Write};

use async_trait::async_trait;
use heartbeat_metrics::SystemMetrics;

use crate::supervisor::CollectorStatus;

#[async_trait]
pub trait Mode: Send {
    fn label(&self) -> &'static str;
    fn description(&self) -> &'static str;

    async fn on_start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()>;

    async fn on_shutdown(&mut self, _status: CollectorStatus) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Clear the screen and draw a full frame. The dashboard-style modes all
/// redraw through here so stdout writes stay serialized on the driver.
pub(crate) fn draw_frame(lines: &[String]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    heartbeat_common::term::clear_screen(&mut out)?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Emit one scrolling line (service, sparkline, alerts, raw).
pub(crate) fn print_line(line: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()
}
