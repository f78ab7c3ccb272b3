// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The rotating meta-mode: every visualization mode, five minutes each.
//!
//! Children are built lazily on first visit and owned by the map, so
//! teardown is just dropping the map. The rotation timer is the one place
//! a visualization consults the wall clock.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use heartbeat_common::Logger;
use heartbeat_metrics::SystemMetrics;

use super::Mode;
use crate::dispatcher;
use crate::supervisor::CollectorStatus;

const ROTATION_PERIOD: Duration = Duration::from_secs(5 * 60);

pub struct CycleMode {
    logger: Arc<dyn Logger>,
    children: HashMap<&'static str, Box<dyn Mode>>,
    keys: Vec<&'static str>,
    current: usize,
    last_switch: Instant,
    period: Duration,
}

impl CycleMode {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_period(logger, ROTATION_PERIOD)
    }

    pub fn with_period(logger: Arc<dyn Logger>, period: Duration) -> Self {
        // Everything except this mode itself and the HTTP server.
        let keys: Vec<&'static str> = dispatcher::MODE_KEYS
            .iter()
            .copied()
            .filter(|&key| key != "cycle" && key != "server")
            .collect();
        Self {
            logger,
            children: HashMap::new(),
            keys,
            current: 0,
            last_switch: Instant::now(),
            period,
        }
    }

    pub fn current_key(&self) -> &'static str {
        self.keys[self.current]
    }

    fn child(&mut self, key: &'static str) -> &mut Box<dyn Mode> {
        let logger = Arc::clone(&self.logger);
        self.children
            .entry(key)
            .or_insert_with(|| dispatcher::build(key, logger).expect("catalog key must build"))
    }

    async fn switch_to(&mut self, index: usize) -> anyhow::Result<()> {
        self.current = index % self.keys.len();
        self.last_switch = Instant::now();
        let key = self.current_key();
        {
            let mut out = io::stdout().lock();
            heartbeat_common::term::clear_screen(&mut out)?;
            io::Write::flush(&mut out)?;
        }
        self.child(key).on_start().await
    }
}

#[async_trait]
impl Mode for CycleMode {
    fn label(&self) -> &'static str {
        "Cycle"
    }

    fn description(&self) -> &'static str {
        "rotate through every other visualization, 5 minutes each"
    }

    async fn on_start(&mut self) -> anyhow::Result<()> {
        self.switch_to(0).await
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        if self.last_switch.elapsed() >= self.period {
            let next = (self.current + 1) % self.keys.len();
            self.switch_to(next).await?;
        }
        let key = self.current_key();
        self.child(key).on_metrics(sample).await
    }

    async fn on_shutdown(&mut self, status: CollectorStatus) -> anyhow::Result<()> {
        let key = self.current_key();
        self.child(key).on_shutdown(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartbeat_common::TracingLogger;

    fn mode(period: Duration) -> CycleMode {
        CycleMode::with_period(Arc::new(TracingLogger), period)
    }

    #[test]
    fn rotation_skips_itself_and_server() {
        let mode = mode(ROTATION_PERIOD);
        assert!(!mode.keys.contains(&"cycle"));
        assert!(!mode.keys.contains(&"server"));
        assert_eq!(mode.keys.len(), dispatcher::MODE_KEYS.len() - 2);
    }

    #[tokio::test]
    async fn rotates_once_the_period_elapses() {
        let mut mode = mode(Duration::ZERO);
        let sample = SystemMetrics {
            timestamp: 0,
            cpu_usage_percent: 1.0,
            cpu_cores: vec![],
            memory_total_mb: 1.0,
            memory_used_mb: 0.0,
            memory_free_mb: 1.0,
            memory_available_mb: 1.0,
            memory_usage_percent: 0.0,
            swap_total_mb: 0.0,
            swap_used_mb: 0.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        };
        assert_eq!(mode.current_key(), "ecg");
        mode.on_metrics(&sample).await.unwrap();
        assert_eq!(mode.current_key(), "compact");
        mode.on_metrics(&sample).await.unwrap();
        assert_eq!(mode.current_key(), "service");
        // Children stay alive once built.
        assert!(mode.children.contains_key("compact"));
    }

    #[tokio::test]
    async fn does_not_rotate_early() {
        let mut mode = mode(Duration::from_secs(3600));
        let sample = SystemMetrics {
            timestamp: 0,
            cpu_usage_percent: 1.0,
            cpu_cores: vec![],
            memory_total_mb: 1.0,
            memory_used_mb: 0.0,
            memory_free_mb: 1.0,
            memory_available_mb: 1.0,
            memory_usage_percent: 0.0,
            swap_total_mb: 0.0,
            swap_used_mb: 0.0,
            cpu_spike_detected: false,
            memory_leak_suspected: false,
        };
        mode.on_metrics(&sample).await.unwrap();
        mode.on_metrics(&sample).await.unwrap();
        assert_eq!(mode.current_key(), "ecg");
    }
}
