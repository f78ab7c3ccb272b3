// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use heartbeat_metrics::SystemMetrics;

use super::{print_line, Mode};

/// Re-emits every sample as one JSON line, for piping into other tools.
#[derive(Debug, Default)]
pub struct RawMode;

impl RawMode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mode for RawMode {
    fn label(&self) -> &'static str {
        "Raw JSON"
    }

    fn description(&self) -> &'static str {
        "re-emit each sample as one JSON line on stdout"
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        print_line(&serde_json::to_string(sample)?)?;
        Ok(())
    }
}
