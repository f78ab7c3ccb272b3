// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mode selection. The dispatcher is the only owner of the active mode;
//! modes are never shared between dispatch instances.

use std::sync::Arc;

use heartbeat_common::config::ServerConfig;
use heartbeat_common::Logger;

use crate::modes::{
    alerts::AlertsMode,
    compact::CompactMode,
    cycle::CycleMode,
    decorative,
    ecg::EcgMode,
    percore::PerCoreMode,
    raw::RawMode,
    server::ServerMode,
    service::ServiceMode,
    sparkline::SparklineMode,
    stats::StatsMode,
    timeline::TimelineMode,
    window::WindowMode,
    Mode,
};

pub const DEFAULT_MODE: &str = "ecg";

/// Every selectable mode, in catalog (and cycle rotation) order.
pub const MODE_KEYS: [&str; 20] = [
    "ecg",
    "compact",
    "service",
    "sparkline",
    "alerts",
    "raw",
    "timeline",
    "percore",
    "stats",
    "aurora",
    "zen",
    "retro",
    "matrix",
    "quantum",
    "neural",
    "tron",
    "cyberpunk",
    "cycle",
    "window",
    "server",
];

/// Instantiate the mode registered under `key`.
pub fn build(key: &str, logger: Arc<dyn Logger>) -> Option<Box<dyn Mode>> {
    let mode: Box<dyn Mode> = match key {
        "ecg" => Box::new(EcgMode::new()),
        "compact" => Box::new(CompactMode::new()),
        "service" => Box::new(ServiceMode::new()),
        "sparkline" => Box::new(SparklineMode::new()),
        "alerts" => Box::new(AlertsMode::new()),
        "raw" => Box::new(RawMode::new()),
        "timeline" => Box::new(TimelineMode::new()),
        "percore" => Box::new(PerCoreMode::new()),
        "stats" => Box::new(StatsMode::new()),
        "aurora" => Box::new(decorative::AuroraMode::new()),
        "zen" => Box::new(decorative::ZenMode::new()),
        "retro" => Box::new(decorative::RetroMode::new()),
        "matrix" => Box::new(decorative::MatrixMode::new()),
        "quantum" => Box::new(decorative::QuantumMode::new()),
        "neural" => Box::new(decorative::NeuralMode::new()),
        "tron" => Box::new(decorative::TronMode::new()),
        "cyberpunk" => Box::new(decorative::CyberpunkMode::new()),
        "cycle" => Box::new(CycleMode::new(logger)),
        "window" => Box::new(WindowMode::new(logger)),
        "server" => Box::new(ServerMode::new(ServerConfig::from_env(), logger)),
        _ => return None,
    };
    Some(mode)
}

pub fn is_known(key: &str) -> bool {
    MODE_KEYS.contains(&key)
}

/// The mode catalog as printed by `--list` (and on unknown-mode errors).
pub fn render_catalog() -> String {
    let logger: Arc<dyn Logger> = Arc::new(heartbeat_common::TracingLogger);
    let mut out = String::from("Available modes:\n");
    for key in MODE_KEYS {
        // Construction is side-effect free; nothing binds or spawns until
        // on_start.
        if let Some(mode) = build(key, Arc::clone(&logger)) {
            out.push_str(&format!("  {key:<10} {}\n", mode.description()));
        }
    }
    out.push_str(&format!("\nDefault: {DEFAULT_MODE}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartbeat_common::TracingLogger;

    #[test]
    fn every_catalog_key_builds() {
        for key in MODE_KEYS {
            let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
            let mode = build(key, logger);
            assert!(mode.is_some(), "mode `{key}` did not build");
        }
    }

    #[test]
    fn unknown_key_does_not_build() {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        assert!(build("disco", logger).is_none());
        assert!(!is_known("disco"));
        assert!(is_known("ecg"));
    }

    #[test]
    fn catalog_lists_every_key() {
        let rendered = render_catalog();
        for key in MODE_KEYS {
            assert!(rendered.contains(key), "catalog missing `{key}`");
        }
    }

    #[test]
    fn labels_are_unique() {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        let mut labels = std::collections::HashSet::new();
        for key in MODE_KEYS {
            let mode = build(key, Arc::clone(&logger)).unwrap();
            assert!(labels.insert(mode.label().to_string()), "duplicate label for `{key}`");
        }
    }
}
