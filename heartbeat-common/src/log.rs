// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logging facade consumed by the telemetry core.
//!
//! The pipeline and the modes only ever see [`Logger`], so none of them
//! depend on a concrete subscriber. [`TracingLogger`] is the default
//! implementation and forwards to `tracing`; embedders that want to render
//! with their own styling stack can provide their own implementation.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Ordered key/value bag attached to a log line.
///
/// Rendered as `k=v` pairs separated by single spaces so every failure
/// category produces exactly one grep-friendly line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    entries: Vec<(String, String)>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kv(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.entries.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// The minimal logging surface the telemetry core consumes.
pub trait Logger: Send + Sync {
    fn log_info(&self, msg: &str, meta: Option<&Meta>);
    fn log_success(&self, msg: &str, meta: Option<&Meta>);
    fn log_warning(&self, msg: &str, meta: Option<&Meta>);
    fn log_error(&self, msg: &str, meta: Option<&Meta>);
    fn log_debug(&self, msg: &str, meta: Option<&Meta>);
    fn log_critical(&self, msg: &str, meta: Option<&Meta>);

    /// Decorative section header. Implementations may no-op.
    fn log_section(&self, _title: &str) {}
}

fn render(msg: &str, meta: Option<&Meta>) -> String {
    match meta {
        Some(meta) if !meta.is_empty() => format!("{msg} {meta}"),
        _ => msg.to_string(),
    }
}

/// [`Logger`] implementation backed by the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_info(&self, msg: &str, meta: Option<&Meta>) {
        tracing::info!("{}", render(msg, meta));
    }

    fn log_success(&self, msg: &str, meta: Option<&Meta>) {
        tracing::info!(success = true, "{}", render(msg, meta));
    }

    fn log_warning(&self, msg: &str, meta: Option<&Meta>) {
        tracing::warn!("{}", render(msg, meta));
    }

    fn log_error(&self, msg: &str, meta: Option<&Meta>) {
        tracing::error!("{}", render(msg, meta));
    }

    fn log_debug(&self, msg: &str, meta: Option<&Meta>) {
        tracing::debug!("{}", render(msg, meta));
    }

    fn log_critical(&self, msg: &str, meta: Option<&Meta>) {
        tracing::error!(critical = true, "{}", render(msg, meta));
    }

    fn log_section(&self, title: &str) {
        tracing::info!("━━━ {title} ━━━");
    }
}

/// Install the default global subscriber.
///
/// Visualization modes own stdout, so log lines go to stderr. The filter
/// honors `RUST_LOG` and falls back to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_renders_ordered_pairs() {
        let meta = Meta::new().kv("code", 3).kv("line", "garbage");
        assert_eq!(meta.to_string(), "code=3 line=garbage");
    }

    #[test]
    fn render_skips_empty_meta() {
        assert_eq!(render("flush error", Some(&Meta::new())), "flush error");
        assert_eq!(render("flush error", None), "flush error");
        let meta = Meta::new().kv("path", "/tmp/m.log");
        assert_eq!(
            render("flush error", Some(&meta)),
            "flush error path=/tmp/m.log"
        );
    }
}
