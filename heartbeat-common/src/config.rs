// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Static configuration, resolved once at startup from the environment.

use std::time::Duration;

pub mod parse_env {
    use std::{env, str::FromStr, time::Duration};

    pub fn duration_ms(name: &str) -> Option<Duration> {
        Some(Duration::from_millis(env::var(name).ok()?.parse::<u64>().ok()?))
    }

    pub fn int<T: FromStr>(name: &str) -> Option<T> {
        env::var(name).ok()?.parse::<T>().ok()
    }

    pub fn str_not_empty(name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.is_empty())
    }
}

pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SERVER_HOSTNAME: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILE_PATH: &str = "./metrics.log";
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(5000);

/// Settings for the `server` mode: where to listen and where/how often to
/// flush buffered samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    pub log_file_path: String,
    pub flush_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_SERVER_HOSTNAME.to_string(),
            port: DEFAULT_SERVER_PORT,
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hostname: parse_env::str_not_empty("HEARTBEAT_SERVER_HOSTNAME")
                .unwrap_or(defaults.hostname),
            port: parse_env::int("HEARTBEAT_SERVER_PORT").unwrap_or(defaults.port),
            log_file_path: parse_env::str_not_empty("HEARTBEAT_LOG_FILE_PATH")
                .unwrap_or(defaults.log_file_path),
            flush_interval: parse_env::duration_ms("HEARTBEAT_FLUSH_INTERVAL_MS")
                .unwrap_or(defaults.flush_interval),
        }
    }
}

/// How to spawn the native collector.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub working_dir: String,
    pub command: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            working_dir: ".".to_string(),
            command: ["cargo", "run", "--release", "--quiet"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CollectorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let command = parse_env::str_not_empty("HEARTBEAT_COLLECTOR_CMD")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts: &Vec<String>| !parts.is_empty())
            .unwrap_or(defaults.command);
        Self {
            working_dir: parse_env::str_not_empty("HEARTBEAT_COLLECTOR_DIR")
                .unwrap_or(defaults.working_dir),
            command,
        }
    }

    pub fn program(&self) -> &str {
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.log_file_path, "./metrics.log");
        assert_eq!(config.flush_interval, Duration::from_millis(5000));
    }

    #[test]
    fn collector_default_invocation() {
        let config = CollectorConfig::default();
        assert_eq!(config.program(), "cargo");
        assert_eq!(config.args(), ["run", "--release", "--quiet"]);
    }
}
