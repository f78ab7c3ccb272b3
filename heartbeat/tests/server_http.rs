// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-to-end checks for the server mode over a real socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use heartbeat::modes::server::ServerMode;
use heartbeat::modes::Mode;
use heartbeat::supervisor::CollectorStatus;
use heartbeat_common::config::ServerConfig;
use heartbeat_common::TracingLogger;
use heartbeat_metrics::SystemMetrics;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn sample(cpu: f64) -> SystemMetrics {
    SystemMetrics {
        timestamp: 1700000000,
        cpu_usage_percent: cpu,
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

fn test_config(log_file_path: String, flush_interval: Duration) -> ServerConfig {
    ServerConfig {
        hostname: "127.0.0.1".to_string(),
        port: 0,
        log_file_path,
        flush_interval,
    }
}

async fn http_get(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).to_string();
    let status = text
        .split_whitespace()
        .nth(1)
        .expect("status line")
        .parse()
        .expect("numeric status");
    let body = text
        .split("\r\n\r\n")
        .nth(1)
        .unwrap_or_default()
        .to_string();
    (status, body)
}

#[tokio::test]
async fn endpoints_serve_health_metrics_and_404() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("metrics.log");
    let mut mode = ServerMode::new(
        test_config(
            log_path.to_str().unwrap().to_string(),
            Duration::from_secs(3600),
        ),
        Arc::new(TracingLogger),
    );
    mode.on_start().await.unwrap();
    let addr = mode.local_addr().unwrap();

    let (status, body) = http_get(addr, "/health").await;
    assert_eq!(status, 200);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");

    // No sample ingested yet.
    let (status, body) = http_get(addr, "/metrics").await;
    assert_eq!(status, 404);
    assert!(body.contains("no samples yet"));

    mode.on_metrics(&sample(40.0)).await.unwrap();
    let (status, body) = http_get(addr, "/metrics").await;
    assert_eq!(status, 200);
    let metrics: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics["cpu_usage_percent"], 40.0);
    assert!(metrics.get("server_uptime_seconds").is_some());

    let (status, _) = http_get(addr, "/nope").await;
    assert_eq!(status, 404);

    mode.on_shutdown(CollectorStatus::Success).await.unwrap();
}

#[tokio::test]
async fn metrics_is_never_stale() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("metrics.log");
    let mut mode = ServerMode::new(
        test_config(
            log_path.to_str().unwrap().to_string(),
            Duration::from_secs(3600),
        ),
        Arc::new(TracingLogger),
    );
    mode.on_start().await.unwrap();
    let addr = mode.local_addr().unwrap();

    for cpu in [10.0, 20.0, 30.0] {
        mode.on_metrics(&sample(cpu)).await.unwrap();
        let (_, body) = http_get(addr, "/metrics").await;
        let metrics: serde_json::Value = serde_json::from_str(&body).unwrap();
        // After on_metrics(sN) returns, /metrics serves sN or later,
        // never an earlier sample.
        assert_eq!(metrics["cpu_usage_percent"], cpu);
    }

    mode.on_shutdown(CollectorStatus::Success).await.unwrap();
}

#[tokio::test]
async fn port_is_released_after_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("metrics.log");
    let mut mode = ServerMode::new(
        test_config(
            log_path.to_str().unwrap().to_string(),
            Duration::from_secs(3600),
        ),
        Arc::new(TracingLogger),
    );
    mode.on_start().await.unwrap();
    let addr = mode.local_addr().unwrap();
    mode.on_shutdown(CollectorStatus::Success).await.unwrap();

    // The listener is gone, so the exact address can be bound again.
    let rebound = std::net::TcpListener::bind(addr);
    assert!(rebound.is_ok());
}

#[tokio::test]
async fn flush_cadence_writes_whole_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("metrics.log");
    let mut mode = ServerMode::new(
        test_config(
            log_path.to_str().unwrap().to_string(),
            Duration::from_millis(100),
        ),
        Arc::new(TracingLogger),
    );
    mode.on_start().await.unwrap();

    // Three samples inside the first flush window.
    for cpu in [1.0, 2.0, 3.0] {
        mode.on_metrics(&sample(cpu)).await.unwrap();
    }
    assert!(!log_path.exists(), "flushed before the interval elapsed");

    tokio::time::sleep(Duration::from_millis(150)).await;
    mode.on_metrics(&sample(4.0)).await.unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let cpus: Vec<f64> = contents
        .lines()
        .map(|line| {
            SystemMetrics::decode(line)
                .expect("every flushed line is valid JSON")
                .cpu_usage_percent
        })
        .collect();
    assert_eq!(cpus, vec![1.0, 2.0, 3.0, 4.0]);
    assert!(contents.ends_with('\n'), "no partial trailing line");

    mode.on_shutdown(CollectorStatus::Success).await.unwrap();
}
