// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The HTTP metrics server mode.
//!
//! Publishes the most recent sample on `GET /metrics`, liveness on
//! `GET /health`, and appends buffered samples to a newline-delimited JSON
//! log file on a fixed cadence. Ingestion and file I/O run on the mode
//! driver; request handlers only read the latest-sample slot, so requests
//! never block sample ingestion.

use std::convert::Infallible;
use std::fs::OpenOptions;
use std::io::{self, Write as _};
use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use async_trait::async_trait;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Response, StatusCode};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use heartbeat_common::config::ServerConfig;
use heartbeat_common::{Logger, Meta};
use heartbeat_metrics::SystemMetrics;

use super::Mode;
use crate::supervisor::CollectorStatus;

/// Soft deadline for the listener to wind down during shutdown.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(2);

/// State shared between the mode driver (single writer) and the request
/// handlers (many readers).
struct ServerState {
    latest: Mutex<Option<SystemMetrics>>,
    started: Instant,
    shutting_down: AtomicBool,
}

pub struct ServerMode {
    config: ServerConfig,
    logger: Arc<dyn Logger>,
    state: Arc<ServerState>,
    buffer: Vec<SystemMetrics>,
    last_flush: Instant,
    cancel: CancellationToken,
    accept_task: Option<JoinHandle<()>>,
    local_addr: Option<std::net::SocketAddr>,
}

impl ServerMode {
    pub fn new(config: ServerConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            logger,
            state: Arc::new(ServerState {
                latest: Mutex::new(None),
                started: Instant::now(),
                shutting_down: AtomicBool::new(false),
            }),
            buffer: Vec::new(),
            last_flush: Instant::now(),
            cancel: CancellationToken::new(),
            accept_task: None,
            local_addr: None,
        }
    }

    /// The bound address, available once `on_start` has succeeded. Useful
    /// when the configured port is 0 (ephemeral).
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.local_addr
    }

    /// Append the buffered samples to the log file. On failure the buffer
    /// is kept so the next scheduled flush retries with everything
    /// accumulated since the last success.
    fn flush(&mut self) {
        match flush_batch(&self.config.log_file_path, &self.buffer) {
            Ok(()) => {
                self.logger.log_debug(
                    "flushed samples",
                    Some(
                        &Meta::new()
                            .kv("count", self.buffer.len())
                            .kv("path", &self.config.log_file_path),
                    ),
                );
                self.buffer.clear();
            }
            Err(err) => self.logger.log_error(
                "flush error",
                Some(
                    &Meta::new()
                        .kv("error", err)
                        .kv("path", &self.config.log_file_path)
                        .kv("buffered", self.buffer.len()),
                ),
            ),
        }
        self.last_flush = Instant::now();
    }
}

#[async_trait]
impl Mode for ServerMode {
    fn label(&self) -> &'static str {
        "Metrics Server"
    }

    fn description(&self) -> &'static str {
        "HTTP /health and /metrics plus NDJSON flush to disk"
    }

    async fn on_start(&mut self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.hostname, self.config.port);
        let listener = StdTcpListener::bind(&addr)
            .with_context(|| format!("failed to bind http listener on {addr}"))?;
        listener
            .set_nonblocking(true)
            .context("failed to switch listener to non-blocking")?;
        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to register listener with the runtime")?;
        self.local_addr = listener.local_addr().ok();

        self.accept_task = Some(tokio::spawn(accept_loop(
            listener,
            Arc::clone(&self.state),
            self.cancel.clone(),
            Arc::clone(&self.logger),
        )));
        self.logger.log_success(
            "metrics server listening",
            Some(
                &Meta::new()
                    .kv("addr", &addr)
                    .kv("log_file", &self.config.log_file_path)
                    .kv("flush_interval_ms", self.config.flush_interval.as_millis()),
            ),
        );
        Ok(())
    }

    async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
        {
            let mut latest = self.state.latest.lock().expect("lock poisoned");
            *latest = Some(sample.clone());
        }
        self.buffer.push(sample.clone());
        if self.last_flush.elapsed() >= self.config.flush_interval && !self.buffer.is_empty() {
            self.flush();
        }
        Ok(())
    }

    async fn on_shutdown(&mut self, _status: CollectorStatus) -> anyhow::Result<()> {
        self.state.shutting_down.store(true, Ordering::SeqCst);
        self.logger.log_info(
            "flushing remaining samples",
            Some(&Meta::new().kv("count", self.buffer.len())),
        );
        if !self.buffer.is_empty() {
            self.flush();
        }
        self.cancel.cancel();
        if let Some(task) = self.accept_task.take() {
            if tokio::time::timeout(SHUTDOWN_DEADLINE, task).await.is_err() {
                self.logger
                    .log_warning("listener did not stop within deadline", None);
            }
        }
        self.logger.log_success("metrics server stopped", None);
        Ok(())
    }
}

async fn accept_loop(
    listener: tokio::net::TcpListener,
    state: Arc<ServerState>,
    cancel: CancellationToken,
    logger: Arc<dyn Logger>,
) {
    loop {
        let stream = tokio::select! {
            _ = cancel.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => stream,
                Err(err) => {
                    logger.log_warning("accept failed", Some(&Meta::new().kv("error", err)));
                    continue;
                }
            }
        };
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                async move {
                    Ok::<_, Infallible>(route(req.method(), req.uri().path(), &state))
                }
            });
            // Connection-level errors (resets, bad requests) are routine.
            let _ = hyper::server::conn::http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await;
        });
    }
}

fn route(method: &Method, path: &str, state: &ServerState) -> Response<Full<Bytes>> {
    match path {
        "/health" => {
            if method != Method::GET {
                return json_response(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &json!({"error": "method not allowed"}),
                );
            }
            if state.shutting_down.load(Ordering::SeqCst) {
                return json_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &json!({"status": "shutting_down"}),
                );
            }
            json_response(
                StatusCode::OK,
                &json!({
                    "status": "healthy",
                    "uptime_seconds": state.started.elapsed().as_secs(),
                    "timestamp_ms": epoch_ms(),
                }),
            )
        }
        "/metrics" => {
            if method != Method::GET {
                return json_response(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &json!({"error": "method not allowed"}),
                );
            }
            let latest = state.latest.lock().expect("lock poisoned").clone();
            match latest {
                Some(sample) => match serde_json::to_value(&sample) {
                    Ok(mut value) => {
                        if let Value::Object(map) = &mut value {
                            map.insert(
                                "server_uptime_seconds".to_string(),
                                json!(state.started.elapsed().as_secs()),
                            );
                        }
                        json_response(StatusCode::OK, &value)
                    }
                    Err(_) => json_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &json!({"error": "serialization failed"}),
                    ),
                },
                None => json_response(StatusCode::NOT_FOUND, &json!({"error": "no samples yet"})),
            }
        }
        _ => json_response(StatusCode::NOT_FOUND, &json!({"error": "not found"})),
    }
}

fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append `samples` to `path` as newline-delimited JSON in a single write.
/// The file is created on first use.
fn flush_batch(path: &str, samples: &[SystemMetrics]) -> io::Result<()> {
    let mut lines = String::new();
    for sample in samples {
        let line = serde_json::to_string(sample).map_err(io::Error::other)?;
        lines.push_str(&line);
        lines.push('\n');
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(lines.as_bytes())
}
