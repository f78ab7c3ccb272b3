// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Collector subprocess supervision and the sample pump.
//!
//! Owns the native collector's lifetime: spawns it with piped stdio,
//! decodes stdout lines into samples on one task, pumps stderr to the
//! logger on another, and drives the selected mode from a bounded
//! single-producer single-consumer channel so the mode observes samples in
//! exactly the order the collector emitted them.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use heartbeat_common::config::CollectorConfig;
use heartbeat_common::{Logger, Meta};
use heartbeat_metrics::SystemMetrics;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::modes::Mode;

/// Queue depth between the stdout decoder and the mode driver. Mode
/// handlers are O(window size) with tiny constants, so a shallow queue is
/// enough and bounds memory if a handler ever stalls.
const SAMPLE_CHANNEL_CAPACITY: usize = 64;

/// How many bytes of an undecodable line end up in the error log.
const DECODE_ERROR_PREFIX_BYTES: usize = 80;

/// Terminal state of the collector child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStatus {
    Success,
    Failed(i32),
    /// Killed by a signal or otherwise exited without a code.
    Unknown,
}

impl CollectorStatus {
    pub fn is_success(self) -> bool {
        matches!(self, CollectorStatus::Success)
    }

    /// The process exit code to propagate for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            CollectorStatus::Success => 0,
            CollectorStatus::Failed(code) => code,
            CollectorStatus::Unknown => 1,
        }
    }
}

impl From<std::process::ExitStatus> for CollectorStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            CollectorStatus::Success
        } else {
            match status.code() {
                Some(code) => CollectorStatus::Failed(code),
                None => CollectorStatus::Unknown,
            }
        }
    }
}

/// Run the full pipeline lifecycle for one selected mode.
///
/// `on_start` → ordered `on_metrics` calls → `on_shutdown` exactly once.
/// Returns the process exit code to use; startup failures (mode start,
/// collector spawn) surface as `Err` and the caller exits 1.
pub async fn run(
    mut mode: Box<dyn Mode>,
    config: CollectorConfig,
    logger: Arc<dyn Logger>,
) -> anyhow::Result<i32> {
    mode.on_start()
        .await
        .with_context(|| format!("mode `{}` failed to start", mode.label()))?;

    let mut child = Command::new(config.program())
        .args(config.args())
        .current_dir(&config.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn collector `{}`", config.program()))?;

    let stdout = child.stdout.take().context("collector stdout not piped")?;
    let stderr = child.stderr.take().context("collector stderr not piped")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone(), Arc::clone(&logger));

    let (tx, mut rx) = mpsc::channel::<SystemMetrics>(SAMPLE_CHANNEL_CAPACITY);
    let stdout_task = tokio::spawn(decode_stdout(stdout, tx, Arc::clone(&logger)));
    let stderr_task = tokio::spawn(pump_stderr(stderr, Arc::clone(&logger)));

    let mut interrupted = false;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                interrupted = true;
                break;
            }
            received = rx.recv() => match received {
                Some(sample) => deliver(mode.as_mut(), &sample, logger.as_ref()).await,
                None => break, // collector EOF
            }
        }
    }

    if interrupted {
        let _ = child.start_kill();
        // Deliver whatever the decoder already queued before shutting down.
        while let Ok(sample) = rx.try_recv() {
            deliver(mode.as_mut(), &sample, logger.as_ref()).await;
        }
    }
    // Unblocks the decoder if it is parked on a full channel.
    drop(rx);

    let status = match child.wait().await {
        Ok(status) => CollectorStatus::from(status),
        Err(err) => {
            logger.log_error(
                "collector wait failed",
                Some(&Meta::new().kv("error", err)),
            );
            CollectorStatus::Unknown
        }
    };
    let _ = stdout_task.await;
    let _ = stderr_task.await;

    if let Err(err) = mode.on_shutdown(status).await {
        logger.log_error(
            "mode error",
            Some(&Meta::new().kv("hook", "shutdown").kv("error", format!("{err:#}"))),
        );
    }

    if !status.is_success() {
        logger.log_error(
            "collector exited with failure",
            Some(&Meta::new().kv("code", status.exit_code())),
        );
    }
    Ok(status.exit_code())
}

async fn deliver(mode: &mut dyn Mode, sample: &SystemMetrics, logger: &dyn Logger) {
    if let Err(err) = mode.on_metrics(sample).await {
        logger.log_error(
            "mode error",
            Some(&Meta::new().kv("hook", "metrics").kv("error", format!("{err:#}"))),
        );
    }
}

/// Decode collector stdout lines into samples, preserving order. Invalid
/// lines are logged and skipped; they are never queued.
async fn decode_stdout(
    stdout: tokio::process::ChildStdout,
    tx: mpsc::Sender<SystemMetrics>,
    logger: Arc<dyn Logger>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match SystemMetrics::decode(&line) {
                    Ok(sample) => {
                        if tx.send(sample).await.is_err() {
                            break; // driver gone
                        }
                    }
                    Err(err) => logger.log_error(
                        "decode error",
                        Some(
                            &Meta::new()
                                .kv("error", err)
                                .kv("line", line_prefix(&line)),
                        ),
                    ),
                }
            }
            Ok(None) => break,
            Err(err) => {
                logger.log_error(
                    "collector stdout read failed",
                    Some(&Meta::new().kv("error", err)),
                );
                break;
            }
        }
    }
}

/// Drain collector stderr concurrently; each line is a warning.
async fn pump_stderr(stderr: tokio::process::ChildStderr, logger: Arc<dyn Logger>) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        logger.log_warning("collector stderr", Some(&Meta::new().kv("line", line)));
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken, logger: Arc<dyn Logger>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger.log_info("interrupt received, shutting down", None);
            cancel.cancel();
        }
    });
}

fn line_prefix(line: &str) -> &str {
    let mut end = line.len().min(DECODE_ERROR_PREFIX_BYTES);
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}
