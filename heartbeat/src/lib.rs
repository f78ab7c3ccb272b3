// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Heartbeat: a system-telemetry pipeline.
//!
//! Supervises a native collector subprocess, decodes its JSON-lines stdout
//! into [`heartbeat_metrics::SystemMetrics`] samples, and feeds the stream
//! to exactly one selected mode: a terminal visualization or the HTTP
//! metrics server.

pub mod cli;
pub mod dispatcher;
pub mod lifeline;
pub mod modes;
pub mod supervisor;
