// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod log;
pub mod style;
pub mod term;

pub use log::{Logger, Meta, TracingLogger};
