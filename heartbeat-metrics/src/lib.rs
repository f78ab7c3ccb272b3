// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub mod sample;
pub mod window;

pub use sample::{CoreUsage, DecodeError, SystemMetrics, MAX_LINE_BYTES};
pub use window::{Scale, SlidingWindow};
