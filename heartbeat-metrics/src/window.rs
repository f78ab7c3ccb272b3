// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity sliding windows over a single scalar field.
//!
//! Bounded FIFO: pushing at capacity evicts the oldest entry. Queries are
//! O(n), which is fine at the window sizes the modes use (≤ a few hundred).
//! The window is ordered purely by sample arrival and is transparent to
//! time gaps.

use std::collections::VecDeque;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// How sparkline cells are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Linear over the observed [min, max] of the current contents.
    Window,
    /// Fixed [0, 100], for percentage fields.
    Percent,
}

#[derive(Debug, Clone)]
pub struct SlidingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            let _ = self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = self.values.iter().sum::<f64>() / self.values.len() as f64;
        Some(mean)
    }

    /// Population standard deviation (divisor N). `None` below 2 samples,
    /// where a deviation is not meaningful.
    pub fn stddev(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        let mean = self.mean()?;
        #[allow(clippy::cast_precision_loss)]
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.values.len() as f64;
        Some(variance.sqrt())
    }

    /// Stable copy for consumers that need a consistent view.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Render the contents as unicode block glyphs, oldest first.
    pub fn sparkline(&self, scale: Scale) -> String {
        let (lo, hi) = match scale {
            Scale::Percent => (0.0, 100.0),
            Scale::Window => {
                let lo = self.min().unwrap_or(0.0);
                let hi = self.max().unwrap_or(0.0);
                (lo, hi)
            }
        };
        self.values.iter().map(|&v| glyph_for(v, lo, hi)).collect()
    }
}

/// Map `value` into the 8-glyph block ramp over [lo, hi].
pub fn glyph_for(value: f64, lo: f64, hi: f64) -> char {
    if hi <= lo {
        return BLOCKS[0];
    }
    let unit = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = ((unit * (BLOCKS.len() - 1) as f64).round() as usize).min(BLOCKS.len() - 1);
    BLOCKS[idx]
}
