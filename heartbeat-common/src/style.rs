// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared color thresholds and status symbols.
//!
//! Every mode maps percentages through the same thresholds so the severity
//! of a sample reads identically across dashboards: CPU turns yellow above
//! 60 and red above 80; memory turns yellow above 60 and red above 85.

use std::env;

use crossterm::style::{Color, Stylize};

/// Severity bucket for a percentage, ordered by how loudly it should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

pub fn cpu_severity(percent: f64) -> Severity {
    if percent > 80.0 {
        Severity::Red
    } else if percent > 60.0 {
        Severity::Yellow
    } else {
        Severity::Green
    }
}

pub fn mem_severity(percent: f64) -> Severity {
    if percent > 85.0 {
        Severity::Red
    } else if percent > 60.0 {
        Severity::Yellow
    } else {
        Severity::Green
    }
}

/// Combined health of a sample: red when either resource is critical,
/// yellow when either is elevated, green otherwise.
pub fn status_severity(cpu: f64, mem: f64) -> Severity {
    if cpu > 80.0 || mem > 85.0 {
        Severity::Red
    } else if cpu > 60.0 || mem > 70.0 {
        Severity::Yellow
    } else {
        Severity::Green
    }
}

/// ANSI-free status glyph, safe for service logs.
pub fn status_symbol(cpu: f64, mem: f64) -> &'static str {
    match status_severity(cpu, mem) {
        Severity::Red => "🔴",
        Severity::Yellow => "🟡",
        Severity::Green => "🟢",
    }
}

/// Whether colored output is allowed on this terminal.
///
/// `NO_COLOR` (any value) and `TERM=dumb` both disable styling; modes then
/// emit the plain-text fallback.
pub fn color_enabled() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => true,
    }
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Severity::Green => Color::Green,
            Severity::Yellow => Color::Yellow,
            Severity::Red => Color::Red,
        }
    }
}

/// Colorize `text` by severity, or pass it through when styling is off.
pub fn paint(text: &str, severity: Severity) -> String {
    if color_enabled() {
        text.with(severity.color()).to_string()
    } else {
        text.to_string()
    }
}

/// 24-bit foreground color, degrading to plain text without truecolor.
pub fn paint_rgb(text: &str, r: u8, g: u8, b: u8) -> String {
    if color_enabled() && truecolor_enabled() {
        text.with(Color::Rgb { r, g, b }).to_string()
    } else {
        text.to_string()
    }
}

fn truecolor_enabled() -> bool {
    env::var("COLORTERM")
        .map(|v| v.contains("truecolor") || v.contains("24bit"))
        .unwrap_or(false)
}

/// Fixed-width horizontal bar, `█` for the filled cells and `░` for the rest.
pub fn bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut out = String::with_capacity(width * 3);
    for _ in 0..filled {
        out.push('█');
    }
    for _ in filled..width {
        out.push('░');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_thresholds() {
        assert_eq!(cpu_severity(60.0), Severity::Green);
        assert_eq!(cpu_severity(60.1), Severity::Yellow);
        assert_eq!(cpu_severity(80.0), Severity::Yellow);
        assert_eq!(cpu_severity(80.1), Severity::Red);
    }

    #[test]
    fn mem_thresholds() {
        assert_eq!(mem_severity(60.0), Severity::Green);
        assert_eq!(mem_severity(85.0), Severity::Yellow);
        assert_eq!(mem_severity(85.1), Severity::Red);
    }

    #[test]
    fn status_symbol_thresholds() {
        assert_eq!(status_symbol(12.5, 25.0), "🟢");
        assert_eq!(status_symbol(61.0, 10.0), "🟡");
        assert_eq!(status_symbol(10.0, 71.0), "🟡");
        assert_eq!(status_symbol(81.0, 10.0), "🔴");
        assert_eq!(status_symbol(10.0, 86.0), "🔴");
    }

    // Severity must be monotone in (cpu, mem): raising either never lowers it.
    #[test]
    fn status_severity_monotone() {
        let grid = [0.0, 55.0, 61.0, 71.0, 81.0, 86.0, 99.0];
        for &cpu_a in &grid {
            for &mem_a in &grid {
                for &cpu_b in &grid {
                    for &mem_b in &grid {
                        if cpu_a <= cpu_b && mem_a <= mem_b {
                            assert!(
                                status_severity(cpu_a, mem_a) <= status_severity(cpu_b, mem_b),
                                "severity regressed between ({cpu_a},{mem_a}) and ({cpu_b},{mem_b})"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn bar_width_is_fixed() {
        assert_eq!(bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(bar(100.0, 10), "██████████");
        assert_eq!(bar(50.0, 10), "█████░░░░░");
        assert_eq!(bar(250.0, 4), "████");
        assert_eq!(bar(-5.0, 4), "░░░░");
    }
}
