// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The decorative mode family. Every render here is a pure function of
//! (current sample, frame counter, animation phase), with no wall clock
//! and no randomness beyond a deterministic hash, so identical state
//! always draws an identical frame. Color degrades to plain glyphs when
//! the terminal opts out.

use async_trait::async_trait;
use heartbeat_common::style::{paint_rgb, status_symbol};
use heartbeat_metrics::SystemMetrics;

use super::{draw_frame, Mode};
use crate::lifeline::LifelineAnimator;

/// Deterministic mixer for glitch/firing decisions (splitmix64 finalizer).
fn mix(a: u64, b: u64, c: u64) -> u64 {
    let mut z = a
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(b.wrapping_mul(0xbf58_476d_1ce4_e5b9))
        .wrapping_add(c.wrapping_mul(0x94d0_49bb_1331_11eb));
    z ^= z >> 30;
    z = z.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

macro_rules! decorative_mode {
    ($name:ident, $label:expr, $description:expr) => {
        pub struct $name {
            animator: LifelineAnimator,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    animator: LifelineAnimator::new(),
                }
            }
        }

        #[async_trait]
        impl Mode for $name {
            fn label(&self) -> &'static str {
                $label
            }

            fn description(&self) -> &'static str {
                $description
            }

            async fn on_metrics(&mut self, sample: &SystemMetrics) -> anyhow::Result<()> {
                self.animator
                    .advance(sample.cpu_usage_percent, sample.memory_usage_percent);
                draw_frame(&self.render(sample))?;
                Ok(())
            }
        }
    };
}

decorative_mode!(AuroraMode, "Aurora", "northern-lights bands swaying with load");

impl AuroraMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const GLYPHS: [char; 5] = [' ', '·', ':', '≈', '≋'];
        let phase = self.animator.phase();
        let gain = 0.4 + sample.cpu_usage_percent / 100.0 * 0.6;
        let mut lines = vec![header("AURORA", sample)];
        for y in 0..6u32 {
            let row: String = (0..48u32)
                .map(|x| {
                    let wave =
                        (phase + f64::from(x) * 0.15 + f64::from(y) * 0.7).sin() * gain;
                    let unit = (wave * 0.5 + 0.5).clamp(0.0, 1.0);
                    GLYPHS[((unit * (GLYPHS.len() - 1) as f64).round() as usize)
                        .min(GLYPHS.len() - 1)]
                })
                .collect();
            let g = 150 + (y * 18) as u8;
            lines.push(paint_rgb(&row, 40, g, 180));
        }
        lines
    }
}

decorative_mode!(ZenMode, "Zen", "a breathing circle; calm at idle, tense under load");

impl ZenMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let breath = self.animator.phase().sin();
        let radius = 3.0 + breath * 1.5;
        let mut lines = vec![header("ZEN", sample), String::new()];
        for y in -5i32..=5 {
            let row: String = (-12i32..=12)
                .map(|x| {
                    // Halve x so the circle is round in character cells.
                    let d = (f64::from(x) * 0.5).hypot(f64::from(y));
                    if (d - radius).abs() < 0.5 {
                        '·'
                    } else if d < 0.7 {
                        '●'
                    } else {
                        ' '
                    }
                })
                .collect();
            lines.push(format!("      {row}"));
        }
        lines.push(String::new());
        lines.push(
            if breath >= 0.0 { "        breathe in" } else { "        breathe out" }
                .to_string(),
        );
        lines
    }
}

decorative_mode!(RetroMode, "Retro", "synthwave horizon with a load-driven sun");

impl RetroMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        let frame = self.animator.frame();
        let mut lines = vec![header("RETRO", sample)];
        // Sun: a half disc whose visible rows grow with CPU.
        let sun_rows = 1 + (sample.cpu_usage_percent / 34.0) as usize;
        for r in 0..sun_rows.min(3) {
            let width = 12 - r * 4;
            let pad = " ".repeat(18 + r * 2);
            lines.push(paint_rgb(&format!("{pad}{}", "▀".repeat(width)), 255, 120, 40));
        }
        // Perspective grid sliding toward the viewer.
        for depth in 0..5u64 {
            let inset = (depth * 3 + (frame + depth) % 3) as usize;
            let pad = " ".repeat(inset);
            let span = 44usize.saturating_sub(inset * 2);
            lines.push(paint_rgb(
                &format!("{pad}╱{}╲", "─".repeat(span)),
                200,
                60,
                220,
            ));
        }
        lines
    }
}

decorative_mode!(MatrixMode, "Matrix", "falling glyph rain, denser as CPU climbs");

impl MatrixMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const CHARSET: [char; 10] = ['0', '1', 'ᚠ', 'ᚢ', 'ᚦ', 'ᚨ', 'ᚱ', 'ᚲ', '·', '¦'];
        const ROWS: u64 = 10;
        const COLS: u64 = 32;
        let frame = self.animator.frame();
        let density = 3 + (sample.cpu_usage_percent / 12.5) as u64; // tail length
        let mut lines = vec![header("MATRIX", sample)];
        for y in 0..ROWS {
            let row: String = (0..COLS)
                .map(|x| {
                    let speed = 1 + mix(x, 0, 0) % 3;
                    let head = (frame * speed + mix(x, 1, 0)) % (ROWS + density);
                    let dist = (y + ROWS + density - head) % (ROWS + density);
                    if dist < density {
                        CHARSET[(mix(x, y, frame) % CHARSET.len() as u64) as usize]
                    } else {
                        ' '
                    }
                })
                .collect();
            lines.push(paint_rgb(&row, 60, 220, 90));
        }
        lines
    }
}

decorative_mode!(QuantumMode, "Quantum", "an orbiting probability cloud");

impl QuantumMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const GLYPHS: [char; 5] = [' ', '·', '∙', '○', '●'];
        let phase = self.animator.phase();
        let spread = 6.0 + sample.memory_usage_percent / 12.0;
        let cx = 20.0 + phase.cos() * 9.0;
        let cy = 4.5 + phase.sin() * 2.5;
        let mut lines = vec![header("QUANTUM", sample)];
        for y in 0..9u32 {
            let row: String = (0..40u32)
                .map(|x| {
                    let dx = (f64::from(x) - cx) * 0.6;
                    let dy = f64::from(y) - cy;
                    let amplitude = (-(dx * dx + dy * dy) / spread).exp();
                    GLYPHS[((amplitude * (GLYPHS.len() - 1) as f64).round() as usize)
                        .min(GLYPHS.len() - 1)]
                })
                .collect();
            lines.push(paint_rgb(&row, 120, 160, 255));
        }
        lines
    }
}

decorative_mode!(NeuralMode, "Neural", "a toy network firing in proportion to load");

impl NeuralMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const LAYERS: u64 = 3;
        const NODES: u64 = 5;
        let frame = self.animator.frame();
        let load = sample
            .cpu_usage_percent
            .max(sample.memory_usage_percent)
            .clamp(0.0, 100.0) as u64;
        let mut lines = vec![header("NEURAL", sample), String::new()];
        for node in 0..NODES {
            let row: String = (0..LAYERS)
                .map(|layer| {
                    let firing = mix(frame, layer, node) % 100 < load.max(5);
                    if firing { "◉" } else { "○" }
                })
                .collect::<Vec<_>>()
                .join(" ──── ");
            lines.push(format!("      {row}"));
        }
        lines.push(String::new());
        lines.push(format!("      activity ∝ max(cpu, mem) = {load}%"));
        lines
    }
}

decorative_mode!(TronMode, "Tron", "a light cycle lapping the grid");

impl TronMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const W: u64 = 36;
        const H: u64 = 8;
        const TRAIL: u64 = 10;
        let frame = self.animator.frame();
        let perimeter = 2 * (W + H);
        let mut cells = vec![vec![' '; W as usize + 2]; H as usize + 2];
        for step in 0..TRAIL {
            let pos = (frame * 2 + perimeter - step) % perimeter;
            let (x, y, glyph) = if pos < W {
                (pos + 1, 0, '━')
            } else if pos < W + H {
                (W + 1, pos - W + 1, '┃')
            } else if pos < 2 * W + H {
                (W - (pos - W - H), H + 1, '━')
            } else {
                (0, H - (pos - 2 * W - H) + 1, '┃')
            };
            cells[y as usize][x as usize] = if step == 0 { '◈' } else { glyph };
        }
        let mut lines = vec![header("TRON", sample)];
        for row in cells {
            lines.push(paint_rgb(&row.into_iter().collect::<String>(), 80, 230, 255));
        }
        lines
    }
}

decorative_mode!(CyberpunkMode, "Cyberpunk", "neon banner glitching under pressure");

impl CyberpunkMode {
    fn render(&self, sample: &SystemMetrics) -> Vec<String> {
        const BANNER: &str = "H E A R T B E A T // O N L I N E";
        const GLITCH: [char; 6] = ['@', '#', '%', '&', '§', '▓'];
        let frame = self.animator.frame();
        let intensity = (sample.cpu_usage_percent / 2.0) as u64; // 0..50%
        let glitched: String = BANNER
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if c != ' ' && mix(frame, i as u64, 7) % 100 < intensity {
                    GLITCH[(mix(frame, i as u64, 11) % GLITCH.len() as u64) as usize]
                } else {
                    c
                }
            })
            .collect();
        vec![
            header("CYBERPUNK", sample),
            String::new(),
            paint_rgb(&glitched, 255, 60, 200),
            paint_rgb(&"▔".repeat(34), 60, 240, 255),
            format!(
                "  uplink {:.1}% | memory lattice {:.1}%",
                sample.cpu_usage_percent, sample.memory_usage_percent
            ),
        ]
    }
}

fn header(title: &str, sample: &SystemMetrics) -> String {
    format!(
        "{title} {} cpu {:.1}% mem {:.1}%",
        status_symbol(sample.cpu_usage_percent, sample.memory_usage_percent),
        sample.cpu_usage_percent,
        sample.memory_usage_percent
    )
}
