// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Terminal protocol used by the in-place rendering modes.
//!
//! Wraps the cursor save/restore, absolute positioning, and region clearing
//! that the window-style modes rely on. Rows and columns are 1-based, as in
//! the underlying escape sequences.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveTo, RestorePosition, SavePosition},
    queue,
    terminal::{Clear, ClearType},
};

pub fn save_cursor(out: &mut impl Write) -> io::Result<()> {
    queue!(out, SavePosition)
}

pub fn restore_cursor(out: &mut impl Write) -> io::Result<()> {
    queue!(out, RestorePosition)
}

/// Move to an absolute 1-based (row, col).
pub fn move_to(out: &mut impl Write, row: u16, col: u16) -> io::Result<()> {
    queue!(out, MoveTo(col.saturating_sub(1), row.saturating_sub(1)))
}

pub fn clear_line(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::CurrentLine))
}

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Current 1-based cursor row, if the terminal reports it.
pub fn cursor_row() -> io::Result<u16> {
    let (_, row) = crossterm::cursor::position()?;
    Ok(row + 1)
}

const ESC: char = '\u{1b}';

/// Remove ANSI escape sequences from `input`.
///
/// CSI sequences (`ESC [ … final-byte`) are dropped whole; any other ESC
/// byte is dropped on its own. The result never contains ESC, so the
/// function is idempotent.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESC {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            let _ = chars.next();
            // Parameter and intermediate bytes run up to the final byte
            // in '@'..='~'.
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}
