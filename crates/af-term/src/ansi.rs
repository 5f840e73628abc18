// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. The form engine decides *what* to paint;
// this module only knows the byte-level encoding of the handful of commands
// a BBS-style screen needs: cursor addressing and visibility, screen
// clearing, line deletion and the focus highlight.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

use crate::attr::Attr;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor to the start of a screen row.
#[inline]
pub fn goto_row(w: &mut impl Write, row: u16) -> io::Result<()> {
    cursor_to(w, 0, row)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Full screen reset: attributes off, screen cleared, cursor home.
///
/// This is the first thing a session entry paints. Clearing alone leaves
/// whatever colours the previous screen set, and many BBS clients fill the
/// cleared area with the current background.
pub fn reset_screen(w: &mut impl Write) -> io::Result<()> {
    reset(w)?;
    clear_screen(w)?;
    cursor_to(w, 0, 0)
}

// ─── Lines ───────────────────────────────────────────────────────────────────

/// Delete `n` lines starting at the cursor row (DL).
///
/// Lines below scroll up to fill the gap. Does nothing when `n` is 0
/// (DL treats a zero parameter as 1, which is never what we want).
pub fn delete_lines(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}M")
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit the SGR sequence for `attr`. Does nothing if no attributes are set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.contains(Attr::INVERSE) {
        w.write_all(b"\x1b[7m")?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
