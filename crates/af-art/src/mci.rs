//! MCI marker scanning.
//!
//! An MCI code is `%` followed by two upper-case letters and a decimal
//! number: `%TL1`, `%ET2`, `%MT10`. The letters say what kind of element
//! belongs there, the number is the sysop's label for it.
//!
//! Scanning an art asset does three things in one pass:
//!
//! - blanks every marker (same width, so the art's layout is unchanged)
//! - records where each marker sat, in display columns
//! - numbers the markers 1..N in the order they appear
//!
//! Column positions ignore embedded CSI escape sequences (colour changes
//! and the like take no screen space) and count wide characters as two
//! columns.

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::placeholder::{Placeholder, PlaceholderMap};

/// `%` + two upper-case letters + 1-3 digits.
static MCI_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Z]{2})([0-9]{1,3})").expect("MCI pattern is valid"));

/// CSI escape sequences: ESC `[` params intermediates final.
static CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("CSI pattern is valid"));

/// SUB (0x1A) marks end-of-file in DOS-era art; a SAUCE record follows.
const EOF_MARKER: char = '\u{1a}';

/// Art with its markers blanked, plus where the markers were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedArt {
    /// Lines ready to paint, without line terminators.
    pub lines: Vec<String>,
    /// Marker positions, relative to the first line.
    pub placeholders: PlaceholderMap,
}

impl ScannedArt {
    /// Number of screen rows the art occupies.
    #[must_use]
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }
}

/// Display width of `s`, skipping CSI escape sequences.
#[must_use]
pub fn display_width(s: &str) -> usize {
    CSI.replace_all(s, "").width()
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Scan a piece of art for MCI markers.
#[must_use]
pub fn scan(art: &str) -> ScannedArt {
    let body = art.split(EOF_MARKER).next().unwrap_or_default();

    let mut lines = Vec::new();
    let mut found = Vec::new();

    for (row, line) in body.lines().enumerate() {
        let mut out = String::with_capacity(line.len());
        let mut last = 0;

        for caps in MCI_CODE.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&line[last..whole.start()]);

            let marker = whole.as_str();
            let width = marker.width();
            found.push(Placeholder {
                index: 0,
                code: caps[1].to_string(),
                tag: caps[2].parse().unwrap_or(0),
                row: to_u16(row),
                col: to_u16(display_width(&line[..whole.start()])),
                width: to_u16(width),
                height: 1,
            });

            out.extend(std::iter::repeat_n(' ', width));
            last = whole.end();
        }

        out.push_str(&line[last..]);
        lines.push(out);
    }

    ScannedArt {
        lines,
        placeholders: PlaceholderMap::new(found),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
