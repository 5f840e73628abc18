// SPDX-License-Identifier: MIT
//
// Decoded key events.
//
// The session transport owns byte decoding (telnet IAC handling, ANSI
// escape parsing, whatever the client speaks). By the time a key reaches
// the form engine it is one of these structured values. We keep the
// vocabulary small: the keys a full-screen BBS form actually reacts to.
//
// Each key also has a stable lower-case name ("escape", "enter", ...).
// Submissions carry the key that completed a field, and menu configs and
// line-oriented drivers refer to keys by that name.

use std::fmt;

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── KeyCode ────────────────────────────────────────────────────────────────

/// Named keys, in the order [`KeyCode::from_name`] tries them.
const NAMED: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("escape", KeyCode::Escape),
    ("delete", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
];

impl KeyCode {
    /// Stable lower-case name. Printable characters have no name.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(_, code)| *code == self)
            .map(|(name, _)| *name)
    }

    /// Look a named key up, accepting the usual short aliases
    /// (`esc`, `return`, `bs`, `del`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "esc" => "escape",
            "return" | "cr" => "enter",
            "bs" => "backspace",
            "del" => "delete",
            other => other,
        };
        NAMED
            .iter()
            .find(|(n, _)| *n == canonical)
            .map(|(_, code)| *code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.name()) {
            (Self::Char(ch), _) => write!(f, "{ch}"),
            (_, Some(name)) => f.write_str(name),
            (other, None) => write!(f, "{other:?}"),
        }
    }
}

// ─── KeyEvent ───────────────────────────────────────────────────────────────

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A printable character with no modifiers.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch))
    }

    /// True for the Escape key, which BBS forms treat as "leave / toggle".
    #[inline]
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
    }

    /// The printable character this key types, if any.
    ///
    /// Control-modified characters are commands, not text.
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !ch.is_control() && !self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.code)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
