//! Fields — the interactive elements bound to a region's placeholders.
//!
//! A field's position and size come from the placeholder it is bound to.
//! The field owns its id, its text and whether it takes focus. Focus
//! itself is tracked by the owning
//! [`RegionController`](crate::controller::RegionController), which tells
//! the field how to style itself when it paints.
//!
//! [`Field`] is the widget seam: a controller can hold any implementation.
//! [`TextField`] is the stock widget, covering labels, single- and
//! multi-line edits, and buttons.

use std::fmt;
use std::io;

use af_art::Placeholder;
use af_term::{Attr, KeyCode, KeyEvent, OutputBuffer, ansi};
use serde::Deserialize;
use unicode_width::UnicodeWidthChar;

/// Field identifier, unique within one controller.
pub type FieldId = u32;

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// What sort of widget sits on a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Display text (`%TL`).
    Label,
    /// Single-line text entry (`%ET`).
    Edit,
    /// Multi-line text entry (`%MT`).
    MultiLine,
    /// Selectable item (`%BT`, `%HM`).
    Button,
}

impl FieldKind {
    /// The widget for an MCI code. Codes we don't know display as labels.
    #[must_use]
    pub fn from_mci(code: &str) -> Self {
        match code {
            "ET" => Self::Edit,
            "MT" => Self::MultiLine,
            "BT" | "HM" => Self::Button,
            _ => Self::Label,
        }
    }

    /// Whether fields of this kind take focus unless configured otherwise.
    #[inline]
    #[must_use]
    pub const fn default_accepts_focus(self) -> bool {
        !matches!(self, Self::Label)
    }

    /// True for the text-entry kinds.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Edit | Self::MultiLine)
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// Instructions for building one field during binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    /// 1-based index into the region's placeholder map.
    pub placeholder: usize,
    pub kind: FieldKind,
    pub text: String,
    pub accepts_focus: bool,
    pub read_only: bool,
    /// Maximum characters the field holds. Edits default to their width.
    pub max_len: Option<usize>,
    /// Width override; the placeholder's width otherwise.
    pub width: Option<u16>,
    /// Height override for multi-line fields.
    pub height: Option<u16>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(id: FieldId, placeholder: usize, kind: FieldKind) -> Self {
        Self {
            id,
            placeholder,
            kind,
            text: String::new(),
            accepts_focus: kind.default_accepts_focus(),
            read_only: false,
            max_len: None,
            width: None,
            height: None,
        }
    }

    /// The default spec for a placeholder: id = index, kind from the MCI code.
    #[must_use]
    pub fn for_placeholder(placeholder: &Placeholder) -> Self {
        Self::new(
            FieldId::try_from(placeholder.index).unwrap_or(FieldId::MAX),
            placeholder.index,
            FieldKind::from_mci(&placeholder.code),
        )
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub const fn focusable(mut self, accepts_focus: bool) -> Self {
        self.accepts_focus = accepts_focus;
        self
    }

    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

// ---------------------------------------------------------------------------
// Field trait
// ---------------------------------------------------------------------------

/// What a key did to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not for this field. The controller may act on it (Tab).
    Ignored,
    /// Handled without changing content (cursor movement, full field).
    Consumed,
    /// Content changed.
    Changed,
    /// Accept or escape: the field is done and the form should submit.
    Complete,
}

/// An interactive or display element bound to one placeholder.
pub trait Field: fmt::Debug + Send {
    fn id(&self) -> FieldId;

    fn kind(&self) -> FieldKind;

    fn accepts_focus(&self) -> bool;

    fn set_accepts_focus(&mut self, accepts_focus: bool);

    /// Current text or value.
    fn text(&self) -> &str;

    /// Replace the content and move the cursor to its end.
    fn set_text(&mut self, text: &str);

    fn set_read_only(&mut self, read_only: bool);

    /// Top-left screen position as `(row, col)`.
    fn position(&self) -> (u16, u16);

    /// Where the hardware cursor belongs while this field has focus.
    fn cursor(&self) -> (u16, u16);

    /// Paint the field's current state with `style` on top.
    fn paint(&self, out: &mut OutputBuffer, style: Attr) -> io::Result<()>;

    /// React to a key while focused.
    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome;
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// The stock widget.
#[derive(Debug, Clone)]
pub struct TextField {
    id: FieldId,
    kind: FieldKind,
    row: u16,
    col: u16,
    width: u16,
    height: u16,
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    accepts_focus: bool,
    read_only: bool,
    max_len: Option<usize>,
}

impl TextField {
    /// Build a field from its spec, sized and placed by its placeholder.
    #[must_use]
    pub fn new(spec: &FieldSpec, placeholder: &Placeholder) -> Self {
        let width = spec.width.unwrap_or(placeholder.width).max(1);
        let height = match spec.kind {
            FieldKind::MultiLine => spec.height.unwrap_or(placeholder.height).max(1),
            _ => 1,
        };
        let max_len = spec.max_len.or(match spec.kind {
            FieldKind::Edit => Some(usize::from(width)),
            _ => None,
        });
        let mut field = Self {
            id: spec.id,
            kind: spec.kind,
            row: placeholder.row,
            col: placeholder.col,
            width,
            height,
            text: String::new(),
            cursor: 0,
            accepts_focus: spec.accepts_focus,
            read_only: spec.read_only,
            max_len,
        };
        field.set_text(&spec.text);
        field
    }

    /// [`new`](Self::new), boxed as a [`Field`]. The default field factory.
    #[must_use]
    pub fn boxed(spec: &FieldSpec, placeholder: &Placeholder) -> Box<dyn Field> {
        Box::new(Self::new(spec, placeholder))
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Line the cursor is on and the text from that line's start to the
    /// cursor.
    fn cursor_line(&self) -> (usize, &str) {
        let before = &self.text[..self.byte_at(self.cursor)];
        let line = before.matches('\n').count();
        let start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, &before[start..])
    }

    /// First line shown. Multi-line fields scroll to keep the cursor visible.
    fn first_visible_line(&self) -> usize {
        let (line, _) = self.cursor_line();
        line.saturating_sub(usize::from(self.height) - 1)
    }

    fn insert(&mut self, ch: char) -> KeyOutcome {
        if self.max_len.is_some_and(|max| self.char_len() >= max) {
            return KeyOutcome::Consumed;
        }
        let at = self.byte_at(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        KeyOutcome::Changed
    }

    fn remove(&mut self, chars: usize) -> KeyOutcome {
        let at = self.byte_at(chars);
        self.text.remove(at);
        KeyOutcome::Changed
    }

    fn move_to(&mut self, chars: usize) -> KeyOutcome {
        self.cursor = chars.min(self.char_len());
        KeyOutcome::Consumed
    }
}

/// Clip `line` to `width` display columns and pad it out to exactly that.
fn fit(line: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

fn columns(s: &str) -> u16 {
    let w: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    u16::try_from(w).unwrap_or(u16::MAX)
}

impl Field for TextField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn accepts_focus(&self) -> bool {
        self.accepts_focus
    }

    fn set_accepts_focus(&mut self, accepts_focus: bool) {
        self.accepts_focus = accepts_focus;
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = match self.max_len {
            Some(max) => text.chars().take(max).collect(),
            None => text.to_string(),
        };
        self.cursor = self.char_len();
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    fn cursor(&self) -> (u16, u16) {
        let (line, prefix) = self.cursor_line();
        let visible = line - self.first_visible_line();
        let row = self
            .row
            .saturating_add(u16::try_from(visible).unwrap_or(u16::MAX));
        let col = self.col.saturating_add(columns(prefix).min(self.width));
        (row, col)
    }

    fn paint(&self, out: &mut OutputBuffer, style: Attr) -> io::Result<()> {
        let mut lines = self.text.split('\n').skip(self.first_visible_line());
        for r in 0..self.height {
            ansi::cursor_to(out, self.col, self.row.saturating_add(r))?;
            ansi::attrs(out, style)?;
            out.push_str(&fit(lines.next().unwrap_or_default(), self.width));
            ansi::reset(out)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Escape => return KeyOutcome::Complete,
            KeyCode::Enter if self.kind == FieldKind::MultiLine && !self.read_only => {
                return self.insert('\n');
            }
            KeyCode::Enter => return KeyOutcome::Complete,
            _ => {}
        }

        if !self.kind.is_editable() {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor + 1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.char_len()),
            KeyCode::Backspace if !self.read_only && self.cursor > 0 => {
                self.cursor -= 1;
                self.remove(self.cursor)
            }
            KeyCode::Delete if !self.read_only && self.cursor < self.char_len() => {
                self.remove(self.cursor)
            }
            _ => match key.printable() {
                Some(ch) if !self.read_only => self.insert(ch),
                _ => KeyOutcome::Ignored,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ph(code: &str, row: u16, col: u16, width: u16) -> Placeholder {
        Placeholder {
            index: 1,
            code: code.to_string(),
            tag: 1,
            row,
            col,
            width,
            height: 1,
        }
    }

    fn field(code: &str, width: u16) -> TextField {
        let p = ph(code, 2, 5, width);
        TextField::new(&FieldSpec::for_placeholder(&p), &p)
    }

    fn type_str(f: &mut TextField, s: &str) {
        for ch in s.chars() {
            f.handle_key(&KeyEvent::char(ch));
        }
    }

    #[test]
    fn kinds_from_mci_codes() {
        assert_eq!(FieldKind::from_mci("TL"), FieldKind::Label);
        assert_eq!(FieldKind::from_mci("ET"), FieldKind::Edit);
        assert_eq!(FieldKind::from_mci("MT"), FieldKind::MultiLine);
        assert_eq!(FieldKind::from_mci("BT"), FieldKind::Button);
        assert_eq!(FieldKind::from_mci("HM"), FieldKind::Button);
        assert_eq!(FieldKind::from_mci("XY"), FieldKind::Label);
    }

    #[test]
    fn labels_do_not_take_focus_by_default() {
        assert!(!field("TL", 4).accepts_focus());
        assert!(field("ET", 4).accepts_focus());
        assert!(field("BT", 4).accepts_focus());
    }

    #[test]
    fn spec_from_placeholder_uses_index() {
        let mut p = ph("ET", 0, 0, 4);
        p.index = 3;
        let spec = FieldSpec::for_placeholder(&p);
        assert_eq!((spec.id, spec.placeholder, spec.kind), (3, 3, FieldKind::Edit));
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut f = field("ET", 10);
        type_str(&mut f, "hllo");
        f.handle_key(&KeyEvent::new(KeyCode::Home));
        f.handle_key(&KeyEvent::new(KeyCode::Right));
        assert_eq!(f.handle_key(&KeyEvent::char('e')), KeyOutcome::Changed);
        assert_eq!(f.text(), "hello");
    }

    #[test]
    fn backspace_and_delete() {
        let mut f = field("ET", 10);
        type_str(&mut f, "abc");
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Backspace)), KeyOutcome::Changed);
        assert_eq!(f.text(), "ab");
        f.handle_key(&KeyEvent::new(KeyCode::Home));
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Backspace)), KeyOutcome::Ignored);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Delete)), KeyOutcome::Changed);
        assert_eq!(f.text(), "b");
    }

    #[test]
    fn edit_length_defaults_to_width() {
        let mut f = field("ET", 3);
        type_str(&mut f, "abcd");
        assert_eq!(f.text(), "abc");
        assert_eq!(f.handle_key(&KeyEvent::char('z')), KeyOutcome::Consumed);
    }

    #[test]
    fn explicit_max_len_wins() {
        let p = ph("ET", 0, 0, 4);
        let mut spec = FieldSpec::for_placeholder(&p);
        spec.max_len = Some(2);
        let mut f = TextField::new(&spec, &p);
        type_str(&mut f, "xyz");
        assert_eq!(f.text(), "xy");
    }

    #[test]
    fn enter_and_escape_complete() {
        let mut f = field("ET", 4);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Enter)), KeyOutcome::Complete);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Escape)), KeyOutcome::Complete);
        let mut b = field("BT", 4);
        assert_eq!(b.handle_key(&KeyEvent::new(KeyCode::Enter)), KeyOutcome::Complete);
        assert_eq!(b.handle_key(&KeyEvent::char('x')), KeyOutcome::Ignored);
    }

    #[test]
    fn tab_is_left_to_the_controller() {
        let mut f = field("ET", 4);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Tab)), KeyOutcome::Ignored);
    }

    #[test]
    fn multi_line_enter_is_newline() {
        let p = ph("MT", 0, 0, 10);
        let spec = FieldSpec {
            height: Some(3),
            ..FieldSpec::for_placeholder(&p)
        };
        let mut f = TextField::new(&spec, &p);
        type_str(&mut f, "hi");
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Enter)), KeyOutcome::Changed);
        type_str(&mut f, "there");
        assert_eq!(f.text(), "hi\nthere");
        assert_eq!(f.size(), (10, 3));
        assert_eq!(f.cursor(), (1, 5));
    }

    #[test]
    fn multi_line_scrolls_to_cursor() {
        let p = ph("MT", 4, 0, 10);
        let spec = FieldSpec {
            height: Some(2),
            ..FieldSpec::for_placeholder(&p)
        };
        let mut f = TextField::new(&spec, &p);
        f.set_text("a\nb\nc");
        assert_eq!(f.cursor(), (5, 1));
        let mut out = OutputBuffer::new();
        f.paint(&mut out, Attr::empty()).unwrap();
        let text = String::from_utf8(out.take()).unwrap();
        assert!(text.contains('b') && text.contains('c'));
        assert!(!text.contains('a'));
    }

    #[test]
    fn read_only_rejects_edits_but_completes() {
        let p = ph("MT", 0, 0, 10);
        let spec = FieldSpec::for_placeholder(&p).with_text("msg").read_only(true);
        let mut f = TextField::new(&spec, &p);
        assert_eq!(f.handle_key(&KeyEvent::char('x')), KeyOutcome::Ignored);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Backspace)), KeyOutcome::Ignored);
        assert_eq!(f.handle_key(&KeyEvent::new(KeyCode::Enter)), KeyOutcome::Complete);
        assert_eq!(f.text(), "msg");
    }

    #[test]
    fn paint_pads_to_width() {
        let mut f = field("ET", 4);
        f.set_text("ab");
        let mut out = OutputBuffer::new();
        f.paint(&mut out, Attr::empty()).unwrap();
        assert_eq!(out.as_bytes(), b"\x1b[3;6Hab  \x1b[0m");
    }

    #[test]
    fn paint_highlights_with_style() {
        let f = field("ET", 2);
        let mut out = OutputBuffer::new();
        f.paint(&mut out, Attr::FOCUSED).unwrap();
        assert_eq!(out.as_bytes(), b"\x1b[3;6H\x1b[7m  \x1b[0m");
    }

    #[test]
    fn paint_clips_long_labels() {
        let p = ph("TL", 0, 0, 3);
        let f = TextField::new(&FieldSpec::for_placeholder(&p).with_text("abcdef"), &p);
        let mut out = OutputBuffer::new();
        f.paint(&mut out, Attr::empty()).unwrap();
        assert_eq!(out.as_bytes(), b"\x1b[1;1Habc\x1b[0m");
    }

    #[test]
    fn cursor_follows_text() {
        let mut f = field("ET", 10);
        assert_eq!(f.cursor(), (2, 5));
        type_str(&mut f, "漢a");
        assert_eq!(f.cursor(), (2, 8));
    }

    #[test]
    fn ctrl_chars_are_not_typed() {
        let mut f = field("ET", 10);
        let key = KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: af_term::Modifiers::CTRL,
        };
        assert_eq!(f.handle_key(&key), KeyOutcome::Ignored);
        assert_eq!(f.text(), "");
    }
}
