//! Region controllers — the interactive surface of one screen region.
//!
//! A controller owns the fields bound to one region's placeholders and
//! decides which of them has focus. Keys arrive from the editor, go to the
//! focused field, and come back out as a [`Submission`] when the field
//! completes.
//!
//! # Focus
//!
//! At most one field is focused. A controller can be *disabled*
//! ([`set_focus(false)`](RegionController::set_focus)): it drops focus,
//! ignores keys and paints its fields without a highlight, but keeps their
//! contents. [`switch_focus`](RegionController::switch_focus) re-enables it.
//!
//! # Binding
//!
//! [`bind`](RegionController::bind) is all-or-nothing. If any spec names a
//! placeholder the art doesn't have, or two specs claim one id, nothing is
//! bound and the controller answers `NotFound` for every id until a later
//! bind succeeds.

use std::collections::BTreeMap;
use std::io;

use af_art::{Placeholder, PlaceholderMap};
use af_term::{Attr, KeyCode, KeyEvent, OutputBuffer};
use tracing::debug;

use crate::error::{BindError, FocusError};
use crate::field::{Field, FieldId, FieldSpec, KeyOutcome, TextField};
use crate::region::FormId;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A completed form interaction, handed to the editor's dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub form_id: FormId,
    /// The field that completed.
    pub field_id: FieldId,
    /// The key that completed it.
    pub key: KeyEvent,
    /// Every field's value, by id.
    pub values: BTreeMap<FieldId, String>,
}

impl Submission {
    /// A submission with no values, for input decoded elsewhere.
    #[must_use]
    pub const fn new(form_id: FormId, field_id: FieldId, key: KeyEvent) -> Self {
        Self {
            form_id,
            field_id,
            key,
            values: BTreeMap::new(),
        }
    }

    /// Escape-class submissions drive the edit / edit-menu toggle.
    #[inline]
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        self.key.is_escape()
    }
}

/// What the controller did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Nothing took the key.
    Ignored,
    /// The key moved the cursor or focus without changing content.
    Consumed,
    /// A field's content changed.
    Changed(FieldId),
    /// The focused field completed.
    Submitted(Submission),
}

// ---------------------------------------------------------------------------
// RegionController
// ---------------------------------------------------------------------------

/// Builds a widget for a spec at its placeholder.
pub type FieldFactory = fn(&FieldSpec, &Placeholder) -> Box<dyn Field>;

/// Owns the fields of one region and their focus.
#[derive(Debug)]
pub struct RegionController {
    form_id: FormId,
    fields: BTreeMap<FieldId, Box<dyn Field>>,
    /// Focus order: the order specs were bound in.
    order: Vec<FieldId>,
    focused: Option<FieldId>,
    enabled: bool,
}

impl RegionController {
    /// An empty controller. Every lookup fails until [`bind`](Self::bind)
    /// succeeds.
    #[must_use]
    pub const fn new(form_id: FormId) -> Self {
        Self {
            form_id,
            fields: BTreeMap::new(),
            order: Vec::new(),
            focused: None,
            enabled: true,
        }
    }

    /// Create and bind in one step.
    pub fn bound(
        form_id: FormId,
        placeholders: &PlaceholderMap,
        specs: &[FieldSpec],
    ) -> Result<Self, BindError> {
        let mut controller = Self::new(form_id);
        controller.bind(placeholders, specs)?;
        Ok(controller)
    }

    /// Build [`TextField`]s from `specs`, placed per `placeholders`.
    pub fn bind(
        &mut self,
        placeholders: &PlaceholderMap,
        specs: &[FieldSpec],
    ) -> Result<(), BindError> {
        self.bind_with(placeholders, specs, TextField::boxed)
    }

    /// Like [`bind`](Self::bind) with a custom widget factory.
    ///
    /// Replaces whatever was bound before. On failure the controller is
    /// left empty.
    pub fn bind_with(
        &mut self,
        placeholders: &PlaceholderMap,
        specs: &[FieldSpec],
        factory: FieldFactory,
    ) -> Result<(), BindError> {
        self.fields.clear();
        self.order.clear();
        self.focused = None;

        let mut fields = BTreeMap::new();
        let mut order = Vec::with_capacity(specs.len());
        for spec in specs {
            let placeholder =
                placeholders
                    .get(spec.placeholder)
                    .ok_or(BindError::UnknownPlaceholder {
                        form_id: self.form_id,
                        index: spec.placeholder,
                    })?;
            if fields.contains_key(&spec.id) {
                return Err(BindError::DuplicateFieldId {
                    form_id: self.form_id,
                    id: spec.id,
                });
            }
            fields.insert(spec.id, factory(spec, placeholder));
            order.push(spec.id);
        }

        debug!(form_id = self.form_id, fields = fields.len(), "bound form");
        self.fields = fields;
        self.order = order;
        Ok(())
    }

    #[must_use]
    pub const fn form_id(&self) -> FormId {
        self.form_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field ids in focus order.
    #[must_use]
    pub fn field_ids(&self) -> &[FieldId] {
        &self.order
    }

    pub fn get_field(&self, id: FieldId) -> Result<&dyn Field, FocusError> {
        self.fields
            .get(&id)
            .map(|f| &**f)
            .ok_or(FocusError::NotFound(id))
    }

    pub fn get_field_mut(&mut self, id: FieldId) -> Result<&mut (dyn Field + 'static), FocusError> {
        self.fields
            .get_mut(&id)
            .map(|f| &mut **f)
            .ok_or(FocusError::NotFound(id))
    }

    /// The focused field's id, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    /// Whether the controller takes input.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a field owns focus here.
    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.enabled && self.focused.is_some()
    }

    /// Enable or disable the controller.
    ///
    /// Disabling drops focus. Enabling focuses the lowest-id focusable
    /// field when nothing is focused.
    pub fn set_focus(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.focused = None;
        } else if self.focused.is_none() {
            self.focused = self
                .fields
                .values()
                .find(|f| f.accepts_focus())
                .map(|f| f.id());
        }
        debug!(form_id = self.form_id, enabled, focused = ?self.focused, "set focus");
    }

    /// Check that `id` could take focus, without moving it.
    pub fn check_focusable(&self, id: FieldId) -> Result<(), FocusError> {
        if self.get_field(id)?.accepts_focus() {
            Ok(())
        } else {
            Err(FocusError::NotFocusable(id))
        }
    }

    /// Move focus to `id` and enable the controller.
    ///
    /// Leaves everything untouched on failure.
    pub fn switch_focus(&mut self, id: FieldId) -> Result<(), FocusError> {
        self.check_focusable(id)?;
        self.enabled = true;
        self.focused = Some(id);
        debug!(form_id = self.form_id, field_id = id, "switched focus");
        Ok(())
    }

    /// Focus the next (or previous) focusable field in focus order,
    /// wrapping around. Returns whether focus moved.
    pub fn focus_next(&mut self, backwards: bool) -> bool {
        let Some(current) = self.focused else {
            return false;
        };
        let Some(pos) = self.order.iter().position(|&id| id == current) else {
            return false;
        };
        let n = self.order.len();
        let next = (1..n)
            .map(|step| {
                if backwards {
                    self.order[(pos + n - step) % n]
                } else {
                    self.order[(pos + step) % n]
                }
            })
            .find(|&id| self.check_focusable(id).is_ok());
        next.is_some_and(|id| self.switch_focus(id).is_ok())
    }

    /// Every field's current value, by id.
    #[must_use]
    pub fn values(&self) -> BTreeMap<FieldId, String> {
        self.fields
            .iter()
            .map(|(&id, f)| (id, f.text().to_string()))
            .collect()
    }

    /// Package the focused field's completion for the dispatcher.
    ///
    /// Focus is not changed. `None` when nothing is focused.
    #[must_use]
    pub fn submit(&self, key: KeyEvent) -> Option<Submission> {
        let field_id = self.focused?;
        debug!(form_id = self.form_id, field_id, %key, "submit");
        Some(Submission {
            form_id: self.form_id,
            field_id,
            key,
            values: self.values(),
        })
    }

    /// Route a key to the focused field.
    pub fn handle_key(&mut self, key: &KeyEvent) -> ControllerEvent {
        if !self.enabled {
            return ControllerEvent::Ignored;
        }
        let Some(id) = self.focused else {
            return ControllerEvent::Ignored;
        };
        let Some(field) = self.fields.get_mut(&id) else {
            return ControllerEvent::Ignored;
        };

        match field.handle_key(key) {
            KeyOutcome::Complete => self
                .submit(*key)
                .map_or(ControllerEvent::Ignored, ControllerEvent::Submitted),
            KeyOutcome::Changed => ControllerEvent::Changed(id),
            KeyOutcome::Consumed => ControllerEvent::Consumed,
            KeyOutcome::Ignored => match key.code {
                KeyCode::Tab if self.focus_next(false) => ControllerEvent::Consumed,
                KeyCode::BackTab if self.focus_next(true) => ControllerEvent::Consumed,
                _ => ControllerEvent::Ignored,
            },
        }
    }

    /// Paint every field in id order. Only the focused field of an enabled
    /// controller is highlighted.
    pub fn redraw_all(&self, out: &mut OutputBuffer) -> io::Result<()> {
        for (&id, field) in &self.fields {
            let style = if self.enabled && self.focused == Some(id) {
                Attr::FOCUSED
            } else {
                Attr::empty()
            };
            field.paint(out, style)?;
        }
        Ok(())
    }

    /// Where the hardware cursor belongs, if a field has focus.
    #[must_use]
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        if !self.enabled {
            return None;
        }
        self.focused
            .and_then(|id| self.fields.get(&id))
            .map(|f| f.cursor())
    }

    /// Mark every field read-only (or writable again).
    pub fn set_read_only(&mut self, read_only: bool) {
        for field in self.fields.values_mut() {
            field.set_read_only(read_only);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use pretty_assertions::assert_eq;

    fn map(codes: &[&str]) -> PlaceholderMap {
        PlaceholderMap::new(
            codes
                .iter()
                .enumerate()
                .map(|(i, code)| Placeholder {
                    index: 0,
                    code: (*code).to_string(),
                    tag: 1,
                    row: u16::try_from(i).unwrap(),
                    col: 0,
                    width: 8,
                    height: 1,
                })
                .collect(),
        )
    }

    fn controller(codes: &[&str]) -> RegionController {
        let m = map(codes);
        let specs: Vec<FieldSpec> = m.iter().map(FieldSpec::for_placeholder).collect();
        RegionController::bound(1, &m, &specs).unwrap()
    }

    fn focused_count(c: &RegionController) -> usize {
        usize::from(c.focused().is_some())
    }

    #[test]
    fn bind_builds_one_field_per_spec() {
        let c = controller(&["TL", "ET", "ET"]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.field_ids(), &[1, 2, 3]);
        assert_eq!(c.get_field(2).unwrap().kind(), FieldKind::Edit);
    }

    #[test]
    fn unknown_placeholder_leaves_controller_unusable() {
        let m = map(&["ET", "ET", "ET"]);
        let specs = vec![
            FieldSpec::new(1, 1, FieldKind::Edit),
            FieldSpec::new(2, 5, FieldKind::Edit),
        ];
        let mut c = RegionController::new(4);
        let err = c.bind(&m, &specs).unwrap_err();
        assert_eq!(err, BindError::UnknownPlaceholder { form_id: 4, index: 5 });
        for id in 0..=5 {
            assert_eq!(c.get_field(id).unwrap_err(), FocusError::NotFound(id));
        }
        assert!(c.is_empty());
    }

    #[test]
    fn failed_rebind_clears_previous_fields() {
        let m = map(&["ET"]);
        let mut c = RegionController::bound(0, &m, &[FieldSpec::new(1, 1, FieldKind::Edit)]).unwrap();
        c.switch_focus(1).unwrap();
        assert!(c.bind(&m, &[FieldSpec::new(1, 2, FieldKind::Edit)]).is_err());
        assert!(c.get_field(1).is_err());
        assert_eq!(c.focused(), None);
    }

    #[test]
    fn duplicate_field_id_is_rejected() {
        let m = map(&["ET", "ET"]);
        let specs = vec![
            FieldSpec::new(7, 1, FieldKind::Edit),
            FieldSpec::new(7, 2, FieldKind::Edit),
        ];
        let err = RegionController::bound(2, &m, &specs).unwrap_err();
        assert_eq!(err, BindError::DuplicateFieldId { form_id: 2, id: 7 });
    }

    #[test]
    fn set_focus_picks_lowest_focusable() {
        let mut c = controller(&["TL", "ET", "ET"]);
        c.set_focus(true);
        assert_eq!(c.focused(), Some(2));
        assert!(c.has_focus());
    }

    #[test]
    fn set_focus_keeps_existing_focus() {
        let mut c = controller(&["ET", "ET"]);
        c.switch_focus(2).unwrap();
        c.set_focus(true);
        assert_eq!(c.focused(), Some(2));
    }

    #[test]
    fn disabling_clears_focus_not_content() {
        let mut c = controller(&["ET"]);
        c.get_field_mut(1).unwrap().set_text("keep");
        c.switch_focus(1).unwrap();
        c.set_focus(false);
        assert_eq!(c.focused(), None);
        assert!(!c.is_enabled());
        assert_eq!(c.get_field(1).unwrap().text(), "keep");
        assert_eq!(c.cursor_position(), None);
    }

    #[test]
    fn switch_focus_failures_have_no_side_effects() {
        let mut c = controller(&["TL", "ET"]);
        c.switch_focus(2).unwrap();
        assert_eq!(c.switch_focus(1), Err(FocusError::NotFocusable(1)));
        assert_eq!(c.switch_focus(9), Err(FocusError::NotFound(9)));
        assert_eq!(c.focused(), Some(2));
        assert!(!c.get_field(1).unwrap().accepts_focus());
        assert_eq!(focused_count(&c), 1);
    }

    #[test]
    fn switch_focus_reenables() {
        let mut c = controller(&["ET"]);
        c.set_focus(false);
        c.switch_focus(1).unwrap();
        assert!(c.is_enabled());
        assert!(c.has_focus());
    }

    #[test]
    fn tab_cycles_focusable_fields() {
        let mut c = controller(&["ET", "TL", "ET"]);
        c.switch_focus(1).unwrap();
        assert_eq!(c.handle_key(&KeyEvent::new(KeyCode::Tab)), ControllerEvent::Consumed);
        assert_eq!(c.focused(), Some(3));
        c.handle_key(&KeyEvent::new(KeyCode::Tab));
        assert_eq!(c.focused(), Some(1));
        c.handle_key(&KeyEvent::new(KeyCode::BackTab));
        assert_eq!(c.focused(), Some(3));
    }

    #[test]
    fn typing_reports_change() {
        let mut c = controller(&["ET"]);
        c.switch_focus(1).unwrap();
        assert_eq!(c.handle_key(&KeyEvent::char('x')), ControllerEvent::Changed(1));
        assert_eq!(c.get_field(1).unwrap().text(), "x");
    }

    #[test]
    fn completion_submits_all_values() {
        let mut c = controller(&["ET", "ET"]);
        c.get_field_mut(1).unwrap().set_text("alice");
        c.switch_focus(2).unwrap();
        c.handle_key(&KeyEvent::char('y'));

        let ControllerEvent::Submitted(sub) = c.handle_key(&KeyEvent::new(KeyCode::Enter)) else {
            panic!("expected a submission");
        };
        assert_eq!(sub.form_id, 1);
        assert_eq!(sub.field_id, 2);
        assert_eq!(sub.key.code, KeyCode::Enter);
        assert_eq!(sub.values[&1], "alice");
        assert_eq!(sub.values[&2], "y");
        // Submitting doesn't move focus.
        assert_eq!(c.focused(), Some(2));
    }

    #[test]
    fn disabled_controller_ignores_keys() {
        let mut c = controller(&["ET"]);
        c.set_focus(false);
        assert_eq!(c.handle_key(&KeyEvent::char('x')), ControllerEvent::Ignored);
        assert_eq!(c.get_field(1).unwrap().text(), "");
        assert_eq!(c.submit(KeyEvent::new(KeyCode::Enter)), None);
    }

    #[test]
    fn redraw_highlights_only_focused_field() {
        let mut c = controller(&["ET", "ET"]);
        c.switch_focus(2).unwrap();
        let mut out = OutputBuffer::new();
        c.redraw_all(&mut out).unwrap();
        let text = String::from_utf8(out.take()).unwrap();
        assert_eq!(text.matches("\x1b[7m").count(), 1);
        // Id order: field 1 (row 0) paints before field 2 (row 1).
        assert!(text.find("\x1b[1;1H").unwrap() < text.find("\x1b[2;1H").unwrap());

        c.set_focus(false);
        let mut out = OutputBuffer::new();
        c.redraw_all(&mut out).unwrap();
        assert!(!String::from_utf8(out.take()).unwrap().contains("\x1b[7m"));
    }

    #[test]
    fn redraw_does_not_change_state() {
        let mut c = controller(&["ET", "ET"]);
        c.switch_focus(1).unwrap();
        c.get_field_mut(2).unwrap().set_text("v");
        let before = c.values();
        c.redraw_all(&mut OutputBuffer::new()).unwrap();
        assert_eq!(c.values(), before);
        assert_eq!(c.focused(), Some(1));
    }

    #[test]
    fn read_only_applies_to_all_fields() {
        let mut c = controller(&["ET"]);
        c.set_read_only(true);
        c.switch_focus(1).unwrap();
        assert_eq!(c.handle_key(&KeyEvent::char('x')), ControllerEvent::Ignored);
    }

    #[test]
    fn cursor_position_follows_focused_field() {
        let mut c = controller(&["ET", "ET"]);
        assert_eq!(c.cursor_position(), None);
        c.switch_focus(2).unwrap();
        assert_eq!(c.cursor_position(), Some((1, 0)));
    }
}
