//! The full-screen editor — composes regions into one session screen and
//! runs the view / edit / edit-menu mode machine.
//!
//! # Entry
//!
//! [`enter_session`](FullScreenEditor::enter_session) runs a fixed sequence,
//! each step awaited before the next:
//!
//! 1. clear the screen
//! 2. paint the header, then the body (the body's row depends on the
//!    header's painted height)
//! 3. paint the current mode's footer
//! 4. bind header, body and footer through the config loader
//! 5. seed header field 1 with the session identity and make it read-only
//! 6. disable the body and focus header field 2
//!
//! The first failure stops the sequence, marks the editor failed and is
//! returned to the owner. A half-painted screen is left as is.
//!
//! # Transitions
//!
//! [`dispatch_submit`](FullScreenEditor::dispatch_submit) is the one place
//! focus moves between regions:
//!
//! ```text
//!   header complete ──► body field 1
//!
//!            escape (body)
//!   Edit ─────────────────────► EditMenu
//!        ◄─────────────────────
//!            escape (menu)
//!
//!   View: escape does nothing
//! ```
//!
//! An escape only counts when it comes from the region that owns focus in
//! the current mode. Anything else is ignored.
//!
//! A mode switch renders the new footer and binds it (first use only),
//! then sends footer art, fields and cursor in a single write. Mode, focus
//! and footer state are committed once that write succeeds. If the render,
//! the bind or the write fails, they are exactly as they were.
//!
//! # Liveness
//!
//! Every await is followed by a check that the transport is still live.
//! When the owner tears the session down mid-sequence the editor returns
//! [`EditorError::SessionClosed`] without touching its state.

use std::collections::BTreeMap;
use std::sync::Arc;

use af_art::{AssetRenderer, PlaceholderMap, RenderOptions, RenderedArt};
use af_term::{KeyEvent, OutputBuffer, Transport, ansi};
use tracing::{debug, error, info, warn};

use crate::controller::{ControllerEvent, RegionController, Submission};
use crate::error::EditorError;
use crate::field::FieldId;
use crate::loader::{ConfigLoader, LoadRequest, MenuContext};
use crate::mode::EditorMode;
use crate::region::{FormId, Layout, Region};

/// Header field showing who is writing.
const HEADER_FROM: FieldId = 1;
/// Header field focused on entry.
const HEADER_FIRST_INPUT: FieldId = 2;
const BODY_FIRST: FieldId = 1;
const MENU_FIRST: FieldId = 1;

// ---------------------------------------------------------------------------
// Collaborators and options
// ---------------------------------------------------------------------------

/// Supplies the name seeded into the header's "from" field.
pub trait IdentityProvider: Send + Sync {
    fn display_name(&self) -> String;
}

impl IdentityProvider for String {
    fn display_name(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    /// Mode to start in.
    pub mode: EditorMode,
    /// Art variant to prefer.
    pub font: Option<String>,
    pub calling_menu: MenuContext,
    /// Art asset per region. Unlisted regions use the region's name.
    pub art: BTreeMap<Region, String>,
}

impl EditorOptions {
    fn asset(&self, region: Region) -> &str {
        self.art.get(&region).map_or(region.name(), String::as_str)
    }
}

/// Flags for [`FullScreenEditor::redraw_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawOptions {
    /// Replace the cached placeholder maps with the fresh paint's.
    pub init_mci: bool,
    /// Repaint every region's fields after the art.
    pub refresh_views: bool,
}

/// Where the editor is in its life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NotEntered,
    Active,
    /// Entry failed. The editor takes no further calls.
    Failed,
    Left,
}

/// What a key or submission led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing happened.
    Ignored,
    /// A region handled the key itself (typing, cursor movement, Tab).
    Handled,
    /// Focus moved to another region.
    FocusMoved(Region),
    /// The mode changed.
    ModeChanged(EditorMode),
    /// A footer item was chosen. The owner acts on it (save, abort...).
    MenuCommand(Submission),
}

/// A footer rendered and bound but not yet on screen.
struct StagedFooter {
    region: Region,
    frame: OutputBuffer,
    height: u16,
    placeholders: PlaceholderMap,
    fresh: Option<RegionController>,
}

/// What [`FullScreenEditor::install_footer`] replaced.
struct FooterUndo {
    region: Region,
    layout: Layout,
    visible_footer: Option<Region>,
    placeholders: Option<PlaceholderMap>,
    fresh: bool,
}

// ---------------------------------------------------------------------------
// FullScreenEditor
// ---------------------------------------------------------------------------

/// One session's editor screen.
pub struct FullScreenEditor {
    transport: Box<dyn Transport>,
    renderer: Arc<dyn AssetRenderer>,
    loader: Arc<dyn ConfigLoader>,
    identity: Arc<dyn IdentityProvider>,
    options: EditorOptions,

    mode: EditorMode,
    state: SessionState,
    /// Created on first use, kept for the session.
    controllers: BTreeMap<Region, RegionController>,
    /// Last painted placeholders per region, in screen coordinates.
    placeholders: BTreeMap<Region, PlaceholderMap>,
    layout: Layout,
    visible_footer: Option<Region>,
    observing_edits: bool,
    modified: bool,
}

impl FullScreenEditor {
    #[must_use]
    pub fn new(
        transport: Box<dyn Transport>,
        renderer: Arc<dyn AssetRenderer>,
        loader: Arc<dyn ConfigLoader>,
        identity: Arc<dyn IdentityProvider>,
        options: EditorOptions,
    ) -> Self {
        Self {
            transport,
            renderer,
            loader,
            identity,
            mode: options.mode,
            options,
            state: SessionState::NotEntered,
            controllers: BTreeMap::new(),
            placeholders: BTreeMap::new(),
            layout: Layout::default(),
            visible_footer: None,
            observing_edits: false,
            modified: false,
        }
    }

    // -- Queries ------------------------------------------------------------

    #[must_use]
    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// The footer on screen, once one has been painted.
    #[must_use]
    pub const fn visible_footer(&self) -> Option<Region> {
        self.visible_footer
    }

    /// The footer region for `mode`, or for the current mode.
    #[must_use]
    pub fn current_footer(&self, mode: Option<EditorMode>) -> Region {
        mode.unwrap_or(self.mode).footer()
    }

    /// Form id carried by submissions from `region`.
    #[must_use]
    pub const fn form_id_for(region: Region) -> FormId {
        region.form_id()
    }

    #[must_use]
    pub fn controller(&self, region: Region) -> Option<&RegionController> {
        self.controllers.get(&region)
    }

    pub fn controller_mut(&mut self, region: Region) -> Option<&mut RegionController> {
        self.controllers.get_mut(&region)
    }

    /// Cached placeholders of a painted region.
    #[must_use]
    pub fn placeholder_map(&self, region: Region) -> Option<&PlaceholderMap> {
        self.placeholders.get(&region)
    }

    /// The region whose controller holds focus.
    #[must_use]
    pub fn focused_region(&self) -> Option<Region> {
        self.controllers
            .iter()
            .find(|(_, c)| c.has_focus())
            .map(|(&region, _)| region)
    }

    /// Whether body content changed while edits were observed.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub const fn is_observing_edits(&self) -> bool {
        self.observing_edits
    }

    /// Start marking the editor modified when the body changes.
    pub fn observe_edit_events(&mut self) {
        self.observing_edits = true;
    }

    // -- Internals ----------------------------------------------------------

    fn ensure_live(&self) -> Result<(), EditorError> {
        if self.transport.is_live() {
            Ok(())
        } else {
            Err(EditorError::SessionClosed)
        }
    }

    const fn ensure_active(&self) -> Result<(), EditorError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::NotEntered => Err(EditorError::NotEntered),
            SessionState::Failed | SessionState::Left => Err(EditorError::Aborted),
        }
    }

    fn region_ref(&self, region: Region) -> Result<&RegionController, EditorError> {
        self.controllers
            .get(&region)
            .ok_or(EditorError::MissingRegion(region))
    }

    fn region_mut(&mut self, region: Region) -> Result<&mut RegionController, EditorError> {
        self.controllers
            .get_mut(&region)
            .ok_or(EditorError::MissingRegion(region))
    }

    async fn write(&mut self, out: &OutputBuffer) -> Result<(), EditorError> {
        self.ensure_live()?;
        self.transport.write(out.as_bytes()).await?;
        self.ensure_live()
    }

    async fn clear_screen(&mut self) -> Result<(), EditorError> {
        self.ensure_live()?;
        self.transport.clear_screen().await?;
        self.ensure_live()
    }

    /// Paint a region's art into a fresh buffer, starting at its row.
    ///
    /// Nothing reaches the transport and no state changes.
    async fn compose_region(
        &mut self,
        region: Region,
        clear: bool,
    ) -> Result<(OutputBuffer, RenderedArt, u16), EditorError> {
        let row = self.layout.row_of(region);
        let mut out = OutputBuffer::new();
        ansi::goto_row(&mut out, row)?;
        if clear {
            ansi::reset(&mut out)?;
            ansi::delete_lines(&mut out, self.layout.height_of(region))?;
        }

        let options = RenderOptions {
            font: self.options.font.clone(),
        };
        let art = self
            .renderer
            .render(self.options.asset(region), &options, &mut out)
            .await?;
        self.ensure_live()?;

        debug!(
            region = %region,
            row,
            height = art.height,
            placeholders = art.placeholder_map.len(),
            "painted region"
        );
        Ok((out, art, row))
    }

    /// Remember where a region landed and what it holds.
    fn record_paint(&mut self, region: Region, art: &RenderedArt, row: u16) -> PlaceholderMap {
        self.layout.record(region, art.height);
        if region.is_footer() {
            self.visible_footer = Some(region);
        }
        let map = art.placeholder_map.offset(row);
        self.placeholders.insert(region, map.clone());
        map
    }

    async fn load_controller(
        &mut self,
        region: Region,
        placeholders: &PlaceholderMap,
    ) -> Result<RegionController, EditorError> {
        let controller = self
            .loader
            .load(LoadRequest {
                form_id: region.form_id(),
                placeholders,
                calling_menu: &self.options.calling_menu,
            })
            .await?;
        self.ensure_live()?;
        debug!(region = %region, fields = controller.len(), "bound region");
        Ok(controller)
    }

    /// Append the regions' fields to `out` and park the cursor on the
    /// focused one. The cursor is hidden while the fields repaint.
    fn compose_fields(&self, out: &mut OutputBuffer, regions: &[Region]) -> Result<(), EditorError> {
        ansi::cursor_hide(out)?;
        for region in regions {
            if let Some(controller) = self.controllers.get(region) {
                controller.redraw_all(out)?;
            }
        }
        let cursor = self
            .focused_region()
            .and_then(|r| self.controllers.get(&r))
            .and_then(RegionController::cursor_position);
        if let Some((row, col)) = cursor {
            ansi::cursor_to(out, col, row)?;
        }
        ansi::cursor_show(out)?;
        Ok(())
    }

    /// Paint the regions' fields in one write.
    async fn paint_fields(&mut self, regions: &[Region]) -> Result<(), EditorError> {
        let mut out = OutputBuffer::new();
        self.compose_fields(&mut out, regions)?;
        self.write(&out).await
    }

    /// Which field each region had focused.
    fn focus_state(&self, regions: &[Region]) -> Vec<(Region, Option<FieldId>)> {
        regions
            .iter()
            .map(|&r| (r, self.controllers.get(&r).and_then(RegionController::focused)))
            .collect()
    }

    /// Put focus back the way [`focus_state`](Self::focus_state) saw it.
    fn restore_focus(&mut self, saved: &[(Region, Option<FieldId>)]) {
        for (region, focused) in saved {
            let Some(controller) = self.controllers.get_mut(region) else {
                continue;
            };
            controller.set_focus(false);
            let Some(id) = *focused else { continue };
            if let Err(err) = controller.switch_focus(id) {
                warn!(region = %region, error = %err, "could not restore focus");
            }
        }
    }

    // -- Painting -----------------------------------------------------------

    /// Paint one region's art at its row and return its placeholders in
    /// screen coordinates. `clear` deletes the lines the region covers
    /// first.
    pub async fn repaint_region(
        &mut self,
        region: Region,
        clear: bool,
    ) -> Result<PlaceholderMap, EditorError> {
        let (out, art, row) = self.compose_region(region, clear).await?;
        self.write(&out).await?;
        Ok(self.record_paint(region, &art, row))
    }

    /// Repaint header, body and the current footer from scratch.
    pub async fn redraw_all(&mut self, options: RedrawOptions) -> Result<(), EditorError> {
        self.ensure_active()?;
        self.clear_screen().await?;

        let footer = self.mode.footer();
        for region in [Region::Header, Region::Body, footer] {
            let (out, art, row) = self.compose_region(region, false).await?;
            self.write(&out).await?;
            if options.init_mci {
                self.record_paint(region, &art, row);
            } else {
                self.layout.record(region, art.height);
            }
        }
        self.visible_footer = Some(footer);

        if options.refresh_views {
            self.paint_fields(&[Region::Header, Region::Body, footer])
                .await?;
        }
        debug!(?options, "redrew screen");
        Ok(())
    }

    /// Repaint the current mode's footer, binding it on first use.
    pub async fn switch_footer(&mut self) -> Result<(), EditorError> {
        self.ensure_active()?;
        self.show_footer(self.mode).await
    }

    /// Render `mode`'s footer into a buffer and bind its controller if it
    /// has none yet. Nothing is written and no state changes. `focus` is a
    /// field the caller is about to focus and is checked here too.
    async fn stage_footer(
        &mut self,
        mode: EditorMode,
        focus: Option<FieldId>,
    ) -> Result<StagedFooter, EditorError> {
        let region = mode.footer();
        let (frame, art, row) = self.compose_region(region, true).await?;
        let placeholders = art.placeholder_map.offset(row);

        let fresh = if self.controllers.contains_key(&region) {
            None
        } else {
            Some(self.load_controller(region, &placeholders).await?)
        };
        if let Some(id) = focus {
            let controller = match &fresh {
                Some(controller) => controller,
                None => self.region_ref(region)?,
            };
            controller.check_focusable(id)?;
        }

        Ok(StagedFooter {
            region,
            frame,
            height: art.height,
            placeholders,
            fresh,
        })
    }

    /// Make a staged footer the current one. The returned undo puts the
    /// previous footer state back.
    fn install_footer(&mut self, staged: StagedFooter) -> (OutputBuffer, FooterUndo) {
        let region = staged.region;
        let undo = FooterUndo {
            region,
            layout: self.layout,
            visible_footer: self.visible_footer,
            placeholders: self.placeholders.get(&region).cloned(),
            fresh: staged.fresh.is_some(),
        };

        self.layout.record(region, staged.height);
        self.placeholders.insert(region, staged.placeholders);
        self.visible_footer = Some(region);
        if let Some(controller) = staged.fresh {
            self.controllers.insert(region, controller);
        }
        (staged.frame, undo)
    }

    fn rollback_footer(&mut self, undo: FooterUndo) {
        self.layout = undo.layout;
        self.visible_footer = undo.visible_footer;
        match undo.placeholders {
            Some(map) => {
                self.placeholders.insert(undo.region, map);
            }
            None => {
                self.placeholders.remove(&undo.region);
            }
        }
        if undo.fresh {
            self.controllers.remove(&undo.region);
        }
        debug!(footer = %undo.region, "footer change rolled back");
    }

    /// Paint `mode`'s footer and its fields in one write, binding the
    /// controller on first use.
    async fn show_footer(&mut self, mode: EditorMode) -> Result<(), EditorError> {
        let staged = self.stage_footer(mode, None).await?;
        let (mut frame, undo) = self.install_footer(staged);
        let footer = undo.region;
        let fresh = undo.fresh;

        let written = match self.compose_fields(&mut frame, &[footer]) {
            Ok(()) => self.write(&frame).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            self.rollback_footer(undo);
            return Err(err);
        }

        if fresh {
            debug!(footer = %footer, "footer bound");
        } else {
            debug!(footer = %footer, "footer redrawn");
        }
        Ok(())
    }

    // -- Session ------------------------------------------------------------

    /// Paint the screen, bind every region and give the header focus.
    pub async fn enter_session(&mut self) -> Result<(), EditorError> {
        if self.state != SessionState::NotEntered {
            return Err(EditorError::Aborted);
        }
        info!(mode = %self.mode, menu = %self.options.calling_menu.name, "entering editor");

        match self.run_entry().await {
            Ok(()) => {
                self.state = SessionState::Active;
                self.observing_edits = self.mode == EditorMode::Edit;
                info!(focus = ?self.focused_region(), "editor ready");
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Failed;
                error!(error = %err, "editor entry failed");
                Err(err)
            }
        }
    }

    async fn run_entry(&mut self) -> Result<(), EditorError> {
        self.clear_screen().await?;

        let mut maps = Vec::with_capacity(3);
        for region in [Region::Header, Region::Body] {
            maps.push((region, self.repaint_region(region, false).await?));
        }
        let footer = self.mode.footer();
        maps.push((footer, self.repaint_region(footer, false).await?));

        for (region, placeholders) in maps {
            let controller = self.load_controller(region, &placeholders).await?;
            self.controllers.insert(region, controller);
        }

        let identity = self.identity.display_name();
        let from = self.region_mut(Region::Header)?.get_field_mut(HEADER_FROM)?;
        from.set_text(&identity);
        from.set_accepts_focus(false);

        if !self.mode.is_editable() {
            self.region_mut(Region::Header)?.set_read_only(true);
            self.region_mut(Region::Body)?.set_read_only(true);
        }

        self.region_mut(Region::Body)?.set_focus(false);
        self.region_mut(Region::Header)?
            .switch_focus(HEADER_FIRST_INPUT)?;

        self.paint_fields(&[Region::Header, Region::Body, footer])
            .await
    }

    /// Reset attributes, park the cursor below the footer and finish.
    pub async fn leave(&mut self) -> Result<(), EditorError> {
        if self.state == SessionState::Left {
            return Err(EditorError::Aborted);
        }
        self.state = SessionState::Left;
        self.observing_edits = false;

        if self.transport.is_live() {
            let below = self
                .layout
                .row_of(self.mode.footer())
                .saturating_add(self.layout.footer);
            let mut out = OutputBuffer::new();
            ansi::reset(&mut out)?;
            self.transport.write(out.as_bytes()).await?;
            self.transport.goto_row_col(below, 0).await?;
        }
        info!(modified = self.modified, "left editor");
        Ok(())
    }

    // -- Input --------------------------------------------------------------

    /// Route a decoded key to the focused region.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<Dispatch, EditorError> {
        self.ensure_active()?;
        let Some(region) = self.focused_region() else {
            debug!(%key, "no focused region");
            return Ok(Dispatch::Ignored);
        };

        match self.region_mut(region)?.handle_key(&key) {
            ControllerEvent::Ignored => Ok(Dispatch::Ignored),
            ControllerEvent::Submitted(submission) => self.dispatch_submit(submission).await,
            ControllerEvent::Changed(_) => {
                if region == Region::Body && self.observing_edits {
                    self.modified = true;
                }
                self.paint_fields(&[region]).await?;
                Ok(Dispatch::Handled)
            }
            ControllerEvent::Consumed => {
                self.paint_fields(&[region]).await?;
                Ok(Dispatch::Handled)
            }
        }
    }

    /// Act on a completed form. Moves focus between regions and toggles
    /// the mode.
    pub async fn dispatch_submit(&mut self, submission: Submission) -> Result<Dispatch, EditorError> {
        self.ensure_active()?;
        let Some(region) = Region::from_form_id(submission.form_id) else {
            warn!(form_id = submission.form_id, "submission from unknown form");
            return Ok(Dispatch::Ignored);
        };
        debug!(
            region = %region,
            field_id = submission.field_id,
            key = %submission.key,
            "dispatching submission"
        );

        match region {
            Region::Header => self.leave_header().await,
            Region::Body | Region::FooterEditMenu if submission.is_escape() => {
                self.escape_from(region).await
            }
            Region::FooterEdit | Region::FooterEditMenu | Region::FooterView => {
                Ok(Dispatch::MenuCommand(submission))
            }
            Region::Body | Region::Help => Ok(Dispatch::Ignored),
        }
    }

    async fn leave_header(&mut self) -> Result<Dispatch, EditorError> {
        if !self.region_ref(Region::Header)?.has_focus() {
            warn!("header submission while header is not focused");
            return Ok(Dispatch::Ignored);
        }
        self.region_ref(Region::Body)?.check_focusable(BODY_FIRST)?;

        let saved = self.focus_state(&[Region::Header, Region::Body]);
        self.region_mut(Region::Header)?.set_focus(false);
        self.region_mut(Region::Body)?.switch_focus(BODY_FIRST)?;

        if let Err(err) = self.paint_fields(&[Region::Header, Region::Body]).await {
            self.restore_focus(&saved);
            return Err(err);
        }
        info!("focus moved to body");
        Ok(Dispatch::FocusMoved(Region::Body))
    }

    /// An escape toggles the mode only when it comes from the region that
    /// owns focus in the current mode.
    async fn escape_from(&mut self, region: Region) -> Result<Dispatch, EditorError> {
        let owner = match self.mode {
            EditorMode::Edit => Region::Body,
            EditorMode::EditMenu => Region::FooterEditMenu,
            EditorMode::View => {
                debug!(mode = %self.mode, "mode does not toggle");
                return Ok(Dispatch::Ignored);
            }
        };
        let focused = self
            .controllers
            .get(&region)
            .is_some_and(RegionController::has_focus);
        if region != owner || !focused {
            warn!(region = %region, mode = %self.mode, "escape from a region without focus");
            return Ok(Dispatch::Ignored);
        }
        self.toggle_mode().await
    }

    /// Swap footers and hand focus between the body and the edit menu.
    ///
    /// Footer art, fields and cursor go out in one write. Mode, focus and
    /// footer state change only once that write succeeds.
    async fn toggle_mode(&mut self) -> Result<Dispatch, EditorError> {
        let Some(next) = self.mode.toggled() else {
            debug!(mode = %self.mode, "mode does not toggle");
            return Ok(Dispatch::Ignored);
        };
        let (losing, gaining, field) = if next == EditorMode::EditMenu {
            (Region::Body, Region::FooterEditMenu, MENU_FIRST)
        } else {
            self.region_ref(Region::Body)?.check_focusable(BODY_FIRST)?;
            (Region::FooterEditMenu, Region::Body, BODY_FIRST)
        };

        let menu_focus = (gaining == Region::FooterEditMenu).then_some(field);
        let staged = self.stage_footer(next, menu_focus).await?;
        let saved = self.focus_state(&[losing, gaining]);
        let (mut frame, undo) = self.install_footer(staged);
        let shown = [Region::Body, undo.region];

        if let Err(err) = self.hand_focus(&mut frame, losing, gaining, field, &shown).await {
            self.restore_focus(&saved);
            self.rollback_footer(undo);
            return Err(err);
        }

        if next == EditorMode::Edit {
            self.observe_edit_events();
        } else {
            self.observing_edits = false;
        }
        info!(from = %self.mode, to = %next, "mode changed");
        self.mode = next;
        Ok(Dispatch::ModeChanged(next))
    }

    /// Move focus from `losing` to `gaining`, then write `frame` with the
    /// fields of the `shown` regions appended.
    async fn hand_focus(
        &mut self,
        frame: &mut OutputBuffer,
        losing: Region,
        gaining: Region,
        field: FieldId,
        shown: &[Region],
    ) -> Result<(), EditorError> {
        if let Some(controller) = self.controllers.get_mut(&losing) {
            controller.set_focus(false);
        }
        self.region_mut(gaining)?.switch_focus(field)?;
        self.compose_fields(frame, shown)?;
        self.write(frame).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
