//! Recording collaborators and a ready-made editor for tests.

use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use af_art::{ArtLibrary, AssetRenderer, RenderError, RenderOptions, RenderedArt, ThemeRenderer};
use af_term::{MemoryTransport, OutputBuffer, Transport};
use async_trait::async_trait;

use crate::controller::RegionController;
use crate::editor::{EditorOptions, FullScreenEditor};
use crate::error::LoadError;
use crate::loader::{ConfigLoader, LoadRequest, MenuConfig, MenuConfigLoader, MenuContext};
use crate::mode::EditorMode;
use crate::region::FormId;

/// Header: a label and two edits, 3 rows.
pub const HEADER_ART: &str = "From: %TL1\nTo:   %ET2\nSubj: %ET3\n";
/// Edit footer: 4 labels on one row.
pub const FOOTER_EDIT_ART: &str = "Ln %TL1 Col %TL2 Ins %TL3 Esc %TL4\n";
/// Edit menu footer: 4 items on one row.
pub const FOOTER_MENU_ART: &str = "%HM1 %HM2 %HM3 %HM4\n";
pub const FOOTER_VIEW_ART: &str = "Esc to quit %HM1\n";

/// Body: one multi-line field over 10 rows.
pub fn body_art() -> String {
    format!("%MT1\n{}", "|\n".repeat(9))
}

pub fn library() -> ArtLibrary {
    ArtLibrary::new()
        .with("header", HEADER_ART)
        .with("body", body_art())
        .with("footerEdit", FOOTER_EDIT_ART)
        .with("footerEditMenu", FOOTER_MENU_ART)
        .with("footerView", FOOTER_VIEW_ART)
}

/// Overrides giving the body field its full size.
pub fn menu_config() -> MenuConfig {
    serde_yaml::from_str("1:\n  fields:\n    1: { width: 60, height: 10 }\n").unwrap()
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// A [`ThemeRenderer`] that records every call and can be told to fail.
pub struct RecordingRenderer {
    inner: ThemeRenderer,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    close_on: Mutex<Option<(String, MemoryTransport)>>,
}

impl RecordingRenderer {
    pub fn new(library: ArtLibrary) -> Self {
        Self {
            inner: ThemeRenderer::new(library),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            close_on: Mutex::new(None),
        }
    }

    /// Assets rendered, in call order.
    pub fn order(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn renders(&self, asset: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|a| *a == asset).count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn fail(&self, asset: &str) {
        self.failing.lock().unwrap().insert(asset.to_string());
    }

    pub fn heal(&self, asset: &str) {
        self.failing.lock().unwrap().remove(asset);
    }

    /// Tear the session down while `asset` is being rendered.
    pub fn close_on(&self, asset: &str, transport: MemoryTransport) {
        *self.close_on.lock().unwrap() = Some((asset.to_string(), transport));
    }
}

#[async_trait]
impl AssetRenderer for RecordingRenderer {
    async fn render(
        &self,
        asset: &str,
        options: &RenderOptions,
        out: &mut OutputBuffer,
    ) -> Result<RenderedArt, RenderError> {
        self.calls.lock().unwrap().push(asset.to_string());
        if self.failing.lock().unwrap().contains(asset) {
            return Err(RenderError::missing(asset));
        }
        let closing = self
            .close_on
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(name, _)| name == asset)
            .map(|(_, transport)| transport.clone());
        if let Some(transport) = closing {
            transport.close();
        }
        self.inner.render(asset, options, out).await
    }
}

// ---------------------------------------------------------------------------
// RecordingLoader
// ---------------------------------------------------------------------------

/// A [`MenuConfigLoader`] that records every call and can be told to fail.
pub struct RecordingLoader {
    inner: MenuConfigLoader,
    calls: Mutex<Vec<FormId>>,
    bound: Mutex<Vec<FormId>>,
    failing: Mutex<HashSet<FormId>>,
}

impl RecordingLoader {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            inner: MenuConfigLoader::new(config),
            calls: Mutex::new(Vec::new()),
            bound: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Form ids loads were attempted for, in call order.
    pub fn order(&self) -> Vec<FormId> {
        self.calls.lock().unwrap().clone()
    }

    /// Successful binds of `form_id`.
    pub fn binds(&self, form_id: FormId) -> usize {
        self.bound.lock().unwrap().iter().filter(|&&f| f == form_id).count()
    }

    /// Successful binds of any form.
    pub fn total(&self) -> usize {
        self.bound.lock().unwrap().len()
    }

    pub fn fail(&self, form_id: FormId) {
        self.failing.lock().unwrap().insert(form_id);
    }
}

#[async_trait]
impl ConfigLoader for RecordingLoader {
    async fn load(&self, request: LoadRequest<'_>) -> Result<RegionController, LoadError> {
        self.calls.lock().unwrap().push(request.form_id);
        if self.failing.lock().unwrap().contains(&request.form_id) {
            return Err(LoadError::UnknownField {
                form_id: request.form_id,
                id: 99,
            });
        }
        let controller = self.inner.load(request).await?;
        self.bound.lock().unwrap().push(request.form_id);
        Ok(controller)
    }
}

// ---------------------------------------------------------------------------
// FlakyTransport
// ---------------------------------------------------------------------------

/// A [`MemoryTransport`] whose writes can be made to fail while the session
/// still reports itself live.
struct FlakyTransport {
    inner: MemoryTransport,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::ErrorKind::ConnectionReset.into());
        }
        self.inner.write(bytes).await
    }

    fn is_live(&self) -> bool {
        self.inner.is_live()
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub editor: FullScreenEditor,
    pub transport: MemoryTransport,
    pub renderer: Arc<RecordingRenderer>,
    pub loader: Arc<RecordingLoader>,
    write_errors: Arc<AtomicBool>,
}

impl Fixture {
    /// Make every transport write fail (or succeed again) without closing
    /// the session.
    pub fn fail_writes(&self, failing: bool) {
        self.write_errors.store(failing, Ordering::SeqCst);
    }
}

/// An editor over the stock art, not yet entered. The identity is "sysop".
pub fn fixture(mode: EditorMode) -> Fixture {
    let transport = MemoryTransport::new();
    let renderer = Arc::new(RecordingRenderer::new(library()));
    let loader = Arc::new(RecordingLoader::new(menu_config()));
    let write_errors = Arc::new(AtomicBool::new(false));
    let editor = FullScreenEditor::new(
        Box::new(FlakyTransport {
            inner: transport.clone(),
            failing: write_errors.clone(),
        }),
        renderer.clone(),
        loader.clone(),
        Arc::new("sysop".to_string()),
        EditorOptions {
            mode,
            calling_menu: MenuContext::new("message_post"),
            ..EditorOptions::default()
        },
    );
    Fixture {
        editor,
        transport,
        renderer,
        loader,
        write_errors,
    }
}

/// [`fixture`], entered.
pub async fn entered(mode: EditorMode) -> Fixture {
    let mut f = fixture(mode);
    f.editor.enter_session().await.unwrap();
    f
}
