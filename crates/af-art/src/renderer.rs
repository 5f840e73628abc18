//! The asset renderer contract and its reference implementation.
//!
//! The form engine asks a renderer to paint a named asset. The renderer
//! writes the art's bytes into an [`OutputBuffer`] (the engine decides when
//! those bytes reach the session) and answers with the art's
//! [`PlaceholderMap`] and height.
//!
//! Rendering must be deterministic for a given asset + font and must number
//! placeholders contiguously from 1 in source order. It is position-agnostic:
//! the art is painted from wherever the cursor is, line by line, and the
//! placeholder rows are relative to the first painted line.

use af_term::output::OutputBuffer;
use async_trait::async_trait;
use tracing::debug;

use crate::asset::ArtLibrary;
use crate::error::RenderError;
use crate::mci;
use crate::placeholder::PlaceholderMap;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Options for one render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Font / art variant to prefer.
    pub font: Option<String>,
}

impl RenderOptions {
    #[must_use]
    pub fn with_font(font: impl Into<String>) -> Self {
        Self {
            font: Some(font.into()),
        }
    }
}

/// What a render produced, besides the bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedArt {
    /// Placeholders found in the art, region-relative.
    pub placeholder_map: PlaceholderMap,
    /// Rows the art occupies.
    pub height: u16,
}

/// Paints named art assets.
#[async_trait]
pub trait AssetRenderer: Send + Sync {
    /// Paint `asset` into `out`.
    async fn render(
        &self,
        asset: &str,
        options: &RenderOptions,
        out: &mut OutputBuffer,
    ) -> Result<RenderedArt, RenderError>;
}

// ---------------------------------------------------------------------------
// ThemeRenderer
// ---------------------------------------------------------------------------

/// Renders assets from an [`ArtLibrary`].
///
/// Lines are separated by CR LF so the client returns to column 0 whatever
/// its newline mode. No trailing line break is written after the last
/// line, so painting a footer on the bottom row never scrolls the screen.
#[derive(Debug, Clone, Default)]
pub struct ThemeRenderer {
    library: ArtLibrary,
}

impl ThemeRenderer {
    #[must_use]
    pub const fn new(library: ArtLibrary) -> Self {
        Self { library }
    }

    #[must_use]
    pub const fn library(&self) -> &ArtLibrary {
        &self.library
    }
}

#[async_trait]
impl AssetRenderer for ThemeRenderer {
    async fn render(
        &self,
        asset: &str,
        options: &RenderOptions,
        out: &mut OutputBuffer,
    ) -> Result<RenderedArt, RenderError> {
        let art = self
            .library
            .resolve(asset, options.font.as_deref())
            .ok_or_else(|| RenderError::missing(asset))?;

        let scanned = mci::scan(art);
        for (i, line) in scanned.lines.iter().enumerate() {
            if i > 0 {
                out.push_str("\r\n");
            }
            out.push_str(line);
        }

        debug!(
            asset,
            font = options.font.as_deref().unwrap_or("-"),
            height = scanned.height(),
            placeholders = scanned.placeholders.len(),
            "rendered art"
        );

        Ok(RenderedArt {
            height: scanned.height(),
            placeholder_map: scanned.placeholders,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
