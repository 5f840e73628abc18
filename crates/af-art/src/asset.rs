//! Art library — named art assets, optionally per font.
//!
//! Assets are registered under a name (`"header"`, `"msg_body"`, ...).
//! A font-specific variant is registered as `"{font}/{name}"` and wins over
//! the plain name when that font is requested. Lookups are pure, so a
//! given asset + font always resolves to the same art.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::RenderError;

/// In-memory collection of art assets.
#[derive(Debug, Clone, Default)]
pub struct ArtLibrary {
    assets: HashMap<String, String>,
}

impl ArtLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an asset.
    pub fn insert(&mut self, name: impl Into<String>, art: impl Into<String>) {
        self.assets.insert(name.into(), art.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, art: impl Into<String>) -> Self {
        self.insert(name, art);
        self
    }

    /// Read an art file from disk and register it under `name`.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected;
    /// plenty of art in the wild mixes encodings.
    pub fn load_file(&mut self, name: impl Into<String>, path: &Path) -> Result<(), RenderError> {
        let bytes = fs::read(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = name.into();
        debug!(asset = %name, path = %path.display(), bytes = bytes.len(), "loaded art");
        self.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        Ok(())
    }

    /// Number of registered assets (font variants count separately).
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Resolve an asset, preferring the font-specific variant.
    #[must_use]
    pub fn resolve(&self, name: &str, font: Option<&str>) -> Option<&str> {
        font.and_then(|f| self.assets.get(&format!("{f}/{name}")))
            .or_else(|| self.assets.get(name))
            .map(String::as_str)
    }
}
