//! Errors raised while loading or painting art.

use std::io;
use std::path::PathBuf;

/// An asset could not be painted.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No art is registered under this name (for the requested font or
    /// without one).
    #[error("art asset `{name}` not found")]
    MissingAsset { name: String },

    /// Reading an art file from disk failed.
    #[error("failed to read art file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Encoding into the output buffer failed.
    #[error("failed to encode art: {0}")]
    Encode(#[from] io::Error),
}

impl RenderError {
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingAsset { name: name.into() }
    }
}
