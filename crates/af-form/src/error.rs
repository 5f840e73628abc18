//! Error types for the form engine.
//!
//! Binding and focus errors are caller or configuration mistakes and are
//! returned synchronously. Render, load and transport failures come from
//! collaborators and abort the multi-step sequence they happen in.

use std::io;

use af_art::RenderError;

use crate::field::FieldId;
use crate::region::{FormId, Region};

/// Field specs don't fit the placeholder map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("form {form_id}: no placeholder {index} in the art")]
    UnknownPlaceholder { form_id: FormId, index: usize },

    #[error("form {form_id}: field id {id} is bound twice")]
    DuplicateFieldId { form_id: FormId, id: FieldId },
}

/// A focus request named a field that can't take focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("no field with id {0}")]
    NotFound(FieldId),

    #[error("field {0} does not accept focus")]
    NotFocusable(FieldId),
}

/// A config loader could not produce a bound controller.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The menu config overrides a field the art has no placeholder for.
    #[error("form {form_id}: config names field {id} but the art has no such placeholder")]
    UnknownField { form_id: FormId, id: FieldId },
}

/// Theme or menu config file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Art(#[from] RenderError),
}

/// Failures surfaced by the full-screen editor to the session owner.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Focus(#[from] FocusError),

    #[error("transport write failed: {0}")]
    Transport(#[from] io::Error),

    /// The transport was torn down while a sequence was suspended.
    #[error("session transport is closed")]
    SessionClosed,

    #[error("session has not been entered")]
    NotEntered,

    /// The editor failed to enter or has already been left.
    #[error("editor is no longer active")]
    Aborted,

    #[error("region {0} has no controller")]
    MissingRegion(Region),
}

impl EditorError {
    /// Whether this is a caller logic error rather than a collaborator
    /// (renderer, loader, transport) failure.
    ///
    /// Owners log expected errors at `warn` and the rest at `error`.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Focus(_)
                | Self::NotEntered
                | Self::Aborted
                | Self::MissingRegion(_)
                | Self::SessionClosed
        )
    }
}
