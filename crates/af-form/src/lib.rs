//! # af-form — Multi-region form engine for ansiform
//!
//! A BBS full-screen editor is a stack of screen regions, each painted from
//! themed art whose MCI markers say where the interactive fields go:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ From: sysop                  │  header          form 0
//! │ To:   [________]             │
//! ├──────────────────────────────┤
//! │ [message body ............]  │  body            form 1
//! ├──────────────────────────────┤
//! │ Save  Abort  Quote  Help     │  footerEditMenu  form 3
//! └──────────────────────────────┘
//! ```
//!
//! # Architecture
//!
//! ```text
//! editor.rs        FullScreenEditor — entry sequence, mode machine
//!     │               │
//!     │ paint         │ bind
//!     ▼               ▼
//! AssetRenderer   loader.rs: ConfigLoader → RegionController
//! (af-art)            │
//!                     ▼
//!                 controller.rs: fields + focus per region
//!                     │
//!                     ▼
//!                 field.rs: Field widgets
//! ```
//!
//! Everything above the transport is single-threaded per session. Steps
//! that depend on each other are awaited in order, never fanned out.

pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod field;
pub mod loader;
pub mod mode;
pub mod region;

#[cfg(test)]
mod testing;

pub use config::ThemeConfig;
pub use controller::{ControllerEvent, RegionController, Submission};
pub use editor::{
    Dispatch, EditorOptions, FullScreenEditor, IdentityProvider, RedrawOptions, SessionState,
};
pub use error::{BindError, ConfigError, EditorError, FocusError, LoadError};
pub use field::{Field, FieldId, FieldKind, FieldSpec, KeyOutcome, TextField};
pub use loader::{ConfigLoader, LoadRequest, MenuConfig, MenuConfigLoader, MenuContext};
pub use mode::EditorMode;
pub use region::{FormId, Layout, Region, footer_row};
