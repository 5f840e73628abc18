//! # af-art — Themed art assets for ansiform
//!
//! A BBS screen region is drawn from a piece of text art (ANSI or plain)
//! that the sysop designs. Wherever an interactive or dynamic element
//! belongs, the art carries an MCI code such as `%ET2` or `%TL1`.
//!
//! # Architecture
//!
//! ```text
//! ArtLibrary (name -> art text)
//!     │
//!     ▼
//! mci.rs:          find %XXn markers, blank them, measure columns
//!     │
//!     ▼
//! placeholder.rs:  PlaceholderMap (index 1..N -> row/col/width)
//!     │
//!     ▼
//! renderer.rs:     AssetRenderer paints into an OutputBuffer and
//!                  returns { placeholder map, height }
//! ```
//!
//! The form engine only depends on the [`AssetRenderer`] contract.
//! [`ThemeRenderer`] is the reference implementation over an in-memory
//! [`ArtLibrary`].

pub mod asset;
pub mod error;
pub mod mci;
pub mod placeholder;
pub mod renderer;

pub use asset::ArtLibrary;
pub use error::RenderError;
pub use placeholder::{Placeholder, PlaceholderMap};
pub use renderer::{AssetRenderer, RenderOptions, RenderedArt, ThemeRenderer};
