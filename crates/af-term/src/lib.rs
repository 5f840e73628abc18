// SPDX-License-Identifier: MIT
//
// af-term — Terminal transport layer for ansiform.
//
// Everything the form engine needs to talk to a caller's screen: the
// byte-level ANSI encoding of cursor, clear and attribute commands, an
// in-memory output buffer so a whole region can be composed before it is
// sent, the async `Transport` contract a session's byte stream fulfils,
// and the already-decoded key events that arrive from the other side.
//
// This crate never reads raw bytes. Decoding keystrokes is the transport
// owner's job; we only define the shape a decoded key takes.

pub mod ansi;
pub mod attr;
pub mod input;
pub mod output;
pub mod transport;

pub use attr::Attr;
pub use input::{KeyCode, KeyEvent, Modifiers};
pub use output::OutputBuffer;
pub use transport::{MemoryTransport, StdoutTransport, Transport};
