// SPDX-License-Identifier: MIT
//
// Session transport — where painted bytes go.
//
// A BBS session's byte stream might be a telnet socket, an SSH channel, a
// websocket bridge or a local terminal. The form engine doesn't care: it
// needs to push bytes, position the cursor, clear the screen and delete
// lines, and it needs to know whether the other end is still there.
//
// Writes are fire-and-forget from the engine's point of view. There is no
// backpressure signal; an error means the session is gone, and `is_live`
// reports it from then on so that continuations resuming after an await
// can bail out before touching state.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::ansi;
use crate::output::OutputBuffer;

// ─── Transport Trait ────────────────────────────────────────────────────────

/// The raw byte sink of one user session.
///
/// Only [`write`](Transport::write) is required. The cursor and clearing
/// primitives are encoded through [`ansi`] and sent as a single write.
#[async_trait]
pub trait Transport: Send {
    /// Send bytes to the client.
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Whether the session on the other end is still connected.
    fn is_live(&self) -> bool {
        true
    }

    /// Move the client's cursor to a 0-indexed `(row, col)`.
    async fn goto_row_col(&mut self, row: u16, col: u16) -> io::Result<()> {
        let mut out = OutputBuffer::new();
        ansi::cursor_to(&mut out, col, row)?;
        self.write(out.as_bytes()).await
    }

    /// Reset attributes, clear the whole screen and home the cursor.
    async fn clear_screen(&mut self) -> io::Result<()> {
        let mut out = OutputBuffer::new();
        ansi::reset_screen(&mut out)?;
        self.write(out.as_bytes()).await
    }

    /// Delete `n` lines at the cursor row.
    async fn delete_lines(&mut self, n: u16) -> io::Result<()> {
        let mut out = OutputBuffer::new();
        ansi::delete_lines(&mut out, n)?;
        self.write(out.as_bytes()).await
    }
}

// ─── StdoutTransport ────────────────────────────────────────────────────────

/// Transport backed by the process's stdout, for local sessions.
pub struct StdoutTransport {
    out: tokio::io::Stdout,
    live: bool,
}

impl StdoutTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
            live: true,
        }
    }
}

impl Default for StdoutTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdoutTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.live {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        let result = async {
            self.out.write_all(bytes).await?;
            self.out.flush().await
        }
        .await;
        if result.is_err() {
            self.live = false;
        }
        result
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

// ─── MemoryTransport ────────────────────────────────────────────────────────

#[derive(Debug)]
struct MemoryState {
    bytes: Vec<u8>,
    writes: usize,
    live: bool,
}

/// In-memory transport. Clones share the same byte log, so a caller can
/// hand one clone to an editor and inspect the other.
///
/// Used for embedding (capturing a screen for a preview) and in tests.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                bytes: Vec::new(),
                writes: 0,
                live: true,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().bytes.clone()
    }

    /// Everything written so far, as (lossy) UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock().bytes).into_owned()
    }

    /// Number of successful `write` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Forget captured output (the write counter keeps counting).
    pub fn clear(&self) {
        self.lock().bytes.clear();
    }

    /// Simulate the client disconnecting. Later writes fail.
    pub fn close(&self) {
        self.lock().live = false;
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        if !state.live {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        state.bytes.extend_from_slice(bytes);
        state.writes += 1;
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.lock().live
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
