//! Message assembly: bytes in, complete messages out.
//!
//! There is no end-of-message symbol on the wire. The boundary is inferred
//! purely from timing: once the silence after the last decoded byte
//! exceeds the idle gap, the buffer is finalized and emitted. The gap must
//! exceed the transmitter's inter-character delay (plus jitter) or
//! messages get split; [`crate::config::LinkConfig::validate`] enforces
//! that ordering.

use log::{debug, info};

use crate::config::LinkConfig;

/// Assembler activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No pending bytes.
    Idle,
    /// At least one byte buffered, idle timer running.
    Accumulating,
}

/// Accumulates decoded bytes and finalizes on the idle-gap boundary.
///
/// Owned exclusively by the receiver loop; [`tick`] is the only place a
/// message is emitted, and it emits at most once per boundary.
///
/// [`tick`]: MessageAssembler::tick
pub struct MessageAssembler {
    buf: Vec<u8>,
    state: AssemblerState,
    /// Timestamp of the most recent append (ms).
    last_byte_ms: u64,
    idle_gap_ms: u64,
    /// Raw bytes stripped from the front of every finalized message
    /// (sentinel-byte workaround, normally 0).
    leading_padding: usize,
}

impl MessageAssembler {
    pub fn new(cfg: &LinkConfig) -> Self {
        Self {
            buf: Vec::new(),
            state: AssemblerState::Idle,
            last_byte_ms: 0,
            idle_gap_ms: cfg.idle_gap_ms,
            leading_padding: cfg.leading_padding_bytes,
        }
    }

    #[inline]
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Bytes currently buffered (padding not yet stripped).
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Append one successfully decoded byte and reset the idle timer.
    pub fn on_byte_decoded(&mut self, byte: u8, now_ms: u64) {
        self.buf.push(byte);
        self.last_byte_ms = now_ms;
        self.state = AssemblerState::Accumulating;
        debug!(
            "byte {byte:#04x} ({}), {} buffered",
            render_byte(byte),
            self.buf.len()
        );
    }

    /// Check the idle-gap boundary.
    ///
    /// Returns the finalized message when the silence since the last
    /// append has reached the gap threshold; the buffer is cleared and
    /// the state returns to [`AssemblerState::Idle`]. Otherwise `None`.
    pub fn tick(&mut self, now_ms: u64) -> Option<String> {
        if self.state != AssemblerState::Accumulating {
            return None;
        }
        if now_ms.saturating_sub(self.last_byte_ms) < self.idle_gap_ms {
            return None;
        }

        let stripped = self.buf.len().min(self.leading_padding);
        let text: String = self.buf[stripped..].iter().map(|&b| render_byte(b)).collect();
        info!("message complete ({} bytes): {text:?}", self.buf.len());

        self.buf.clear();
        self.state = AssemblerState::Idle;
        Some(text)
    }

    /// Drop any partial message (e.g. on recalibration).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = AssemblerState::Idle;
    }
}

/// Printable ASCII renders as itself, everything else as a `[xx]` hex
/// placeholder.
fn render_byte(byte: u8) -> String {
    if (0x20..0x7f).contains(&byte) {
        char::from(byte).to_string()
    } else {
        format!("[{byte:02x}]")
    }
}
