//! Frame codec: one byte as a 10-symbol frame.
//!
//! ```text
//! [start = space][d0][d1][d2][d3][d4][d5][d6][d7][stop = mark]
//! ```
//!
//! Data bits are LSB-first: symbol i carries bit position i. A frame is
//! valid iff the observed stop symbol is mark; anything else is a framing
//! error and the byte is discarded. There are no retries and no
//! acknowledgment at this layer — reliability is best-effort per byte.

use log::trace;

use crate::bit::{emit_bit, read_bit};
use crate::calibrate::CalibrationProfile;
use crate::config::LinkConfig;
use crate::error::FrameError;
use crate::hal::{Clock, LightEmitter, LightSensor};

/// Symbols per frame: start + 8 data + stop.
pub const FRAME_SYMBOLS: u32 = 10;

/// Decode the 9 symbols following an already-consumed start bit.
///
/// The caller must have aligned the read cursor via
/// [`crate::sync::await_start`]. On a bad stop bit the assembled byte is
/// returned inside [`FrameError`] for diagnostics; the caller discards it
/// and resynchronizes with a fresh start search — no attempt is made to
/// salvage or re-read the frame.
pub fn decode_frame(
    sensor: &mut impl LightSensor,
    clock: &mut impl Clock,
    profile: &CalibrationProfile,
    cfg: &LinkConfig,
) -> Result<u8, FrameError> {
    let mut byte: u8 = 0;
    for i in 0..8 {
        if read_bit(sensor, clock, profile, cfg) {
            byte |= 1 << i;
        }
    }

    let stop = read_bit(sensor, clock, profile, cfg);
    trace!("frame decoded: byte {byte:#04x}, stop {}", u8::from(stop));
    if stop {
        Ok(byte)
    } else {
        Err(FrameError { byte })
    }
}

/// Emit one byte as a full frame: start space, 8 data bits LSB-first,
/// stop mark. Blocks for 10 bit periods.
pub fn encode_frame(
    emitter: &mut impl LightEmitter,
    clock: &mut impl Clock,
    cfg: &LinkConfig,
    byte: u8,
) {
    emit_bit(emitter, clock, cfg, false);
    for i in 0..8 {
        emit_bit(emitter, clock, cfg, (byte >> i) & 1 == 1);
    }
    emit_bit(emitter, clock, cfg, true);
}
