//! Protocol fault taxonomy.
//!
//! Every fault here is handled locally at the layer that detects it; none
//! of them terminates the control loop. A failed start-bit search is not an
//! error at all (see [`crate::sync::await_start`]): it is the normal idle
//! condition and is reported as `false`, not as a variant here.

use thiserror::Error;

/// Calibration could not produce a usable threshold.
///
/// Fatal for manual calibration: the caller must halt reception (enter
/// `AwaitingCalibration`) until an operator fixes alignment. The auto
/// variant never returns this; it degrades instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalibrationError {
    /// Dark and light levels are too close to classify reliably.
    #[error("insufficient contrast: dark {dark}, light {light}, need at least {min}")]
    InsufficientContrast { dark: i32, light: i32, min: i32 },
}

/// A decoded frame failed its stop-bit check.
///
/// The byte is discarded, never retried (the symbols are gone), and the
/// receiver resynchronizes with a fresh start-bit search. Carries the
/// discarded byte for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad stop bit, discarding byte {byte:#04x}")]
pub struct FrameError {
    /// The byte assembled before the stop-bit check failed.
    pub byte: u8,
}
