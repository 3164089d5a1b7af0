//! # LifiLink
//!
//! Minimal visible-light communication link: a transmitter toggles a light
//! source on/off to encode bytes, a receiver samples intensity through an
//! ADC and decodes them.
//!
//! ## Architecture
//!
//! All protocol logic is pure and host-testable. Hardware access goes
//! through three narrow traits ([`hal::LightSensor`], [`hal::LightEmitter`],
//! [`hal::Clock`]); the [`hal::sim`] module provides a deterministic
//! recorded-waveform implementation used by the tests and the demo binary.
//!
//! Receiver pipeline:
//!
//! ```text
//! calibrate ──▶ bit (classify + majority vote) ──▶ sync ──▶ frame ──▶ assembler
//! ```
//!
//! Transmitter pipeline:
//!
//! ```text
//! control (inbound) ──▶ link ──▶ frame (encode) ──▶ bit (emit) ──▶ emitter
//! ```
//!
//! Both ends share one [`config::LinkConfig`]; a link only works when the
//! timing constants match on both sides.

pub mod assembler;
pub mod bit;
pub mod calibrate;
pub mod config;
pub mod control;
pub mod error;
pub mod frame;
pub mod hal;
pub mod link;
pub mod receiver;
pub mod sync;

pub use assembler::MessageAssembler;
pub use calibrate::CalibrationProfile;
pub use config::LinkConfig;
pub use control::{ControlEvents, ControlMailbox, Notifier};
pub use error::{CalibrationError, FrameError};
pub use link::LinkDriver;
pub use receiver::{Receiver, ReceiverState};
