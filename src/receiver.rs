//! Receiver control loop.
//!
//! One cooperative loop alternates between the start-bit search, frame
//! decoding and the assembler's idle-gap tick. Every protocol fault is
//! absorbed here: a missed start search is normal idle, a framing error
//! is logged and reported but never retried, and a fatal calibration
//! failure parks the receiver in [`ReceiverState::AwaitingCalibration`]
//! instead of terminating, so an operator can re-run calibration and
//! recover.

use log::warn;

use crate::assembler::MessageAssembler;
use crate::calibrate::{self, CalibrationProfile};
use crate::config::LinkConfig;
use crate::control::Notifier;
use crate::frame::decode_frame;
use crate::hal::{Clock, LightSensor};
use crate::sync::await_start;

/// Receiver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// No valid calibration profile; reception is halted.
    AwaitingCalibration,
    /// Calibrated and decoding.
    Listening,
}

/// Receiver node: sensor + clock + assembler behind one poll loop.
pub struct Receiver<S, C, N> {
    sensor: S,
    clock: C,
    notifier: N,
    cfg: LinkConfig,
    profile: Option<CalibrationProfile>,
    assembler: MessageAssembler,
}

impl<S: LightSensor, C: Clock, N: Notifier> Receiver<S, C, N> {
    /// A receiver starts uncalibrated and will not decode until a
    /// profile is installed or [`calibrate_auto`] succeeds.
    ///
    /// [`calibrate_auto`]: Receiver::calibrate_auto
    pub fn new(sensor: S, clock: C, notifier: N, cfg: LinkConfig) -> Self {
        let assembler = MessageAssembler::new(&cfg);
        Self {
            sensor,
            clock,
            notifier,
            cfg,
            profile: None,
            assembler,
        }
    }

    pub fn state(&self) -> ReceiverState {
        if self.profile.is_some() {
            ReceiverState::Listening
        } else {
            ReceiverState::AwaitingCalibration
        }
    }

    pub fn profile(&self) -> Option<&CalibrationProfile> {
        self.profile.as_ref()
    }

    /// Install an externally produced profile (e.g. from
    /// [`calibrate::calibrate_manual`] on a bench rig).
    pub fn set_profile(&mut self, profile: CalibrationProfile) {
        self.profile = Some(profile);
        self.assembler.reset();
        self.notifier.notify_status("calibration complete");
        self.notifier.notify_status("ready");
    }

    /// Run auto calibration against a cooperating peer and start
    /// listening. Degrades (never fails) when no peer is seen.
    pub fn calibrate_auto(&mut self) -> CalibrationProfile {
        let profile = calibrate::calibrate_auto(&mut self.sensor, &mut self.clock, &self.cfg);
        self.set_profile(profile);
        profile
    }

    /// Drop the current profile and halt reception until recalibrated.
    pub fn invalidate_calibration(&mut self) {
        self.profile = None;
        self.assembler.reset();
        self.notifier.notify_status("awaiting recalibration");
    }

    /// One loop iteration: search for a start bit, decode at most one
    /// frame, then run the idle-gap check.
    ///
    /// Returns the finalized message when this iteration crossed the
    /// idle-gap boundary (the same text is also delivered through the
    /// notifier). Uncalibrated receivers return `None` without touching
    /// the channel.
    pub fn poll(&mut self) -> Option<String> {
        let profile = match self.profile {
            Some(p) => p,
            None => return None,
        };

        if await_start(
            &mut self.sensor,
            &mut self.clock,
            &profile,
            &self.cfg,
            self.cfg.start_timeout_ms,
        ) {
            match decode_frame(&mut self.sensor, &mut self.clock, &profile, &self.cfg) {
                Ok(byte) => {
                    let now = self.clock.now_ms();
                    self.assembler.on_byte_decoded(byte, now);
                }
                Err(e) => {
                    warn!("{e}");
                    self.notifier.notify_status("frame error");
                }
            }
        }

        let now = self.clock.now_ms();
        let finalized = self.assembler.tick(now);
        if let Some(text) = &finalized {
            self.notifier.notify_message(text);
        }
        finalized
    }
}
