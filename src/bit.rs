//! Bit channel: raw readings to binary symbols and back.
//!
//! `true` is "mark" (light), `false` is "space" (dark). Reception is
//! oversampled: K readings per bit cell, combined by majority vote, so a
//! single noise spike near the threshold is outvoted. Emission holds the
//! physical level for exactly one bit period, which is what paces the
//! transmitter.

use crate::calibrate::CalibrationProfile;
use crate::config::LinkConfig;
use crate::hal::{Clock, LightEmitter, LightSensor};

/// Classify one instantaneous reading against the calibrated threshold.
///
/// Mark iff the reading is on the illuminated side of the threshold,
/// which is *below* it when the wiring polarity is inverted.
#[inline]
pub fn classify(raw: u16, profile: &CalibrationProfile) -> bool {
    let raw = i32::from(raw);
    if profile.inverted {
        raw < profile.threshold
    } else {
        raw > profile.threshold
    }
}

/// Recover one bit by majority vote over `cfg.oversample` readings spaced
/// `bit_period / oversample` apart.
///
/// With an odd sample count a tie is impossible; flipping up to
/// `floor(K/2)` samples cannot change the outcome.
pub fn read_bit(
    sensor: &mut impl LightSensor,
    clock: &mut impl Clock,
    profile: &CalibrationProfile,
    cfg: &LinkConfig,
) -> bool {
    let mut marks: u32 = 0;
    for _ in 0..cfg.oversample {
        if classify(sensor.read_raw(), profile) {
            marks += 1;
        }
        clock.sleep_ms(cfg.sample_interval_ms());
    }
    marks * 2 > cfg.oversample
}

/// Drive one symbol: set the emitter to mark/space and hold one bit
/// period before returning.
pub fn emit_bit(emitter: &mut impl LightEmitter, clock: &mut impl Clock, cfg: &LinkConfig, bit: bool) {
    emitter.set_on(bit);
    clock.sleep_ms(cfg.bit_period_ms);
}
