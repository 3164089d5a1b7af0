//! Photometric calibration: derive the light/dark decision threshold.
//!
//! Two variants share the averaging core:
//!
//! - [`calibrate_manual`]: this node owns the light source. Force it off,
//!   average N readings, force it on, average N readings. Fails hard on
//!   insufficient contrast.
//! - [`calibrate_auto`]: receiver side, the peer owns the source. Average
//!   the ambient (dark) level, then wait a bounded window for the peer to
//!   shift the level by at least the contrast minimum. If no shift is
//!   seen, continue with an estimated light level, flagged degraded.

use log::{info, warn};

use crate::config::LinkConfig;
use crate::error::CalibrationError;
use crate::hal::{Clock, LightEmitter, LightSensor};

/// Result of a calibration run. Immutable once built; re-run calibration
/// to replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationProfile {
    /// Mean raw reading with the source dark.
    pub dark_level: i32,
    /// Mean raw reading under illumination.
    pub light_level: i32,
    /// Classification midpoint: `(dark + light) / 2`.
    pub threshold: i32,
    /// Illumination reads *below* threshold (photodiode wiring polarity).
    pub inverted: bool,
    /// Readings averaged per level.
    pub sample_count: u32,
    /// Light level was estimated, not measured (auto variant, no peer).
    pub degraded: bool,
}

impl CalibrationProfile {
    /// Measured separation between the two levels.
    #[inline]
    pub fn contrast(&self) -> i32 {
        (self.light_level - self.dark_level).abs()
    }

    fn from_levels(dark: i32, light: i32, sample_count: u32, degraded: bool) -> Self {
        Self {
            dark_level: dark,
            light_level: light,
            threshold: (dark + light) / 2,
            inverted: light < dark,
            sample_count,
            degraded,
        }
    }
}

/// Average `count` readings spaced `gap_ms` apart.
fn average_level(
    sensor: &mut impl LightSensor,
    clock: &mut impl Clock,
    count: u32,
    gap_ms: u64,
) -> i32 {
    let mut sum: i64 = 0;
    for _ in 0..count {
        sum += i64::from(sensor.read_raw());
        clock.sleep_ms(gap_ms);
    }
    (sum / i64::from(count.max(1))) as i32
}

/// Calibrate with local control of the light source (transmitter side, or
/// a bench rig where both elements share a node).
///
/// Drives the source off and on around the two averaging passes and
/// leaves it off afterwards. `InsufficientContrast` is fatal: the caller
/// must not proceed to reception until an operator fixes alignment.
pub fn calibrate_manual(
    sensor: &mut impl LightSensor,
    emitter: &mut impl LightEmitter,
    clock: &mut impl Clock,
    cfg: &LinkConfig,
) -> Result<CalibrationProfile, CalibrationError> {
    info!("calibrating: source off, measuring dark level");
    emitter.set_on(false);
    clock.sleep_ms(cfg.calibration_settle_ms);
    let dark = average_level(
        sensor,
        clock,
        cfg.calibration_samples,
        cfg.calibration_sample_gap_ms,
    );

    info!("calibrating: source on, measuring light level");
    emitter.set_on(true);
    clock.sleep_ms(cfg.calibration_settle_ms);
    let light = average_level(
        sensor,
        clock,
        cfg.calibration_samples,
        cfg.calibration_sample_gap_ms,
    );
    emitter.set_on(false);

    let profile = CalibrationProfile::from_levels(dark, light, cfg.calibration_samples, false);
    if profile.contrast() < cfg.min_contrast {
        return Err(CalibrationError::InsufficientContrast {
            dark,
            light,
            min: cfg.min_contrast,
        });
    }

    log_profile(&profile);
    Ok(profile)
}

/// Calibrate against a cooperating peer that raises the light level out
/// of band (receiver side).
///
/// Never fails: if the peer does not shift the level within
/// `cfg.peer_wait_ms`, the light level is estimated as
/// `dark + min_contrast` and the profile is flagged [`degraded`]
/// so the operator can see reception is running on a guess.
///
/// [`degraded`]: CalibrationProfile::degraded
pub fn calibrate_auto(
    sensor: &mut impl LightSensor,
    clock: &mut impl Clock,
    cfg: &LinkConfig,
) -> CalibrationProfile {
    info!("calibrating: measuring ambient (dark) level");
    let dark = average_level(
        sensor,
        clock,
        cfg.calibration_samples,
        cfg.calibration_sample_gap_ms,
    );

    info!("calibrating: waiting for peer illumination");
    let deadline = clock.now_ms() + cfg.peer_wait_ms;
    while clock.now_ms() < deadline {
        let raw = i32::from(sensor.read_raw());
        if (raw - dark).abs() >= cfg.min_contrast {
            let light = average_level(
                sensor,
                clock,
                cfg.calibration_samples,
                cfg.calibration_sample_gap_ms,
            );
            let profile = CalibrationProfile::from_levels(dark, light, cfg.calibration_samples, false);
            log_profile(&profile);
            return profile;
        }
        clock.sleep_ms(cfg.calibration_sample_gap_ms);
    }

    warn!(
        "no peer illumination within {} ms, estimating light level (degraded)",
        cfg.peer_wait_ms
    );
    let profile = CalibrationProfile::from_levels(
        dark,
        dark + cfg.min_contrast,
        cfg.calibration_samples,
        true,
    );
    log_profile(&profile);
    profile
}

fn log_profile(p: &CalibrationProfile) {
    info!(
        "calibrated: dark {}, light {}, threshold {}, contrast {}, polarity {}{}",
        p.dark_level,
        p.light_level,
        p.threshold,
        p.contrast(),
        if p.inverted { "inverted" } else { "normal" },
        if p.degraded { " (degraded)" } else { "" },
    );
}
