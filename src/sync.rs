//! Start-bit search: find the leading space edge of a frame.
//!
//! The channel idles at mark. The search samples at a quarter of the bit
//! period and requires `start_debounce` consecutive space classifications
//! before accepting a start bit, so a one-sample dip does not trigger a
//! decode attempt. On acceptance it sleeps `recenter_delay_ms` (3/4 of a
//! bit by default) so that subsequent oversampled reads land centered in
//! each data-bit cell. Getting this alignment right is what prevents the
//! first byte of a message from being lost.

use crate::bit::classify;
use crate::calibrate::CalibrationProfile;
use crate::config::LinkConfig;
use crate::hal::{Clock, LightSensor};

/// Scan for a start bit for at most `timeout_ms`.
///
/// Returns `true` with the read cursor re-centered on the first data bit,
/// or `false` when the window elapses without a qualifying space run.
/// `false` means "no transmission currently in progress" and is the
/// normal idle outcome, not an error.
pub fn await_start(
    sensor: &mut impl LightSensor,
    clock: &mut impl Clock,
    profile: &CalibrationProfile,
    cfg: &LinkConfig,
    timeout_ms: u64,
) -> bool {
    let deadline = clock.now_ms() + timeout_ms;
    let mut space_run: u32 = 0;

    while clock.now_ms() < deadline {
        if classify(sensor.read_raw(), profile) {
            space_run = 0;
        } else {
            space_run += 1;
            if space_run >= cfg.start_debounce {
                // Inside the start bit now; skip ahead to the middle of
                // the first data-bit cell.
                clock.sleep_ms(cfg.recenter_delay_ms());
                return true;
            }
        }
        clock.sleep_ms(cfg.scan_interval_ms());
    }
    false
}
