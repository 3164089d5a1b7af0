//! Hardware boundary: light sensor, light emitter, clock.
//!
//! The protocol layers never touch hardware directly; they are generic over
//! these three traits. An embedded port implements them over its ADC, GPIO
//! and delay primitives; hosts and tests use the [`sim`] implementations.

pub mod sim;

use std::time::{Duration, Instant};

/// Analog light-intensity input (e.g. a photodiode behind a 12-bit ADC).
///
/// Readings are raw device units; their meaning is established by
/// calibration, including the polarity of "light" (some wirings read
/// lower voltage under illumination).
pub trait LightSensor {
    /// Take one instantaneous reading.
    fn read_raw(&mut self) -> u16;
}

/// Binary on/off drive of a light-emitting element.
pub trait LightEmitter {
    /// Drive the element: `true` = emitting (mark), `false` = dark (space).
    fn set_on(&mut self, on: bool);
}

/// Time source and blocking delay.
///
/// All protocol waiting is plain timed blocking through this trait; there
/// is no event loop. `now_ms` must be monotonic.
pub trait Clock {
    /// Monotonic milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall-time [`Clock`] over `std::time` for real hosts.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
