//! Deterministic simulated channel for tests and the demo binary.
//!
//! A transmitter records on/off transitions onto a shared waveform while a
//! virtual clock advances instantly on every sleep. The receiver then
//! replays the recorded waveform against its own fresh clock, so
//! end-to-end timing scenarios (multi-second pacing gaps included) run in
//! microseconds and are bit-for-bit reproducible.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::hal::{Clock, LightEmitter, LightSensor};

/// Default raw ADC reading with the emitter dark.
pub const DEFAULT_DARK_RAW: u16 = 200;

/// Default raw ADC reading under illumination.
pub const DEFAULT_LIGHT_RAW: u16 = 1200;

/// Virtual millisecond clock. Sleeps advance time instantly.
///
/// Clones share the same underlying counter, so an emitter and a sensor
/// handed clones of one `SimClock` stay in lockstep.
#[derive(Clone)]
pub struct SimClock {
    now_ms: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

/// Recorded optical waveform: raw level as a step function of time.
struct Waveform {
    /// `(timestamp_ms, raw_level)` transitions, timestamps non-decreasing.
    transitions: Vec<(u64, u16)>,
    /// Level before the first transition.
    idle_level: u16,
}

impl Waveform {
    fn level_at(&self, t_ms: u64) -> u16 {
        self.transitions
            .iter()
            .rev()
            .find(|(at, _)| *at <= t_ms)
            .map(|(_, level)| *level)
            .unwrap_or(self.idle_level)
    }
}

/// Shared simulated optical channel.
///
/// Produces emitter/sensor endpoints over one waveform. Typical test
/// shape: record a transmission with [`SimBus::emitter`] and the bus
/// clock, then decode it with a fresh clock via [`SimBus::replay`].
pub struct SimBus {
    wave: Arc<Mutex<Waveform>>,
    clock: SimClock,
    dark_raw: u16,
    light_raw: u16,
}

impl SimBus {
    /// Channel with the default 12-bit-ADC levels (dark 200, light 1200).
    pub fn new() -> Self {
        Self::with_levels(DEFAULT_DARK_RAW, DEFAULT_LIGHT_RAW)
    }

    /// Channel with explicit raw levels. `light_raw < dark_raw` simulates
    /// inverted photodiode wiring.
    pub fn with_levels(dark_raw: u16, light_raw: u16) -> Self {
        Self {
            wave: Arc::new(Mutex::new(Waveform {
                transitions: Vec::new(),
                idle_level: dark_raw,
            })),
            clock: SimClock::new(),
            dark_raw,
            light_raw,
        }
    }

    /// Level the line rests at before any emission (default: dark).
    pub fn set_idle_light(&self, lit: bool) {
        let mut wave = self.wave.lock().unwrap();
        wave.idle_level = if lit { self.light_raw } else { self.dark_raw };
    }

    /// The clock the recording side runs on.
    pub fn clock(&self) -> SimClock {
        self.clock.clone()
    }

    /// Emitter endpoint, stamping transitions with the bus clock.
    pub fn emitter(&self) -> SimEmitter {
        SimEmitter {
            wave: Arc::clone(&self.wave),
            clock: self.clock.clone(),
            dark_raw: self.dark_raw,
            light_raw: self.light_raw,
        }
    }

    /// Sensor endpoint on the bus clock (emitter and sensor in lockstep;
    /// used for same-node calibration).
    pub fn sensor(&self) -> SimSensor {
        self.sensor_on(self.clock.clone())
    }

    /// Fresh clock plus a sensor replaying the recorded waveform from
    /// t = 0. This is the receiving end of the link.
    pub fn replay(&self) -> (SimClock, SimSensor) {
        let clock = SimClock::new();
        let sensor = self.sensor_on(clock.clone());
        (clock, sensor)
    }

    /// Snapshot of the recorded `(timestamp_ms, raw_level)` transitions.
    pub fn transitions(&self) -> Vec<(u64, u16)> {
        self.wave.lock().unwrap().transitions.clone()
    }

    fn sensor_on(&self, clock: SimClock) -> SimSensor {
        SimSensor {
            wave: Arc::clone(&self.wave),
            clock,
            dark_raw: self.dark_raw,
            light_raw: self.light_raw,
            reads: 0,
            flipped: HashSet::new(),
        }
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

/// [`LightEmitter`] that records transitions onto the shared waveform.
pub struct SimEmitter {
    wave: Arc<Mutex<Waveform>>,
    clock: SimClock,
    dark_raw: u16,
    light_raw: u16,
}

impl LightEmitter for SimEmitter {
    fn set_on(&mut self, on: bool) {
        let level = if on { self.light_raw } else { self.dark_raw };
        let now = self.clock.now_ms();
        self.wave.lock().unwrap().transitions.push((now, level));
    }
}

/// [`LightSensor`] reading the shared waveform at its clock's current time.
///
/// Individual readings can be flipped to the opposite level to model
/// noise spikes (see [`SimSensor::flip_reads`]).
pub struct SimSensor {
    wave: Arc<Mutex<Waveform>>,
    clock: SimClock,
    dark_raw: u16,
    light_raw: u16,
    reads: u64,
    flipped: HashSet<u64>,
}

impl SimSensor {
    /// Flip the Nth upcoming readings (0-based over the sensor lifetime)
    /// to the opposite raw level.
    pub fn flip_reads(&mut self, indices: impl IntoIterator<Item = u64>) {
        self.flipped.extend(indices);
    }
}

impl LightSensor for SimSensor {
    fn read_raw(&mut self) -> u16 {
        let level = self.wave.lock().unwrap().level_at(self.clock.now_ms());
        let index = self.reads;
        self.reads += 1;
        if self.flipped.contains(&index) {
            // Mirror to the opposite nominal level.
            if level == self.light_raw {
                self.dark_raw
            } else {
                self.light_raw
            }
        } else {
            level
        }
    }
}

/// [`LightSensor`] that replays a fixed reading sequence, repeating the
/// last value once exhausted. For unit tests that drive classification
/// directly, without a waveform.
pub struct ScriptedSensor {
    readings: Vec<u16>,
    next: usize,
}

impl ScriptedSensor {
    pub fn new(readings: Vec<u16>) -> Self {
        Self { readings, next: 0 }
    }
}

impl LightSensor for ScriptedSensor {
    fn read_raw(&mut self) -> u16 {
        let i = self.next.min(self.readings.len().saturating_sub(1));
        if self.next < self.readings.len() {
            self.next += 1;
        }
        self.readings.get(i).copied().unwrap_or(0)
    }
}
