//! Module: config
//!
//! Purpose: Link timing and protocol constants.
//!
//! Every constant that must agree on both ends of a link lives in one
//! [`LinkConfig`] value, injected into each component constructor. There is
//! no global configuration state.
//!
//! Defaults match the reference hardware deployment: 300 ms bit period,
//! 5 samples per bit, multi-second pacing gaps sized for a hand-aligned
//! laser/photodiode pair.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::FRAME_SYMBOLS;

/// Invalid [`LinkConfig`] field combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Majority vote needs an odd sample count to exclude ties.
    #[error("oversample factor {0} must be odd and non-zero")]
    EvenOversample(u32),

    /// Sub-bit scheduling needs at least 1 ms per sample.
    #[error("bit period {bit_period_ms} ms too short for {oversample} samples per bit")]
    BitPeriodTooShort { bit_period_ms: u64, oversample: u32 },

    /// A gap shorter than the inter-character delay would split every
    /// message at each character boundary.
    #[error("idle gap {idle_gap_ms} ms must exceed inter-character delay {inter_char_delay_ms} ms")]
    GapTooShort {
        idle_gap_ms: u64,
        inter_char_delay_ms: u64,
    },

    /// Start detection needs at least one debounce sample.
    #[error("start debounce count must be non-zero")]
    ZeroDebounce,
}

/// Timing and protocol constants shared by both ends of a link.
///
/// The receiver's sampling is derived from the same `bit_period_ms` the
/// transmitter holds each symbol for; clock drift up to roughly one
/// sample interval per bit is tolerated by the majority vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Duration of one transmitted symbol in milliseconds.
    pub bit_period_ms: u64,

    /// Readings taken per bit cell for majority-vote recovery. Must be odd.
    pub oversample: u32,

    /// Pause between consecutive bytes of a message (transmitter side).
    /// Omitted after the last byte.
    pub inter_char_delay_ms: u64,

    /// Pause after a complete message before the channel is considered
    /// idle again (transmitter side).
    pub inter_message_delay_ms: u64,

    /// Receiver-side silence threshold that finalizes a message. Must
    /// exceed `inter_char_delay_ms` plus worst-case jitter or messages
    /// will be split at character boundaries.
    pub idle_gap_ms: u64,

    /// Consecutive space samples required to accept a start bit.
    pub start_debounce: u32,

    /// How long one start-bit search scans before reporting "no
    /// transmission in progress".
    pub start_timeout_ms: u64,

    /// Delay after start detection, as a percentage of the bit period,
    /// that re-centers sampling in the middle of each bit cell. 75 (i.e.
    /// 3/4 of a bit) aligns the first data-bit read with the cell start.
    pub recenter_percent: u32,

    /// Mark symbols held on the line before the first start bit of a
    /// message. Gives the receiver a clean mark-to-space edge even when
    /// the emitter idled dark, which is the root cause of first-byte
    /// loss on the reference hardware.
    pub preamble_mark_bits: u32,

    /// Raw bytes stripped from the front of every assembled message.
    /// Models the historical sentinel-byte workaround for first-byte
    /// loss; 0 when the link relies on the preamble/re-centering fix.
    pub leading_padding_bytes: usize,

    /// Minimum |light - dark| separation for a usable calibration.
    pub min_contrast: i32,

    /// Readings averaged per calibration level.
    pub calibration_samples: u32,

    /// Spacing between calibration readings.
    pub calibration_sample_gap_ms: u64,

    /// Settling time after forcing the source on/off during manual
    /// calibration (operator repositioning margin).
    pub calibration_settle_ms: u64,

    /// Auto-calibration: how long to wait for the peer to raise the
    /// light level before falling back to an estimated contrast.
    pub peer_wait_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bit_period_ms: 300,
            oversample: 5,
            inter_char_delay_ms: 7_000,
            inter_message_delay_ms: 10_000,
            idle_gap_ms: 8_000,
            start_debounce: 2,
            start_timeout_ms: 3_000,
            recenter_percent: 75,
            preamble_mark_bits: 1,
            leading_padding_bytes: 0,
            min_contrast: 500,
            calibration_samples: 50,
            calibration_sample_gap_ms: 50,
            calibration_settle_ms: 3_000,
            peer_wait_ms: 10_000,
        }
    }
}

impl LinkConfig {
    /// Spacing between oversampled readings within one bit cell.
    #[inline]
    pub fn sample_interval_ms(&self) -> u64 {
        (self.bit_period_ms / u64::from(self.oversample)).max(1)
    }

    /// Start-bit search cadence: a quarter of the bit period.
    #[inline]
    pub fn scan_interval_ms(&self) -> u64 {
        (self.bit_period_ms / 4).max(1)
    }

    /// Delay applied after start detection to re-center bit sampling.
    #[inline]
    pub fn recenter_delay_ms(&self) -> u64 {
        self.bit_period_ms * u64::from(self.recenter_percent) / 100
    }

    /// Nominal duration of one frame (start + 8 data + stop symbols).
    #[inline]
    pub fn frame_duration_ms(&self) -> u64 {
        self.bit_period_ms * u64::from(FRAME_SYMBOLS)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oversample == 0 || self.oversample % 2 == 0 {
            return Err(ConfigError::EvenOversample(self.oversample));
        }
        if self.bit_period_ms < u64::from(self.oversample) {
            return Err(ConfigError::BitPeriodTooShort {
                bit_period_ms: self.bit_period_ms,
                oversample: self.oversample,
            });
        }
        if self.idle_gap_ms <= self.inter_char_delay_ms {
            return Err(ConfigError::GapTooShort {
                idle_gap_ms: self.idle_gap_ms,
                inter_char_delay_ms: self.inter_char_delay_ms,
            });
        }
        if self.start_debounce == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        Ok(())
    }
}
