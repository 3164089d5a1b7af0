//! Transmitter link driver: paced, blocking message emission.
//!
//! Transmission owns the medium exclusively for its duration; there is no
//! cancellation mid-frame. Pacing per message:
//!
//! ```text
//! [mark preamble][frame]--inter-char--[frame]--inter-char--[frame]--inter-message--
//! ```
//!
//! The inter-character delay is inserted *between* bytes, not after the
//! last one; the inter-message delay follows the whole message before the
//! channel counts as idle again. The line is left at mark between frames
//! (the stop bit already leaves it there), so the receiver always sees a
//! clean mark-to-space edge at the next start bit.

use log::{debug, info};

use crate::bit::emit_bit;
use crate::config::LinkConfig;
use crate::control::{ControlMailbox, Notifier};
use crate::frame::encode_frame;
use crate::hal::{Clock, LightEmitter};

/// Drives the physical emitter with framed, paced message transmissions.
pub struct LinkDriver<E, C, N> {
    emitter: E,
    clock: C,
    notifier: N,
    cfg: LinkConfig,
}

impl<E: LightEmitter, C: Clock, N: Notifier> LinkDriver<E, C, N> {
    pub fn new(emitter: E, clock: C, notifier: N, cfg: LinkConfig) -> Self {
        Self {
            emitter,
            clock,
            notifier,
            cfg,
        }
    }

    /// Transmit one message, blocking until the inter-message delay has
    /// elapsed and the channel is idle again.
    pub fn transmit(&mut self, message: &str) {
        info!("transmitting {:?} ({} bytes)", message, message.len());

        // Idle-mark preamble: guarantees the start bit is a real
        // mark-to-space transition even from a cold (dark) line.
        for _ in 0..self.cfg.preamble_mark_bits {
            emit_bit(&mut self.emitter, &mut self.clock, &self.cfg, true);
        }

        let bytes = message.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            debug!("sending byte {byte:#04x}");
            encode_frame(&mut self.emitter, &mut self.clock, &self.cfg, byte);
            if i + 1 < bytes.len() {
                self.clock.sleep_ms(self.cfg.inter_char_delay_ms);
            }
        }

        self.clock.sleep_ms(self.cfg.inter_message_delay_ms);
        info!("transmission complete");
        self.notifier.notify_status("transmission complete");
    }

    /// Consume one queued inbound message from the control mailbox, if
    /// any, and transmit it. Returns whether a transmission happened.
    pub fn service(&mut self, mailbox: &ControlMailbox) -> bool {
        match mailbox.take_inbound() {
            Some(message) => {
                self.transmit(&message);
                true
            }
            None => false,
        }
    }
}
