//! Wireless control-channel boundary.
//!
//! The short-range radio (BLE GATT server or similar) is an external
//! collaborator. It talks to the link through two narrow capabilities:
//!
//! - [`ControlEvents`], implemented here by [`ControlMailbox`]: the
//!   adapter's callbacks for connection changes and inbound message
//!   strings.
//! - [`Notifier`], implemented by the host adapter: decoded messages and
//!   status strings going out to listeners.
//!
//! The mailbox is the *only* cell shared between the adapter's callback
//! context and the main loop. The main loop consumes the inbound slot
//! with a take-once discipline; on a single-threaded node the mutex never
//! contends, and on a threaded host it is the one synchronized boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::warn;

/// Callbacks invoked by the host wireless adapter.
pub trait ControlEvents {
    /// A central connected to or disconnected from the control channel.
    fn on_connection_changed(&self, connected: bool);

    /// A message string arrived to be transmitted over the light link.
    fn on_inbound_message(&self, message: String);
}

/// Outbound notifications to control-channel listeners.
pub trait Notifier {
    /// Deliver a fully decoded message.
    fn notify_message(&mut self, text: &str);

    /// Deliver a status line ("ready", "calibration complete",
    /// "frame error", "transmission complete", ...).
    fn notify_status(&mut self, status: &str);
}

/// [`Notifier`] that only logs; for nodes without a control channel.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_message(&mut self, text: &str) {
        log::info!("message: {text}");
    }

    fn notify_status(&mut self, status: &str) {
        log::info!("status: {status}");
    }
}

/// Shared cell between the wireless callback and the main loop.
///
/// Holds at most one pending inbound message; a second arrival before the
/// first is consumed replaces it with a warning (the control channel is
/// not a queue — the light link is orders of magnitude slower than the
/// radio).
#[derive(Default)]
pub struct ControlMailbox {
    connected: AtomicBool,
    inbound: Mutex<Option<String>>,
}

impl ControlMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection flag, written only by the callback, read by the loop.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Take the pending inbound message, clearing the slot.
    pub fn take_inbound(&self) -> Option<String> {
        self.lock_inbound().take()
    }

    /// Poisoning is recovered, not propagated: an `Option<String>` slot
    /// cannot be observed torn.
    fn lock_inbound(&self) -> MutexGuard<'_, Option<String>> {
        self.inbound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ControlEvents for ControlMailbox {
    fn on_connection_changed(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    fn on_inbound_message(&self, message: String) {
        let mut slot = self.lock_inbound();
        if let Some(dropped) = slot.replace(message) {
            warn!("inbound message replaced before transmission: {dropped:?}");
        }
    }
}
