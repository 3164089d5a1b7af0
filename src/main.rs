//! Loopback demo: transmit a message over the simulated optical channel
//! and decode it back.
//!
//! The simulator records the emitter's on/off waveform against a virtual
//! clock, then replays it for the receiver from t = 0, so the whole
//! multi-second exchange runs instantly. Run with `RUST_LOG=debug` for
//! the per-byte trail.

use lifi_link::calibrate::calibrate_manual;
use lifi_link::control::{ControlEvents, ControlMailbox, LogNotifier};
use lifi_link::hal::sim::SimBus;
use lifi_link::{LinkConfig, LinkDriver, Receiver};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = LinkConfig::default();
    if let Err(e) = cfg.validate() {
        eprintln!("bad link config: {e}");
        std::process::exit(1);
    }
    println!(
        "link config: {}",
        serde_json::to_string_pretty(&cfg).expect("config serializes")
    );

    // Bench calibration: emitter and sensor on one rig.
    let rig = SimBus::new();
    let profile = match calibrate_manual(&mut rig.sensor(), &mut rig.emitter(), &mut rig.clock(), &cfg)
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("calibration failed: {e}");
            std::process::exit(1);
        }
    };

    // Transmitter node: a "phone" injects a message via the control
    // mailbox, the link driver picks it up.
    let bus = SimBus::new();
    let mailbox = ControlMailbox::new();
    mailbox.on_connection_changed(true);
    mailbox.on_inbound_message("HELLO LIFI".to_string());

    let mut tx = LinkDriver::new(bus.emitter(), bus.clock(), LogNotifier, cfg);
    assert!(mailbox.is_connected());
    tx.service(&mailbox);

    // Receiver node: replay the recorded waveform from t = 0.
    let (rx_clock, rx_sensor) = bus.replay();
    let mut rx = Receiver::new(rx_sensor, rx_clock, LogNotifier, cfg);
    rx.set_profile(profile);

    for _ in 0..64 {
        if let Some(message) = rx.poll() {
            println!("decoded: {message:?}");
            return;
        }
    }
    eprintln!("no message decoded");
    std::process::exit(1);
}
