//! Frame codec tests

use lifi_link::bit::emit_bit;
use lifi_link::calibrate::CalibrationProfile;
use lifi_link::frame::{decode_frame, encode_frame};
use lifi_link::hal::sim::{SimBus, DEFAULT_DARK_RAW, DEFAULT_LIGHT_RAW};
use lifi_link::sync::await_start;
use lifi_link::LinkConfig;

fn profile() -> CalibrationProfile {
    CalibrationProfile {
        dark_level: 200,
        light_level: 1200,
        threshold: 700,
        inverted: false,
        sample_count: 50,
        degraded: false,
    }
}

#[test]
fn test_roundtrip_all_byte_values() {
    let cfg = LinkConfig::default();
    let p = profile();

    for byte in 0..=255u8 {
        let bus = SimBus::new();
        bus.set_idle_light(true);
        encode_frame(&mut bus.emitter(), &mut bus.clock(), &cfg, byte);

        let (mut clock, mut sensor) = bus.replay();
        assert!(
            await_start(&mut sensor, &mut clock, &p, &cfg, cfg.start_timeout_ms),
            "start bit not found for byte {byte:#04x}"
        );
        let decoded = decode_frame(&mut sensor, &mut clock, &p, &cfg);
        assert_eq!(decoded, Ok(byte));
    }
}

#[test]
fn test_data_bits_are_lsb_first() {
    let cfg = LinkConfig::default();
    let bus = SimBus::new();
    bus.set_idle_light(true);
    encode_frame(&mut bus.emitter(), &mut bus.clock(), &cfg, 0x01);

    let transitions = bus.transitions();
    // Start bit is space, then bit 0 of 0x01 — the very first data
    // symbol — is mark.
    assert_eq!(transitions[0], (0, DEFAULT_DARK_RAW));
    assert_eq!(transitions[1], (300, DEFAULT_LIGHT_RAW));
    // Bit 1 is space again.
    assert_eq!(transitions[2], (600, DEFAULT_DARK_RAW));
}

#[test]
fn test_frame_occupies_ten_bit_periods() {
    let cfg = LinkConfig::default();
    let bus = SimBus::new();
    let mut clock = bus.clock();
    encode_frame(&mut bus.emitter(), &mut clock, &cfg, b'A');
    use lifi_link::frame::FRAME_SYMBOLS;
    use lifi_link::hal::Clock;
    assert_eq!(clock.now_ms(), cfg.frame_duration_ms());
    assert_eq!(
        cfg.frame_duration_ms(),
        cfg.bit_period_ms * u64::from(FRAME_SYMBOLS)
    );
}

#[test]
fn test_bad_stop_bit_discards_byte() {
    let cfg = LinkConfig::default();
    let p = profile();
    let bus = SimBus::new();
    bus.set_idle_light(true);

    // Hand-rolled corrupt frame: valid start and data, space where the
    // stop mark belongs.
    {
        let mut emitter = bus.emitter();
        let mut clock = bus.clock();
        emit_bit(&mut emitter, &mut clock, &cfg, false); // start
        for i in 0..8 {
            emit_bit(&mut emitter, &mut clock, &cfg, (0xa5 >> i) & 1 == 1);
        }
        emit_bit(&mut emitter, &mut clock, &cfg, false); // corrupt stop
    }

    let (mut clock, mut sensor) = bus.replay();
    assert!(await_start(&mut sensor, &mut clock, &p, &cfg, cfg.start_timeout_ms));
    let err = decode_frame(&mut sensor, &mut clock, &p, &cfg).expect_err("stop bit is space");
    assert_eq!(err.byte, 0xa5);
}

#[test]
fn test_decode_survives_minority_sample_noise() {
    let cfg = LinkConfig::default();
    let p = profile();
    let bus = SimBus::new();
    bus.set_idle_light(true);
    encode_frame(&mut bus.emitter(), &mut bus.clock(), &cfg, b'K');

    let (mut clock, mut sensor) = bus.replay();
    assert!(await_start(&mut sensor, &mut clock, &p, &cfg, cfg.start_timeout_ms));
    // Two flipped readings inside each of the first two data bits.
    // The start search consumed reads 0 and 1; data bit 0 spans reads
    // 2..=6, data bit 1 spans 7..=11.
    sensor.flip_reads([2, 3, 7, 8]);
    assert_eq!(decode_frame(&mut sensor, &mut clock, &p, &cfg), Ok(b'K'));
}
