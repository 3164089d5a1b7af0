//! Message assembly and idle-gap boundary tests

use lifi_link::assembler::{AssemblerState, MessageAssembler};
use lifi_link::LinkConfig;

#[test]
fn test_initial_state_is_idle() {
    let asm = MessageAssembler::new(&LinkConfig::default());
    assert_eq!(asm.state(), AssemblerState::Idle);
    assert_eq!(asm.pending(), 0);
}

#[test]
fn test_tick_with_empty_buffer_never_emits() {
    let mut asm = MessageAssembler::new(&LinkConfig::default());
    assert_eq!(asm.tick(0), None);
    assert_eq!(asm.tick(1_000_000), None);
}

#[test]
fn test_idle_gap_emits_exactly_once() {
    let cfg = LinkConfig::default(); // 8 s gap
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(b'H', 1_000);
    asm.on_byte_decoded(b'I', 2_000);
    assert_eq!(asm.state(), AssemblerState::Accumulating);

    // One millisecond short of the gap: nothing yet.
    assert_eq!(asm.tick(9_999), None);

    // Gap reached: both bytes, one emission.
    assert_eq!(asm.tick(10_000), Some("HI".to_string()));
    assert_eq!(asm.state(), AssemblerState::Idle);
    assert_eq!(asm.pending(), 0);

    // And never a second one.
    assert_eq!(asm.tick(10_001), None);
    assert_eq!(asm.tick(60_000), None);
}

#[test]
fn test_append_resets_idle_timer() {
    let cfg = LinkConfig::default();
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(b'A', 0);
    assert_eq!(asm.tick(7_999), None);

    // New byte just before the boundary pushes it out.
    asm.on_byte_decoded(b'B', 7_999);
    assert_eq!(asm.tick(15_000), None);
    assert_eq!(asm.tick(15_999), Some("AB".to_string()));
}

#[test]
fn test_leading_padding_is_stripped() {
    let mut cfg = LinkConfig::default();
    cfg.leading_padding_bytes = 1;
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(b'#', 0);
    asm.on_byte_decoded(b'H', 100);
    asm.on_byte_decoded(b'I', 200);

    assert_eq!(asm.tick(200 + cfg.idle_gap_ms), Some("HI".to_string()));
}

#[test]
fn test_padding_larger_than_buffer_yields_empty_message() {
    let mut cfg = LinkConfig::default();
    cfg.leading_padding_bytes = 2;
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(b'#', 0);
    assert_eq!(asm.tick(cfg.idle_gap_ms), Some(String::new()));
    assert_eq!(asm.state(), AssemblerState::Idle);
}

#[test]
fn test_non_printable_bytes_render_as_hex() {
    let cfg = LinkConfig::default();
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(0x02, 0);
    asm.on_byte_decoded(b'O', 10);
    asm.on_byte_decoded(b'K', 20);
    asm.on_byte_decoded(0x7f, 30);

    assert_eq!(
        asm.tick(30 + cfg.idle_gap_ms),
        Some("[02]OK[7f]".to_string())
    );
}

#[test]
fn test_reset_drops_partial_message() {
    let cfg = LinkConfig::default();
    let mut asm = MessageAssembler::new(&cfg);

    asm.on_byte_decoded(b'X', 0);
    asm.reset();
    assert_eq!(asm.state(), AssemblerState::Idle);
    assert_eq!(asm.tick(cfg.idle_gap_ms), None);
}
