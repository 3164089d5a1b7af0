//! Link configuration tests

use lifi_link::config::{ConfigError, LinkConfig};

#[test]
fn test_default_config_is_valid() {
    let cfg = LinkConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.bit_period_ms, 300);
    assert_eq!(cfg.oversample, 5);
}

#[test]
fn test_derived_intervals() {
    let cfg = LinkConfig::default();
    assert_eq!(cfg.sample_interval_ms(), 60);
    assert_eq!(cfg.scan_interval_ms(), 75);
    assert_eq!(cfg.recenter_delay_ms(), 225);
    assert_eq!(cfg.frame_duration_ms(), 3_000);
}

#[test]
fn test_even_oversample_rejected() {
    let mut cfg = LinkConfig::default();
    cfg.oversample = 4;
    assert_eq!(cfg.validate(), Err(ConfigError::EvenOversample(4)));

    cfg.oversample = 0;
    assert_eq!(cfg.validate(), Err(ConfigError::EvenOversample(0)));
}

#[test]
fn test_gap_must_exceed_inter_char_delay() {
    let mut cfg = LinkConfig::default();
    cfg.idle_gap_ms = cfg.inter_char_delay_ms;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::GapTooShort { .. })
    ));
}

#[test]
fn test_bit_period_must_fit_oversampling() {
    let mut cfg = LinkConfig::default();
    cfg.bit_period_ms = 3;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::BitPeriodTooShort { .. })
    ));
}

#[test]
fn test_zero_debounce_rejected() {
    let mut cfg = LinkConfig::default();
    cfg.start_debounce = 0;
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroDebounce));
}

#[test]
fn test_serde_roundtrip() {
    let mut cfg = LinkConfig::default();
    cfg.bit_period_ms = 100;
    cfg.leading_padding_bytes = 1;

    let json = serde_json::to_string(&cfg).expect("serializes");
    let back: LinkConfig = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back, cfg);
}

#[test]
fn test_partial_json_uses_defaults() {
    let cfg: LinkConfig = serde_json::from_str(r#"{"bit_period_ms": 150}"#).expect("partial ok");
    assert_eq!(cfg.bit_period_ms, 150);
    assert_eq!(cfg.oversample, LinkConfig::default().oversample);
}
