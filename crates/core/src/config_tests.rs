// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_match_reference_polling() {
    let config = TrackerConfig::default();
    assert_eq!(config.tick_interval, Duration::from_secs(1));
    assert_eq!(config.force_every, 3);
    assert_eq!(config.completion_delay, Duration::from_millis(600));
    assert!(config.validate().is_ok());
}

#[test]
fn load_fills_missing_keys_with_defaults() {
    let file = write_config("tick_interval = \"250ms\"\nmax_ticks = 10\n");
    let config = TrackerConfig::load(file.path()).unwrap();

    assert_eq!(config.tick_interval, Duration::from_millis(250));
    assert_eq!(config.max_ticks, 10);
    assert_eq!(config.force_every, 3);
    assert_eq!(config.completion_delay, Duration::from_millis(600));
}

#[test]
fn load_rejects_unknown_keys() {
    let file = write_config("tick_intervall = \"1s\"\n");
    let err = TrackerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)), "got {:?}", err);
}

#[test]
fn load_rejects_zero_force_every() {
    let file = write_config("force_every = 0\n");
    let err = TrackerConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("force_every"), "got {}", err);
}

#[test]
fn load_reports_missing_file() {
    let err = TrackerConfig::load(Path::new("/nonexistent/hcitrack.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read(..)));
}

#[test]
fn validate_rejects_zero_interval() {
    let config = TrackerConfig::default().with_tick_interval(Duration::ZERO);
    assert!(config.validate().is_err());
}
