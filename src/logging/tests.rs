// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel, create_log_file};

#[test]
fn test_log_level_directives() {
    let directives: Vec<_> = (0..=6)
        .filter_map(|level| LogLevel::new(level).ok())
        .map(LogLevel::directive)
        .collect();
    insta::assert_debug_snapshot!(directives, @r#"
    [
        "off",
        "error",
        "warn",
        "warn,git_tasks=info",
        "warn,git_tasks=debug",
        "warn,git_tasks=trace",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(u8::from(LogLevel::INFO), 3);
    assert_eq!(LogLevel::default(), LogLevel::WARN);
}

#[test]
fn test_log_config_defaults_keep_console_quiet() {
    let config = LogConfig::builder().build();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
}

#[test]
fn test_log_level_serde_round_trips_through_u8() {
    let ok: LogLevel = serde_json::from_str("4").expect("valid level");
    assert_eq!(ok, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&LogLevel::TRACE).expect("serialize"), "5");

    let err = serde_json::from_str::<LogLevel>("12").unwrap_err();
    assert!(err.to_string().contains("log level must be 0-6"), "{err}");
}

#[test]
fn test_log_file_parent_is_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logs").join("git-tasks.log");
    create_log_file(&path).expect("create log file");
    assert!(path.is_file());
}
