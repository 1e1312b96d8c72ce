//! Edge case and boundary condition tests
//!
//! These tests verify the engine handles unusual inputs, odd output
//! targets and error conditions.

use std::fs;

use logfacade_core::{
    default_config, fields, ConfigError, Encoding, Environment, Field, Level, LogEntry, Logger,
    MemorySink, Sink,
};
use serde_json::Value;
use tempfile::TempDir;

fn memory_logger(encoding: Encoding) -> (Logger, MemorySink) {
    let buffer = MemorySink::new();
    let config = default_config(Environment::Test)
        .with_level(Level::Debug)
        .with_encoding(encoding)
        .with_stacktrace_level(None);
    let logger = Logger::builder(config)
        .sink(Sink::memory(&buffer))
        .build()
        .unwrap();
    (logger, buffer)
}

// ============================================================================
// Message Content Tests
// ============================================================================

/// Test empty message with no fields
#[test]
fn test_empty_message() {
    let (logger, buffer) = memory_logger(Encoding::Json);
    logger.info("", fields![]);

    let entry = LogEntry::from_json_line(&buffer.lines()[0]).unwrap();
    assert_eq!(entry.msg, "");
    assert!(entry.fields.is_empty());
}

/// Test that multi-line and unicode messages stay on one JSON line
#[test]
fn test_multiline_message_is_one_json_line() {
    let (logger, buffer) = memory_logger(Encoding::Json);
    let msg = "first line\nsecond line\t✓ 日本語";
    logger.warn(msg, fields! { "emoji" => "🚀" });

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let entry = LogEntry::from_json_line(&lines[0]).unwrap();
    assert_eq!(entry.msg, msg);
    assert_eq!(entry.fields["emoji"], "🚀");
}

/// Test that multi-line messages stay on one console line
#[test]
fn test_multiline_message_is_one_console_line() {
    let (logger, buffer) = memory_logger(Encoding::Console);
    logger.warn("first\nsecond\r\tindented", fields! { "note" => "a\nb" });

    let contents = buffer.contents();
    assert_eq!(contents.matches('\n').count(), 1);

    let line = &buffer.lines()[0];
    let columns: Vec<_> = line.split('\t').collect();
    assert_eq!(columns[3], r"first\nsecond\r\tindented");
    assert_eq!(columns[4], r#"{"note":"a\nb"}"#);
}

/// Test console output without fields has no trailing fields column
#[test]
fn test_console_without_fields() {
    let (logger, buffer) = memory_logger(Encoding::Console);
    logger.error("plain", fields![]);

    let line = &buffer.lines()[0];
    assert!(line.ends_with("\tplain"));
    assert!(!line.contains('{'));
}

/// Test nested structured values
#[test]
fn test_nested_field_values() {
    let (logger, buffer) = memory_logger(Encoding::Json);
    logger.info(
        "nested",
        vec![
            Field::new("tags", serde_json::json!(["a", "b"])),
            Field::new("user", serde_json::json!({"id": 1, "active": true})),
        ],
    );

    let entry: Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
    assert_eq!(entry["tags"][1], "b");
    assert_eq!(entry["user"]["active"], true);
}

// ============================================================================
// Output Target Tests
// ============================================================================

/// Test file targets given as a file:// URL
#[test]
fn test_file_url_target() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.log");
    let config = default_config(Environment::Production)
        .with_output_paths([format!("file://{}", path.display())]);

    let logger = Logger::build(&config).unwrap();
    logger.info("dropped at warn", fields![]);
    logger.warn("written", fields![]);
    logger.sync().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\"msg\":\"written\""));
}

/// Test that children share their parent's file sink
#[test]
fn test_children_share_sinks() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shared.log");
    let config = default_config(Environment::Staging).with_output_paths([path.to_str().unwrap()]);
    let logger = Logger::build(&config).unwrap();

    for i in 0..10 {
        logger.with(fields! { "worker" => i }).info("tick", fields![]);
    }
    drop(logger);

    // Dropping the last handle flushes the file
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 10);
}

/// Test that a failed build leaves no new files behind
#[test]
fn test_failed_build_creates_no_files() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("good.log");
    let bad = temp.path().join("missing").join("bad.log");

    let config = default_config(Environment::Production)
        .with_output_paths([good.to_str().unwrap(), bad.to_str().unwrap()]);
    assert!(matches!(Logger::build(&config), Err(ConfigError::OpenSink { .. })));
    assert!(!good.exists());

    // A bad error output must not leave the regular output behind either
    let mut config = default_config(Environment::Production).with_output_paths([good.to_str().unwrap()]);
    config.error_output_paths = vec![bad.display().to_string()];
    assert!(Logger::build(&config).is_err());
    assert!(!good.exists());
}

/// Test that an empty target string is rejected
#[test]
fn test_empty_target_rejected() {
    let config = default_config(Environment::Staging).with_output_paths([""]);
    assert!(matches!(Logger::build(&config), Err(ConfigError::EmptyTarget)));
}

/// Test that a bad error output target fails the build
#[test]
fn test_bad_error_output_rejected() {
    let temp = TempDir::new().unwrap();
    let mut config = default_config(Environment::Test);
    config.error_output_paths = vec![temp
        .path()
        .join("missing")
        .join("errors.log")
        .display()
        .to_string()];

    assert!(matches!(Logger::build(&config), Err(ConfigError::OpenSink { .. })));
}

/// Test that a logger with no outputs syncs identically every time
#[test]
fn test_sync_without_outputs_is_deterministic() {
    let logger = Logger::build(&default_config(Environment::Test)).unwrap();
    for _ in 0..5 {
        logger.error("into the void", fields![]);
        assert!(logger.sync().is_ok());
    }
}

/// Test disabling the caller annotation
#[test]
fn test_caller_can_be_disabled() {
    let buffer = MemorySink::new();
    let mut config = default_config(Environment::Test).with_level(Level::Info);
    config.add_caller = false;
    let logger = Logger::builder(config)
        .sink(Sink::memory(&buffer))
        .build()
        .unwrap();

    logger.info("anonymous", fields![]);
    let entry = LogEntry::from_json_line(&buffer.lines()[0]).unwrap();
    assert!(entry.caller.is_none());
}
