//! Property-based tests for entry encoding and level filtering
//!
//! Uses proptest to check that whatever goes into a logger comes back out
//! of the JSON line unchanged, and that filtering follows the level order.

use logfacade_core::{default_config, Environment, Field, Level, LogEntry, Logger, MemorySink, Sink};
use proptest::prelude::*;
use serde_json::Value;

// ============================================================================
// Strategy Generators
// ============================================================================

fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warn),
        Just(Level::Error),
    ]
}

/// Field keys that do not collide with the fixed entry keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}")
        .expect("valid regex")
        .prop_filter("reserved key", |k| {
            !matches!(k.as_str(), "level" | "ts" | "caller" | "msg" | "n")
        })
}

fn memory_logger(level: Level) -> (Logger, MemorySink) {
    let buffer = MemorySink::new();
    let config = default_config(Environment::Test)
        .with_level(level)
        .with_stacktrace_level(None);
    let logger = Logger::builder(config)
        .sink(Sink::memory(&buffer))
        .build()
        .unwrap();
    (logger, buffer)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Any message and string field value survive JSON encoding
    #[test]
    fn message_and_fields_roundtrip(
        msg in ".{0,200}",
        key in key_strategy(),
        value in ".{0,200}",
        number in any::<i64>(),
    ) {
        let (logger, buffer) = memory_logger(Level::Debug);
        logger.error(&msg, vec![Field::string(key.clone(), value.clone()), Field::int("n", number)]);

        let lines = buffer.lines();
        prop_assert_eq!(lines.len(), 1);

        let entry = LogEntry::from_json_line(&lines[0]).unwrap();
        prop_assert_eq!(entry.msg, msg);
        prop_assert_eq!(entry.fields.get(&key), Some(&Value::String(value)));
        prop_assert_eq!(entry.fields.get("n"), Some(&Value::from(number)));
    }

    /// An entry is recorded exactly when its level reaches the minimum
    #[test]
    fn filtering_follows_level_order(minimum in level_strategy(), level in level_strategy()) {
        let (logger, buffer) = memory_logger(minimum);
        logger.log(level, "threshold check", Vec::<Field>::new());

        prop_assert_eq!(buffer.lines().len(), usize::from(level >= minimum));
    }

    /// Raising the minimum level never lowers it
    #[test]
    fn with_min_level_is_monotonic(start in level_strategy(), raise in level_strategy()) {
        let (logger, _buffer) = memory_logger(start);
        let raised = logger.with_min_level(raise);
        prop_assert!(raised.level() >= start);
        prop_assert!(raised.level() >= raise);
    }
}
