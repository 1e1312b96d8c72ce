//! Tracing Layer that forwards `tracing` events into a [`Logger`].
//!
//! The layer does not own a logger. It asks a resolver for the current handle
//! on every event, which lets a process-wide facade swap its handle without
//! touching the installed subscriber.

use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::level::Level;
use crate::logger::Logger;

/// Crates whose own events are never forwarded.
pub const OWN_CRATES: [&str; 2] = ["logfacade", "logfacade_core"];

/// Whether `target` is one of [`OWN_CRATES`] or a module inside one.
pub fn is_own_target(target: &str) -> bool {
    OWN_CRATES.iter().any(|krate| {
        target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// A tracing Layer that records events through a resolved [`Logger`].
pub struct EngineLayer<F> {
    resolve: F,
}

impl<F> EngineLayer<F>
where
    F: Fn() -> Option<Logger> + Send + Sync + 'static,
{
    /// Create a layer that looks up its logger with `resolve` per event.
    /// Events are dropped while `resolve` returns `None`.
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

impl EngineLayer<Box<dyn Fn() -> Option<Logger> + Send + Sync>> {
    /// Layer bound to one fixed logger.
    pub fn fixed(logger: Logger) -> Self {
        Self {
            resolve: Box::new(move || Some(logger.clone())),
        }
    }
}

impl<S, F> Layer<S> for EngineLayer<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    F: Fn() -> Option<Logger> + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if is_own_target(target) {
            return;
        }

        let level = Level::from(*metadata.level());
        let Some(logger) = (self.resolve)() else {
            return;
        };
        if !logger.enabled(level) {
            return;
        }

        let mut visitor = JsonVisitor::new();
        event.record(&mut visitor);

        let mut fields = visitor.fields;
        fields.insert("target".to_string(), Value::String(target.to_string()));

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                fields.insert("span".to_string(), Value::String(spans.join(" > ")));
            }
        }

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        };

        logger.log_collected(level, visitor.message.unwrap_or_default(), fields, caller);
    }
}

/// Collects an event's `message` and its other fields as JSON values.
#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, field: &Field, value: Value) {
        match (field.name(), value) {
            ("message", Value::String(text)) => self.message = Some(text),
            ("message", other) => self.message = Some(other.to_string()),
            (name, value) => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

/// `Debug` output as a JSON value. A quoted string (the `Debug` form of
/// `&str` and `String`) is unquoted; anything else is kept as text.
fn debug_value(value: &dyn fmt::Debug) -> Value {
    let text = format!("{:?}", value);
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        if let Ok(unquoted) = serde_json::from_str::<String>(&text) {
            return Value::String(unquoted);
        }
    }
    Value::String(text)
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // The message arrives as `fmt::Arguments`, whose Debug is its text
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.put(field, debug_value(value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    /// Non-finite values are kept as their string form.
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map_or_else(|| Value::String(value.to_string()), Value::Number);
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }
}
