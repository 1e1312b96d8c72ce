//! Log entry type and its two encodings.
//!
//! Each entry is a self-contained record rendered to exactly one line, so
//! concurrent writers never interleave partial entries within a sink. Console
//! text escapes line breaks and tabs to keep that true.

use std::fmt::Write as FmtWrite;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Encoding;
use crate::level::Level;

/// Keys the entry itself writes; user fields never use them directly.
pub const RESERVED_KEYS: [&str; 5] = ["level", "ts", "caller", "msg", "stacktrace"];

/// Prefix given to user fields whose key is in [`RESERVED_KEYS`].
pub const RENAMED_FIELD_PREFIX: &str = "fields.";

/// A single log entry.
///
/// In JSON form the structured fields are flattened next to the fixed keys:
///
/// ```text
/// {"level":"info","ts":"2026-10-17T09:30:45.123Z","caller":"src/main.rs:12","msg":"svc up","port":8080}
/// ```
///
/// A field named like a fixed key is written as `fields.<key>`, so
/// `{"msg": "x"}` in the fields becomes `"fields.msg":"x"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: Level,

    /// RFC 3339 timestamp with millisecond precision, UTC
    pub ts: String,

    /// Source location (`file:line`) of the logging call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,

    pub msg: String,

    /// Captured stack trace, for levels configured to record one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,

    /// Context and call-site fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(level: Level, msg: impl Into<String>) -> Self {
        Self {
            level,
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            caller: None,
            msg: msg.into(),
            stacktrace: None,
            fields: Map::new(),
        }
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Set the structured fields, renaming any that collide with a fixed key.
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        if fields.keys().any(|key| is_reserved(key)) {
            self.fields = fields
                .into_iter()
                .map(|(key, value)| {
                    if is_reserved(&key) {
                        (format!("{}{}", RENAMED_FIELD_PREFIX, key), value)
                    } else {
                        (key, value)
                    }
                })
                .collect();
        } else {
            self.fields = fields;
        }
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Render as tab-separated console text (no trailing newline).
    ///
    /// `ts LEVEL caller msg {fields} stacktrace`; the caller, fields and
    /// stacktrace columns are omitted when empty. `\n`, `\r`, `\t` and `\\`
    /// in text columns are written as escapes.
    pub fn to_console_line(&self) -> String {
        let mut line = String::with_capacity(64 + self.msg.len());
        line.push_str(&self.ts);
        line.push('\t');
        line.push_str(self.level.as_upper());
        if let Some(caller) = &self.caller {
            line.push('\t');
            push_escaped(&mut line, caller);
        }
        line.push('\t');
        push_escaped(&mut line, &self.msg);
        if !self.fields.is_empty() {
            // JSON text never contains raw control characters
            let _ = write!(line, "\t{}", Value::Object(self.fields.clone()));
        }
        if let Some(stacktrace) = &self.stacktrace {
            line.push('\t');
            push_escaped(&mut line, stacktrace);
        }
        line
    }

    /// Encode the entry as one newline-terminated line.
    pub fn encode(&self, encoding: Encoding) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = match encoding {
            Encoding::Json => self.to_json_line()?,
            Encoding::Console => self.to_console_line(),
        };
        line.push('\n');
        Ok(line.into_bytes())
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn push_escaped(line: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            '\\' => line.push_str("\\\\"),
            c => line.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogEntry {
        let fields = serde_json::json!({"port": 8080, "tls": false});
        let Value::Object(fields) = fields else { unreachable!() };
        LogEntry::new(Level::Info, "svc up")
            .with_caller("src/main.rs:12")
            .with_fields(fields)
    }

    #[test]
    fn test_json_line_flattens_fields() {
        let json = sample().to_json_line().unwrap();
        assert!(json.starts_with("{\"level\":\"info\""));
        assert!(json.contains("\"msg\":\"svc up\""));
        assert!(json.contains("\"caller\":\"src/main.rs:12\""));
        assert!(json.contains("\"port\":8080"));
        assert!(!json.contains("\"fields\""));

        // Roundtrip
        let parsed = LogEntry::from_json_line(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_json_line_without_caller() {
        let entry = LogEntry::new(Level::Warn, "disk low");
        let json = entry.to_json_line().unwrap();
        assert!(!json.contains("caller"));
        assert!(json.contains("\"level\":\"warn\""));
    }

    #[test]
    fn test_console_line_layout() {
        let entry = sample();
        let line = entry.to_console_line();
        let columns: Vec<_> = line.split('\t').collect();

        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0], entry.ts);
        assert_eq!(columns[1], "INFO");
        assert_eq!(columns[2], "src/main.rs:12");
        assert_eq!(columns[3], "svc up");
        assert_eq!(columns[4], r#"{"port":8080,"tls":false}"#);
    }

    #[test]
    fn test_reserved_field_keys_are_renamed() {
        let fields = serde_json::json!({"msg": "user value", "level": "custom", "port": 1});
        let Value::Object(fields) = fields else { unreachable!() };
        let entry = LogEntry::new(Level::Error, "real message").with_fields(fields);

        assert_eq!(entry.fields["fields.msg"], "user value");
        assert_eq!(entry.fields["fields.level"], "custom");
        assert_eq!(entry.fields["port"], 1);

        let parsed = LogEntry::from_json_line(&entry.to_json_line().unwrap()).unwrap();
        assert_eq!(parsed.msg, "real message");
        assert_eq!(parsed.level, Level::Error);
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_console_escapes_control_characters() {
        let entry = LogEntry::new(Level::Warn, "first\nsecond\tthird\\").with_stacktrace("a\nb");
        let line = entry.to_console_line();

        assert!(!line.contains('\n'));
        let columns: Vec<_> = line.split('\t').collect();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[2], r"first\nsecond\tthird\\");
        assert_eq!(columns[3], r"a\nb");
    }

    #[test]
    fn test_encode_terminates_line() {
        let bytes = LogEntry::new(Level::Error, "boom").encode(Encoding::Console).unwrap();
        assert!(bytes.ends_with(b"\tERROR\tboom\n"));
    }
}
