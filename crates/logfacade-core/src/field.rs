//! Structured key/value fields attached to log entries.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single structured field.
///
/// Values are held as [`serde_json::Value`] so every encoder can render them
/// without knowing the original Rust type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    /// Create a field from anything convertible into a JSON value.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, value)
    }

    /// Non-finite floats are recorded as their string form.
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Self::new(key, Value::Number(n)),
            None => Self::new(key, value.to_string()),
        }
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, value)
    }

    /// Duration in human-readable form, e.g. `"1.5s"`.
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, format!("{:?}", value))
    }

    /// An error under the conventional `error` key.
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", err.to_string())
    }

    /// Any serializable value; values that fail to serialize are recorded as
    /// their serialization error text.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)));
        Self::new(key, value)
    }

    /// A value rendered through its `Display` impl.
    pub fn display(key: impl Into<String>, value: &dyn fmt::Display) -> Self {
        Self::new(key, value.to_string())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.key, self.value)
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Field {
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}

/// Merge fields into a JSON object; later keys replace earlier ones.
pub(crate) fn extend_map(map: &mut Map<String, Value>, fields: impl IntoIterator<Item = Field>) {
    for field in fields {
        let (key, value) = field.into_parts();
        map.insert(key, value);
    }
}

/// Build a `Vec<Field>` from `key => value` pairs.
///
/// Values go through [`Field::any`], so anything `Serialize` works.
///
/// ```
/// use logfacade_core::fields;
///
/// let fields = fields! { "port" => 8080, "tls" => false };
/// assert_eq!(fields.len(), 2);
/// assert!(fields![].is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<$crate::Field>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Field::any($key, &$value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Field::string("user", "ana").value(), &Value::from("ana"));
        assert_eq!(Field::int("port", 8080).value(), &Value::from(8080));
        assert_eq!(Field::bool("tls", true).value(), &Value::Bool(true));
        assert_eq!(Field::float("ratio", 0.5).value(), &Value::from(0.5));
        assert_eq!(Field::float("ratio", f64::NAN).value(), &Value::from("NaN"));
    }

    #[test]
    fn test_error_and_duration() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let field = Field::error(&err);
        assert_eq!(field.key(), "error");
        assert_eq!(field.value(), &Value::from("disk full"));

        let field = Field::duration("elapsed", Duration::from_millis(1500));
        assert_eq!(field.value(), &Value::from("1.5s"));
    }

    #[test]
    fn test_any_serializes_structs() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let field = Field::any("user", &User { id: 7, name: "ana" });
        assert_eq!(field.value(), &serde_json::json!({"id": 7, "name": "ana"}));
    }

    #[test]
    fn test_fields_macro_and_merge() {
        let mut map = Map::new();
        extend_map(&mut map, fields! { "a" => 1, "b" => "two" });
        extend_map(&mut map, fields! { "a" => 3 });

        assert_eq!(map.get("a"), Some(&Value::from(3)));
        assert_eq!(map.get("b"), Some(&Value::from("two")));
    }
}
