//! A streaming JSON reader and writer.
//!
//! Parsing is driven by an explicit-stack push-down automaton over a buffered character
//! reader, so the nesting depth of a document is bounded by configuration rather than by the
//! call stack. Containers are built through a pluggable [ContainerFactory], and the root of a
//! document can be bound to a target type through a [RootHook].
//!
//! ```
//! use chisel_jsonstream::{writer, JsonValue, Parser};
//!
//! let parsed = Parser::new().parse_str(r#"{"name": "chisel", "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(parsed.get("name").and_then(JsonValue::as_str), Some("chisel"));
//! assert_eq!(writer::to_string(&parsed).unwrap(), r#"{"name":"chisel","tags":["a","b"]}"#);
//! ```
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

pub mod adapters;
pub mod coords;
pub mod decoders;
pub mod errors;
pub mod factory;
pub mod hook;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod writer;
#[cfg(test)]
mod test_macros;

pub use crate::adapters::{TypeAdapter, TypeAdapters};
pub use crate::decoders::Encoding;
pub use crate::errors::{ParserError, ParserResult, WriterError, WriterResult};
pub use crate::factory::{ContainerFactory, DomFactory, Scalar, SortedFactory};
pub use crate::hook::RootHook;
pub use crate::lexer::{FloatParsing, Number};
pub use crate::parser::{Parser, ParserOptions};
pub use crate::writer::{PropertyAccessor, Writable, Writer, WriterOptions};

/// Insertion ordered map used for [JsonValue::Object]
pub type Map = IndexMap<String, JsonValue>;

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// Map of values
    Object(Map),
    /// Array of values
    Array(Vec<JsonValue>),
    /// Canonical string value
    String(String),
    /// Floating point numeric value
    Float(f64),
    /// Integer numeric value
    Integer(i64),
    /// Canonical boolean value
    Boolean(bool),
    /// Canonical null value
    Null,
}

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float, integers included
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Float(f) => Some(*f),
            JsonValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a member of an object
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Display for JsonValue {
    /// Writes compact JSON. Fails for non-finite floats and for values nested beyond the
    /// default writer depth.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match writer::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Boolean(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Integer(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Float(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(values: Vec<JsonValue>) -> Self {
        JsonValue::Array(values)
    }
}

impl From<Map> for JsonValue {
    fn from(map: Map) -> Self {
        JsonValue::Object(map)
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(JsonValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use crate::{JsonValue, Map};

    #[test]
    fn should_convert_into_values() {
        assert_eq!(JsonValue::from("a"), JsonValue::String("a".into()));
        assert_eq!(JsonValue::from(None::<i64>), JsonValue::Null);
        assert_eq!(JsonValue::from(Some(2.5)), JsonValue::Float(2.5));
        assert_eq!(JsonValue::from(3i64).as_f64(), Some(3.0));
    }

    #[test]
    fn should_display_as_compact_json() {
        let mut map = Map::new();
        map.insert("k".into(), vec![JsonValue::Null, true.into()].into());
        assert_eq!(JsonValue::from(map).to_string(), r#"{"k":[null,true]}"#);
    }
}
