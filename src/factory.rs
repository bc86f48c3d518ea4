//! Container construction used by the parser.
//!
//! The parser never builds containers directly. Whenever it recognises a `{` or a `[` it asks
//! its [ContainerFactory] for a fresh container, and completed values are folded into their
//! parents through [ContainerFactory::insert] and [ContainerFactory::append]. This keeps the
//! parser agnostic to the concrete tree type it produces.
use std::collections::BTreeMap;

use crate::lexer::Number;
use crate::{JsonValue, Map};

/// A completed scalar, as handed to a [ContainerFactory]
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
}

/// Abstraction over the construction of the value tree produced by a parse
pub trait ContainerFactory {
    /// The type of value produced for any JSON value
    type Value;
    /// A keyed mapping under construction
    type Object;
    /// An ordered sequence under construction
    type Array;

    fn new_object(&self) -> Self::Object;
    fn new_array(&self) -> Self::Array;

    /// Insert a key-value pair into an object
    fn insert(&self, object: &mut Self::Object, key: String, value: Self::Value);
    /// Append a value onto the end of an array
    fn append(&self, array: &mut Self::Array, value: Self::Value);

    fn object_value(&self, object: Self::Object) -> Self::Value;
    fn array_value(&self, array: Self::Array) -> Self::Value;
    fn scalar_value(&self, scalar: Scalar) -> Self::Value;
}

/// The default factory, producing [JsonValue] trees with insertion ordered objects
#[derive(Debug, Default, Copy, Clone)]
pub struct DomFactory;

impl ContainerFactory for DomFactory {
    type Value = JsonValue;
    type Object = Map;
    type Array = Vec<JsonValue>;

    #[inline]
    fn new_object(&self) -> Map {
        Map::new()
    }

    #[inline]
    fn new_array(&self) -> Vec<JsonValue> {
        Vec::new()
    }

    #[inline]
    fn insert(&self, object: &mut Map, key: String, value: JsonValue) {
        object.insert(key, value);
    }

    #[inline]
    fn append(&self, array: &mut Vec<JsonValue>, value: JsonValue) {
        array.push(value);
    }

    #[inline]
    fn object_value(&self, object: Map) -> JsonValue {
        JsonValue::Object(object)
    }

    #[inline]
    fn array_value(&self, array: Vec<JsonValue>) -> JsonValue {
        JsonValue::Array(array)
    }

    fn scalar_value(&self, scalar: Scalar) -> JsonValue {
        match scalar {
            Scalar::Null => JsonValue::Null,
            Scalar::Boolean(b) => JsonValue::Boolean(b),
            Scalar::Number(Number::Integer(i)) => JsonValue::Integer(i),
            Scalar::Number(Number::Float(f)) => JsonValue::Float(f),
            Scalar::String(s) => JsonValue::String(s),
        }
    }
}

/// A factory producing [JsonValue] trees whose objects are rebuilt with their keys in sorted
/// order once complete
#[derive(Debug, Default, Copy, Clone)]
pub struct SortedFactory;

impl ContainerFactory for SortedFactory {
    type Value = JsonValue;
    type Object = BTreeMap<String, JsonValue>;
    type Array = Vec<JsonValue>;

    fn new_object(&self) -> Self::Object {
        BTreeMap::new()
    }

    fn new_array(&self) -> Self::Array {
        Vec::new()
    }

    fn insert(&self, object: &mut Self::Object, key: String, value: JsonValue) {
        object.insert(key, value);
    }

    fn append(&self, array: &mut Self::Array, value: JsonValue) {
        array.push(value);
    }

    fn object_value(&self, object: Self::Object) -> JsonValue {
        JsonValue::Object(object.into_iter().collect())
    }

    fn array_value(&self, array: Self::Array) -> JsonValue {
        JsonValue::Array(array)
    }

    fn scalar_value(&self, scalar: Scalar) -> JsonValue {
        DomFactory.scalar_value(scalar)
    }
}

#[cfg(test)]
mod tests {
    use crate::factory::{ContainerFactory, DomFactory, Scalar, SortedFactory};
    use crate::lexer::Number;
    use crate::JsonValue;

    #[test]
    fn should_replace_duplicate_keys() {
        let factory = DomFactory;
        let mut object = factory.new_object();
        factory.insert(&mut object, "a".into(), JsonValue::Integer(1));
        factory.insert(&mut object, "a".into(), JsonValue::Integer(2));
        assert_eq!(object.len(), 1);
        assert_eq!(object["a"], JsonValue::Integer(2));
    }

    #[test]
    fn should_sort_keys() {
        let factory = SortedFactory;
        let mut object = factory.new_object();
        for key in ["z", "m", "a"] {
            factory.insert(&mut object, key.into(), JsonValue::Null);
        }
        let value = factory.object_value(object);
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["a", "m", "z"]);
    }

    #[test]
    fn should_convert_scalars() {
        let factory = DomFactory;
        assert_eq!(
            factory.scalar_value(Scalar::Number(Number::Float(1.5))),
            JsonValue::Float(1.5)
        );
        assert_eq!(
            factory.scalar_value(Scalar::String("x".into())),
            JsonValue::String("x".into())
        );
    }
}
