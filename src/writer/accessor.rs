//! Property enumeration for opaque objects
use std::any::Any;
use std::borrow::Cow;

use crate::writer::shape::Writable;

/// A single named property of an opaque object
pub struct Property<'a> {
    pub name: Cow<'a, str>,
    pub value: Box<dyn Writable + 'a>,
}

impl<'a> Property<'a> {
    pub fn new<N: Into<Cow<'a, str>>, V: Writable + 'a>(name: N, value: V) -> Self {
        Property {
            name: name.into(),
            value: Box::new(value),
        }
    }
}

/// Yields the readable properties of opaque objects, in the order they should be written.
///
/// Implementations downcast `object` to the types they know about and return `None` for
/// anything else, in which case the writer falls back to an empty object.
pub trait PropertyAccessor {
    fn properties<'a>(&self, object: &'a dyn Any) -> Option<Vec<Property<'a>>>;
}
