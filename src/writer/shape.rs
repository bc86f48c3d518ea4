//! The [Writable] capability, through which values describe their JSON shape to the writer
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::JsonValue;

/// Iterator over the elements of a sequence
pub type Elements<'a> = Box<dyn Iterator<Item = &'a dyn Writable> + 'a>;

/// Iterator over the entries of a keyed mapping
pub type Entries<'a> = Box<dyn Iterator<Item = (&'a str, &'a dyn Writable)> + 'a>;

/// The shape of a value, in the order in which the writer dispatches on it
pub enum Shape<'a> {
    Null,
    Str(&'a str),
    Seq(Elements<'a>),
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Float32(f32),
    /// A symbolic value such as an enum variant, written as its name
    Symbol(&'a str),
    Primitives(Primitives<'a>),
    Map(Entries<'a>),
    /// Anything else. Opaque values are written through a registered type adapter or
    /// property accessor.
    Opaque(&'a dyn Any),
}

/// Slices of primitives, written with `", "` between elements
#[derive(Debug, Copy, Clone)]
pub enum Primitives<'a> {
    Bool(&'a [bool]),
    Int(&'a [i64]),
    I32(&'a [i32]),
    Float(&'a [f64]),
    F32(&'a [f32]),
}

impl Primitives<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Primitives::Bool(s) => s.len(),
            Primitives::Int(s) => s.len(),
            Primitives::I32(s) => s.len(),
            Primitives::Float(s) => s.len(),
            Primitives::F32(s) => s.len(),
        }
    }
}

/// Wraps a reference to any value so that it is written as an opaque object
#[derive(Copy, Clone)]
pub struct Opaque<'a>(pub &'a dyn Any);

pub trait Writable {
    fn shape(&self) -> Shape<'_>;
}

impl Writable for Primitives<'_> {
    fn shape(&self) -> Shape<'_> {
        Shape::Primitives(*self)
    }
}

impl Writable for Opaque<'_> {
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque(self.0)
    }
}

impl Writable for JsonValue {
    fn shape(&self) -> Shape<'_> {
        match self {
            JsonValue::Null => Shape::Null,
            JsonValue::String(s) => Shape::Str(s),
            JsonValue::Array(values) => Shape::Seq(Box::new(values.iter().map(as_writable))),
            JsonValue::Boolean(b) => Shape::Bool(*b),
            JsonValue::Integer(i) => Shape::Integer(*i),
            JsonValue::Float(f) => Shape::Float(*f),
            JsonValue::Object(map) => Shape::Map(Box::new(
                map.iter().map(|(k, v)| (k.as_str(), as_writable(v))),
            )),
        }
    }
}

#[inline]
fn as_writable<T: Writable>(value: &T) -> &dyn Writable {
    value
}

impl Writable for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Bool(*self)
    }
}

macro_rules! writable_integer {
    ($($t : ty),*) => {
        $(
            impl Writable for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Integer(i64::from(*self))
                }
            }
        )*
    };
}

writable_integer!(i8, i16, i32, i64, u8, u16, u32);

impl Writable for u64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsigned(*self)
    }
}

impl Writable for usize {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsigned(*self as u64)
    }
}

impl Writable for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float(*self)
    }
}

impl Writable for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float32(*self)
    }
}

impl Writable for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }
}

impl Writable for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }
}

impl<T: Writable> Writable for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Null,
        }
    }
}

impl<T: Writable> Writable for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(Box::new(self.iter().map(as_writable)))
    }
}

impl<T: Writable> Writable for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<K: AsRef<str>, V: Writable, S: BuildHasher> Writable for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter().map(|(k, v)| (k.as_ref(), as_writable(v))),
        ))
    }
}

impl<K: AsRef<str>, V: Writable> Writable for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter().map(|(k, v)| (k.as_ref(), as_writable(v))),
        ))
    }
}

impl<K: AsRef<str>, V: Writable, S: BuildHasher> Writable for IndexMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(Box::new(
            self.iter().map(|(k, v)| (k.as_ref(), as_writable(v))),
        ))
    }
}

impl<T: Writable + ?Sized> Writable for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Writable + ?Sized> Writable for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}
