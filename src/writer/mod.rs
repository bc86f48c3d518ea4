//! The recursive, depth-bounded writer.
//!
//! Values are written through the [Writable] capability: the writer asks each value for its
//! [Shape] and dispatches on it. Opaque values are first offered to any registered
//! [TypeAdapters], then to the [PropertyAccessor], and are otherwise written as `{}`.
//!
//! The depth bound stops runaway recursion, including that caused by reference cycles between
//! opaque objects, but it doesn't detect cycles as such.
use std::io::Write;

use crate::adapters::TypeAdapters;
use crate::errors::{WriterError, WriterResult};
use crate::lexer::MAX_SAFE_INTEGER;

pub use self::accessor::{Property, PropertyAccessor};
pub use self::shape::{Elements, Entries, Opaque, Primitives, Shape, Writable};

pub mod accessor;
pub mod shape;

/// The default bound on container nesting
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Writer configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Containers nested this deep or deeper fail to write, the root being at depth 0
    pub max_depth: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Write a value into a freshly allocated [String], using the default options
pub fn to_string<T: Writable>(value: &T) -> WriterResult<String> {
    let mut writer = Writer::new(Vec::with_capacity(128));
    writer.write(value)?;
    String::from_utf8(writer.into_inner())
        .map_err(|err| WriterError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

pub struct Writer<'w, W: Write> {
    sink: W,
    options: WriterOptions,
    adapters: Option<&'w TypeAdapters>,
    accessor: Option<&'w dyn PropertyAccessor>,
}

impl<'w, W: Write> Writer<'w, W> {
    pub fn new(sink: W) -> Self {
        Writer {
            sink,
            options: WriterOptions::default(),
            adapters: None,
            accessor: None,
        }
    }

    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_adapters(mut self, adapters: &'w TypeAdapters) -> Self {
        self.adapters = Some(adapters);
        self
    }

    pub fn with_accessor(mut self, accessor: &'w dyn PropertyAccessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    /// Write a single value. Output already written when an error occurs stays in the sink.
    pub fn write<T: Writable>(&mut self, value: &T) -> WriterResult<()> {
        log::debug!("starting write with {:?}", self.options);
        self.write_value(value, 0)?;
        self.sink.flush()?;
        log::debug!("completed write");
        Ok(())
    }

    /// Give back the underlying sink
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_value(&mut self, value: &dyn Writable, depth: usize) -> WriterResult<()> {
        match value.shape() {
            Shape::Null => self.write_raw("null"),
            Shape::Str(s) | Shape::Symbol(s) => self.write_string(s),
            Shape::Seq(elements) => {
                self.check_depth(depth)?;
                self.sink.write_all(b"[")?;
                for (i, element) in elements.enumerate() {
                    if i > 0 {
                        self.sink.write_all(b",")?;
                    }
                    self.write_value(element, depth + 1)?;
                }
                self.write_raw("]")
            }
            Shape::Bool(b) => self.write_raw(if b { "true" } else { "false" }),
            Shape::Integer(i) => self.write_integer(i),
            Shape::Unsigned(u) => self.write_unsigned(u),
            Shape::Float(f) => self.write_float(f),
            Shape::Float32(f) => self.write_float32(f),
            Shape::Primitives(primitives) => {
                self.check_depth(depth)?;
                self.write_primitives(primitives)
            }
            Shape::Map(entries) => {
                self.check_depth(depth)?;
                self.sink.write_all(b"{")?;
                for (i, (key, value)) in entries.enumerate() {
                    if i > 0 {
                        self.sink.write_all(b",")?;
                    }
                    self.write_string(key)?;
                    self.sink.write_all(b":")?;
                    self.write_value(value, depth + 1)?;
                }
                self.write_raw("}")
            }
            Shape::Opaque(object) => {
                self.check_depth(depth)?;
                if let Some(adapted) = self.adapters.and_then(|a| a.serialize_any(object)) {
                    return self.write_string(&adapted);
                }
                match self.accessor.and_then(|a| a.properties(object)) {
                    Some(properties) => {
                        self.sink.write_all(b"{")?;
                        for (i, property) in properties.iter().enumerate() {
                            if i > 0 {
                                self.sink.write_all(b",")?;
                            }
                            self.write_string(&property.name)?;
                            self.sink.write_all(b":")?;
                            self.write_value(&*property.value, depth + 1)?;
                        }
                        self.write_raw("}")
                    }
                    None => self.write_raw("{}"),
                }
            }
        }
    }

    #[inline]
    fn check_depth(&self, depth: usize) -> WriterResult<()> {
        if depth >= self.options.max_depth {
            return Err(WriterError::MaxDepthExceeded(self.options.max_depth));
        }
        Ok(())
    }

    #[inline]
    fn write_raw(&mut self, s: &str) -> WriterResult<()> {
        self.sink.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Integers beyond [MAX_SAFE_INTEGER] are written in float form, so that they parse again
    fn write_integer(&mut self, i: i64) -> WriterResult<()> {
        if i.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
            return self.write_float(i as f64);
        }
        self.write_raw(&lexical::to_string(i))
    }

    fn write_unsigned(&mut self, u: u64) -> WriterResult<()> {
        if u > MAX_SAFE_INTEGER as u64 {
            return self.write_float(u as f64);
        }
        self.write_raw(&lexical::to_string(u))
    }

    fn write_float(&mut self, f: f64) -> WriterResult<()> {
        if !f.is_finite() {
            return Err(WriterError::NonFiniteNumber(f));
        }
        self.write_raw(&lexical::to_string(f))
    }

    fn write_float32(&mut self, f: f32) -> WriterResult<()> {
        if !f.is_finite() {
            return Err(WriterError::NonFiniteNumber(f64::from(f)));
        }
        self.write_raw(&lexical::to_string(f))
    }

    fn write_primitives(&mut self, primitives: Primitives<'_>) -> WriterResult<()> {
        self.sink.write_all(b"[")?;
        for i in 0..primitives.len() {
            if i > 0 {
                self.sink.write_all(b", ")?;
            }
            match primitives {
                Primitives::Bool(s) => self.write_raw(if s[i] { "true" } else { "false" })?,
                Primitives::Int(s) => self.write_integer(s[i])?,
                Primitives::I32(s) => self.write_raw(&lexical::to_string(s[i]))?,
                Primitives::Float(s) => self.write_float(s[i])?,
                Primitives::F32(s) => self.write_float32(s[i])?,
            }
        }
        self.write_raw("]")
    }

    /// Write a quoted string, escaping quotes, backslashes, solidi and the common control
    /// characters
    fn write_string(&mut self, s: &str) -> WriterResult<()> {
        self.sink.write_all(b"\"")?;
        let mut start = 0;
        for (i, c) in s.char_indices() {
            let escaped = match c {
                '"' => "\\\"",
                '\\' => "\\\\",
                '/' => "\\/",
                '\u{0008}' => "\\b",
                '\u{000c}' => "\\f",
                '\n' => "\\n",
                '\r' => "\\r",
                '\t' => "\\t",
                _ => continue,
            };
            self.sink.write_all(s[start..i].as_bytes())?;
            self.sink.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        self.sink.write_all(s[start..].as_bytes())?;
        self.write_raw("\"")
    }
}
