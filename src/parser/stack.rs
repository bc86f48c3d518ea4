//! The explicit stack of partially built values used by the parser
use crate::coords::Coords;
use crate::errors::{Details, ParserResult};
use crate::parser_error;

/// A single frame on the parser stack
#[derive(Debug, PartialEq)]
pub enum Frame<O, A, V> {
    /// An object under construction
    Object(O),
    /// A key awaiting its value
    ObjectKey(String),
    /// An array under construction
    Array(A),
    /// A completed scalar root value
    Single(V),
}

impl<O, A, V> Frame<O, A, V> {
    fn is_container(&self) -> bool {
        matches!(self, Frame::Object(_) | Frame::Array(_))
    }
}

/// Bounded stack of [Frame]s. Only container frames count towards the depth bound.
pub struct Stack<O, A, V> {
    frames: Vec<Frame<O, A, V>>,
    /// The maximum number of simultaneously open containers
    max_depth: usize,
    /// The number of container frames currently on the stack
    depth: usize,
}

impl<O, A, V> Stack<O, A, V> {
    pub fn new(max_depth: usize) -> Self {
        Stack {
            frames: Vec::with_capacity(max_depth.min(64)),
            max_depth,
            depth: 0,
        }
    }

    pub fn push(&mut self, frame: Frame<O, A, V>, coords: Coords) -> ParserResult<()> {
        if frame.is_container() {
            if self.depth >= self.max_depth {
                return parser_error!(Details::DepthExceeded(self.max_depth), coords);
            }
            self.depth += 1;
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame<O, A, V>> {
        let frame = self.frames.pop()?;
        if frame.is_container() {
            self.depth -= 1;
        }
        Some(frame)
    }

    /// Pop the top frame only if it holds an object key
    pub fn pop_key(&mut self) -> Option<String> {
        match self.frames.last() {
            Some(Frame::ObjectKey(_)) => match self.frames.pop() {
                Some(Frame::ObjectKey(key)) => Some(key),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame<O, A, V>> {
        self.frames.last_mut()
    }

    pub fn top(&self) -> Option<&Frame<O, A, V>> {
        self.frames.last()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The number of open containers
    pub fn depth(&self) -> usize {
        self.depth
    }
}
