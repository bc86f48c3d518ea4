//! Block buffered reader over a stream of `char`s.
//!
//! The reader pulls characters from its source a block at a time, and hands them out one at a
//! time with a single character of lookahead. It's strictly forward only: once a character has
//! been consumed with [CharReader::next] it can't be pushed back.
use crate::coords::Coords;
use crate::errors::{Details, ParserResult};
use crate::reader_error;

/// The number of characters pulled from the source on each refill
pub const BLOCK_SIZE: usize = 1024;

pub struct CharReader<Chars: Iterator<Item = char>> {
    /// The underlying source of characters
    chars: Chars,
    /// Block buffer
    buffer: Vec<char>,
    /// Position of the next unconsumed character within the buffer
    pos: usize,
    /// Current position within the input, in consumed characters
    coords: Coords,
    /// Set once the source has reported that it has nothing more to give
    exhausted: bool,
}

impl<Chars: Iterator<Item = char>> CharReader<Chars> {
    pub fn new(chars: Chars) -> Self {
        CharReader {
            chars,
            buffer: Vec::with_capacity(BLOCK_SIZE),
            pos: 0,
            coords: Coords::default(),
            exhausted: false,
        }
    }

    /// The current [Coords], reflecting every character consumed so far
    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// The total number of characters consumed so far
    pub fn consumed(&self) -> usize {
        self.coords.absolute
    }

    /// Check whether there is at least one more character available, refilling if required.
    /// This never fails.
    pub fn has_more(&mut self) -> bool {
        if self.pos < self.buffer.len() {
            return true;
        }
        self.fill();
        self.pos < self.buffer.len()
    }

    /// Take a look at the next character without consuming it
    pub fn peek(&mut self) -> ParserResult<char> {
        if !self.has_more() {
            return reader_error!(Details::UnexpectedEndOfInput, self.coords);
        }
        Ok(self.buffer[self.pos])
    }

    /// Consume the next character
    pub fn next(&mut self) -> ParserResult<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.coords.advance(c);
        Ok(c)
    }

    /// Consume exactly `count` characters
    pub fn next_n(&mut self, count: usize) -> ParserResult<String> {
        let mut chars = String::with_capacity(count);
        for _ in 0..count {
            chars.push(self.next()?);
        }
        Ok(chars)
    }

    /// Perform a single read from the underlying source, replacing the (fully consumed) buffer
    /// contents
    fn fill(&mut self) {
        if self.exhausted {
            return;
        }
        self.buffer.clear();
        self.pos = 0;
        self.buffer.extend(self.chars.by_ref().take(BLOCK_SIZE));
        if self.buffer.len() < BLOCK_SIZE {
            self.exhausted = true;
        }
        log::trace!(
            "refilled reader buffer with {} chars at {}",
            self.buffer.len(),
            self.coords
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{Details, Stage};
    use crate::reader::{CharReader, BLOCK_SIZE};

    #[test]
    fn should_peek_without_consuming() {
        let mut reader = CharReader::new("ab".chars());
        assert_eq!(reader.peek().unwrap(), 'a');
        assert_eq!(reader.peek().unwrap(), 'a');
        assert_eq!(reader.consumed(), 0);
        assert_eq!(reader.next().unwrap(), 'a');
        assert_eq!(reader.next().unwrap(), 'b');
        assert_eq!(reader.consumed(), 2);
    }

    #[test]
    fn should_report_end_of_input_without_failing() {
        let mut reader = CharReader::new("".chars());
        assert!(!reader.has_more());
        assert!(!reader.has_more());
    }

    #[test]
    fn should_fail_when_input_is_required() {
        let mut reader = CharReader::new("x".chars());
        reader.next().unwrap();
        let err = reader.next().unwrap_err();
        assert_eq!(err.stage, Stage::Reader);
        assert_eq!(err.details, Details::UnexpectedEndOfInput);
        assert_eq!(err.coords.absolute, 1);
        assert!(reader.peek().is_err());
    }

    #[test]
    fn should_refill_across_block_boundaries() {
        let source = "0123456789".repeat(BLOCK_SIZE / 4);
        let mut reader = CharReader::new(source.chars());
        let mut consumed = String::new();
        while reader.has_more() {
            consumed.push(reader.next().unwrap());
        }
        assert_eq!(consumed, source);
        assert_eq!(reader.consumed(), source.len());
    }

    #[test]
    fn should_refill_when_source_is_an_exact_block_multiple() {
        let source = "x".repeat(BLOCK_SIZE * 2);
        let mut reader = CharReader::new(source.chars());
        assert_eq!(reader.next_n(BLOCK_SIZE * 2).unwrap(), source);
        assert!(!reader.has_more());
    }

    #[test]
    fn should_consume_exact_counts() {
        let mut reader = CharReader::new("null, true".chars());
        assert_eq!(reader.next_n(4).unwrap(), "null");
        assert_eq!(reader.next().unwrap(), ',');
        assert!(reader.next_n(10).is_err());
    }
}
