//! Coordinate structure used to reference specific locations within parser input
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A [Coords] represents a single location within the parser input
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Coords {
    /// The number of characters consumed so far
    pub absolute: usize,
    /// The line position, starting at 1
    pub line: usize,
    /// The column position within the current line, 0 before any character has been consumed
    pub column: usize,
}

impl Coords {
    /// Move the coordinates past a single consumed character
    pub(crate) fn advance(&mut self, c: char) {
        self.absolute += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[abs: {}, line: {}, column: {}]",
            self.absolute, self.line, self.column
        )
    }
}

impl Default for Coords {
    /// The default set of coordinates are positioned before the first character of the first line
    fn default() -> Self {
        Coords {
            absolute: 0,
            line: 1,
            column: 0,
        }
    }
}

impl PartialOrd<Self> for Coords {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coords {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute.cmp(&other.absolute)
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::Coords;

    #[test]
    fn should_track_lines_and_columns() {
        let mut coords = Coords::default();
        "ab\ncd".chars().for_each(|c| coords.advance(c));
        assert_eq!(coords.absolute, 5);
        assert_eq!(coords.line, 2);
        assert_eq!(coords.column, 2);
    }

    #[test]
    fn should_order_on_absolute_position() {
        let mut first = Coords::default();
        first.advance('\n');
        let mut second = Coords::default();
        second.advance('a');
        second.advance('b');
        assert!(first < second);
    }
}
