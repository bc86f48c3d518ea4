//! The set of grammar elements admissible at the current point of a parse
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Expectation: u16 {
        const END_DOCUMENT = 0x0001;
        const BEGIN_OBJECT = 0x0002;
        const END_OBJECT = 0x0004;
        const OBJECT_KEY = 0x0008;
        const OBJECT_VALUE = 0x0010;
        const COLON = 0x0020;
        const COMMA = 0x0040;
        const BEGIN_ARRAY = 0x0080;
        const END_ARRAY = 0x0100;
        const ARRAY_VALUE = 0x0200;
        const SINGLE_VALUE = 0x0400;
    }
}

impl Expectation {
    /// Any of the positions in which a scalar value may appear
    pub const ANY_VALUE: Expectation = Expectation::OBJECT_VALUE
        .union(Expectation::ARRAY_VALUE)
        .union(Expectation::SINGLE_VALUE);

    /// The start of a document
    pub const DOCUMENT: Expectation = Expectation::SINGLE_VALUE
        .union(Expectation::BEGIN_OBJECT)
        .union(Expectation::BEGIN_ARRAY);

    /// Directly after a `{`
    pub const OBJECT_START: Expectation = Expectation::OBJECT_KEY.union(Expectation::END_OBJECT);

    /// After a `:`
    pub const AFTER_COLON: Expectation = Expectation::OBJECT_VALUE
        .union(Expectation::BEGIN_OBJECT)
        .union(Expectation::BEGIN_ARRAY);

    /// Directly after a `[` (or a `,` within an array, less the closing bracket)
    pub const ARRAY_START: Expectation = Expectation::ARRAY_VALUE
        .union(Expectation::BEGIN_OBJECT)
        .union(Expectation::BEGIN_ARRAY)
        .union(Expectation::END_ARRAY);

    pub const AFTER_ARRAY_COMMA: Expectation = Expectation::ARRAY_VALUE
        .union(Expectation::BEGIN_OBJECT)
        .union(Expectation::BEGIN_ARRAY);

    /// After a member has been added to an object
    pub const OBJECT_NEXT: Expectation = Expectation::COMMA.union(Expectation::END_OBJECT);

    /// After an element has been added to an array
    pub const ARRAY_NEXT: Expectation = Expectation::COMMA.union(Expectation::END_ARRAY);
}

#[cfg(test)]
mod tests {
    use crate::parser::expectation::Expectation;

    #[test]
    fn should_not_admit_structure_in_key_position() {
        assert!(!Expectation::OBJECT_START.contains(Expectation::BEGIN_OBJECT));
        assert!(!Expectation::OBJECT_START.intersects(Expectation::ANY_VALUE));
    }

    #[test]
    fn should_not_admit_closing_brackets_after_commas() {
        assert!(!Expectation::AFTER_ARRAY_COMMA.contains(Expectation::END_ARRAY));
        assert!(Expectation::ARRAY_START.contains(Expectation::END_ARRAY));
    }
}
