//! General error types for the parser and writer

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::coords::Coords;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, ParserError>;

/// Result type used by the writer
pub type WriterResult<T> = Result<T, WriterError>;

/// Enumeration of the various different parser stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The buffered source reader
    Reader,
    /// The lexer stage of the parser
    Lexer,
    /// The push-down automaton stage of the parser
    Parser,
    /// Conversion of the parsed root value into a target type
    Binding,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Reader => write!(f, "reader"),
            Stage::Lexer => write!(f, "lexer"),
            Stage::Parser => write!(f, "parser"),
            Stage::Binding => write!(f, "binding"),
        }
    }
}

/// The specific way in which a numeric literal was found to be malformed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumberFault {
    /// A sign, fraction or exponent with no integer digits in front of it
    MissingIntegerDigits,
    /// A '.' that isn't followed by any digits
    MissingFractionDigits,
    /// An 'e' or 'E' (and optional sign) that isn't followed by any digits
    MissingExponentDigits,
    /// A multi-digit integer part starting with '0'
    InvalidLeadingZero,
    /// An integer literal beyond the safe integer bound
    IntegerTooLarge,
    /// A float literal with a magnitude beyond the largest finite double
    FloatOutOfRange,
}

impl Display for NumberFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberFault::MissingIntegerDigits => write!(f, "missing integer part of number"),
            NumberFault::MissingFractionDigits => write!(f, "missing fraction part of number"),
            NumberFault::MissingExponentDigits => write!(f, "missing exponent part of number"),
            NumberFault::InvalidLeadingZero => write!(f, "leading zeros are not permitted"),
            NumberFault::IntegerTooLarge => write!(
                f,
                "exceeded maximum integer value: {}",
                crate::lexer::MAX_SAFE_INTEGER
            ),
            NumberFault::FloatOutOfRange => write!(f, "exceeded maximum value: {:e}", f64::MAX),
        }
    }
}

/// A global enumeration of error details
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Details {
    #[error("unexpected character '{}'", .0.escape_debug())]
    UnexpectedCharacter(char),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),
    #[error("invalid number: {0}")]
    NumberFormat(NumberFault),
    #[error("{0}")]
    GrammarViolation(String),
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
    #[error("stream failure: {0}")]
    StreamFailure(String),
    #[error("cannot convert parsed {found} into {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0}")]
    Binding(String),
}

/// The general parser error structure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} error: {details} at {coords}")]
pub struct ParserError {
    /// The originating stage for the error
    pub stage: Stage,
    /// The details of the error
    pub details: Details,
    /// Where in the input the error was detected
    pub coords: Coords,
}

/// Errors produced whilst writing
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("maximum depth of {0} nested values exceeded")]
    MaxDepthExceeded(usize),
    #[error("cannot represent {0} in JSON")]
    NonFiniteNumber(f64),
    #[error("output failure: {0}")]
    Io(#[from] std::io::Error),
}

#[macro_export]
macro_rules! reader_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Reader,
            details: $details,
            coords: $coords,
        })
    };
}

#[macro_export]
macro_rules! lexer_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Lexer,
            details: $details,
            coords: $coords,
        })
    };
}

#[macro_export]
macro_rules! parser_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            coords: $coords,
        })
    };
}

#[macro_export]
macro_rules! binding_error {
    ($details: expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Binding,
            details: $details,
            coords: $crate::coords::Coords::default(),
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::coords::Coords;
    use crate::errors::{Details, NumberFault, ParserError, ParserResult, Stage};

    #[test]
    fn should_render_stage_details_and_coords() {
        let result: ParserResult<()> =
            lexer_error!(Details::UnexpectedCharacter('\n'), Coords::default());
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "lexer error: unexpected character '\\n' at [abs: 0, line: 1, column: 0]"
        );
    }

    #[test]
    fn should_render_number_faults() {
        let err = ParserError {
            stage: Stage::Lexer,
            details: Details::NumberFormat(NumberFault::IntegerTooLarge),
            coords: Coords::default(),
        };
        assert!(err.to_string().contains("9007199254740991"));
    }
}
