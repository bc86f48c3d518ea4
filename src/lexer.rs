//! The lexer classifies the input a token at a time based on a single character of lookahead.
//!
//! Classification ([Lexer::read_next_token]) consumes structural characters, but leaves the
//! payload of strings, numbers, booleans and nulls in place. The parser decides whether such a
//! token is admissible in its current state and only then calls the matching `read_*` function
//! to consume it.
use std::fmt::{Display, Formatter};

use crate::coords::Coords;
use crate::errors::{Details, NumberFault, ParserResult};
use crate::lexer_error;
use crate::reader::CharReader;

/// The largest integer magnitude accepted for integer literals, i.e. 2^53 - 1
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Default capacity of the number literal buffer
const DEFAULT_NUMBER_CAPACITY: usize = 32;

/// Default capacity for newly created string buffers
const DEFAULT_STRING_CAPACITY: usize = 64;

/// Enumeration of valid JSON tokens
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Colon,
    Comma,
    Str,
    Boolean,
    Number,
    Null,
    EndOfDocument,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::BeginObject => write!(f, "'{{'"),
            Token::EndObject => write!(f, "'}}'"),
            Token::BeginArray => write!(f, "'['"),
            Token::EndArray => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Str => write!(f, "string"),
            Token::Boolean => write!(f, "boolean"),
            Token::Number => write!(f, "number"),
            Token::Null => write!(f, "null"),
            Token::EndOfDocument => write!(f, "end of document"),
        }
    }
}

/// A fully parsed numeric literal
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// How the lexer turns a validated float literal into an `f64`
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FloatParsing {
    /// Correctly rounded conversion of the whole literal
    #[default]
    Exact,
    /// The integer part plus the fraction digits summed as `d / 10^(i + 1)`, scaled by
    /// `10^exponent`. Long fractions can pick up rounding error.
    DigitSummation,
}

/// The phases of the number reading state machine
#[derive(Debug, Copy, Clone, PartialEq)]
enum NumberPhase {
    Integer,
    Fraction,
    Exponent,
    End,
}

/// Check for the whitespace characters permitted between tokens
#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

pub struct Lexer<Chars: Iterator<Item = char>> {
    /// The buffered source of input characters
    reader: CharReader<Chars>,
    /// Buffer used to hoover up the characters of a number literal
    number: String,
    /// The float conversion strategy
    float_parsing: FloatParsing,
}

impl<Chars: Iterator<Item = char>> Lexer<Chars> {
    pub fn new(chars: Chars) -> Self {
        Self::with_float_parsing(chars, FloatParsing::default())
    }

    pub fn with_float_parsing(chars: Chars, float_parsing: FloatParsing) -> Self {
        Lexer {
            reader: CharReader::new(chars),
            number: String::with_capacity(DEFAULT_NUMBER_CAPACITY),
            float_parsing,
        }
    }

    /// The current position within the input
    pub fn coords(&self) -> Coords {
        self.reader.coords()
    }

    /// Skip any whitespace and classify the next token. Structural tokens are consumed, any
    /// other token is left in the input for one of the `read_*` functions.
    pub fn read_next_token(&mut self) -> ParserResult<Token> {
        let c = loop {
            if !self.reader.has_more() {
                return Ok(Token::EndOfDocument);
            }
            let c = self.reader.peek()?;
            if !is_whitespace(c) {
                break c;
            }
            self.reader.next()?;
        };
        let token = match c {
            '{' => Token::BeginObject,
            '}' => Token::EndObject,
            '[' => Token::BeginArray,
            ']' => Token::EndArray,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '"' => return Ok(Token::Str),
            't' | 'f' => return Ok(Token::Boolean),
            'n' => return Ok(Token::Null),
            '-' | '0'..='9' => return Ok(Token::Number),
            c => return lexer_error!(Details::UnexpectedCharacter(c), self.reader.coords()),
        };
        self.reader.next()?;
        Ok(token)
    }

    /// Read a complete string, translating any escape sequences
    pub fn read_string(&mut self) -> ParserResult<String> {
        let c = self.reader.next()?;
        if c != '"' {
            return lexer_error!(Details::UnexpectedCharacter(c), self.reader.coords());
        }
        let mut value = String::with_capacity(DEFAULT_STRING_CAPACITY);
        loop {
            match self.next_in_string()? {
                '\\' => self.read_escape_sequence(&mut value)?,
                '"' => break,
                c @ ('\r' | '\n') => {
                    return lexer_error!(Details::UnexpectedCharacter(c), self.reader.coords())
                }
                c => value.push(c),
            }
        }
        Ok(value)
    }

    /// A string must be terminated before the input ends
    fn next_in_string(&mut self) -> ParserResult<char> {
        if !self.reader.has_more() {
            return lexer_error!(
                Details::MalformedLiteral("unterminated string".to_string()),
                self.reader.coords()
            );
        }
        self.reader.next()
    }

    /// Translate a single escape sequence, the leading backslash having already been consumed
    fn read_escape_sequence(&mut self, value: &mut String) -> ParserResult<()> {
        let escape = self.next_in_string()?;
        self.translate_escape(escape, value)
    }

    fn translate_escape(&mut self, escape: char, value: &mut String) -> ParserResult<()> {
        match escape {
            '"' => value.push('"'),
            '\\' => value.push('\\'),
            '/' => value.push('/'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000c}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'u' => {
                let unit = self.read_hex_quad()?;
                self.push_code_unit(unit, value)?;
            }
            c => {
                return lexer_error!(
                    Details::MalformedLiteral(format!("invalid escape sequence '\\{}'", c)),
                    self.reader.coords()
                )
            }
        }
        Ok(())
    }

    /// Read the four hex digits of a `\uXXXX` escape
    fn read_hex_quad(&mut self) -> ParserResult<u32> {
        let mut unit = 0u32;
        for _ in 0..4 {
            let c = self.next_in_string()?;
            match c.to_digit(16) {
                Some(d) => unit = (unit << 4) + d,
                None => {
                    return lexer_error!(
                        Details::MalformedLiteral(format!("invalid hex digit '{}' in \\u escape", c)),
                        self.reader.coords()
                    )
                }
            }
        }
        Ok(unit)
    }

    /// Push a UTF-16 code unit, pairing a high surrogate with an immediately following
    /// `\uXXXX` low surrogate. An unpaired surrogate becomes U+FFFD and whatever escape
    /// follows it is translated on its own.
    fn push_code_unit(&mut self, mut unit: u32, value: &mut String) -> ParserResult<()> {
        loop {
            if !(0xd800..0xdc00).contains(&unit) {
                value.push(char::from_u32(unit).unwrap_or_else(|| self.lone_surrogate(unit)));
                return Ok(());
            }
            if !(self.reader.has_more() && self.reader.peek()? == '\\') {
                value.push(self.lone_surrogate(unit));
                return Ok(());
            }
            self.reader.next()?;
            let escape = self.next_in_string()?;
            if escape != 'u' {
                value.push(self.lone_surrogate(unit));
                return self.translate_escape(escape, value);
            }
            let low = self.read_hex_quad()?;
            if (0xdc00..0xe000).contains(&low) {
                let combined = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
                value.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(());
            }
            value.push(self.lone_surrogate(unit));
            unit = low;
        }
    }

    fn lone_surrogate(&self, unit: u32) -> char {
        log::warn!(
            "replacing lone surrogate \\u{:04X} at {}",
            unit,
            self.reader.coords()
        );
        char::REPLACEMENT_CHARACTER
    }

    /// Read either `true` or `false`
    pub fn read_boolean(&mut self) -> ParserResult<bool> {
        let (value, remainder) = match self.reader.next()? {
            't' => (true, "rue"),
            'f' => (false, "alse"),
            c => return lexer_error!(Details::UnexpectedCharacter(c), self.reader.coords()),
        };
        self.match_exact(remainder)?;
        Ok(value)
    }

    /// Read a `null`
    pub fn read_null(&mut self) -> ParserResult<()> {
        self.match_exact("null")
    }

    /// Consume and match (exactly) a sequence of characters from the input
    fn match_exact(&mut self, expected: &str) -> ParserResult<()> {
        for e in expected.chars() {
            if !self.reader.has_more() {
                return lexer_error!(Details::UnexpectedEndOfInput, self.reader.coords());
            }
            let c = self.reader.next()?;
            if c != e {
                return lexer_error!(
                    Details::MalformedLiteral(format!("was looking for '{}', found '{}'", e, c)),
                    self.reader.coords()
                );
            }
        }
        Ok(())
    }

    /// Read a number, producing an integer if the literal has neither a fraction nor an
    /// exponent, and a float otherwise
    pub fn read_number(&mut self) -> ParserResult<Number> {
        self.number.clear();
        let mut integer_digits = 0usize;
        let mut fraction_digits = 0usize;
        let mut exponent_digits = 0usize;
        let mut has_fraction = false;
        let mut has_exponent = false;

        if self.reader.peek()? == '-' {
            self.number.push(self.reader.next()?);
        }

        let mut phase = NumberPhase::Integer;
        while phase != NumberPhase::End {
            let c = if self.reader.has_more() {
                self.reader.peek()?
            } else {
                break;
            };
            match phase {
                NumberPhase::Integer => match c {
                    '0'..='9' => {
                        self.number.push(self.reader.next()?);
                        integer_digits += 1;
                    }
                    '.' => {
                        self.require_digits(integer_digits, NumberFault::MissingIntegerDigits)?;
                        self.number.push(self.reader.next()?);
                        has_fraction = true;
                        phase = NumberPhase::Fraction;
                    }
                    'e' | 'E' => {
                        self.require_digits(integer_digits, NumberFault::MissingIntegerDigits)?;
                        self.read_exponent_marker()?;
                        has_exponent = true;
                        phase = NumberPhase::Exponent;
                    }
                    _ => phase = NumberPhase::End,
                },
                NumberPhase::Fraction => match c {
                    '0'..='9' => {
                        self.number.push(self.reader.next()?);
                        fraction_digits += 1;
                    }
                    'e' | 'E' => {
                        self.require_digits(fraction_digits, NumberFault::MissingFractionDigits)?;
                        self.read_exponent_marker()?;
                        has_exponent = true;
                        phase = NumberPhase::Exponent;
                    }
                    _ => phase = NumberPhase::End,
                },
                NumberPhase::Exponent => match c {
                    '0'..='9' => {
                        self.number.push(self.reader.next()?);
                        exponent_digits += 1;
                    }
                    _ => phase = NumberPhase::End,
                },
                NumberPhase::End => (),
            }
        }

        self.require_digits(integer_digits, NumberFault::MissingIntegerDigits)?;
        if has_fraction {
            self.require_digits(fraction_digits, NumberFault::MissingFractionDigits)?;
        }
        if has_exponent {
            self.require_digits(exponent_digits, NumberFault::MissingExponentDigits)?;
        }
        let digits = self.number.trim_start_matches('-');
        if integer_digits > 1 && digits.starts_with('0') {
            return lexer_error!(
                Details::NumberFormat(NumberFault::InvalidLeadingZero),
                self.reader.coords()
            );
        }

        if !has_fraction && !has_exponent {
            return self.integer_value().map(Number::Integer);
        }
        let value = match self.float_parsing {
            FloatParsing::Exact => self.exact_float_value()?,
            FloatParsing::DigitSummation => self.summed_float_value(),
        };
        if !value.is_finite() {
            return lexer_error!(
                Details::NumberFormat(NumberFault::FloatOutOfRange),
                self.reader.coords()
            );
        }
        Ok(Number::Float(value))
    }

    /// Consume an exponent marker along with any sign that follows it
    fn read_exponent_marker(&mut self) -> ParserResult<()> {
        self.number.push(self.reader.next()?);
        if self.reader.has_more() {
            let sign = self.reader.peek()?;
            if sign == '-' || sign == '+' {
                self.number.push(self.reader.next()?);
            }
        }
        Ok(())
    }

    fn require_digits(&self, count: usize, fault: NumberFault) -> ParserResult<()> {
        if count == 0 {
            return lexer_error!(Details::NumberFormat(fault), self.reader.coords());
        }
        Ok(())
    }

    /// Accumulate the buffered integer literal digit by digit, bailing out as soon as the safe
    /// integer bound is passed
    fn integer_value(&self) -> ParserResult<i64> {
        let (negative, digits) = match self.number.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, self.number.as_str()),
        };
        let mut value: i64 = 0;
        for d in digits.bytes() {
            value = value * 10 + i64::from(d - b'0');
            if value > MAX_SAFE_INTEGER {
                return lexer_error!(
                    Details::NumberFormat(NumberFault::IntegerTooLarge),
                    self.reader.coords()
                );
            }
        }
        Ok(if negative { -value } else { value })
    }

    fn exact_float_value(&self) -> ParserResult<f64> {
        match fast_float::parse::<f64, _>(self.number.as_bytes()) {
            Ok(value) => Ok(value),
            Err(_) => lexer_error!(
                Details::MalformedLiteral(format!("invalid number '{}'", self.number)),
                self.reader.coords()
            ),
        }
    }

    /// Rebuild the float from its parts by scaled digit summation
    fn summed_float_value(&self) -> f64 {
        let (negative, literal) = match self.number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.number.as_str()),
        };
        let (mantissa, exponent) = match literal.find(|c| c == 'e' || c == 'E') {
            Some(index) => (&literal[..index], Some(&literal[index + 1..])),
            None => (literal, None),
        };
        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };

        let mut value = integer
            .bytes()
            .fold(0f64, |acc, d| acc * 10.0 + f64::from(d - b'0'));
        for (i, d) in fraction.bytes().enumerate() {
            let d = d - b'0';
            if d != 0 {
                value += f64::from(d) / 10f64.powi(i as i32 + 1);
            }
        }
        if let Some(exponent) = exponent.filter(|_| value != 0.0) {
            let (exp_negative, exp_digits) = match exponent.as_bytes().first() {
                Some(b'-') => (true, &exponent[1..]),
                Some(b'+') => (false, &exponent[1..]),
                _ => (false, exponent),
            };
            let magnitude = exp_digits.bytes().fold(0i32, |acc, d| {
                acc.saturating_mul(10).saturating_add(i32::from(d - b'0'))
            });
            value *= 10f64.powi(if exp_negative { -magnitude } else { magnitude });
        }
        if negative {
            -value
        } else {
            value
        }
    }
}
