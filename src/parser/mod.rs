//! The push-down parser.
//!
//! Rather than recursing, the parser drives an explicit [Stack] of partially built containers,
//! and tracks which grammar elements are admissible next as an [Expectation] bitmask. Any token
//! outside of the current expectation is rejected immediately, and parsing never attempts to
//! recover. The bounded stack means that arbitrarily deep input can't overflow the call stack.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::adapters::TypeAdapters;
use crate::coords::Coords;
use crate::decoders::{decoder_for, read_source, Encoding};
use crate::errors::{Details, ParserResult};
use crate::factory::{ContainerFactory, DomFactory, Scalar};
use crate::hook::{short_type_name, RootHook};
use crate::lexer::{FloatParsing, Lexer, Token};
use crate::{parser_error, reader_error};

use self::expectation::Expectation;
use self::stack::{Frame, Stack};

pub mod expectation;
pub mod stack;

/// The default bound on the number of simultaneously open containers
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Parser configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// The maximum container nesting depth
    pub max_depth: usize,
    /// How float literals are converted
    pub float_parsing: FloatParsing,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            float_parsing: FloatParsing::default(),
        }
    }
}

type ParserStack<F> = Stack<
    <F as ContainerFactory>::Object,
    <F as ContainerFactory>::Array,
    <F as ContainerFactory>::Value,
>;

/// The completed root of a document. An object root is kept as the raw container so that it
/// can be handed to a [RootHook].
enum Root<F: ContainerFactory> {
    Object(F::Object),
    Value(F::Value),
}

/// Main JSON parser struct
pub struct Parser<F: ContainerFactory = DomFactory> {
    options: ParserOptions,
    encoding: Encoding,
    factory: F,
}

impl Default for Parser {
    /// The default encoding is Utf-8
    fn default() -> Self {
        Parser {
            options: ParserOptions::default(),
            encoding: Encoding::default(),
            factory: DomFactory,
        }
    }
}

impl Parser {
    /// A parser producing [JsonValue](crate::JsonValue) trees with the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new instance of the parser using a specific [Encoding]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Parser {
            encoding,
            ..Default::default()
        }
    }

    /// Create a new instance of the parser with the given [ParserOptions]
    pub fn with_options(options: ParserOptions) -> Self {
        Parser {
            options,
            ..Default::default()
        }
    }
}

impl<F: ContainerFactory> Parser<F> {
    /// Create a new instance of the parser which builds its values through `factory`
    pub fn with_factory(factory: F) -> Self {
        Parser {
            options: ParserOptions::default(),
            encoding: Encoding::default(),
            factory,
        }
    }

    /// Replace the [ParserOptions]
    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the [Encoding] used for byte input
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<F::Value> {
        match File::open(&path) {
            Ok(f) => self.parse_reader(BufReader::new(f)),
            Err(err) => {
                reader_error!(
                    Details::StreamFailure(format!(
                        "unable to open {}: {}",
                        path.as_ref().display(),
                        err
                    )),
                    Coords::default()
                )
            }
        }
    }

    pub fn parse_reader<Buffer: BufRead>(&self, mut reader: Buffer) -> ParserResult<F::Value> {
        let bytes = read_source(&mut reader, self.encoding)?;
        let mut source = bytes.as_slice();
        let chars = decoder_for(&mut source, self.encoding);
        self.parse_chars(chars)
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<F::Value> {
        self.parse_reader(BufReader::new(bytes))
    }

    pub fn parse_str(&self, str: &str) -> ParserResult<F::Value> {
        self.parse_chars(str.chars())
    }

    pub fn parse_chars<Chars: Iterator<Item = char>>(
        &self,
        chars: Chars,
    ) -> ParserResult<F::Value> {
        Ok(match self.parse_root(chars)? {
            Root::Object(object) => self.factory.object_value(object),
            Root::Value(value) => value,
        })
    }

    /// Parse a document and convert its root through a [RootHook]
    pub fn parse_with<Chars, Hook>(
        &self,
        chars: Chars,
        hook: &Hook,
        adapters: &TypeAdapters,
    ) -> ParserResult<Hook::Target>
    where
        Chars: Iterator<Item = char>,
        Hook: RootHook<F>,
    {
        match self.parse_root(chars)? {
            Root::Object(object) => {
                let path = short_type_name::<Hook::Target>();
                log::debug!("binding root object to {}", path);
                hook.to_target(path, object, adapters)
            }
            Root::Value(value) => hook.from_value(value),
        }
    }

    pub fn parse_str_with<Hook: RootHook<F>>(
        &self,
        str: &str,
        hook: &Hook,
        adapters: &TypeAdapters,
    ) -> ParserResult<Hook::Target> {
        self.parse_with(str.chars(), hook, adapters)
    }

    fn parse_root<Chars: Iterator<Item = char>>(&self, chars: Chars) -> ParserResult<Root<F>> {
        let mut lexer = Lexer::with_float_parsing(chars, self.options.float_parsing);
        let mut stack: ParserStack<F> = Stack::new(self.options.max_depth);
        let mut expected = Expectation::DOCUMENT;
        log::debug!("starting parse with {:?}", self.options);

        loop {
            let token = lexer.read_next_token()?;
            let coords = lexer.coords();
            log::trace!("read {} expecting {:?} at {}", token, expected, coords);
            expected = match token {
                Token::EndOfDocument => {
                    if !expected.contains(Expectation::END_DOCUMENT) {
                        return parser_error!(Details::UnexpectedEndOfInput, coords);
                    }
                    let root = match stack.pop() {
                        Some(Frame::Object(object)) => Root::Object(object),
                        Some(Frame::Array(array)) => Root::Value(self.factory.array_value(array)),
                        Some(Frame::Single(value)) => Root::Value(value),
                        _ => return parser_error!(Details::UnexpectedEndOfInput, coords),
                    };
                    if !stack.is_empty() {
                        return parser_error!(Details::UnexpectedEndOfInput, coords);
                    }
                    log::debug!("completed parse of {} chars", coords.absolute);
                    return Ok(root);
                }
                Token::BeginObject => {
                    Self::admit(expected, Expectation::BEGIN_OBJECT, token, coords)?;
                    stack.push(Frame::Object(self.factory.new_object()), coords)?;
                    Expectation::OBJECT_START
                }
                Token::BeginArray => {
                    Self::admit(expected, Expectation::BEGIN_ARRAY, token, coords)?;
                    stack.push(Frame::Array(self.factory.new_array()), coords)?;
                    Expectation::ARRAY_START
                }
                Token::EndObject => {
                    Self::admit(expected, Expectation::END_OBJECT, token, coords)?;
                    match stack.pop() {
                        Some(Frame::Object(object)) if stack.is_empty() => {
                            stack.push(Frame::Object(object), coords)?;
                            Expectation::END_DOCUMENT
                        }
                        Some(Frame::Object(object)) => {
                            let value = self.factory.object_value(object);
                            self.attach(&mut stack, value, coords)?
                        }
                        _ => return Self::unmatched(token, coords),
                    }
                }
                Token::EndArray => {
                    Self::admit(expected, Expectation::END_ARRAY, token, coords)?;
                    match stack.pop() {
                        Some(Frame::Array(array)) if stack.is_empty() => {
                            stack.push(Frame::Array(array), coords)?;
                            Expectation::END_DOCUMENT
                        }
                        Some(Frame::Array(array)) => {
                            let value = self.factory.array_value(array);
                            self.attach(&mut stack, value, coords)?
                        }
                        _ => return Self::unmatched(token, coords),
                    }
                }
                Token::Colon => {
                    Self::admit(expected, Expectation::COLON, token, coords)?;
                    Expectation::AFTER_COLON
                }
                Token::Comma => {
                    Self::admit(expected, Expectation::COMMA, token, coords)?;
                    match stack.top() {
                        Some(Frame::Object(_)) => Expectation::OBJECT_KEY,
                        Some(Frame::Array(_)) => Expectation::AFTER_ARRAY_COMMA,
                        _ => return Self::unmatched(token, coords),
                    }
                }
                Token::Str if expected.contains(Expectation::OBJECT_KEY) => {
                    let key = lexer.read_string()?;
                    stack.push(Frame::ObjectKey(key), coords)?;
                    Expectation::COLON
                }
                Token::Str | Token::Number | Token::Boolean | Token::Null => {
                    Self::admit(expected, Expectation::ANY_VALUE, token, coords)?;
                    let scalar = match token {
                        Token::Str => Scalar::String(lexer.read_string()?),
                        Token::Number => Scalar::Number(lexer.read_number()?),
                        Token::Boolean => Scalar::Boolean(lexer.read_boolean()?),
                        _ => {
                            lexer.read_null()?;
                            Scalar::Null
                        }
                    };
                    let value = self.factory.scalar_value(scalar);
                    self.attach(&mut stack, value, lexer.coords())?
                }
            };
        }
    }

    /// Fold a completed value into whatever is on top of the stack, returning the next
    /// expectation
    fn attach(
        &self,
        stack: &mut ParserStack<F>,
        value: F::Value,
        coords: Coords,
    ) -> ParserResult<Expectation> {
        if let Some(key) = stack.pop_key() {
            return match stack.top_mut() {
                Some(Frame::Object(object)) => {
                    self.factory.insert(object, key, value);
                    Ok(Expectation::OBJECT_NEXT)
                }
                _ => parser_error!(
                    Details::GrammarViolation(format!("unmatched object key \"{}\"", key)),
                    coords
                ),
            };
        }
        if stack.is_empty() {
            stack.push(Frame::Single(value), coords)?;
            return Ok(Expectation::END_DOCUMENT);
        }
        match stack.top_mut() {
            Some(Frame::Array(array)) => {
                self.factory.append(array, value);
                Ok(Expectation::ARRAY_NEXT)
            }
            _ => parser_error!(
                Details::GrammarViolation("unmatched value".to_string()),
                coords
            ),
        }
    }

    /// Check that a token falls within the current expectation
    #[inline]
    fn admit(
        expected: Expectation,
        required: Expectation,
        token: Token,
        coords: Coords,
    ) -> ParserResult<()> {
        if expected.intersects(required) {
            return Ok(());
        }
        parser_error!(
            Details::GrammarViolation(format!("unexpected {}", token)),
            coords
        )
    }

    fn unmatched<T>(token: Token, coords: Coords) -> ParserResult<T> {
        parser_error!(
            Details::GrammarViolation(format!("unmatched {}", token)),
            coords
        )
    }
}
