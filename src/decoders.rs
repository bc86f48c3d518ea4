//! The parser operates over a stream of `char`s produced by some flavour of iterator. When the
//! input is a stream of bytes, a decoder from `chisel-decoders` is placed in front of the
//! [CharReader](crate::reader::CharReader) to turn those bytes into `char`s.
//!
//! The decoders end their iteration on the first undecodable byte, which is indistinguishable
//! from the end of the input. Byte sources are therefore read and checked with [read_source]
//! before any decoding takes place.
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::BufRead;

use crate::coords::Coords;
use crate::errors::{Details, ParserResult};
use crate::reader_error;

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
}

/// Create a boxed `char` iterator over some buffered byte source, decoding with the given
/// [Encoding]
pub(crate) fn decoder_for<'a, Buffer: BufRead>(
    buffer: &'a mut Buffer,
    encoding: Encoding,
) -> Box<dyn Iterator<Item = char> + 'a> {
    log::trace!("selecting {:?} decoder", encoding);
    match encoding {
        Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
        Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
    }
}

/// Read the whole of a byte source, failing with a [Details::StreamFailure] if the read fails
/// or if the bytes aren't valid in the given [Encoding]. The error is positioned at the first
/// offending character.
pub(crate) fn read_source<Buffer: BufRead>(
    buffer: &mut Buffer,
    encoding: Encoding,
) -> ParserResult<Vec<u8>> {
    let mut bytes = vec![];
    if let Err(err) = buffer.read_to_end(&mut bytes) {
        return reader_error!(
            Details::StreamFailure(format!("failed to read input: {}", err)),
            Coords::default()
        );
    }
    let valid_up_to = match encoding {
        Encoding::Utf8 => match std::str::from_utf8(&bytes) {
            Ok(_) => return Ok(bytes),
            Err(err) => err.valid_up_to(),
        },
        Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            None => return Ok(bytes),
            Some(offset) => offset,
        },
    };
    let mut coords = Coords::default();
    String::from_utf8_lossy(&bytes[..valid_up_to])
        .chars()
        .for_each(|c| coords.advance(c));
    log::debug!("invalid {:?} input at byte {}", encoding, valid_up_to);
    reader_error!(
        Details::StreamFailure(format!(
            "invalid {:?} byte 0x{:02x} at offset {}",
            encoding, bytes[valid_up_to], valid_up_to
        )),
        coords
    )
}
