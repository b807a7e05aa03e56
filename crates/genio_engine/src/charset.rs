use std::borrow::Cow;

pub use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};

use genio_base::{GenioResult, err};

/// Looks up an encoding by its WHATWG label, e.g. `"utf-8"` or `"ISO-8859-1"`.
///
/// Note that the WHATWG rules map the Latin-1 labels to windows-1252.
pub fn charset_for_label(label: &str) -> GenioResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| err!("Unknown character encoding '{}'", label))
}

/// Decodes bytes, keeping any byte order mark and replacing malformed
/// sequences with U+FFFD.
pub fn decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    encoding.decode_without_bom_handling(bytes).0
}

/// Encodes text without a byte order mark. Characters the encoding cannot
/// represent are written as numeric character references.
pub fn encode<'a>(encoding: &'static Encoding, text: &'a str) -> Cow<'a, [u8]> {
    // encoding_rs only encodes to UTF-16 as UTF-8
    if encoding == UTF_16LE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
    } else if encoding == UTF_16BE {
        Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
    } else {
        encoding.encode(text).0
    }
}
