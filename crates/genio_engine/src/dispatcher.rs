/* 📖 # How does a read pass deliver units?

A read pass resolves its source, opens one file handle through the PAL, and
hands each unit to the consumer synchronously and in file order:

| mode                     | units                                        |
|--------------------------|----------------------------------------------|
| `BinaryMode::WholeFile`  | one `&[u8]` with the whole content           |
| `BinaryMode::FixedBlock` | `&[u8]` blocks of exactly n bytes, last shorter |
| `TextMode::WholeFile`    | one `&str` with the whole decoded content    |
| `TextMode::Lines`        | one `&str` per line, terminator stripped     |

`\n`, `\r\n` and a lone `\r` each end a line, whatever the encoding.

A failed read ends the pass with an error. Units delivered before the failure
stay with the consumer; a block or line that was only partly read is dropped.
*/

use std::io::{self, BufRead, BufReader, Read};
use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use genio_base::{GenioResult, IoResultExt, PalHandle, bail};

use crate::charset::{self, Encoding};
use crate::source::FileSource;

/// Largest block a fixed-block read allocates.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024 * 1024;

/// Receives the units of a read pass, one call per unit.
///
/// Implemented for any `FnMut(&U)` closure as well as the collectors in
/// [`crate::consumers`].
pub trait UnitConsumer<U: ?Sized> {
    fn accept(&mut self, unit: &U);
}

impl<U: ?Sized, F> UnitConsumer<U> for F
where
    F: FnMut(&U),
{
    fn accept(&mut self, unit: &U) {
        self(unit)
    }
}

/// Granularity of a binary read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMode {
    WholeFile,
    FixedBlock(NonZeroUsize),
}

impl BinaryMode {
    /// Zero or negative sizes read the whole file, positive sizes read blocks.
    pub fn from_block_size(block_size: isize) -> Self {
        match usize::try_from(block_size).ok().and_then(NonZeroUsize::new) {
            Some(size) => BinaryMode::FixedBlock(size),
            None => BinaryMode::WholeFile,
        }
    }
}

/// Granularity of a text read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    WholeFile,
    Lines,
}

impl TextMode {
    /// Zero or negative sizes read the whole file, any positive size reads lines.
    pub fn from_block_size(block_size: isize) -> Self {
        if block_size > 0 {
            TextMode::Lines
        } else {
            TextMode::WholeFile
        }
    }
}

/// Reads a file as bytes and returns the number of units delivered.
#[instrument(skip(pal, consumer), fields(source = %source))]
pub fn read_binary<C>(
    pal: &PalHandle,
    source: &FileSource,
    mode: BinaryMode,
    consumer: &mut C,
) -> GenioResult<usize>
where
    C: UnitConsumer<[u8]> + ?Sized,
{
    let path = source.resolve(pal)?;
    let mut reader = pal.read_file(&path)?;
    let units = match mode {
        BinaryMode::WholeFile => {
            let mut content = Vec::new();
            reader.read_to_end(&mut content).at_path(path.as_path())?;
            consumer.accept(&content);
            1
        }
        BinaryMode::FixedBlock(size) => {
            if size.get() > MAX_BLOCK_SIZE {
                bail!(
                    "Block size {} exceeds the maximum of {} bytes",
                    size,
                    MAX_BLOCK_SIZE
                );
            }
            let mut buffer = vec![0u8; size.get()];
            let mut units = 0;
            loop {
                let filled = fill_block(&mut reader, &mut buffer).at_path(path.as_path())?;
                if filled == 0 {
                    break;
                }
                consumer.accept(&buffer[..filled]);
                units += 1;
                if filled < buffer.len() {
                    break;
                }
            }
            units
        }
    };
    debug!(units, "binary read complete");
    Ok(units)
}

/// Reads a file as text in the given encoding and returns the number of units
/// delivered.
#[instrument(skip(pal, consumer), fields(source = %source, encoding = encoding.name()))]
pub fn read_text<C>(
    pal: &PalHandle,
    source: &FileSource,
    encoding: &'static Encoding,
    mode: TextMode,
    consumer: &mut C,
) -> GenioResult<usize>
where
    C: UnitConsumer<str> + ?Sized,
{
    let path = source.resolve(pal)?;
    let mut reader = pal.read_file(&path)?;
    let units = match mode {
        TextMode::WholeFile => {
            let mut content = Vec::new();
            reader.read_to_end(&mut content).at_path(path.as_path())?;
            consumer.accept(&charset::decode(encoding, &content));
            1
        }
        TextMode::Lines if encoding.is_ascii_compatible() => {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();
            let mut after_cr = false;
            let mut units = 0;
            while read_line(&mut reader, &mut line, &mut after_cr).at_path(path.as_path())? {
                consumer.accept(&charset::decode(encoding, &line));
                units += 1;
            }
            units
        }
        TextMode::Lines => {
            // Line breaks of UTF-16 and friends are only visible after decoding
            let mut content = Vec::new();
            reader.read_to_end(&mut content).at_path(path.as_path())?;
            let text = charset::decode(encoding, &content);
            let mut units = 0;
            for line in split_lines(&text) {
                consumer.accept(line);
                units += 1;
            }
            units
        }
    };
    debug!(units, "text read complete");
    Ok(units)
}

/// Reads until `buffer` is full or the input ends; returns the bytes read.
fn fill_block(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads the next line into `line` without its terminator. Returns false once
/// the input is exhausted.
///
/// `after_cr` carries over between calls; a `\n` right after a `\r` is skipped
/// at the start of the next call.
fn read_line(
    reader: &mut impl BufRead,
    line: &mut Vec<u8>,
    after_cr: &mut bool,
) -> io::Result<bool> {
    line.clear();
    let mut read_any = false;
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(read_any);
        }
        if std::mem::take(after_cr) && available[0] == b'\n' {
            reader.consume(1);
            continue;
        }
        read_any = true;
        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                line.extend_from_slice(&available[..end]);
                *after_cr = available[end] == b'\r';
                reader.consume(end + 1);
                return Ok(true);
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

/// Splits decoded text the way [`read_line`] splits bytes.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(end) => {
                lines.push(&rest[..end]);
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}
