/* 📖 # Why both collectors and helper functions?

The collectors are consumers for callers who drive a read pass themselves,
for example to stream blocks into a file or to inspect a transformer's state
mid-way. Most callers only want the result, so each collector also has a
helper that runs the pass and hands back an owned value.
*/

mod collectors;
mod fixed_width;

pub use collectors::{FirstNLinesCollector, LineCounter, WholeBinaryCollector, WholeTextCollector};
pub use fixed_width::{Column, ColumnSpec, FIELD_SEPARATOR, FixedWidthToCsv, ReportFormat};

use genio_base::{GenioResult, PalHandle};

use crate::charset::Encoding;
use crate::dispatcher::{BinaryMode, TextMode, read_binary, read_text};
use crate::source::FileSource;

/// The whole content of a file; the mode only changes how it is read.
pub fn read_all_bytes(
    pal: &PalHandle,
    source: &FileSource,
    mode: BinaryMode,
) -> GenioResult<Vec<u8>> {
    let mut collector = WholeBinaryCollector::new();
    read_binary(pal, source, mode, &mut collector)?;
    Ok(collector.into_data())
}

/// The whole decoded content of a file.
pub fn read_all_text(
    pal: &PalHandle,
    source: &FileSource,
    encoding: &'static Encoding,
) -> GenioResult<String> {
    let mut collector = WholeTextCollector::new();
    read_text(pal, source, encoding, TextMode::WholeFile, &mut collector)?;
    Ok(collector.into_text())
}

/// Up to `limit` leading lines of a file. The file is still read to the end.
pub fn read_first_lines(
    pal: &PalHandle,
    source: &FileSource,
    encoding: &'static Encoding,
    limit: usize,
) -> GenioResult<Vec<String>> {
    let mut collector = FirstNLinesCollector::new(limit);
    read_text(pal, source, encoding, TextMode::Lines, &mut collector)?;
    Ok(collector.into_lines())
}

pub fn count_lines(
    pal: &PalHandle,
    source: &FileSource,
    encoding: &'static Encoding,
) -> GenioResult<usize> {
    let mut counter = LineCounter::new();
    read_text(pal, source, encoding, TextMode::Lines, &mut counter)?;
    Ok(counter.count())
}

/// Reads a fixed-width report line by line and returns its records.
pub fn transform_report(
    pal: &PalHandle,
    source: &FileSource,
    encoding: &'static Encoding,
    format: ReportFormat,
) -> GenioResult<Vec<String>> {
    let mut transformer = FixedWidthToCsv::new(format);
    read_text(pal, source, encoding, TextMode::Lines, &mut transformer)?;
    Ok(transformer.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{UTF_8, WINDOWS_1252};
    use genio_base::{FilePath, MockPal};
    use std::num::NonZeroUsize;

    fn pal_with(path: &str, content: &[u8]) -> PalHandle {
        let mock = MockPal::new();
        mock.add_file(FilePath::from(path), content.to_vec());
        PalHandle::new(mock)
    }

    #[test]
    fn test_read_all_bytes_same_for_every_mode() {
        let content: Vec<u8> = (0..100u8).collect();
        let pal = pal_with("data.bin", &content);
        let source = FileSource::file("data.bin");

        for mode in [
            BinaryMode::WholeFile,
            BinaryMode::FixedBlock(NonZeroUsize::new(7).unwrap()),
            BinaryMode::from_block_size(2048),
        ] {
            assert_eq!(read_all_bytes(&pal, &source, mode).unwrap(), content);
        }
    }

    #[test]
    fn test_read_all_text() {
        let pal = pal_with("text.txt", b"Gr\xFC\xDFe\nLine 2\n");
        let text = read_all_text(&pal, &FileSource::file("text.txt"), WINDOWS_1252).unwrap();
        assert_eq!(text, "Grüße\nLine 2\n");
    }

    #[test]
    fn test_first_lines_and_count() {
        let pal = pal_with("lines.txt", b"1\n2\n3\n4\n5\n");
        let source = FileSource::file("lines.txt");

        assert_eq!(read_first_lines(&pal, &source, UTF_8, 1).unwrap(), ["1"]);
        assert_eq!(read_first_lines(&pal, &source, UTF_8, 3).unwrap(), ["1", "2", "3"]);
        assert_eq!(read_first_lines(&pal, &source, UTF_8, 10).unwrap().len(), 5);
        assert_eq!(count_lines(&pal, &source, UTF_8).unwrap(), 5);
    }

    #[test]
    fn test_transform_report_from_file() {
        let pal = pal_with(
            "report.txt",
            b"SELECT ...\nA   B\n--- ---\nx1  y1\nx2  y2\n2 record(s) selected.\n",
        );
        let format = ReportFormat::with_columns(ColumnSpec::from_widths(&[3, 3]).unwrap());

        let records =
            transform_report(&pal, &FileSource::file("report.txt"), UTF_8, format).unwrap();

        assert_eq!(records, ["x1;y1", "x2;y2"]);
    }

    #[test]
    fn test_helpers_propagate_errors() {
        let pal = PalHandle::new(MockPal::new());
        let source = FileSource::file("missing.txt");
        assert!(read_all_text(&pal, &source, UTF_8).is_err());
        assert!(count_lines(&pal, &source, UTF_8).is_err());
        assert!(transform_report(&pal, &source, UTF_8, ReportFormat::default()).is_err());
    }
}
