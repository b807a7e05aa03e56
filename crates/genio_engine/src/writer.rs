use std::io::Write;

use tracing::{debug, instrument};

use genio_base::{FilePath, GenioResult, IoResultExt, PalHandle};

use crate::charset::{self, Encoding};

/// Whether a write replaces or extends existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Truncate,
    Append,
}

impl WriteMode {
    pub fn from_append_flag(append: bool) -> Self {
        if append {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        }
    }
}

/// Writes bytes to `path`, creating the file if needed.
///
/// Parent directories are not created.
#[instrument(skip(pal, data), fields(path = %path, len = data.len()))]
pub fn write_bytes(
    pal: &PalHandle,
    path: &FilePath,
    data: &[u8],
    mode: WriteMode,
) -> GenioResult<()> {
    let mut writer = match mode {
        WriteMode::Truncate => pal.create_file(path)?,
        WriteMode::Append => pal.append_file(path)?,
    };
    writer.write_all(data).at_path(path.as_path())?;
    writer.flush().at_path(path.as_path())?;
    debug!("write complete");
    Ok(())
}

/// Encodes `text` and writes it like [`write_bytes`].
pub fn write_text(
    pal: &PalHandle,
    path: &FilePath,
    text: &str,
    encoding: &'static Encoding,
    mode: WriteMode,
) -> GenioResult<()> {
    write_bytes(pal, path, &charset::encode(encoding, text), mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{UTF_8, UTF_16LE, WINDOWS_1252};
    use crate::consumers::{read_all_text, read_first_lines};
    use crate::source::FileSource;
    use genio_base::{ErrorKind, MockPal, RealPal};
    use tempfile::TempDir;

    #[test]
    fn test_truncate_then_append() {
        let mock = MockPal::new();
        let pal = PalHandle::new(mock.clone());
        let path = FilePath::from("out.txt");

        write_text(&pal, &path, "old content", UTF_8, WriteMode::Truncate).unwrap();
        write_text(&pal, &path, "A", UTF_8, WriteMode::Truncate).unwrap();
        write_text(&pal, &path, "B", UTF_8, WriteMode::Append).unwrap();

        assert_eq!(mock.file_content(&path).unwrap(), b"AB");
    }

    #[test]
    fn test_append_creates_missing_file() {
        let mock = MockPal::new();
        let pal = PalHandle::new(mock.clone());
        let path = FilePath::from("fresh.bin");

        write_bytes(&pal, &path, &[1, 2, 3], WriteMode::Append).unwrap();

        assert_eq!(mock.file_content(&path).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_text_is_encoded() {
        let mock = MockPal::new();
        let pal = PalHandle::new(mock.clone());
        let path = FilePath::from("latin1.txt");

        write_text(&pal, &path, "Größe", WINDOWS_1252, WriteMode::Truncate).unwrap();

        assert_eq!(mock.file_content(&path).unwrap(), b"Gr\xF6\xDFe");
    }

    #[test]
    fn test_utf16_text_round_trips() {
        let mock = MockPal::new();
        let pal = PalHandle::new(mock.clone());
        let path = FilePath::from("u16.txt");

        write_text(&pal, &path, "hi", UTF_16LE, WriteMode::Truncate).unwrap();
        assert_eq!(mock.file_content(&path).unwrap(), [104, 0, 105, 0]);

        write_text(&pal, &path, "\nGrüße", UTF_16LE, WriteMode::Append).unwrap();
        let source = FileSource::file("u16.txt");
        assert_eq!(read_all_text(&pal, &source, UTF_16LE).unwrap(), "hi\nGrüße");
        assert_eq!(read_first_lines(&pal, &source, UTF_16LE, 5).unwrap(), ["hi", "Grüße"]);
    }

    #[test]
    fn test_real_filesystem_append() {
        let temp_dir = TempDir::new().unwrap();
        let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));
        let path = FilePath::from("out.txt");

        write_text(&pal, &path, "A", UTF_8, WriteMode::from_append_flag(false)).unwrap();
        write_text(&pal, &path, "B", UTF_8, WriteMode::from_append_flag(true)).unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(content, "AB");
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));

        let err = write_bytes(
            &pal,
            &FilePath::from("no/such/dir/out.bin"),
            b"x",
            WriteMode::Truncate,
        )
        .unwrap_err();

        assert!(matches!(err.kind(), ErrorKind::FileError { .. }));
    }
}
