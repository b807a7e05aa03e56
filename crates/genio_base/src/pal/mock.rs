use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

use crate::{GenioError, GenioResult};

use super::FilePath;
use super::traits::{DirEntry, EntryKind, Pal, ReadSeek};

/* 📖 # How does MockPal store its filesystem?

Files and directories live in ordered maps behind `Arc<Mutex<_>>`, so clones
of one MockPal share state and walks come out in path order. Adding a file also
registers every ancestor directory.

Two failure hooks exist for exercising error paths: a file can be set to fail
after a number of bytes have been read, and a path can be set to fail when a
directory walk reaches it.
*/

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use genio_base::{MockPal, Pal, FilePath};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("test.txt"), b"content".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("test.txt")).unwrap();
/// assert_eq!(content, "content");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPal {
    files: Arc<Mutex<BTreeMap<FilePath, Vec<u8>>>>,
    directories: Arc<Mutex<BTreeSet<FilePath>>>,
    read_failures: Arc<Mutex<BTreeMap<FilePath, usize>>>,
    walk_failures: Arc<Mutex<HashSet<FilePath>>>,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the mock storage, registering its parent directories.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.register_ancestors(&path);
        self.files.lock().unwrap().insert(path, content);
    }

    /// Add a directory (and its ancestors) to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.register_ancestors(&path);
        self.directories.lock().unwrap().insert(path);
    }

    /// Make reads of `path` fail once `after_bytes` bytes have been handed out.
    pub fn fail_reads_after(&self, path: FilePath, after_bytes: usize) {
        self.read_failures.lock().unwrap().insert(path, after_bytes);
    }

    /// Make directory walks yield an error in place of `path`.
    pub fn fail_walk_at(&self, path: FilePath) {
        self.walk_failures.lock().unwrap().insert(path);
    }

    /// Current content of a file, if present.
    pub fn file_content(&self, path: &FilePath) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn register_ancestors(&self, path: &FilePath) {
        let mut directories = self.directories.lock().unwrap();
        for ancestor in path.as_path().ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                directories.insert(FilePath::from(ancestor));
            }
        }
    }

    fn not_found(path: &FilePath, what: &str) -> Box<GenioError> {
        Box::new(GenioError::file_error(
            path.as_path(),
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found: {}", what, path)),
        ))
    }

    fn writer(&self, path: &FilePath, initial: Vec<u8>) -> Box<dyn Write> {
        self.register_ancestors(path);
        Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: initial,
        })
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> GenioResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn directory_exists(&self, path: &FilePath) -> GenioResult<bool> {
        Ok(self.directories.lock().unwrap().contains(path))
    }

    fn read_file(&self, path: &FilePath) -> GenioResult<Box<dyn ReadSeek + 'static>> {
        let content = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path, "File"))?;
        let fail_after = self.read_failures.lock().unwrap().get(path).copied();
        match fail_after {
            Some(limit) => Ok(Box::new(FailingReader {
                inner: Cursor::new(content),
                limit,
            })),
            None => Ok(Box::new(Cursor::new(content))),
        }
    }

    fn create_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>> {
        Ok(self.writer(path, Vec::new()))
    }

    fn append_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>> {
        let existing = self.file_content(path).unwrap_or_default();
        Ok(self.writer(path, existing))
    }

    fn create_directory_all(&self, path: &FilePath) -> GenioResult<()> {
        self.add_directory(path.clone());
        Ok(())
    }

    fn walk_directory(
        &self,
        path: &FilePath,
    ) -> GenioResult<Box<dyn Iterator<Item = GenioResult<DirEntry>> + '_>> {
        if !self.directory_exists(path)? {
            return Err(Self::not_found(path, "Directory"));
        }
        let root_depth = path.depth();
        let mut entries: Vec<(FilePath, EntryKind)> = self
            .directories
            .lock()
            .unwrap()
            .iter()
            .filter(|dir| dir.as_path().starts_with(path.as_path()))
            .map(|dir| (dir.clone(), EntryKind::Directory))
            .collect();
        entries.extend(
            self.files
                .lock()
                .unwrap()
                .keys()
                .filter(|file| file.as_path().starts_with(path.as_path()))
                .map(|file| (file.clone(), EntryKind::File)),
        );
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let failures = self.walk_failures.lock().unwrap().clone();
        let iter = entries.into_iter().map(move |(entry_path, kind)| {
            if failures.contains(&entry_path) {
                return Err(Box::new(GenioError::file_error(
                    entry_path.as_path(),
                    io::Error::new(io::ErrorKind::PermissionDenied, "walk failure injected"),
                )));
            }
            let depth = entry_path.depth() - root_depth;
            Ok(DirEntry {
                path: entry_path,
                kind,
                depth,
            })
        });
        Ok(Box::new(iter))
    }
}

/// Helper struct for writing files to MockPal; content is stored on drop.
struct MockFileWriter {
    path: FilePath,
    files: Arc<Mutex<BTreeMap<FilePath, Vec<u8>>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files
            .lock()
            .unwrap()
            .insert(self.path.clone(), std::mem::take(&mut self.buffer));
    }
}

/// Reader that errors once `limit` bytes have been handed out.
struct FailingReader {
    inner: Cursor<Vec<u8>>,
    limit: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let position = self.inner.position() as usize;
        if position >= self.limit {
            return Err(io::Error::other("read failure injected"));
        }
        let allowed = (self.limit - position).min(buf.len());
        self.inner.read(&mut buf[..allowed])
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_exists() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("dir/test.txt"), b"content".to_vec());

        assert!(pal.file_exists(&FilePath::from("dir/test.txt")).unwrap());
        assert!(!pal.file_exists(&FilePath::from("other.txt")).unwrap());
        assert!(pal.directory_exists(&FilePath::from("dir")).unwrap());
    }

    #[test]
    fn test_read_file_not_found() {
        let pal = MockPal::new();
        assert!(pal.read_file(&FilePath::from("missing.txt")).is_err());
    }

    #[test]
    fn test_create_then_append() {
        let pal = MockPal::new();
        let path = FilePath::from("out.txt");
        pal.create_file(&path).unwrap().write_all(b"A").unwrap();
        pal.append_file(&path).unwrap().write_all(b"B").unwrap();
        pal.append_file(&path).unwrap().write_all(b"C").unwrap();
        assert_eq!(pal.file_content(&path).unwrap(), b"ABC");

        pal.create_file(&path).unwrap().write_all(b"Z").unwrap();
        assert_eq!(pal.file_content(&path).unwrap(), b"Z");
    }

    #[test]
    fn test_failing_reader_stops_at_limit() {
        let pal = MockPal::new();
        let path = FilePath::from("flaky.bin");
        pal.add_file(path.clone(), b"0123456789".to_vec());
        pal.fail_reads_after(path.clone(), 4);

        let mut reader = pal.read_file(&path).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"0123");
        assert!(reader.read(&mut buf).is_err());
    }

    #[test]
    fn test_walk_directory_lists_root_first() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("root/d2"));
        pal.add_file(FilePath::from("root/f1"), vec![]);
        pal.add_file(FilePath::from("root/d1/f2"), vec![]);
        pal.add_file(FilePath::from("elsewhere/f3"), vec![]);

        let listing: Vec<String> = pal
            .walk_directory(&FilePath::from("root"))
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                format!("{}:{:?}:{}", entry.path, entry.kind, entry.depth)
            })
            .collect();

        assert_eq!(
            listing,
            [
                "root:Directory:0",
                "root/d1:Directory:1",
                "root/d1/f2:File:2",
                "root/d2:Directory:1",
                "root/f1:File:1",
            ]
        );
    }

    #[test]
    fn test_walk_directory_injected_failure() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("root/ok"), vec![]);
        pal.add_file(FilePath::from("root/locked"), vec![]);
        pal.fail_walk_at(FilePath::from("root/locked"));

        let results: Vec<_> = pal.walk_directory(&FilePath::from("root")).unwrap().collect();
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_walk_directory_missing_root() {
        let pal = MockPal::new();
        assert!(pal.walk_directory(&FilePath::from("nope")).is_err());
    }
}
