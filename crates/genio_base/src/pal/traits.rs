use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::GenioResult;
use crate::IoResultExt;

use super::file_path::FilePath;

/// Trait combining Read + Seek for file operations.
///
/// Lets implementations hand out real files or in-memory buffers behind the
/// same opaque handle.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// What kind of filesystem entry a walk produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Special files and symlinks to anything but a regular file; not followed.
    Other,
}

/// One entry yielded by [`Pal::walk_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: FilePath,
    pub kind: EntryKind,
    /// 0 for the walk root, 1 for its direct children, and so on.
    pub depth: usize,
}

/// Platform Abstraction Layer (PAL) trait providing filesystem operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs` and `walkdir`
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a regular file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> GenioResult<bool>;

    /// Check if a directory exists at the given path.
    fn directory_exists(&self, path: &FilePath) -> GenioResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> GenioResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> GenioResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).at_path(path.as_path())?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Create a new file, truncating it if it exists.
    fn create_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>>;

    /// Open a file for appending, creating it if it does not exist.
    fn append_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>>;

    /// Create a directory and all parent directories.
    fn create_directory_all(&self, path: &FilePath) -> GenioResult<()>;

    /// Walk a directory tree top-down, starting with the root itself.
    ///
    /// Fails up front if the root cannot be read. Failures on individual
    /// entries below the root are yielded as `Err` items so callers can decide
    /// whether to skip them.
    fn walk_directory(
        &self,
        path: &FilePath,
    ) -> GenioResult<Box<dyn Iterator<Item = GenioResult<DirEntry>> + '_>>;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use genio_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pal::mock::MockPal;

    #[test]
    fn test_pal_handle_clone_shares_state() {
        let mock = MockPal::new();
        let pal = PalHandle::new(mock.clone());
        let pal_clone = pal.clone();
        mock.add_file(FilePath::from("late.txt"), b"x".to_vec());
        assert!(pal_clone.file_exists(&FilePath::from("late.txt")).unwrap());
    }
}
