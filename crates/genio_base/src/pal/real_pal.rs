use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::{GenioError, GenioResult, IoResultExt};

use super::FilePath;
use super::traits::{DirEntry, EntryKind, Pal, ReadSeek};

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// Relative paths are resolved against the configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to a concrete filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> GenioResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_file();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn directory_exists(&self, path: &FilePath) -> GenioResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_dir();
        debug!(exists, resolved = %resolved.display(), "checked directory existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> GenioResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(GenioError::file_error(&resolved, e))
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(GenioError::file_error(&resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn append_file(&self, path: &FilePath) -> GenioResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for appending");
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&resolved)
            .map_err(|e| {
                debug!(error = %e, "failed to open file for appending");
                Box::new(GenioError::file_error(&resolved, e))
            })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath) -> GenioResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        fs::create_dir_all(&resolved).at_path(&resolved)?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn walk_directory(
        &self,
        path: &FilePath,
    ) -> GenioResult<Box<dyn Iterator<Item = GenioResult<DirEntry>> + '_>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "starting directory walk");

        let metadata = fs::metadata(&resolved).at_path(&resolved)?;
        if !metadata.is_dir() {
            return Err(Box::new(GenioError::file_error(
                &resolved,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            )));
        }

        // Entries are reported under the path the caller passed in, not the resolved one
        let base_path = path.clone();
        let iter = WalkDir::new(&resolved)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(e) => {
                    let relative = e.path().strip_prefix(&resolved).ok()?;
                    let entry_path = if relative.as_os_str().is_empty() {
                        base_path.clone()
                    } else {
                        base_path.join(relative)
                    };
                    let file_type = e.file_type();
                    let kind = if file_type.is_dir() {
                        EntryKind::Directory
                    } else if file_type.is_file() {
                        EntryKind::File
                    } else if file_type.is_symlink()
                        && fs::metadata(e.path()).is_ok_and(|target| target.is_file())
                    {
                        EntryKind::File
                    } else {
                        EntryKind::Other
                    };
                    Some(Ok(DirEntry {
                        path: entry_path,
                        kind,
                        depth: e.depth(),
                    }))
                }
                Err(e) => {
                    debug!(error = %e, "error walking directory");
                    let failed_path = e
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| PathBuf::from("unknown"));
                    Some(Err(Box::new(GenioError::file_error(
                        failed_path,
                        std::io::Error::other(e.to_string()),
                    ))))
                }
            });

        Ok(Box::new(iter))
    }
}
