use std::path::{Path, PathBuf};

/// A filesystem path as seen by a PAL implementation.
///
/// Relative paths are resolved against the PAL's base directory, absolute
/// paths are used as they are.
///
/// # Examples
///
/// ```
/// use genio_base::FilePath;
///
/// let path1 = FilePath::from("testdata/sample.txt");
/// let path2 = FilePath::from(String::from("/tmp/out.txt"));
/// assert!(path2.is_absolute());
/// assert_eq!(path1.join("x").to_string(), "testdata/sample.txt/x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(PathBuf);

impl FilePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, child: impl AsRef<Path>) -> FilePath {
        Self(self.0.join(child))
    }

    pub fn is_absolute(&self) -> bool {
        self.0.is_absolute()
    }

    /// Number of path components, used for indenting tree listings.
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    /// Final component of the path, or the whole path if there is none.
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.to_string())
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<PathBuf> for FilePath {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for FilePath {
    fn from(p: &Path) -> Self {
        Self(p.to_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
