use std::fmt;

use relative_path::{Component, RelativePathBuf};
use tracing::{debug, instrument};

use genio_base::{ErrorKind, FilePath, GenioError, GenioResult, PalHandle};

/// Directory holding a crate's bundled resource files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoot(FilePath);

impl ResourceRoot {
    /// Name of the resource directory below a crate's manifest directory.
    pub const DEFAULT_DIR: &'static str = "resources";

    pub fn new(dir: impl Into<FilePath>) -> Self {
        Self(dir.into())
    }

    /// The `resources` directory of a crate, typically called with
    /// `env!("CARGO_MANIFEST_DIR")`.
    pub fn for_crate(manifest_dir: &str) -> Self {
        Self(FilePath::from(manifest_dir).join(Self::DEFAULT_DIR))
    }

    pub fn path(&self) -> &FilePath {
        &self.0
    }
}

/// Where a read gets its bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A plain filesystem path, absolute or relative to the PAL base directory.
    Filesystem(FilePath),
    /// A file bundled below a resource root.
    Resource {
        root: ResourceRoot,
        path: RelativePathBuf,
    },
}

impl FileSource {
    pub fn file(path: impl Into<FilePath>) -> Self {
        FileSource::Filesystem(path.into())
    }

    /// A resource identifier such as `/testdata/demo.txt`; the leading `/` is
    /// optional and refers to the resource root.
    pub fn resource(root: &ResourceRoot, path: &str) -> Self {
        FileSource::Resource {
            root: root.clone(),
            path: RelativePathBuf::from(path.trim_start_matches('/')).normalize(),
        }
    }

    /// Resolves the source to one concrete path without touching file contents.
    #[instrument(skip(pal), fields(source = %self))]
    pub fn resolve(&self, pal: &PalHandle) -> GenioResult<FilePath> {
        match self {
            FileSource::Filesystem(path) => Ok(path.clone()),
            FileSource::Resource { root, path } => {
                let not_found = || {
                    Box::new(GenioError::new(ErrorKind::ResourceNotFound {
                        root: root.path().as_path().to_path_buf(),
                        resource: path.to_string(),
                    }))
                };
                if matches!(path.components().next(), Some(Component::ParentDir)) {
                    debug!("resource path escapes its root");
                    return Err(not_found());
                }
                if !pal.directory_exists(root.path())? {
                    debug!(root = %root.path(), "resource root missing");
                    return Err(not_found());
                }
                let resolved = FilePath::from(path.to_path(root.path().as_path()));
                if !pal.file_exists(&resolved)? {
                    debug!(resolved = %resolved, "resource missing");
                    return Err(not_found());
                }
                debug!(resolved = %resolved, "resolved resource");
                Ok(resolved)
            }
        }
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Filesystem(path) => write!(f, "{}", path),
            FileSource::Resource { root, path } => {
                write!(f, "resource:/{} (root {})", path, root.path())
            }
        }
    }
}
