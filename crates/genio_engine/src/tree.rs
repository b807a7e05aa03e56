/* 📖 # How are directory walks made fail-tolerant?

Only the walk root has to be readable. Every entry below it that cannot be
visited (permissions, a file vanishing mid-walk) is logged at `warn` and
skipped, so one bad subdirectory never hides the rest of the tree. The filtered
searches are plain full walks with a predicate on the path string.
*/

use std::fmt::Write as _;

use tracing::{debug, instrument, warn};

use genio_base::{DirEntry, EntryKind, FilePath, GenioResult, PalHandle};

/// Files and directories found by one walk, in traversal order.
///
/// # Examples
/// ```no_run
/// use genio_base::{FilePath, PalHandle, RealPal};
/// use genio_engine::walk;
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let tree = walk(&pal, &FilePath::from("src")).unwrap();
/// println!("{} files in {} directories", tree.files.len(), tree.directories.len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTree {
    pub files: Vec<FilePath>,
    /// Starts with the walk root itself.
    pub directories: Vec<FilePath>,
}

/// Walks `root` top-down, collecting regular files and directories.
///
/// A symlink to a regular file counts as a file. Other symlinks and special
/// files are neither followed nor reported.
#[instrument(skip(pal), fields(root = %root))]
pub fn walk(pal: &PalHandle, root: &FilePath) -> GenioResult<DirectoryTree> {
    let mut tree = DirectoryTree::default();
    for entry in visit(pal, root)? {
        match entry.kind {
            EntryKind::File => tree.files.push(entry.path),
            EntryKind::Directory => tree.directories.push(entry.path),
            EntryKind::Other => {}
        }
    }
    debug!(
        files = tree.files.len(),
        directories = tree.directories.len(),
        "walk complete"
    );
    Ok(tree)
}

/// Paths of all files below `root` whose path contains `needle`.
pub fn files_containing(
    pal: &PalHandle,
    root: &FilePath,
    needle: &str,
) -> GenioResult<Vec<String>> {
    search(pal, root, EntryKind::File, |path| path.contains(needle))
}

/// Paths of all files below `root` whose path ends with `suffix`.
pub fn files_ending_with(
    pal: &PalHandle,
    root: &FilePath,
    suffix: &str,
) -> GenioResult<Vec<String>> {
    search(pal, root, EntryKind::File, |path| path.ends_with(suffix))
}

/// Paths of all directories below and including `root` whose path contains
/// `needle`.
pub fn dirs_containing(
    pal: &PalHandle,
    root: &FilePath,
    needle: &str,
) -> GenioResult<Vec<String>> {
    search(pal, root, EntryKind::Directory, |path| path.contains(needle))
}

/// Renders the tree below `root` with two spaces of indentation per level,
/// directories marked with a trailing `/`.
#[instrument(skip(pal), fields(root = %root))]
pub fn outline(pal: &PalHandle, root: &FilePath) -> GenioResult<String> {
    let mut rendered = String::new();
    for entry in visit(pal, root)? {
        let name = if entry.depth == 0 {
            entry.path.to_string()
        } else {
            entry.path.file_name()
        };
        let marker = match entry.kind {
            EntryKind::Directory => "/",
            EntryKind::File => "",
            EntryKind::Other => "@",
        };
        // Writing to a String cannot fail
        let _ = writeln!(rendered, "{}{}{}", "  ".repeat(entry.depth), name, marker);
    }
    Ok(rendered)
}

fn search(
    pal: &PalHandle,
    root: &FilePath,
    kind: EntryKind,
    predicate: impl Fn(&str) -> bool,
) -> GenioResult<Vec<String>> {
    Ok(visit(pal, root)?
        .into_iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.path.to_string())
        .filter(|path| predicate(path))
        .collect())
}

/// All readable entries below `root`; unreadable ones are logged and dropped.
fn visit(pal: &PalHandle, root: &FilePath) -> GenioResult<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in pal.walk_directory(root)? {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(error = %err, "skipping unreadable entry"),
        }
    }
    Ok(entries)
}
