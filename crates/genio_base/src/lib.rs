/* 📖 # What lives in genio_base?

genio_base holds the pieces every other genio crate builds on: the error type,
tracing setup and the Platform Abstraction Layer (PAL) through which all
filesystem access goes.
*/

pub mod error;
mod error_tests;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, GenioError, GenioResult, IoResultExt, ResultExt};
pub use pal::{DirEntry, EntryKind, FilePath, MockPal, Pal, PalHandle, ReadSeek, RealPal};
