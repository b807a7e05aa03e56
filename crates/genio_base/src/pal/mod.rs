/* 📖 # What is the Platform Abstraction Layer?

The PAL is a trait-based seam over filesystem access. Everything in genio that
opens, writes or walks files goes through a `Pal`:
- `RealPal` talks to the real filesystem relative to a base directory
- `MockPal` keeps files in memory and can inject read and walk failures
*/

mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{DirEntry, EntryKind, Pal, PalHandle, ReadSeek};
