/* 📖 # What does genio_engine do?

genio_engine implements file access on top of the PAL: resolving plain and
bundled files, read passes that hand whole files, fixed-size blocks or lines to
a consumer, writing, directory walks and the ready-made consumers, including
the fixed-width report to CSV transformer.
*/

pub mod charset;
pub mod config;
pub mod consumers;
pub mod dispatcher;
pub mod source;
pub mod tree;
pub mod writer;

pub use charset::{Encoding, UTF_8, WINDOWS_1252, charset_for_label};
pub use config::{
    Config, DEFAULT_BLOCK_SIZE, ReportConfig, SearchConfig, load_config, load_config_or_default,
};
pub use consumers::{
    Column, ColumnSpec, FIELD_SEPARATOR, FirstNLinesCollector, FixedWidthToCsv, LineCounter,
    ReportFormat, WholeBinaryCollector, WholeTextCollector, count_lines, read_all_bytes,
    read_all_text, read_first_lines, transform_report,
};
pub use dispatcher::{
    BinaryMode, MAX_BLOCK_SIZE, TextMode, UnitConsumer, read_binary, read_text,
};
pub use source::{FileSource, ResourceRoot};
pub use tree::{DirectoryTree, dirs_containing, files_containing, files_ending_with, outline, walk};
pub use writer::{WriteMode, write_bytes, write_text};
