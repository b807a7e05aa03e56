/* 📖 # How does a fixed-width report become CSV?

Database tools print query results as padded columns between a dashed ruler
line and a trailing `n record(s) selected.` summary:

```text
SOME HEADER TEXT
YAYTOPA 6              ...
------- -------------- ...
1234567 ABCDEFGHIJ     ...
1 record(s) selected.
```

The transformer ignores everything up to the ruler, slices each following line
by the column widths until the summary line, and emits the trimmed fields
joined with `;`. Each column occupies its width plus one separating space.
Report senders do not pad the last column, so every slice is clamped to the
end of the line; columns past the end come out empty.

Slicing counts characters, so umlauts in a Latin-1 report keep their columns
after decoding.
*/

use serde::Deserialize;
use tracing::trace;

use genio_base::{GenioResult, bail};

use crate::dispatcher::UnitConsumer;

/// Separator placed between the fields of one record.
pub const FIELD_SEPARATOR: char = ';';

/// One named column of a fixed-width report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    pub name: String,
    pub width: usize,
}

impl Column {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Ordered columns of a report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

/// Columns of the legacy partner export.
const LEGACY_COLUMNS: &[(&str, usize)] = &[
    ("YAYTOPA", 7),
    ("6", 14),
    ("YUNAASOENA", 10),
    ("EUUNESNAEESO", 12),
    ("PE_NENA", 45),
    ("APNR", 6),
    ("EE", 12),
    ("EUUNESANAETUN", 13),
    ("ANTOESSUNTSAETUN", 16),
    ("ARARTNRS", 8),
    ("ARARTNRSAETUN", 13),
    ("ASNR_PETRANT", 13),
    ("NENA_PETRANT", 46),
    ("TAYAET_PETRANT", 14),
    ("TASASO_PETRANT", 14),
    ("ASNR_AARSRASARTAR", 17),
    ("NENA_AARSRASARTAR", 46),
    ("TAYAET_AARSRASARTAR", 19),
    ("TASASO_AARSRASARTAR", 19),
    ("STREßA", 34),
    ("POE", 8),
    ("ORT", 23),
    ("URSEASA", 22),
    ("URANAAARSASUOAAN", 16),
    ("AERT", 4),
    ("ARET", 4),
    ("ARETU6", 6),
    ("ARETU6", 6),
    ("ARETTAAT", 200),
];

impl ColumnSpec {
    pub fn new(columns: Vec<Column>) -> GenioResult<Self> {
        if columns.is_empty() {
            bail!("A column spec needs at least one column");
        }
        if let Some(column) = columns.iter().find(|column| column.width == 0) {
            bail!("Column '{}' has zero width", column.name);
        }
        Ok(Self { columns })
    }

    /// Unnamed columns, named by their 1-based position.
    pub fn from_widths(widths: &[usize]) -> GenioResult<Self> {
        Self::new(
            widths
                .iter()
                .enumerate()
                .map(|(index, width)| Column::new(format!("column{}", index + 1), *width))
                .collect(),
        )
    }

    pub fn legacy_report() -> Self {
        Self {
            columns: LEGACY_COLUMNS
                .iter()
                .map(|(name, width)| Column::new(*name, *width))
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Characters a fully padded line occupies, separators included.
    pub fn line_width(&self) -> usize {
        self.columns.iter().map(|column| column.width + 1).sum()
    }
}

/// Markers and columns describing one kind of report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    /// A line starting with this opens the data block.
    pub start_marker: String,
    /// A line containing this closes the data block.
    pub end_marker: String,
    pub columns: ColumnSpec,
}

impl ReportFormat {
    pub const LEGACY_START_MARKER: &'static str = "---";
    pub const LEGACY_END_MARKER: &'static str = "record(s) selected.";

    pub fn new(
        start_marker: impl Into<String>,
        end_marker: impl Into<String>,
        columns: ColumnSpec,
    ) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            columns,
        }
    }

    /// Legacy markers with custom columns.
    pub fn with_columns(columns: ColumnSpec) -> Self {
        Self::new(Self::LEGACY_START_MARKER, Self::LEGACY_END_MARKER, columns)
    }
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::with_columns(ColumnSpec::legacy_report())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    OutsideBlock,
    InsideBlock,
}

/// Line consumer turning the data block of a fixed-width report into
/// `;`-separated records.
#[derive(Debug)]
pub struct FixedWidthToCsv {
    format: ReportFormat,
    state: BlockState,
    records: Vec<String>,
}

impl FixedWidthToCsv {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            state: BlockState::OutsideBlock,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }

    pub fn into_records(self) -> Vec<String> {
        self.records
    }

    pub fn is_inside_block(&self) -> bool {
        self.state == BlockState::InsideBlock
    }

    /// Joins all records holding at least one non-empty field, each followed
    /// by `line_separator`.
    pub fn to_csv_document(&self, line_separator: &str) -> String {
        let mut document = String::new();
        for record in self.records.iter().filter(|record| !is_blank(record)) {
            document.push_str(record);
            document.push_str(line_separator);
        }
        document
    }

    fn convert_line(&self, line: &str) -> String {
        let mut fields = Vec::with_capacity(self.format.columns.columns.len());
        let mut rest = line;
        for column in &self.format.columns.columns {
            let split = rest
                .char_indices()
                .nth(column.width + 1)
                .map_or(rest.len(), |(index, _)| index);
            let (field, tail) = rest.split_at(split);
            let field = field.trim();
            trace!(column = %column.name, field, "sliced field");
            fields.push(field);
            rest = tail;
        }
        fields.join(&FIELD_SEPARATOR.to_string())
    }
}

impl Default for FixedWidthToCsv {
    fn default() -> Self {
        Self::new(ReportFormat::default())
    }
}

impl UnitConsumer<str> for FixedWidthToCsv {
    fn accept(&mut self, line: &str) {
        match self.state {
            BlockState::OutsideBlock => {
                if line.starts_with(&self.format.start_marker) {
                    self.state = BlockState::InsideBlock;
                }
            }
            BlockState::InsideBlock => {
                if line.contains(&self.format.end_marker) {
                    self.state = BlockState::OutsideBlock;
                } else {
                    let record = self.convert_line(line);
                    self.records.push(record);
                }
            }
        }
    }
}

fn is_blank(record: &str) -> bool {
    record.chars().all(|c| c == FIELD_SEPARATOR || c.is_whitespace())
}
