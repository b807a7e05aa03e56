/* 📖 # What can genio.toml configure?

Everything is optional; a missing file or key falls back to the defaults the
demo has always used.

```toml
work_dir = "/tmp/genio"          # default: TEMP, TMPDIR, home, system temp
resource_root = "resources"      # default: resources/ of the genio_cli crate
block_size = 2048                # <= 0 reads whole files, at most 64 MiB

[search]
file_contains = "1_3"
file_suffix = ".txt"
dir_contains = "fake"

[report]
start_marker = "---"
end_marker = "record(s) selected."
encoding = "ISO-8859-1"

[[report.columns]]               # omit to use the legacy report columns
name = "ID"
width = 7
```
*/

use serde::Deserialize;
use tracing::{debug, instrument};

use genio_base::{FilePath, GenioResult, PalHandle, ResultExt, bail, err};

use crate::charset::{Encoding, charset_for_label};
use crate::consumers::{Column, ColumnSpec, ReportFormat};
use crate::dispatcher::MAX_BLOCK_SIZE;

pub const DEFAULT_BLOCK_SIZE: isize = 2048;

/// Settings of the genio demo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory for the sample files; resolved from the environment if unset.
    pub work_dir: Option<String>,
    /// Directory holding bundled resources.
    pub resource_root: Option<String>,
    /// Block size for binary and text reads, `<= 0` meaning whole file.
    pub block_size: isize,
    pub search: SearchConfig,
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: None,
            resource_root: None,
            block_size: DEFAULT_BLOCK_SIZE,
            search: SearchConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Patterns for the demo's tree searches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub file_contains: String,
    pub file_suffix: String,
    pub dir_contains: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            file_contains: "1_3".to_string(),
            file_suffix: ".txt".to_string(),
            dir_contains: "fake".to_string(),
        }
    }
}

/// Shape and encoding of the report to transform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub start_marker: String,
    pub end_marker: String,
    pub encoding: String,
    /// Empty selects the legacy report columns.
    pub columns: Vec<Column>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            start_marker: ReportFormat::LEGACY_START_MARKER.to_string(),
            end_marker: ReportFormat::LEGACY_END_MARKER.to_string(),
            encoding: "ISO-8859-1".to_string(),
            columns: Vec::new(),
        }
    }
}

impl Config {
    /// Checks the settings serde cannot check on its own.
    pub fn validate(&self) -> GenioResult<()> {
        if usize::try_from(self.block_size).is_ok_and(|size| size > MAX_BLOCK_SIZE) {
            bail!(
                "block_size {} exceeds the maximum of {} bytes",
                self.block_size,
                MAX_BLOCK_SIZE
            );
        }
        Ok(())
    }
}

impl ReportConfig {
    pub fn report_format(&self) -> GenioResult<ReportFormat> {
        let columns = if self.columns.is_empty() {
            ColumnSpec::legacy_report()
        } else {
            ColumnSpec::new(self.columns.clone()).context("Invalid [report] columns")?
        };
        Ok(ReportFormat::new(
            self.start_marker.clone(),
            self.end_marker.clone(),
            columns,
        ))
    }

    pub fn encoding(&self) -> GenioResult<&'static Encoding> {
        charset_for_label(&self.encoding).context("Invalid [report] encoding")
    }
}

/// Loads and parses a TOML configuration file.
#[instrument(skip(pal), fields(path = %path))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> GenioResult<Config> {
    let content = pal.read_file_to_string(path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| err!("Failed to parse config file {}: {}", path, e))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path))?;
    debug!(?config, "loaded config");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the default configuration.
pub fn load_config_or_default(pal: &PalHandle, path: &FilePath) -> GenioResult<Config> {
    if pal.file_exists(path)? {
        load_config(pal, path)
    } else {
        debug!(path = %path, "no config file, using defaults");
        Ok(Config::default())
    }
}
