/* 📖 # What does the genio demo do?

`genio` walks through every file access path of genio_engine once and prints
what it sees. There is no argument parsing; an optional `genio.toml` in the
current directory adjusts the work directory, block size, search patterns and
report format (see `genio_engine::config`).

The demo
1. picks a work directory (config, then `TEMP`, `TMPDIR`, the home directory
   and finally the system temp directory) and creates its sample files there,
2. reads a plain file and a bundled resource whole, line by line and in blocks,
3. writes `out.txt` once truncating and once appending,
4. walks and searches a small sample tree,
5. turns the bundled fixed-width report `testdata/demo.txt` into `demo.csv`.

Exit codes:
- 0: every step succeeded
- 1: a step failed; the error is printed with its context
*/

use std::env;
use std::process;

use tracing::{debug, info};

use genio_base::tracing::init_tracing;
use genio_base::{FilePath, GenioResult, PalHandle, RealPal, ResultExt};
use genio_engine::{
    BinaryMode, Config, FileSource, FixedWidthToCsv, LineCounter, ResourceRoot, TextMode, UTF_8,
    WriteMode, dirs_containing, files_containing, files_ending_with, load_config_or_default,
    outline, read_all_bytes, read_all_text, read_binary, read_first_lines, read_text, walk,
    write_bytes, write_text,
};

const CONFIG_FILE: &str = "genio.toml";
const RULER: &str = "------------------------------------------------------------";
const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const SAMPLE_FILE: &str = "irgendeinfile.txt";
const OUTPUT_FILE: &str = "out.txt";
const CSV_FILE: &str = "demo.csv";
const SAMPLE_TREE: &str = "genio_tree";

const SAMPLE_RESOURCE: &str = "/testdata/irgendeinfile.txt";
const REPORT_RESOURCE: &str = "/testdata/demo.txt";

const SAMPLE_TEXT: &str = "First line of the sample file\n\
Second line, with umlauts: Grüße aus Wien\n\
Third and last line\n";

/// Files created below the sample tree root; directories come from the paths.
const SAMPLE_TREE_FILES: &[&str] = &[
    "docs/readme.txt",
    "docs/release_1_3.txt",
    "fake_drive/setup_1_3.exe",
    "fake_drive/tools/helper.exe",
    "fake_drive/tools/notes.txt",
    "empty/.keep",
];

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Warning: {}", e);
    }

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    let config = match load_config_or_default(&pal, &FilePath::from(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load {}: {:?}", CONFIG_FILE, e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&pal, &config) {
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}

/// Picks the directory for the sample files.
fn resolve_work_dir(config: &Config, env_var: impl Fn(&str) -> Option<String>) -> FilePath {
    if let Some(dir) = &config.work_dir {
        return FilePath::from(dir.as_str());
    }
    ["TEMP", "TMPDIR", "HOME", "USERPROFILE"]
        .into_iter()
        .find_map(|key| env_var(key).filter(|value| !value.is_empty()))
        .map(FilePath::from)
        .unwrap_or_else(|| FilePath::from(env::temp_dir()))
}

fn resource_root(config: &Config) -> ResourceRoot {
    match &config.resource_root {
        Some(dir) => ResourceRoot::new(dir.as_str()),
        None => ResourceRoot::for_crate(env!("CARGO_MANIFEST_DIR")),
    }
}

fn section(title: &str) {
    println!("[ {} ] {}", title, RULER);
}

fn run(pal: &PalHandle, config: &Config) -> GenioResult<()> {
    let work_dir = resolve_work_dir(config, |key| env::var(key).ok());
    let resources = resource_root(config);
    println!("Using work directory {}", work_dir);
    println!("Using resources from {}", resources.path());

    prepare_samples(pal, &work_dir).context("Failed to prepare sample files")?;

    let sample_file = FileSource::file(work_dir.join(SAMPLE_FILE));
    let sample_resource = FileSource::resource(&resources, SAMPLE_RESOURCE);
    let binary_mode = BinaryMode::from_block_size(config.block_size);
    let text_mode = TextMode::from_block_size(config.block_size);
    debug!(?binary_mode, ?text_mode, "read modes");

    section("whole resource, binary");
    let bytes = read_all_bytes(pal, &sample_resource, BinaryMode::WholeFile)?;
    println!("Read {} bytes from {}", bytes.len(), sample_resource);

    section("whole resource, text");
    let text = read_all_text(pal, &sample_resource, UTF_8)?;
    println!("Read: [{}]", text);

    section("file, line by line");
    read_text(pal, &sample_file, UTF_8, text_mode, &mut |line: &str| {
        println!("{}", line)
    })?;
    let mut counter = LineCounter::new();
    read_text(pal, &sample_file, UTF_8, TextMode::Lines, &mut counter)?;
    println!("{} has {} lines", sample_file, counter.count());

    section("resource, line by line");
    read_text(pal, &sample_resource, UTF_8, text_mode, &mut |line: &str| {
        println!("{}", line)
    })?;

    section("file, binary blocks");
    print_blocks(pal, &sample_file, binary_mode)?;

    section("resource, binary blocks");
    print_blocks(pal, &sample_resource, binary_mode)?;

    section("resource, first line only");
    let first_lines = read_first_lines(pal, &sample_resource, UTF_8, 1)?;
    println!("Lines kept: {}", first_lines.len());
    for line in &first_lines {
        println!("{}", line);
    }

    section("write, truncate then append");
    let output = work_dir.join(OUTPUT_FILE);
    write_text(pal, &output, "This is a test\n", UTF_8, WriteMode::Truncate)?;
    write_bytes(
        pal,
        &output,
        "This line was appended!".as_bytes(),
        WriteMode::Append,
    )?;
    println!("{} now reads:", output);
    println!("{}", read_all_text(pal, &FileSource::file(output.clone()), UTF_8)?);

    let tree_root = work_dir.join(SAMPLE_TREE);

    section("directory tree");
    let tree = walk(pal, &tree_root)?;
    println!("Directories: {}", tree.directories.len());
    println!("Files: {}", tree.files.len());
    print!("{}", outline(pal, &tree_root)?);

    let search = &config.search;
    section("files containing");
    print_matches(
        &format!("Files containing '{}'", search.file_contains),
        &files_containing(pal, &tree_root, &search.file_contains)?,
    );

    section("files ending with");
    print_matches(
        &format!("Files ending with '{}'", search.file_suffix),
        &files_ending_with(pal, &tree_root, &search.file_suffix)?,
    );

    section("directories containing");
    print_matches(
        &format!("Directories containing '{}'", search.dir_contains),
        &dirs_containing(pal, &tree_root, &search.dir_contains)?,
    );

    section("fixed-width report to CSV");
    let report = FileSource::resource(&resources, REPORT_RESOURCE);
    let encoding = config.report.encoding()?;
    let mut transformer = FixedWidthToCsv::new(config.report.report_format()?);
    read_text(pal, &report, encoding, TextMode::Lines, &mut transformer)?;
    let document = transformer.to_csv_document(LINE_SEPARATOR);
    println!("{}", document);

    let csv_file = work_dir.join(CSV_FILE);
    println!("Writing {}", csv_file);
    write_text(pal, &csv_file, &document, encoding, WriteMode::Truncate)?;

    info!(records = transformer.records().len(), "demo complete");
    Ok(())
}

/// Creates the work directory, the sample file and the sample tree unless they
/// already exist.
fn prepare_samples(pal: &PalHandle, work_dir: &FilePath) -> GenioResult<()> {
    pal.create_directory_all(work_dir)?;

    let sample_file = work_dir.join(SAMPLE_FILE);
    if !pal.file_exists(&sample_file)? {
        write_text(pal, &sample_file, SAMPLE_TEXT, UTF_8, WriteMode::Truncate)?;
        debug!(path = %sample_file, "created sample file");
    }

    let tree_root = work_dir.join(SAMPLE_TREE);
    for relative in SAMPLE_TREE_FILES {
        let path = tree_root.join(relative);
        if let Some(parent) = path.as_path().parent() {
            pal.create_directory_all(&FilePath::from(parent))?;
        }
        if !pal.file_exists(&path)? {
            write_bytes(pal, &path, b"", WriteMode::Truncate)?;
        }
    }
    Ok(())
}

fn print_blocks(pal: &PalHandle, source: &FileSource, mode: BinaryMode) -> GenioResult<()> {
    let blocks = read_binary(pal, source, mode, &mut |block: &[u8]| {
        print!("{}", String::from_utf8_lossy(block))
    })?;
    println!("({} blocks)", blocks);
    Ok(())
}

fn print_matches(title: &str, matches: &[String]) {
    println!("{}: {}", title, matches.len());
    for path in matches {
        println!("[{}]", path);
    }
}
