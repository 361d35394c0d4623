//! dirpak CLI - command-line tool for `.dir`/`.pak` archives.
//!
//! This is the main entry point for the dirpak command-line application.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, Log, Metadata, Record};

use dirpak::pak::destination_for;
use dirpak::prelude::*;

/// dirpak - list and extract .dir/.pak archives
#[derive(Parser)]
#[command(name = "dirpak")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show library log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the contents of an archive
    List {
        /// Path to the .dir, .pak or base name
        #[arg(short, long, env = "DIRPAK_ARCHIVE")]
        archive: PathBuf,

        /// Filter pattern (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Show offsets, lengths and compression
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract files from an archive
    Extract {
        /// Path to the .dir, .pak or base name
        #[arg(short, long, env = "DIRPAK_ARCHIVE")]
        archive: PathBuf,

        /// Output directory (defaults to the archive base name)
        #[arg(short, long, env = "DIRPAK_OUTPUT")]
        output: Option<PathBuf>,

        /// Filter pattern (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Extract in table order instead of sorted by path
        #[arg(long)]
        no_sort: bool,

        /// Report failed entries and carry on
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Decode a single entry
    Read {
        /// Path to the .dir, .pak or base name
        #[arg(short, long, env = "DIRPAK_ARCHIVE")]
        archive: PathBuf,

        /// Entry path inside the archive
        #[arg(short, long)]
        entry: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::List {
            archive,
            filter,
            detailed,
        } => {
            cmd_list(&archive, filter.as_deref(), detailed)?;
        }
        Commands::Extract {
            archive,
            output,
            filter,
            no_sort,
            keep_going,
        } => {
            cmd_extract(&archive, output.as_deref(), filter.as_deref(), !no_sort, keep_going)?;
        }
        Commands::Read {
            archive,
            entry,
            output,
        } => {
            cmd_read(&archive, &entry, output.as_deref())?;
        }
    }

    Ok(())
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Warnings are always shown; each `-v` lowers the threshold one level.
fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    log::set_max_level(level_filter(verbose));
    Ok(())
}

fn open_archive(path: &Path) -> Result<PakArchive> {
    PakArchive::open_path(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))
}

fn cmd_list(archive_path: &Path, filter: Option<&str>, detailed: bool) -> Result<()> {
    let archive = open_archive(archive_path)?;
    let filter = filter.map(EntryFilter::new).transpose()?;

    let mut count = 0;
    for entry in archive.iter() {
        if !EntryFilter::accepts(filter.as_ref(), entry) {
            continue;
        }

        if detailed {
            let header = archive
                .header(entry)
                .with_context(|| format!("Failed to read header of {}", entry.path()))?;
            println!(
                "{:>10} {:>10} {} {}",
                entry.offset(),
                entry.length(),
                if header.is_compressed() { "Z" } else { " " },
                entry.path()
            );
        } else {
            println!("{}", entry.path());
        }
        count += 1;
    }

    println!("\nTotal: {} entries", count);

    Ok(())
}

fn cmd_extract(
    archive_path: &Path,
    output: Option<&Path>,
    filter: Option<&str>,
    sorted: bool,
    keep_going: bool,
) -> Result<()> {
    println!("Opening archive: {}", archive_path.display());

    let start = Instant::now();
    let archive = open_archive(archive_path)?;
    println!("Loaded {} entries in {:?}", archive.entry_count(), start.elapsed());

    let root = output.unwrap_or_else(|| archive.paths().base());
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create {}", root.display()))?;

    let start = Instant::now();
    let (extracted, errors) = match filter {
        None if !keep_going => extract_everything(&archive, root, sorted)?,
        _ => extract_selected(&archive, root, filter, sorted, keep_going)?,
    };

    println!(
        "Extracted {} entries to {} in {:?} ({} errors)",
        extracted,
        root.display(),
        start.elapsed(),
        errors
    );

    Ok(())
}

/// Whole-archive extraction through the archive's own batch iterator.
fn extract_everything(archive: &PakArchive, root: &Path, sorted: bool) -> Result<(usize, usize)> {
    let records = archive.extract_all_iter(Some(root), sorted);
    let pb = progress_bar(records.total())?;

    let mut extracted = 0;
    for record in records {
        let record = record?;
        pb.set_message(record.entry);
        pb.inc(1);
        extracted += 1;
    }

    pb.finish_with_message("Done");
    Ok((extracted, 0))
}

fn extract_selected(
    archive: &PakArchive,
    root: &Path,
    filter: Option<&str>,
    sorted: bool,
    keep_going: bool,
) -> Result<(usize, usize)> {
    let filter = filter.map(EntryFilter::new).transpose()?;

    let mut entries: Vec<&DirEntry> = archive
        .iter()
        .filter(|e| EntryFilter::accepts(filter.as_ref(), e))
        .collect();
    if sorted {
        entries.sort_unstable_by(|a, b| a.path().cmp(b.path()));
    }

    println!("Extracting {} entries...", entries.len());
    let pb = progress_bar(entries.len())?;

    let mut extracted = 0;
    let mut errors = 0;
    for entry in entries {
        let result = destination_for(root, entry)
            .and_then(|dest| archive.extract_entry(entry, &dest));

        match result {
            Ok(()) => extracted += 1,
            Err(e) if keep_going => {
                pb.println(format!("Error extracting {}: {}", entry.path(), e));
                errors += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to extract {}", entry.path()));
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok((extracted, errors))
}

fn cmd_read(archive_path: &Path, entry: &str, output: Option<&Path>) -> Result<()> {
    let archive = open_archive(archive_path)?;
    let data = archive
        .read(entry)
        .with_context(|| format!("Failed to read {}", entry))?;

    match output {
        Some(path) => {
            fs::write(path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Case-insensitive glob over entry paths.
///
/// A pattern without wildcards matches any path containing it.
struct EntryFilter {
    pattern: Pattern,
}

impl EntryFilter {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    fn new(pattern: &str) -> Result<Self> {
        let pattern = if pattern.contains(['*', '?', '[']) {
            pattern.to_owned()
        } else {
            format!("*{}*", Pattern::escape(pattern))
        };
        let pattern = Pattern::new(&pattern)
            .with_context(|| format!("Invalid filter pattern {}", pattern))?;
        Ok(Self { pattern })
    }

    fn accepts(filter: Option<&Self>, entry: &DirEntry) -> bool {
        filter.map_or(true, |f| f.pattern.matches_with(entry.path(), Self::OPTIONS))
    }
}
