//! salvor-scan - Locate indirect objects by scanning raw bytes
//!
//! Prints, for each input file, every `N G obj` header found before the
//! last `%%EOF` marker together with its byte offset, as JSON.

use anyhow::Context;
use clap::{ArgAction, Parser};
use memmap2::Mmap;
use salvor_core::document::locator::{ScanOptions, find_last_eof_marker, locate_objects_with};
use salvor_core::parser::SliceCursor;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "salvor-scan")]
#[command(author, version, about = "Locate PDF objects by brute-force scan", long_about = None)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Abort after this many consecutive unproductive scan steps
    #[arg(long = "max-steps", default_value_t = ScanOptions::default().max_unproductive_steps)]
    max_steps: usize,

    /// Ignore `obj` keywords before this offset
    #[arg(long = "min-offset", default_value_t = ScanOptions::default().minimum_offset)]
    min_offset: u64,

    /// Only print the number of objects found
    #[arg(short = 'c', long = "count", action = ArgAction::SetTrue)]
    count: bool,

    /// Compact JSON instead of pretty-printed
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
}

#[derive(Serialize)]
struct ObjectEntry {
    objid: u64,
    genno: u32,
    offset: u64,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    size: u64,
    last_eof: Option<u64>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    objects: Option<Vec<ObjectEntry>>,
}

fn scan_file(path: &Path, options: &ScanOptions, with_objects: bool) -> anyhow::Result<FileReport> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    // SAFETY: the map is read-only and dropped before the function returns.
    let mmap =
        unsafe { Mmap::map(&file) }.with_context(|| format!("mapping {}", path.display()))?;
    let mut cursor = SliceCursor::new(&mmap[..]);

    let last_eof = find_last_eof_marker(&mut cursor);
    let locations = locate_objects_with(&mut cursor, options)
        .with_context(|| format!("scanning {}", path.display()))?;
    info!(file = %path.display(), objects = locations.len(), "scan finished");

    let objects = with_objects.then(|| {
        locations
            .sorted_by_offset()
            .into_iter()
            .map(|(reference, offset)| ObjectEntry {
                objid: reference.objid,
                genno: reference.genno,
                offset,
            })
            .collect()
    });

    Ok(FileReport {
        file: path.display().to_string(),
        size: mmap.len() as u64,
        last_eof,
        count: locations.len(),
        objects,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let options = ScanOptions {
        max_unproductive_steps: args.max_steps,
        minimum_offset: args.min_offset,
    };

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("creating {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        reports.push(scan_file(path, &options, !args.count)?);
    }

    if args.compact {
        serde_json::to_writer(&mut output, &reports)?;
    } else {
        serde_json::to_writer_pretty(&mut output, &reports)?;
    }
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
