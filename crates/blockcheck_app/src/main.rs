use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use blockcheck_core::{ScanOptions, ScanOutcome, DEFAULT_CHUNK_SIZE};

const EXIT_EMPTY: u8 = 0;
const EXIT_NOT_EMPTY: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "blockcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check whether block devices contain only zero bytes")]
struct Cli {
    /// Block devices to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Bytes read per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    chunk_size: usize,

    /// Scan regular image files as well as block devices
    #[arg(long)]
    allow_regular_file: bool,

    /// Suppress per-path output
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    ScanOptions::default()
        .with_chunk_size(size)
        .validate()
        .map_err(|e| e.to_string())?;
    Ok(size)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check(path: &Path, options: &ScanOptions, allow_regular: bool) -> Result<ScanOutcome> {
    blockcheck_io::scan_path(path, options, allow_regular)
        .with_context(|| format!("Failed to check {}", path.display()))
}

fn describe(path: &Path, outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Empty { bytes_scanned } => {
            format!("{}: empty ({} bytes)", path.display(), bytes_scanned)
        }
        ScanOutcome::Dirty { offset } => format!(
            "{}: not empty (first data at offset {})",
            path.display(),
            offset
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ScanOptions::default().with_chunk_size(cli.chunk_size);
    let mut status = EXIT_EMPTY;
    tracing::debug!(chunk_size = options.chunk_size, paths = cli.paths.len(), "checking");

    for path in &cli.paths {
        match check(path, &options, cli.allow_regular_file) {
            Ok(outcome) => {
                if !cli.quiet {
                    println!("{}", describe(path, &outcome));
                }
                if !outcome.is_empty() {
                    status = status.max(EXIT_NOT_EMPTY);
                }
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                status = EXIT_ERROR;
            }
        }
    }

    ExitCode::from(status)
}
