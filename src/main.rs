use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use pdf_slim::{ghostscript, split, Compressor, Error, Ghostscript, QUALITY_NAMES};

const MB: u64 = 1024 * 1024;

/// PDF compression and splitting utility
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input PDF file
    input: PathBuf,

    /// Output PDF file (for compression)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compression quality level
    #[arg(short, long, default_value = "medium", value_parser = PossibleValuesParser::new(QUALITY_NAMES))]
    quality: String,

    /// Split the PDF into parts of at most this many megabytes
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    split: Option<u64>,

    /// Prefix for split files (default: input path without extension)
    #[arg(short, long)]
    prefix: Option<PathBuf>,

    /// Show processing details (-vv also enables debug logging)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ghostscript executable
    #[arg(long, env = "PDF_SLIM_GS", default_value = ghostscript::DEFAULT_PROGRAM)]
    gs: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        return Err(Error::InputNotFound(args.input.clone()).into());
    }

    match args.split {
        Some(megabytes) => run_split(args, megabytes),
        None => run_compress(args),
    }
}

fn run_split(args: &Args, megabytes: u64) -> Result<()> {
    let verbose = args.verbose > 0;
    if verbose {
        println!("Splitting PDF into parts of {megabytes}MB each...");
    }

    let max_bytes = megabytes.saturating_mul(MB);
    let parts = split(&args.input, max_bytes, args.prefix.as_deref())
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    if parts.len() == 1 && parts[0] == args.input {
        println!("Input PDF is smaller than specified size. No splitting needed.");
    }
    if verbose {
        println!("Created {} parts:", parts.len());
        for part in &parts {
            println!(" - {} ({:.1} MB)", part.display(), size_mb(part)?);
        }
    }
    Ok(())
}

fn run_compress(args: &Args) -> Result<()> {
    let Some(output) = args.output.as_deref() else {
        bail!("Output path required for compression.");
    };
    let verbose = args.verbose > 0;

    let original = size_mb(&args.input)?;
    if verbose {
        println!("Compressing PDF with {} quality...", args.quality);
        println!("Original size: {original:.2} MB");
    }

    Compressor::new()
        .with_engine(Ghostscript::new(&args.gs))
        .compress(&args.input, output, &args.quality)
        .with_context(|| format!("Failed to compress {}", args.input.display()))?;

    if verbose {
        let compressed = size_mb(output)?;
        let reduction = if original > 0.0 {
            (original - compressed) / original * 100.0
        } else {
            0.0
        };
        println!("Compressed size: {compressed:.2} MB");
        println!("Reduction: {reduction:.1}%");
    }
    Ok(())
}

fn size_mb(path: &Path) -> Result<f64> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to read size of {}", path.display()))?
        .len();
    Ok(len as f64 / MB as f64)
}
