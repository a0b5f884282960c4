//! Helicase entrypoint: load a base sequence, rewrite it to exhaustion,
//! draw the emitted RNA, and write the finished canvas as a binary PPM.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use core_dna::Seq;
use core_raster::{Bitmap, HEIGHT, RasterEngine, WIDTH};
use core_rewrite::RewriteEngine;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "helicase", version, about = "DNA rewriting engine and RNA drawing interpreter")]
struct Args {
    /// Base prefix prepended to the loaded sequence before rewriting.
    prefix: Option<String>,
    /// Path of the initial base sequence.
    #[arg(long, default_value = "endo.dna")]
    dna: PathBuf,
    /// Path of the output image (binary PPM).
    #[arg(long, default_value = "endo.ppm")]
    out: PathBuf,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("helicase.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "helicase.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; drop the guard so the
        // writer shuts down.
        Err(_err) => None,
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let bitmap = execute(&args)?;
    write_ppm(&args.out, &bitmap).with_context(|| format!("writing {}", args.out.display()))?;
    println!("image written to {}", args.out.display());
    Ok(())
}

fn execute(args: &Args) -> Result<Bitmap> {
    let bytes = load_sequence(&args.dna)?;
    let prefix = args.prefix.as_deref().unwrap_or("");
    core_dna::validate(prefix.as_bytes()).context("prefix")?;

    let mut rewriter = RewriteEngine::with_prefix(prefix.as_bytes(), Seq::from_bytes(&bytes));
    info!(
        target: "runtime",
        dna_len = rewriter.dna().len(),
        prefix_len = prefix.len(),
        "rewrite_start"
    );
    rewriter.run();
    println!(
        "{} iterations, {} rna commands",
        rewriter.iterations(),
        rewriter.rna().len()
    );

    let mut raster = RasterEngine::new();
    let halt = raster.run(rewriter.rna());
    info!(target: "runtime", ?halt, "raster_done");
    Ok(raster.into_bitmap())
}

/// Read the sequence file, tolerating a trailing line ending.
fn load_sequence(path: &Path) -> Result<Vec<u8>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    while bytes.last().is_some_and(|&b| matches!(b, b'\n' | b'\r')) {
        bytes.pop();
    }
    core_dna::validate(&bytes).context("initial base sequence")?;
    Ok(bytes)
}

/// Binary PPM (P6). Channels are written as stored: premultiplied, which
/// is the displayed value over a black background.
fn write_ppm(path: &Path, bitmap: &Bitmap) -> std::io::Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);
    write!(w, "P6\n{WIDTH} {HEIGHT}\n255\n")?;
    for px in bitmap.pixels() {
        w.write_all(&[px.r, px.g, px.b])?;
    }
    w.flush()
}
