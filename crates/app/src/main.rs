//! huffpack: compress and decompress files with a static Huffman code.
//!
//! # Flow
//!
//! ```text
//! compress:   <dir>/<file> -> symbols -> Encoder -> pack -> <dir>/encoded/data.{huff,bin,pad}
//! decompress: <dir>/encoded/data.{huff,bin,pad} -> unpack -> decode -> <dir>/<file>
//! demo:       generated symbols -> compress -> decompress -> verify (in memory)
//! ```
//!
//! Errors are logged and end the process with status 1; usage errors print
//! help and end it with status 2.

mod config;
mod input_gen;
mod storage;

use std::path::Path;
use std::process;
use std::time::Instant;

use huffpack_core::metrics::CompressionStats;
use huffpack_core::{artifact, Encoder, Result};
use log::LevelFilter;

use crate::config::{print_help, Command, Config};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_help();
            process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    if let Err(e) = run(&config) {
        log::error!("{e}");
        process::exit(1);
    }
}

/// Logger with `[LEVEL] message` lines, `info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

fn run(config: &Config) -> Result<()> {
    match &config.command {
        Command::Compress { dir, file } => compress(config, dir, file),
        Command::Decompress { dir, file } => decompress(config, dir, file),
        Command::Demo { seed, size } => demo(config, *seed, *size),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

fn compress(config: &Config, dir: &Path, file: &str) -> Result<()> {
    let started = Instant::now();
    let mut stats = CompressionStats::new();

    let input_path = dir.join(file);
    log::debug!("reading {}", input_path.display());
    let (symbols, input_bytes) = storage::read_input(&input_path, config.mode)?;
    stats.input_bytes = input_bytes;

    log::debug!("encoding {} symbols", symbols.len());
    let encoded = Encoder::new(config.alphabet).encode(&symbols)?;
    let packed = encoded.pack();
    stats.record(symbols.len(), &encoded, &packed);

    storage::write_artifact(dir, &packed)?;
    stats.complete();

    log::info!(
        "{} -> {} ({} bytes -> {} bytes)",
        input_path.display(),
        storage::encoded_dir(dir).display(),
        input_bytes,
        packed.stored_len()
    );
    println!("Compressed successfully!");
    println!("Compressing file took: {} ms!", started.elapsed().as_millis());

    if config.print_stats {
        stats.print_summary();
    }
    Ok(())
}

fn decompress(config: &Config, dir: &Path, file: &str) -> Result<()> {
    let started = Instant::now();

    log::debug!("reading {}", storage::encoded_dir(dir).display());
    let packed = storage::read_artifact(dir)?;

    let symbols = artifact::decompress(&packed)?;
    log::debug!("decoded {} symbols", symbols.len());

    let output_path = dir.join(file);
    let written = storage::write_output(&output_path, &symbols, config.mode)?;

    log::info!(
        "{} -> {} ({} bytes -> {} bytes)",
        storage::encoded_dir(dir).display(),
        output_path.display(),
        packed.stored_len(),
        written
    );
    println!("Decompressed successfully!");
    println!("Decompressing file took: {} ms!", started.elapsed().as_millis());
    Ok(())
}

fn demo(config: &Config, seed: u64, size: usize) -> Result<()> {
    println!("Running demo with seed {seed} (repeat with --seed {seed})");

    let mut stats = CompressionStats::new();
    let symbols = input_gen::generate_sample_symbols(seed, size, config.alphabet);
    // Two bytes per UTF-16 unit, one per byte symbol
    let unit_bytes = if config.alphabet.size() <= 256 { 1 } else { 2 };
    stats.input_bytes = (symbols.len() * unit_bytes) as u64;

    let encoded = Encoder::new(config.alphabet).encode(&symbols)?;
    let packed = encoded.pack();
    stats.record(symbols.len(), &encoded, &packed);

    artifact::verify(&symbols, &packed)?;
    stats.complete();

    log::info!(
        "{} symbols ({} distinct) round-tripped through {} stored bytes",
        symbols.len(),
        stats.distinct_symbols,
        packed.stored_len()
    );
    println!("Round trip verified in {} ms", stats.duration().as_millis());

    if config.print_stats {
        stats.print_summary();
    }
    Ok(())
}
