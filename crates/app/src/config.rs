//! Configuration for the huffpack command-line tool.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized demo defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then runs the in-memory
//! demo with a printed seed, so every run can be repeated.

use huffpack_core::Alphabet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Default input file name inside the working directory.
pub const DEFAULT_INPUT_NAME: &str = "input.txt";

/// Default output file name for decompression.
pub const DEFAULT_OUTPUT_NAME: &str = "decoded.txt";

/// What the tool was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compress `dir/file` into `dir/encoded/`
    Compress { dir: PathBuf, file: String },

    /// Decompress `dir/encoded/` into `dir/file`
    Decompress { dir: PathBuf, file: String },

    /// Round-trip generated sample data in memory
    Demo { seed: u64, size: usize },

    /// Print usage and exit
    Help,
}

/// How file contents map to symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// UTF-8 text, encoded as UTF-16 code units
    Text,
    /// Raw bytes, one symbol per byte
    Raw,
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Codec ===
    /// Alphabet the encoder enforces
    pub alphabet: Alphabet,

    /// How files are turned into symbols and back
    pub mode: InputMode,

    // === Behavior ===
    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the statistics summary
    pub print_stats: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// If no arguments are provided, runs the demo with a time-based seed.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut positional: Vec<String> = Vec::new();
        let mut seed: Option<u64> = None;
        let mut size: Option<usize> = None;
        let mut alphabet: Option<Alphabet> = None;
        let mut mode = InputMode::Text;
        let mut print_config = false;
        let mut print_stats = false;
        let mut help = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    size = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--alphabet" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--alphabet requires utf16, bytes, legacy or a size".to_string());
                    }
                    alphabet = Some(parse_alphabet(&args[i])?);
                }
                "--raw" => {
                    mode = InputMode::Raw;
                }
                "--stats" => {
                    print_stats = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--help" | "-h" => {
                    help = true;
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown argument: {flag}"));
                }
                _ => positional.push(args[i].clone()),
            }
            i += 1;
        }

        let command = if help {
            Command::Help
        } else {
            parse_command(&positional, seed, size)?
        };

        // Raw files can only hold byte symbols
        let alphabet = alphabet.unwrap_or(match mode {
            InputMode::Text => Alphabet::UTF16,
            InputMode::Raw => Alphabet::BYTES,
        });

        Ok(Config {
            command,
            alphabet,
            mode,
            print_config,
            print_stats,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.command {
            Command::Compress { dir, file } => {
                println!("Command: compress");
                println!("Input:   {}", dir.join(file).display());
                println!("Output:  {}", dir.join(crate::storage::ENCODED_DIR).display());
            }
            Command::Decompress { dir, file } => {
                println!("Command: decompress");
                println!("Input:   {}", dir.join(crate::storage::ENCODED_DIR).display());
                println!("Output:  {}", dir.join(file).display());
            }
            Command::Demo { seed, size } => {
                println!("Command: demo");
                println!("Seed: {seed}");
                println!("Sample size: {size} symbols");
            }
            Command::Help => println!("Command: help"),
        }
        println!("Alphabet: {} symbols", self.alphabet.size());
        println!("Mode: {:?}", self.mode);
        println!();
    }
}

fn parse_command(positional: &[String], seed: Option<u64>, size: Option<usize>) -> Result<Command, String> {
    let Some((verb, rest)) = positional.split_first() else {
        return Ok(demo(seed, size));
    };

    let (dir, file) = match rest {
        [dir] => (PathBuf::from(dir), None),
        [dir, file] => (PathBuf::from(dir), Some(file.clone())),
        _ if verb.eq_ignore_ascii_case("demo") && rest.is_empty() => {
            return Ok(demo(seed, size));
        }
        _ => {
            return Err(format!(
                "{verb} expects <DIR> [FILE], got {} arguments",
                rest.len()
            ))
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "c" | "compress" => Ok(Command::Compress {
            dir,
            file: file.unwrap_or_else(|| DEFAULT_INPUT_NAME.to_string()),
        }),
        "d" | "decompress" => Ok(Command::Decompress {
            dir,
            file: file.unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
        }),
        _ => Err(format!("unknown command: {verb}")),
    }
}

/// Resolve demo defaults, using the seed for anything not given.
fn demo(seed: Option<u64>, size: Option<usize>) -> Command {
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = size.unwrap_or_else(|| rng.gen_range(4096..=65536));

    Command::Demo { seed, size }
}

fn parse_alphabet(value: &str) -> Result<Alphabet, String> {
    match value {
        "utf16" => Ok(Alphabet::UTF16),
        "bytes" => Ok(Alphabet::BYTES),
        "legacy" => Ok(Alphabet::LEGACY),
        other => {
            let size: u32 = other
                .parse()
                .map_err(|_| format!("invalid alphabet: {other}"))?;
            Alphabet::new(size).map_err(|e| e.to_string())
        }
    }
}

pub fn print_help() {
    println!("huffpack: static Huffman compressor");
    println!();
    println!("USAGE:");
    println!("    huffpack compress <DIR> [FILE]     Compress DIR/FILE into DIR/encoded/");
    println!("    huffpack decompress <DIR> [FILE]   Restore DIR/encoded/ into DIR/FILE");
    println!("    huffpack demo                      Round-trip generated data in memory");
    println!();
    println!("    'c' and 'd' are accepted for compress and decompress.");
    println!("    FILE defaults to {DEFAULT_INPUT_NAME} (compress) or {DEFAULT_OUTPUT_NAME} (decompress).");
    println!();
    println!("OPTIONS:");
    println!("    --alphabet <A>          utf16 (default), bytes, legacy, or a size 1-65536");
    println!("    --raw                   Treat files as raw bytes instead of UTF-8 text");
    println!("    --seed <N>              Demo seed (default: time-based)");
    println!("    --size <N>              Demo sample size (default: random 4096-65536)");
    println!();
    println!("    --stats                 Print compression statistics");
    println!("    --print-config          Print resolved configuration");
    println!("    --help, -h              Print this help");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG                Log filter (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack                              # Demo with a random seed");
    println!("    huffpack demo --seed 42 --stats       # Deterministic demo");
    println!("    huffpack c ./docs notes.txt           # Writes ./docs/encoded/data.*");
    println!("    huffpack d ./docs notes.out.txt       # Restores the text");
    println!();
}
