//! Compression statistics for reporting.
//!
//! Collected once per compressed unit by the caller: the core fills in the
//! sizes from an [`Encoded`] and its [`PackedArtifact`]; timing is marked
//! by whoever runs the pipeline.
//!
//! # Thread Safety
//!
//! `CompressionStats` is plain data. Nothing here is shared between calls.

use std::time::{Duration, Instant};

use crate::artifact::PackedArtifact;
use crate::codes::CodeTable;
use crate::encoder::Encoded;

/// Sizes and timing of one compression or decompression run.
#[derive(Debug, Clone)]
pub struct CompressionStats {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input ===
    /// Symbols in the raw input
    pub input_symbols: u64,

    /// Raw input size in bytes, as read from storage
    pub input_bytes: u64,

    /// Distinct symbols (tree leaves, placeholder excluded)
    pub distinct_symbols: u64,

    // === Encoding ===
    /// Encoded bits before padding
    pub encoded_bits: u64,

    /// Longest code in the table
    pub max_code_len: u64,

    // === Artifact ===
    /// Serialized tree size in bytes
    pub tree_bytes: u64,

    /// Packed data size in bytes
    pub data_bytes: u64,

    /// Pad bits in the last data byte
    pub padding: u8,
}

impl CompressionStats {
    /// Create empty stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_symbols: 0,
            input_bytes: 0,
            distinct_symbols: 0,
            encoded_bits: 0,
            max_code_len: 0,
            tree_bytes: 0,
            data_bytes: 0,
            padding: 0,
        }
    }

    /// Record the sizes of an encoding and its packed form.
    pub fn record(&mut self, input_symbols: usize, encoded: &Encoded, artifact: &PackedArtifact) {
        let table = CodeTable::from_tree(&encoded.tree);

        self.input_symbols = input_symbols as u64;
        self.distinct_symbols = table.len() as u64;
        self.max_code_len = table.max_code_len() as u64;
        self.encoded_bits = encoded.bits.len() as u64;
        self.tree_bytes = artifact.tree.len() as u64;
        self.data_bytes = artifact.data.len() as u64;
        self.padding = artifact.padding;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Bytes on disk: tree, pad byte and data.
    pub fn stored_bytes(&self) -> u64 {
        self.tree_bytes + 1 + self.data_bytes
    }

    /// Compute compression ratio (stored / raw).
    ///
    /// Returns 0.0 if there was no input.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.stored_bytes() as f64 / self.input_bytes as f64
        }
    }

    /// Average code length in bits per input symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_symbols == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / self.input_symbols as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Input ===");
        println!("Bytes: {}", self.input_bytes);
        println!("Symbols: {}", self.input_symbols);
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!();

        println!("=== Encoding ===");
        println!("Encoded bits: {}", self.encoded_bits);
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!("Longest code: {} bits", self.max_code_len);
        println!();

        println!("=== Artifact ===");
        println!("Tree: {} bytes", self.tree_bytes);
        println!("Data: {} bytes ({} pad bits)", self.data_bytes, self.padding);
        println!("Stored: {} bytes", self.stored_bytes());
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             input_symbols={}\n\
             distinct_symbols={}\n\
             encoded_bits={}\n\
             max_code_len={}\n\
             tree_bytes={}\n\
             data_bytes={}\n\
             padding={}\n\
             compression_ratio={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.input_symbols,
            self.distinct_symbols,
            self.encoded_bits,
            self.max_code_len,
            self.tree_bytes,
            self.data_bytes,
            self.padding,
            self.compression_ratio(),
        )
    }
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self::new()
    }
}
