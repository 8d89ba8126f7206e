//! huffpack-core: static Huffman compression of in-memory symbol sequences
//!
//! This library provides the engine of a lossless Huffman compressor:
//! - Counts symbol frequencies over an explicit alphabet
//! - Builds a minimum-weight prefix-code tree with deterministic tie-breaking
//! - Derives the code table and encodes the input into a logical bit stream
//! - Packs bits into bytes with an exact padding count
//! - Decodes by walking the tree, and persists the tree as a framed artifact
//!
//! # Architecture
//!
//! Modules, leaf-first:
//! - `alphabet`: the symbol range an encoding may use
//! - `counter`: frequency tables
//! - `tree`: node type and tree construction
//! - `codes`: code table derivation
//! - `bitio`: bit sequences, bit reader/writer, pack/unpack/strip
//! - `encoder` / `decoder`: the two directions of the codec
//! - `artifact`: tree serialization and the three-part stored form
//! - `metrics`: compression statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and fatal to the call
//! - **No I/O**: Reading and writing storage is the caller's job
//! - **Deterministic**: Equal input always yields equal trees and bytes
//!
//! # Example
//! ```
//! use huffpack_core::{artifact, Alphabet};
//!
//! let input: Vec<u16> = "abracadabra".encode_utf16().collect();
//! let stored = artifact::compress(&input, Alphabet::UTF16).unwrap();
//! assert_eq!(artifact::decompress(&stored).unwrap(), input);
//! ```

pub mod alphabet;
pub mod artifact;
pub mod bitio;
pub mod codes;
pub mod counter;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use alphabet::{Alphabet, Symbol};
pub use artifact::{compress, decompress, verify, PackedArtifact};
pub use bitio::BitSeq;
pub use encoder::{Encoded, Encoder};
pub use error::{Error, Result};
pub use tree::{HuffmanTree, Node};
