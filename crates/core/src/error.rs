//! Error types for huffpack.
//!
//! All operations return structured errors rather than panicking. Every
//! error is fatal to the call that produced it: these indicate corrupt input
//! or misuse, so the core never retries and never logs. The calling layer
//! decides presentation and exit behavior.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Encode: input symbols that the configured alphabet does not cover
/// - Decode: invalid bits, truncated streams, corrupt paths
/// - Bit I/O: reading/writing bits from/to byte buffers, padding
/// - Tree: persisted tree artifact cannot be parsed
/// - CRC: tree artifact checksum mismatch
/// - I/O and configuration: app layer only
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding failed (e.g., symbol outside the alphabet)
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding failed (e.g., invalid bit, truncated stream)
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Persisted tree artifact is malformed
    #[error("malformed tree: {0}")]
    Tree(#[from] TreeError),

    /// CRC validation of the tree artifact failed
    #[error("tree CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error means the persisted tree could not be
    /// reconstructed, whether structurally or by checksum.
    pub fn is_malformed_tree(&self) -> bool {
        matches!(self, Error::Tree(_) | Error::Crc { .. })
    }
}

/// Encoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Input symbol is not covered by the configured alphabet
    #[error("symbol {symbol:#06x} at position {position} is outside the alphabet of size {alphabet_size}")]
    AlphabetViolation {
        symbol: u16,
        position: usize,
        alphabet_size: u32,
    },

    /// Alphabet size must lie in 1..=65536
    #[error("invalid alphabet size {0}: must be between 1 and 65536")]
    InvalidAlphabet(u32),

    /// Total count would leave no room for tree weights in a u64
    #[error("symbol counts overflow at symbol {symbol:#06x}: the total must stay below 2^64 - 1")]
    CountOverflow { symbol: u16 },
}

/// Decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A bit character other than '0' or '1'
    #[error("invalid bit value {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },

    /// Bit stream ended in the middle of a code
    #[error("bit stream truncated mid-code: only {consumed} of {total} bits form complete codes")]
    TruncatedStream { consumed: usize, total: usize },

    /// Code path led to the placeholder leaf, which no symbol owns
    #[error("code ending at bit {position} does not map to a symbol")]
    UnassignedCode { position: usize },

    /// Decoded code units are not valid UTF-16
    #[error("decoded symbols are not valid UTF-16 text")]
    InvalidText,

    /// Decoded output differs from the input it was encoded from
    #[error("decoded output diverges at symbol {position} ({expected} symbols expected, {actual} decoded)")]
    Mismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits at once)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Pad count larger than 7 or than the bit stream itself
    #[error("invalid padding {padding} for a stream of {bit_len} bits")]
    InvalidPadding { padding: u8, bit_len: usize },
}

/// Tree artifact errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Buffer is too short to hold a header
    #[error("tree artifact too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Invalid magic number
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Format version this build does not understand
    #[error("unsupported tree format version {0}")]
    UnsupportedVersion(u8),

    /// Body length doesn't match header specification
    #[error("body length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Body ended before the tree was complete
    #[error("tree body truncated")]
    Truncated,

    /// Bits left over after the tree was complete
    #[error("{0} unexpected bits after the tree body")]
    TrailingBits(usize),

    /// Number of leaves doesn't match the header
    #[error("leaf count mismatch: header says {expected}, found {actual}")]
    LeafCountMismatch { expected: u32, actual: u32 },

    /// More than one placeholder leaf
    #[error("tree contains more than one placeholder leaf")]
    DuplicatePlaceholder,

    /// The same symbol appears on two leaves
    #[error("symbol {0:#06x} appears on more than one leaf")]
    DuplicateSymbol(u16),

    /// A non-empty tree whose root is a leaf
    #[error("root-only tree: the root must be an internal node")]
    RootLeaf,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
