//! Persisted artifact: tree serialization and the three-part packed form.
//!
//! A compressed unit is stored as three co-located items:
//! - the tree artifact (this module's framed pre-order encoding)
//! - the pad count, a single byte in 0..=7
//! - the packed data bytes from [`bitio::pack`](crate::bitio::pack)
//!
//! # Tree Artifact Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x54 ("HUFT")
//! +------------------+
//! | version (1)      |  format version, currently 1
//! +------------------+
//! | leaf_count (4)   |  u32 little-endian, 0 for the empty tree
//! +------------------+
//! | body_len (4)     |  u32 length of the body in bytes
//! +------------------+
//! | crc32 (4)        |  u32 checksum of leaf_count, body_len, body
//! +------------------+
//! | body             |  pre-order bit stream, MSB-first, zero padded
//! | (variable)       |
//! +------------------+
//! ```
//!
//! # Body Encoding
//!
//! Nodes are written in pre-order:
//! - `0`: internal node, followed by its left then right subtree
//! - `1`: leaf, followed by a presence bit; `1` means 16 symbol bits follow,
//!   `0` marks the placeholder leaf
//!
//! Weights are not stored. A tree read back has the same shape and symbols
//! as the one written, with all weights zero.

use std::collections::HashSet;

use crate::alphabet::{Alphabet, Symbol};
use crate::bitio::{self, BitReader, BitWriter};
use crate::decoder;
use crate::encoder::{Encoded, Encoder};
use crate::error::{DecodeError, Error, Result, TreeError};
use crate::tree::{HuffmanTree, Node};

/// Magic number for tree artifacts: "HUFT"
const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x54];

/// Current tree format version
const VERSION: u8 = 1;

/// Size of the tree artifact header in bytes
const HEADER_SIZE: usize = 17;

/// Bits used for a symbol value
const SYMBOL_BITS: usize = 16;

/// The three persisted items of one compressed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArtifact {
    /// Serialized tree (see [`serialize_tree`])
    pub tree: Vec<u8>,
    /// Zero bits padding the last data byte (0-7)
    pub padding: u8,
    /// Packed encoded bits
    pub data: Vec<u8>,
}

impl PackedArtifact {
    /// Reconstruct the encoded artifact: parse the tree, unpack the data and
    /// strip the padding.
    ///
    /// # Errors
    /// - `TreeError::*` / `Error::Crc` if the tree artifact is malformed
    /// - `BitIoError::InvalidPadding` if the pad count is out of range
    pub fn unpack(&self) -> Result<Encoded> {
        let tree = parse_tree(&self.tree)?;
        let bits = bitio::strip(bitio::unpack(&self.data), self.padding)?;
        Ok(Encoded { bits, tree })
    }

    /// Total persisted size in bytes, pad byte included.
    pub fn stored_len(&self) -> usize {
        self.tree.len() + 1 + self.data.len()
    }
}

impl Encoded {
    /// Serialize the tree and pack the bits for storage.
    pub fn pack(&self) -> PackedArtifact {
        let packed = bitio::pack(&self.bits);
        PackedArtifact {
            tree: serialize_tree(&self.tree),
            padding: packed.padding,
            data: packed.bytes,
        }
    }
}

/// Encode `input` and pack it for storage.
pub fn compress(input: &[Symbol], alphabet: Alphabet) -> Result<PackedArtifact> {
    let encoded = Encoder::new(alphabet).encode(input)?;
    Ok(encoded.pack())
}

/// Unpack and decode a stored artifact.
pub fn decompress(artifact: &PackedArtifact) -> Result<Vec<Symbol>> {
    let encoded = artifact.unpack()?;
    decoder::decode(&encoded.tree, &encoded.bits)
}

/// Decode a stored artifact and check that it reproduces `input`.
///
/// # Errors
/// As [`decompress`], plus `DecodeError::Mismatch` at the first position
/// where the decoded symbols differ from `input` (or where one runs out).
pub fn verify(input: &[Symbol], artifact: &PackedArtifact) -> Result<()> {
    let decoded = decompress(artifact)?;
    let common = input.iter().zip(&decoded).take_while(|(a, b)| a == b).count();
    if common == input.len() && common == decoded.len() {
        Ok(())
    } else {
        Err(DecodeError::Mismatch {
            position: common,
            expected: input.len(),
            actual: decoded.len(),
        }
        .into())
    }
}

/// Serialize a tree into a framed, checksummed artifact.
pub fn serialize_tree(tree: &HuffmanTree) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut leaf_count: u32 = 0;

    // Pre-order: push right before left so left is written first
    let mut stack: Vec<&Node> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        match node {
            Node::Internal { left, right, .. } => {
                writer.write_bit(false);
                stack.push(right);
                stack.push(left);
            }
            Node::Leaf { symbol, .. } => {
                leaf_count += 1;
                writer.write_bit(true);
                match symbol {
                    Some(symbol) => {
                        writer.write_bit(true);
                        for shift in (0..SYMBOL_BITS).rev() {
                            writer.write_bit((symbol >> shift) & 1 == 1);
                        }
                    }
                    None => writer.write_bit(false),
                }
            }
        }
    }

    let body = writer.finish();
    let body_len = body.len() as u32;
    let crc32 = compute_crc(leaf_count, body_len, &body);

    let mut artifact = Vec::with_capacity(HEADER_SIZE + body.len());
    artifact.extend_from_slice(&MAGIC);
    artifact.push(VERSION);
    artifact.extend_from_slice(&leaf_count.to_le_bytes());
    artifact.extend_from_slice(&body_len.to_le_bytes());
    artifact.extend_from_slice(&crc32.to_le_bytes());
    artifact.extend_from_slice(&body);
    artifact
}

/// Parse a tree artifact.
///
/// # Errors
/// - `TreeError::TooShort`, `InvalidMagic`, `UnsupportedVersion`,
///   `LengthMismatch` for a bad header
/// - `Error::Crc` if the checksum doesn't match
/// - `TreeError::Truncated`, `TrailingBits`, `LeafCountMismatch`,
///   `DuplicatePlaceholder`, `DuplicateSymbol`, `RootLeaf` for a bad body
pub fn parse_tree(bytes: &[u8]) -> Result<HuffmanTree> {
    if bytes.len() < HEADER_SIZE {
        return Err(TreeError::TooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let magic = read_array::<4>(bytes, 0);
    if magic != MAGIC {
        return Err(TreeError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let version = bytes[4];
    if version != VERSION {
        return Err(TreeError::UnsupportedVersion(version).into());
    }

    let leaf_count = u32::from_le_bytes(read_array::<4>(bytes, 5));
    let body_len = u32::from_le_bytes(read_array::<4>(bytes, 9));
    let crc32 = u32::from_le_bytes(read_array::<4>(bytes, 13));

    let body = &bytes[HEADER_SIZE..];
    if body.len() != body_len as usize {
        return Err(TreeError::LengthMismatch {
            expected: body_len as usize,
            actual: body.len(),
        }
        .into());
    }

    let computed_crc = compute_crc(leaf_count, body_len, body);
    if computed_crc != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed_crc,
        });
    }

    if leaf_count == 0 {
        if !body.is_empty() {
            return Err(TreeError::TrailingBits(body.len() * 8).into());
        }
        return Ok(HuffmanTree::empty());
    }

    let mut reader = BitReader::new(body);
    let root = read_body(&mut reader, leaf_count)?;

    // Only zero padding may follow, and never a whole byte of it
    let remaining = reader.bits_remaining();
    if remaining >= 8 || reader.read_bits(remaining)? != 0 {
        return Err(TreeError::TrailingBits(remaining).into());
    }

    if root.is_leaf() {
        return Err(TreeError::RootLeaf.into());
    }

    Ok(HuffmanTree::from_root(root))
}

/// A partially rebuilt internal node.
enum Pending {
    Empty,
    HasLeft(Node),
}

/// Rebuild a pre-order body with an explicit stack of open internal nodes.
fn read_body(reader: &mut BitReader<'_>, expected_leaves: u32) -> Result<Node> {
    let mut open: Vec<Pending> = Vec::new();
    let mut seen = HashSet::new();
    let mut placeholder_seen = false;
    let mut leaves: u32 = 0;

    loop {
        let is_leaf = reader.read_bit().map_err(|_| TreeError::Truncated)?;
        if !is_leaf {
            // n leaves need n - 1 internal nodes, so a full stack means garbage
            if open.len() as u64 >= u64::from(expected_leaves) {
                return Err(TreeError::LeafCountMismatch {
                    expected: expected_leaves,
                    actual: leaves,
                }
                .into());
            }
            open.push(Pending::Empty);
            continue;
        }

        let has_symbol = reader.read_bit().map_err(|_| TreeError::Truncated)?;
        let symbol = if has_symbol {
            let value = reader
                .read_bits(SYMBOL_BITS)
                .map_err(|_| TreeError::Truncated)? as Symbol;
            if !seen.insert(value) {
                return Err(TreeError::DuplicateSymbol(value).into());
            }
            Some(value)
        } else {
            if placeholder_seen {
                return Err(TreeError::DuplicatePlaceholder.into());
            }
            placeholder_seen = true;
            None
        };

        leaves += 1;
        if leaves > expected_leaves {
            return Err(TreeError::LeafCountMismatch {
                expected: expected_leaves,
                actual: leaves,
            }
            .into());
        }

        // Attach the finished subtree, closing every node it completes
        let mut finished = Node::Leaf { symbol, weight: 0 };
        loop {
            match open.pop() {
                None => {
                    if leaves != expected_leaves {
                        return Err(TreeError::LeafCountMismatch {
                            expected: expected_leaves,
                            actual: leaves,
                        }
                        .into());
                    }
                    return Ok(finished);
                }
                Some(Pending::Empty) => {
                    open.push(Pending::HasLeft(finished));
                    break;
                }
                Some(Pending::HasLeft(left)) => {
                    finished = Node::Internal {
                        weight: 0,
                        left: Box::new(left),
                        right: Box::new(finished),
                    };
                }
            }
        }
    }
}

fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut array = [0u8; N];
    array.copy_from_slice(&bytes[offset..offset + N]);
    array
}

/// Compute CRC32 over the protected fields.
fn compute_crc(leaf_count: u32, body_len: u32, body: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&leaf_count.to_le_bytes());
    hasher.update(&body_len.to_le_bytes());
    hasher.update(body);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BitIoError;

    fn units(text: &str) -> Vec<Symbol> {
        text.encode_utf16().collect()
    }

    fn tree_bytes(text: &str) -> Vec<u8> {
        compress(&units(text), Alphabet::UTF16).unwrap().tree
    }

    /// Re-frame a hand-written body with a valid header.
    fn frame(leaf_count: u32, body: &[u8]) -> Vec<u8> {
        let body_len = body.len() as u32;
        let mut bytes = MAGIC.to_vec();
        bytes.push(VERSION);
        bytes.extend_from_slice(&leaf_count.to_le_bytes());
        bytes.extend_from_slice(&body_len.to_le_bytes());
        bytes.extend_from_slice(&compute_crc(leaf_count, body_len, body).to_le_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    fn body_of(bits: &str) -> Vec<u8> {
        bitio::pack(&bits.parse().unwrap()).bytes
    }

    #[test]
    fn test_tree_round_trip() {
        let encoded = Encoder::default().encode_str("abracadabra").unwrap();
        let bytes = serialize_tree(&encoded.tree);
        let parsed = parse_tree(&bytes).unwrap();

        assert!(parsed.same_shape(&encoded.tree));
        assert_eq!(parsed.leaf_count(), 5);
    }

    #[test]
    fn test_empty_tree_round_trip() {
        let bytes = serialize_tree(&HuffmanTree::empty());
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert!(parse_tree(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_placeholder_round_trip() {
        let encoded = Encoder::default().encode_str("zzzz").unwrap();
        let parsed = parse_tree(&serialize_tree(&encoded.tree)).unwrap();
        assert!(parsed.same_shape(&encoded.tree));
    }

    #[test]
    fn test_body_layout() {
        // root(placeholder, 'a'): 0 | 1 0 | 1 1 <16 bits of 0x0061>
        let encoded = Encoder::default().encode_str("aa").unwrap();
        let bytes = serialize_tree(&encoded.tree);
        let body = &bytes[HEADER_SIZE..];

        assert_eq!(u32::from_le_bytes(read_array::<4>(&bytes, 5)), 2);
        assert_eq!(body, body_of("010110000000001100001").as_slice());
    }

    #[test]
    fn test_compress_decompress() {
        let input = units("hello, huffman");
        let artifact = compress(&input, Alphabet::UTF16).unwrap();
        assert!(artifact.padding <= 7);
        assert_eq!(decompress(&artifact).unwrap(), input);
    }

    #[test]
    fn test_empty_artifact() {
        let artifact = compress(&[], Alphabet::UTF16).unwrap();
        assert!(artifact.data.is_empty());
        assert_eq!(artifact.padding, 0);
        assert!(decompress(&artifact).unwrap().is_empty());
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            parse_tree(&[0u8; 10]),
            Err(Error::Tree(TreeError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = tree_bytes("abc");
        bytes[0] = 0xFF;
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = tree_bytes("abc");
        bytes[4] = 9;
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::UnsupportedVersion(9)))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let mut bytes = tree_bytes("abc");
        bytes.push(0);
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = tree_bytes("abc");
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let err = parse_tree(&bytes).unwrap_err();
        assert!(matches!(err, Error::Crc { .. }));
        assert!(err.is_malformed_tree());
    }

    #[test]
    fn test_truncated_body() {
        // Internal node, placeholder, then a symbol leaf cut off after 3 bits
        let bytes = frame(2, &body_of("01011000"));
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::Truncated))
        ));
    }

    #[test]
    fn test_trailing_bits() {
        // Two symbol leaves, 37 bits
        let body = "0".to_string()
            + "11" + "0000000000000001"
            + "11" + "0000000000000010";
        let mut bits = body.clone();
        bits.push('1');
        let bytes = frame(2, &body_of(&bits));
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::TrailingBits(_)))
        ));

        // The same body without the stray bit parses
        assert_eq!(parse_tree(&frame(2, &body_of(&body))).unwrap().leaf_count(), 2);
    }

    #[test]
    fn test_leaf_count_mismatch() {
        let body = "0".to_string() + "10" + "11" + "0000000001000001";
        assert!(matches!(
            parse_tree(&frame(3, &body_of(&body))),
            Err(Error::Tree(TreeError::LeafCountMismatch { expected: 3, actual: 2 }))
        ));
    }

    #[test]
    fn test_duplicate_placeholder() {
        let bytes = frame(2, &body_of("01010"));
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::DuplicatePlaceholder))
        ));
    }

    #[test]
    fn test_duplicate_symbol() {
        let body = "0".to_string() + "11" + "0000000001000001" + "11" + "0000000001000001";
        assert!(matches!(
            parse_tree(&frame(2, &body_of(&body))),
            Err(Error::Tree(TreeError::DuplicateSymbol(0x41)))
        ));
    }

    #[test]
    fn test_root_leaf() {
        let body = "11".to_string() + "0000000001000001";
        assert!(matches!(
            parse_tree(&frame(1, &body_of(&body))),
            Err(Error::Tree(TreeError::RootLeaf))
        ));
    }

    #[test]
    fn test_runaway_internal_nodes() {
        // A body of all zeros never closes a node
        let bytes = frame(2, &[0u8; 4]);
        assert!(matches!(
            parse_tree(&bytes),
            Err(Error::Tree(TreeError::LeafCountMismatch { .. }))
        ));
    }

    #[test]
    fn test_invalid_padding_byte() {
        let mut artifact = compress(&units("abc"), Alphabet::UTF16).unwrap();
        artifact.padding = 8;
        assert!(matches!(
            artifact.unpack(),
            Err(Error::BitIo(BitIoError::InvalidPadding { padding: 8, .. }))
        ));
    }

    #[test]
    fn test_stored_len() {
        let artifact = compress(&units("abc"), Alphabet::UTF16).unwrap();
        assert_eq!(
            artifact.stored_len(),
            artifact.tree.len() + 1 + artifact.data.len()
        );
    }

    #[test]
    fn test_verify() {
        let input = units("abracadabra");
        let artifact = compress(&input, Alphabet::UTF16).unwrap();
        verify(&input, &artifact).unwrap();

        assert!(matches!(
            verify(&units("abracadabrx"), &artifact),
            Err(Error::Decode(DecodeError::Mismatch {
                position: 10,
                expected: 11,
                actual: 11
            }))
        ));
        assert!(matches!(
            verify(&units("abracadabra!"), &artifact),
            Err(Error::Decode(DecodeError::Mismatch { position: 11, .. }))
        ));
    }

    /// Pre-order body of a tree that is `leaves - 1` internal nodes deep,
    /// with every right child a leaf.
    fn left_deep_body(leaves: u32) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for _ in 1..leaves {
            writer.write_bit(false);
        }
        for symbol in 0..leaves {
            writer.write_bits(0b11, 2).unwrap();
            writer.write_bits(u64::from(symbol), SYMBOL_BITS).unwrap();
        }
        writer.finish()
    }

    #[test]
    fn test_deepest_tree_parses() {
        let tree = parse_tree(&frame(65_536, &left_deep_body(65_536))).unwrap();
        assert_eq!(tree.leaf_count(), 65_536);
        assert_eq!(tree.depth(), 65_535);
    }

    #[test]
    fn test_deep_body_with_trailing_byte() {
        // 65535 + 65536 * 18 bits leave one pad bit, plus the extra byte
        let mut body = left_deep_body(65_536);
        body.push(0);
        assert!(matches!(
            parse_tree(&frame(65_536, &body)),
            Err(Error::Tree(TreeError::TrailingBits(9)))
        ));
    }

    #[test]
    fn test_deep_body_truncated() {
        // The finished left subtree is still pending when the bits run out
        let mut body = left_deep_body(65_536);
        body.truncate(body.len() - 3);
        assert!(matches!(
            parse_tree(&frame(65_536, &body)),
            Err(Error::Tree(TreeError::Truncated))
        ));
    }
}
