//! Tree-driven Huffman decoding.
//!
//! Starting at the root, each bit selects a child (`0` left, `1` right)
//! until a leaf is reached; the leaf's symbol is emitted and the walk
//! restarts at the root. The stream must end exactly on a leaf boundary.

use crate::alphabet::Symbol;
use crate::bitio::BitSeq;
use crate::error::{DecodeError, Result, TreeError};
use crate::tree::{HuffmanTree, Node};

/// Decode a padding-free bit sequence with `tree`.
///
/// An empty sequence decodes to an empty output whatever the tree.
///
/// # Errors
/// - `DecodeError::TruncatedStream` if the bits run out mid-code, or if
///   there are bits but the tree is empty
/// - `DecodeError::UnassignedCode` if a code leads to the placeholder leaf
/// - `TreeError::RootLeaf` if the tree is a lone leaf, which cannot consume bits
pub fn decode(tree: &HuffmanTree, bits: &BitSeq) -> Result<Vec<Symbol>> {
    let total = bits.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let root = match tree.root() {
        Some(root @ Node::Internal { .. }) => root,
        Some(Node::Leaf { .. }) => return Err(TreeError::RootLeaf.into()),
        None => {
            return Err(DecodeError::TruncatedStream { consumed: 0, total }.into());
        }
    };

    let mut output = Vec::new();
    let mut current = root;
    // Bits consumed by complete codes
    let mut boundary = 0;

    for (position, bit) in bits.iter().enumerate() {
        current = match current {
            Node::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            Node::Leaf { .. } => return Err(TreeError::RootLeaf.into()),
        };

        if let Node::Leaf { symbol, .. } = current {
            let symbol = (*symbol).ok_or(DecodeError::UnassignedCode { position })?;
            output.push(symbol);
            current = root;
            boundary = position + 1;
        }
    }

    if boundary != total {
        return Err(DecodeError::TruncatedStream {
            consumed: boundary,
            total,
        }
        .into());
    }

    Ok(output)
}

/// Decode a textual bit string of `'0'`/`'1'` characters.
///
/// # Errors
/// `DecodeError::InvalidBit` for any other character, then as [`decode`].
pub fn decode_str(tree: &HuffmanTree, bits: &str) -> Result<Vec<Symbol>> {
    let bits: BitSeq = bits.parse()?;
    decode(tree, &bits)
}

/// Decode and reassemble UTF-16 text.
///
/// # Errors
/// As [`decode`], plus `DecodeError::InvalidText` if the symbols are not
/// valid UTF-16.
pub fn decode_to_string(tree: &HuffmanTree, bits: &BitSeq) -> Result<String> {
    let units = decode(tree, bits)?;
    symbols_to_string(&units)
}

/// Reassemble decoded UTF-16 code units into text.
///
/// # Errors
/// `DecodeError::InvalidText` on unpaired surrogates.
pub fn symbols_to_string(units: &[Symbol]) -> Result<String> {
    String::from_utf16(units).map_err(|_| DecodeError::InvalidText.into())
}
