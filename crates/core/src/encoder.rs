//! Huffman encoding.
//!
//! Counts symbols, builds the tree and code table, then concatenates the
//! code of every input symbol. The result carries the tree, which the
//! decoder needs; frequency and code tables are discarded.

use crate::alphabet::{Alphabet, Symbol};
use crate::bitio::BitSeq;
use crate::codes::CodeTable;
use crate::counter::count_symbols;
use crate::error::{EncodeError, Result};
use crate::tree::{build_tree, HuffmanTree};

/// Output of an encoding: the logical bit sequence and the tree to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bits: BitSeq,
    pub tree: HuffmanTree,
}

/// Encoder over a fixed alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    alphabet: Alphabet,
}

impl Encoder {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// Encode a symbol sequence.
    ///
    /// # Errors
    /// `EncodeError::AlphabetViolation` if any symbol lies outside the
    /// alphabet.
    pub fn encode(&self, input: &[Symbol]) -> Result<Encoded> {
        let frequencies = count_symbols(input, self.alphabet)?;
        let tree = build_tree(&frequencies);
        let table = CodeTable::from_tree(&tree);

        let bit_len: usize = table
            .iter()
            .map(|(symbol, code)| frequencies.get(symbol) as usize * code.len())
            .sum();

        let mut bits = BitSeq::with_capacity(bit_len);
        for (position, &symbol) in input.iter().enumerate() {
            // Every counted symbol has a code
            let code = table.get(symbol).ok_or(EncodeError::AlphabetViolation {
                symbol,
                position,
                alphabet_size: self.alphabet.size(),
            })?;
            bits.extend_from(code);
        }

        Ok(Encoded { bits, tree })
    }

    /// Encode text as UTF-16 code units.
    pub fn encode_str(&self, text: &str) -> Result<Encoded> {
        let symbols: Vec<Symbol> = text.encode_utf16().collect();
        self.encode(&symbols)
    }

    /// Encode raw bytes, one symbol per byte.
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<Encoded> {
        let symbols: Vec<Symbol> = bytes.iter().map(|&b| Symbol::from(b)).collect();
        self.encode(&symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_abracadabra_bits() {
        let encoded = Encoder::default().encode_str("abracadabra").unwrap();

        // a=0 b=110 r=111 c=100 d=101
        assert_eq!(
            encoded.bits.to_string(),
            "01101110100010101101110"
        );
        assert_eq!(encoded.bits.len(), 23);
        assert_eq!(encoded.bits.len() as u64, encoded.tree.weighted_path_length());
    }

    #[test]
    fn test_empty_input() {
        let encoded = Encoder::default().encode(&[]).unwrap();
        assert!(encoded.bits.is_empty());
        assert!(encoded.tree.is_empty());
    }

    #[test]
    fn test_single_symbol() {
        let encoded = Encoder::default().encode_str("aaaa").unwrap();
        assert_eq!(encoded.bits.to_string(), "1111");
        assert_eq!(encoded.tree.leaf_count(), 2);
    }

    #[test]
    fn test_bit_count_conservation() {
        let text = "she sells sea shells by the sea shore";
        let encoded = Encoder::default().encode_str(text).unwrap();
        let table = CodeTable::from_tree(&encoded.tree);

        let expected: usize = text
            .encode_utf16()
            .map(|s| table.get(s).unwrap().len())
            .sum();
        assert_eq!(encoded.bits.len(), expected);
    }

    #[test]
    fn test_deterministic() {
        let encoder = Encoder::default();
        let a = encoder.encode_str("deterministic output please").unwrap();
        let b = encoder.encode_str("deterministic output please").unwrap();

        assert_eq!(a, b);
        assert_eq!(CodeTable::from_tree(&a.tree), CodeTable::from_tree(&b.tree));
    }

    #[test]
    fn test_alphabet_violation() {
        let encoder = Encoder::new(Alphabet::BYTES);
        let result = encoder.encode_str("caf\u{e9} \u{2603}");
        assert!(matches!(
            result,
            Err(Error::Encode(EncodeError::AlphabetViolation {
                symbol: 0x2603,
                position: 5,
                alphabet_size: 256
            }))
        ));
    }

    #[test]
    fn test_legacy_alphabet_rejects_top_range() {
        let symbols = [0x41, 0xFFFD];
        assert!(Encoder::new(Alphabet::LEGACY).encode(&symbols).is_err());
        assert!(Encoder::new(Alphabet::UTF16).encode(&symbols).is_ok());
    }

    #[test]
    fn test_encode_bytes() {
        let encoded = Encoder::new(Alphabet::BYTES).encode_bytes(&[0, 255, 0]).unwrap();
        assert_eq!(encoded.tree.leaf_count(), 2);
        assert_eq!(encoded.bits.len(), 3);
    }
}
