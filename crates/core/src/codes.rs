//! Code table derivation.
//!
//! A symbol's code is the path from the root to its leaf: `0` for every
//! left edge, `1` for every right edge. Distinct leaves have distinct paths
//! and no leaf lies on another leaf's path, so the table is prefix-free by
//! construction.

use std::collections::BTreeMap;

use crate::alphabet::Symbol;
use crate::bitio::BitSeq;
use crate::tree::{HuffmanTree, Node};

/// Mapping from symbol to its code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, BitSeq>,
}

impl CodeTable {
    /// Walk `tree` and record the code of every symbol leaf.
    ///
    /// The placeholder leaf gets no entry. An empty tree gives an empty
    /// table. Uses an explicit stack, so skewed trees cannot exhaust the
    /// call stack.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(&Node, BitSeq)> = tree
            .root()
            .into_iter()
            .map(|root| (root, BitSeq::new()))
            .collect();

        while let Some((node, path)) = stack.pop() {
            match node {
                Node::Leaf {
                    symbol: Some(symbol),
                    ..
                } => {
                    codes.insert(*symbol, path);
                }
                Node::Leaf { symbol: None, .. } => {}
                Node::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((left, left_path));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitSeq> {
        self.codes.get(&symbol)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitSeq)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Length of the longest code; 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(BitSeq::len).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&BitSeq> = self.codes.values().collect();
        codes.sort_by(|a, b| a.as_slice().cmp(b.as_slice()));
        // After sorting, a prefix sorts immediately before some code it prefixes
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::counter::{count_symbols, FrequencyTable};
    use crate::tree::build_tree;

    fn table_for(text: &str) -> CodeTable {
        let symbols: Vec<Symbol> = text.encode_utf16().collect();
        let tree = build_tree(&count_symbols(&symbols, Alphabet::UTF16).unwrap());
        CodeTable::from_tree(&tree)
    }

    fn code(table: &CodeTable, c: char) -> String {
        table.get(c as Symbol).unwrap().to_string()
    }

    #[test]
    fn test_empty_tree() {
        let table = CodeTable::from_tree(&HuffmanTree::empty());
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_single_symbol() {
        let table = table_for("aaaa");
        assert_eq!(table.len(), 1);
        // Placeholder takes the left edge
        assert_eq!(code(&table, 'a'), "1");
    }

    #[test]
    fn test_abracadabra_codes() {
        let table = table_for("abracadabra");

        assert_eq!(table.len(), 5);
        assert_eq!(code(&table, 'a'), "0");
        assert_eq!(code(&table, 'c'), "100");
        assert_eq!(code(&table, 'd'), "101");
        assert_eq!(code(&table, 'b'), "110");
        assert_eq!(code(&table, 'r'), "111");
        assert!(table.is_prefix_free());

        let shortest = table.iter().map(|(_, c)| c.len()).min().unwrap();
        assert_eq!(table.get('a' as Symbol).unwrap().len(), shortest);
    }

    #[test]
    fn test_prefix_free_check_detects_violation() {
        let mut table = CodeTable::default();
        table.codes.insert(1, "10".parse().unwrap());
        table.codes.insert(2, "101".parse().unwrap());
        assert!(!table.is_prefix_free());

        table.codes.insert(2, "11".parse().unwrap());
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_all_bytes_prefix_free() {
        let table = FrequencyTable::from_counts(
            Alphabet::BYTES,
            (0..=255u16).map(|s| (s, u64::from(s % 17) + 1)),
        )
        .unwrap();
        let codes = CodeTable::from_tree(&build_tree(&table));

        assert_eq!(codes.len(), 256);
        assert!(codes.is_prefix_free());
        assert!(codes.iter().all(|(_, code)| !code.is_empty()));
    }

    #[test]
    fn test_code_lengths_match_leaf_depths() {
        let symbols: Vec<Symbol> = "mississippi river".encode_utf16().collect();
        let frequencies = count_symbols(&symbols, Alphabet::UTF16).unwrap();
        let tree = build_tree(&frequencies);
        let table = CodeTable::from_tree(&tree);

        let cost: u64 = table
            .iter()
            .map(|(symbol, code)| frequencies.get(symbol) * code.len() as u64)
            .sum();
        assert_eq!(cost, tree.weighted_path_length());
    }
}
