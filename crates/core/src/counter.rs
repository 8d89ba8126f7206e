//! Symbol frequency analysis.

use crate::alphabet::{Alphabet, Symbol};
use crate::error::{EncodeError, Result};

/// Occurrence count of every symbol in an alphabet.
///
/// Dense: unseen symbols are present with count 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    /// An all-zero table covering `alphabet`.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            counts: vec![0; alphabet.size() as usize],
        }
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Later pairs for the same symbol add to earlier ones.
    ///
    /// # Errors
    /// - `EncodeError::AlphabetViolation` for a symbol outside `alphabet`
    /// - `EncodeError::CountOverflow` once the total reaches `u64::MAX`, the
    ///   bound under which every merged tree weight fits
    pub fn from_counts<I>(alphabet: Alphabet, counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, u64)>,
    {
        let mut table = Self::new(alphabet);
        let mut total: u64 = 0;
        for (position, (symbol, count)) in counts.into_iter().enumerate() {
            alphabet.check(symbol, position)?;
            total = total
                .checked_add(count)
                .filter(|&total| total < u64::MAX)
                .ok_or(EncodeError::CountOverflow { symbol })?;
            table.counts[symbol as usize] += count;
        }
        Ok(table)
    }

    /// Count of `symbol`; 0 when unseen or outside the alphabet.
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Number of symbols the table covers.
    pub fn alphabet_size(&self) -> usize {
        self.counts.len()
    }

    /// Symbols with a positive count, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Number of distinct symbols seen.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Count every symbol of `input`.
///
/// # Errors
/// `EncodeError::AlphabetViolation` for the first symbol not covered by
/// `alphabet`.
pub fn count_symbols(input: &[Symbol], alphabet: Alphabet) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::new(alphabet);
    for (position, &symbol) in input.iter().enumerate() {
        alphabet.check(symbol, position)?;
        table.counts[symbol as usize] += 1;
    }
    Ok(table)
}
