//! The symbol alphabet.
//!
//! Symbols are 16-bit code units. The alphabet is the stated contract for
//! which of them an encoding may contain: every symbol must be strictly
//! below [`Alphabet::size`]. Frequency tables cover exactly this range.

use crate::error::{EncodeError, Result};

/// One unit of input data.
pub type Symbol = u16;

/// Largest alphabet a 16-bit symbol can address.
pub const MAX_ALPHABET_SIZE: u32 = 1 << 16;

/// A fixed alphabet `0..size` of symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alphabet {
    size: u32,
}

impl Alphabet {
    /// Every UTF-16 code unit.
    pub const UTF16: Alphabet = Alphabet {
        size: MAX_ALPHABET_SIZE,
    };

    /// Every byte value.
    pub const BYTES: Alphabet = Alphabet { size: 256 };

    /// A historical bound that stops 180 code units short of the full
    /// 16-bit range. Only useful when input must be accepted or rejected
    /// exactly as older encoders did.
    pub const LEGACY: Alphabet = Alphabet { size: 65_356 };

    /// Create an alphabet of `size` symbols.
    ///
    /// # Errors
    /// `EncodeError::InvalidAlphabet` unless `1 <= size <= 65536`.
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > MAX_ALPHABET_SIZE {
            return Err(EncodeError::InvalidAlphabet(size).into());
        }
        Ok(Self { size })
    }

    /// Number of symbols in the alphabet.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        u32::from(symbol) < self.size
    }

    /// Check that `symbol`, found at `position`, is covered.
    pub fn check(&self, symbol: Symbol, position: usize) -> Result<()> {
        if self.contains(symbol) {
            Ok(())
        } else {
            Err(EncodeError::AlphabetViolation {
                symbol,
                position,
                alphabet_size: self.size,
            }
            .into())
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::UTF16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_bounds() {
        assert!(Alphabet::new(0).is_err());
        assert!(Alphabet::new(MAX_ALPHABET_SIZE + 1).is_err());
        assert_eq!(Alphabet::new(1).unwrap().size(), 1);
        assert_eq!(Alphabet::new(MAX_ALPHABET_SIZE).unwrap(), Alphabet::UTF16);
    }

    #[test]
    fn test_full_range_is_default() {
        let alphabet = Alphabet::default();
        assert!(alphabet.contains(0));
        assert!(alphabet.contains(u16::MAX));
    }

    #[test]
    fn test_legacy_excludes_top_of_range() {
        assert!(Alphabet::LEGACY.contains(65_355));
        assert!(!Alphabet::LEGACY.contains(65_356));
        assert!(!Alphabet::LEGACY.contains(u16::MAX));
    }

    #[test]
    fn test_check_reports_position() {
        let err = Alphabet::BYTES.check(300, 7).unwrap_err();
        assert!(matches!(
            err,
            Error::Encode(EncodeError::AlphabetViolation {
                symbol: 300,
                position: 7,
                alphabet_size: 256
            })
        ));
    }
}
