//! Bit-level packing of logical bit sequences into bytes.
//!
//! The encoder produces a logical [`BitSeq`]; storage is byte-granular.
//! [`pack`] writes the bits MSB-first and zero-pads the last byte,
//! reporting how many pad bits it added. [`unpack`] expands bytes back into
//! `8 * len` bits, and [`strip`] drops the recorded padding again.
//!
//! Pad bits are always zero and always at the low end of the last byte.
//! Nothing in the bytes marks them, so the pad count travels separately.
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{pack, strip, unpack, BitSeq};
//!
//! let bits: BitSeq = "10111".parse().unwrap();
//! let packed = pack(&bits);
//! assert_eq!(packed.bytes, vec![0b1011_1000]);
//! assert_eq!(packed.padding, 3);
//!
//! let restored = strip(unpack(&packed.bytes), packed.padding).unwrap();
//! assert_eq!(restored, bits);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{BitIoError, DecodeError, Error, Result};

/// A logical sequence of bits.
///
/// Displays as, and parses from, a string of `'0'` and `'1'` characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSeq {
    bits: Vec<bool>,
}

impl BitSeq {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitSeq) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// True if `self` is a prefix of `other` (equal sequences included).
    pub fn is_prefix_of(&self, other: &BitSeq) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// Drop everything after the first `len` bits.
    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }
}

impl FromIterator<bool> for BitSeq {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl FromStr for BitSeq {
    type Err = Error;

    /// Parse a string of `'0'`/`'1'` characters.
    ///
    /// # Errors
    /// `DecodeError::InvalidBit` for any other character.
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(Error::from(DecodeError::InvalidBit { position, found })),
            })
            .collect()
    }
}

impl fmt::Display for BitSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Packs bits into bytes, first bit in the high position.
///
/// The last byte is held back until it fills; [`finish`](Self::finish)
/// flushes it with zero bits in the unused low positions.
#[derive(Debug, Clone)]
pub struct BitWriter {
    out: Vec<u8>,
    /// Partial byte, filled from bit 7 down
    pending: u8,
    /// Bits held in `pending`, always below 8
    pending_len: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Writer sized for about `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            pending: 0,
            pending_len: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.pending |= 0x80 >> self.pending_len;
        }
        self.pending_len += 1;

        if self.pending_len == 8 {
            self.out.push(std::mem::take(&mut self.pending));
            self.pending_len = 0;
        }
    }

    /// Append the low `count` bits of `value`, highest of them first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` when `count` exceeds 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        (0..count)
            .rev()
            .for_each(|shift| self.write_bit((value >> shift) & 1 == 1));
        Ok(())
    }

    /// Zero bits `finish` will add to close the last byte.
    pub fn padding(&self) -> u8 {
        (8 - self.pending_len) % 8
    }

    /// Flush the partial byte, if any, and hand back the output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_len != 0 {
            self.out.push(self.pending);
        }
        self.out
    }

    /// Bits written so far, padding excluded.
    pub fn bit_len(&self) -> usize {
        self.out.len() * 8 + usize::from(self.pending_len)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a byte slice one bit at a time, high bit first.
///
/// The reader has no notion of padding: every bit of every byte is
/// readable. Strip pad bits with [`strip`] or stop early.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    src: &'a [u8],
    /// Index of the next bit; `src.len() * 8` when exhausted
    cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, cursor: 0 }
    }

    /// # Errors
    /// `BitIoError::UnexpectedEof` past the last byte.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .src
            .get(self.cursor / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = byte & (0x80u8 >> (self.cursor % 8)) != 0;
        self.cursor += 1;
        Ok(bit)
    }

    /// Read `count` bits into an integer, first bit most significant.
    ///
    /// Nothing is consumed on error.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` when `count` exceeds 64
    /// - `BitIoError::UnexpectedEof` when fewer than `count` bits are left
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    pub fn bits_remaining(&self) -> usize {
        self.src.len() * 8 - self.cursor
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}

/// Bytes produced by [`pack`], with the number of trailing pad bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packed {
    pub bytes: Vec<u8>,
    /// Zero bits appended to the last byte (0-7)
    pub padding: u8,
}

/// Pack a logical bit sequence into `ceil(len / 8)` bytes.
///
/// The pad count is `(8 - len % 8) % 8`: zero exactly when the length is
/// a multiple of 8.
pub fn pack(bits: &BitSeq) -> Packed {
    let mut writer = BitWriter::with_capacity(bits.len().div_ceil(8));
    for bit in bits.iter() {
        writer.write_bit(bit);
    }

    let padding = writer.padding();
    Packed {
        bytes: writer.finish(),
        padding,
    }
}

/// Expand bytes into `8 * bytes.len()` bits, padding included.
pub fn unpack(bytes: &[u8]) -> BitSeq {
    let mut reader = BitReader::new(bytes);
    let mut bits = BitSeq::with_capacity(bytes.len() * 8);
    while let Ok(bit) = reader.read_bit() {
        bits.push(bit);
    }
    bits
}

/// Remove the last `padding` bits of an unpacked sequence.
///
/// # Errors
/// `BitIoError::InvalidPadding` if `padding > 7` or longer than the sequence.
pub fn strip(mut bits: BitSeq, padding: u8) -> Result<BitSeq> {
    let pad = padding as usize;
    if padding > 7 || pad > bits.len() {
        return Err(BitIoError::InvalidPadding {
            padding,
            bit_len: bits.len(),
        }
        .into());
    }

    bits.truncate(bits.len() - pad);
    Ok(bits)
}
