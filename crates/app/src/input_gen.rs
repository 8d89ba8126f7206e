//! Sample input generation for the demo.
//!
//! When no input file is given, we generate a symbol sequence with
//! interesting compression characteristics: a mix of skewed and flat
//! distributions.
//!
//! # Design
//!
//! Generated data has:
//! - Highly compressible sections (runs of one symbol)
//! - Moderately compressible sections (text-like words)
//! - Structured sections (short repeating patterns)
//! - Near-incompressible sections (uniform over the alphabet)
//!
//! Every symbol stays inside the requested alphabet, so the sample always
//! encodes.

use huffpack_core::{Alphabet, Symbol};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WORD_CHARS: &[u8] = b"etaoinshrdlucmfwypvbgkjqxz";
const PUNCTUATION: &[u8] = b" .,!\n";

/// Generate `len` symbols from `alphabet`, deterministically from `seed`.
pub fn generate_sample_symbols(seed: u64, len: usize, alphabet: Alphabet) -> Vec<Symbol> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len);
    let size = alphabet.size();

    while data.len() < len {
        let chunk_size = (len - data.len()).min(4096);

        match rng.gen_range(0..10u8) {
            // 30% runs
            0..=2 => {
                let symbol = random_symbol(&mut rng, size);
                data.extend(std::iter::repeat(symbol).take(chunk_size));
            }

            // 30% text-like
            3..=5 => push_text(&mut rng, &mut data, chunk_size, size),

            // 20% repeating patterns
            6..=7 => {
                let pattern_len = rng.gen_range(4..=32);
                let pattern: Vec<Symbol> = (0..pattern_len)
                    .map(|_| random_symbol(&mut rng, size))
                    .collect();
                data.extend(pattern.iter().copied().cycle().take(chunk_size));
            }

            // 20% uniform
            _ => {
                for _ in 0..chunk_size {
                    data.push(random_symbol(&mut rng, size));
                }
            }
        }
    }

    data.truncate(len);
    data
}

fn random_symbol(rng: &mut ChaCha8Rng, alphabet_size: u32) -> Symbol {
    rng.gen_range(0..alphabet_size) as Symbol
}

/// Words drawn with a frequency skew toward the front of `WORD_CHARS`.
fn push_text(rng: &mut ChaCha8Rng, data: &mut Vec<Symbol>, count: usize, alphabet_size: u32) {
    // Small alphabets fold the letters onto what they have
    let fold = |c: u8| (u32::from(c) % alphabet_size) as Symbol;
    let mut written = 0;

    while written < count {
        let word_len = rng.gen_range(1..=9);
        for _ in 0..word_len {
            let r: f64 = rng.gen();
            let c = WORD_CHARS[(r * r * WORD_CHARS.len() as f64) as usize];
            data.push(fold(c));
        }
        let p = PUNCTUATION[rng.gen_range(0..PUNCTUATION.len())];
        data.push(fold(p));
        written += word_len + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sample_symbols() {
        let data = generate_sample_symbols(42, 1000, Alphabet::UTF16);
        assert_eq!(data.len(), 1000);
    }

    #[test]
    fn test_determinism() {
        let data1 = generate_sample_symbols(12345, 5000, Alphabet::UTF16);
        let data2 = generate_sample_symbols(12345, 5000, Alphabet::UTF16);

        assert_eq!(data1, data2);
    }

    #[test]
    fn test_different_seeds() {
        let data1 = generate_sample_symbols(1, 1000, Alphabet::UTF16);
        let data2 = generate_sample_symbols(2, 1000, Alphabet::UTF16);

        assert_ne!(data1, data2);
    }

    #[test]
    fn test_various_sizes() {
        for size in [0, 1, 100, 1000, 10000, 100000] {
            let data = generate_sample_symbols(999, size, Alphabet::BYTES);
            assert_eq!(data.len(), size);
        }
    }

    #[test]
    fn test_stays_in_alphabet() {
        for &size in &[1u32, 2, 40, 256, 65_356] {
            let alphabet = Alphabet::new(size).unwrap();
            for seed in 0..8 {
                let data = generate_sample_symbols(seed, 3000, alphabet);
                assert!(data.iter().all(|&s| alphabet.contains(s)));
            }
        }
    }
}
