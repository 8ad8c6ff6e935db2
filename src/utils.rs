//! # Some useful functions for exercising the rate-matching pipeline
//!
//! The [`random_bits`] function returns a given number of random data bits; the [`random_words`]
//! function returns random 128-bit data words for the input stream; and the [`error_count`]
//! function returns the number of positions in which a sequence differs from a reference
//! sequence.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use ratematch::utils;
//!
//! let words = utils::random_words(11);
//! let bits = utils::random_bits(1320);
//! let err_count = utils::error_count(&bits, &bits);
//! assert_eq!(err_count, 0);
//! ```

use rand::Rng;

use crate::{Bit, DataWord};

/// Returns given number of random data bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// # Returns
///
/// - `bits`: Random bits, each [`Bit::Zero`] or [`Bit::One`] with equal probability (never
///   [`Bit::Filler`]).
#[must_use]
pub fn random_bits(num_bits: usize) -> Vec<Bit> {
    let mut rng = rand::rng();
    (0 .. num_bits)
        .map(|_| {
            if rng.random_bool(0.5) {
                Bit::One
            } else {
                Bit::Zero
            }
        })
        .collect()
}

/// Returns given number of random data words.
///
/// # Parameters
///
/// - `num_words`: Number of random words to be generated.
///
/// # Returns
///
/// - `words`: Random 128-bit data words.
#[must_use]
pub fn random_words(num_words: usize) -> Vec<DataWord> {
    let mut rng = rand::rng();
    (0 .. num_words)
        .map(|_| DataWord::new(rng.random::<u128>()))
        .collect()
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared.
///
/// # Returns
///
/// - `err_count`: Number of positions in which the two sequences differ. If they are of
///   different lengths, then the longer sequence is effectively truncated to the length of the
///   shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_random_bits() {
        let num_bits = 0;
        assert!(random_bits(num_bits).is_empty());
        let num_bits = 10000;
        let bits = random_bits(num_bits);
        let num_zeros = bits.iter().filter(|&b| *b == Zero).count();
        let num_ones = bits.iter().filter(|&b| *b == One).count();
        assert_eq!(num_zeros + num_ones, num_bits);
        assert!(num_zeros > 9 * num_bits / 20 && num_ones > 9 * num_bits / 20);
    }

    #[test]
    fn test_random_words() {
        assert!(random_words(0).is_empty());
        let words = random_words(4);
        assert_eq!(words.len(), 4);
        // Two consecutive random words colliding is vanishingly unlikely
        assert_ne!(words[0], words[1]);
    }

    #[test]
    fn test_error_count() {
        assert_eq!(error_count(&[], &[One, Zero]), 0);
        assert_eq!(error_count(&[One, Zero], &[]), 0);
        // Longer `seq`
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero, Zero, One];
        assert_eq!(error_count(&seq, &ref_seq), 2);
        // Shorter `seq`
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero, Zero, One];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero];
        assert_eq!(error_count(&seq, &ref_seq), 2);
    }
}
