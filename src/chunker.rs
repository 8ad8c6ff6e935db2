//! Re-chunking of a bit sequence into end-tagged data words

use crate::{Bit, DataWord, Error, WORD_WIDTH};

/// A data word on the output stream, tagged with an end-of-stream marker
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub struct StreamWord {
    /// The word payload
    pub data: DataWord,
    /// `true` only on the final word of the stream
    pub last: bool,
}

/// Splits a bit sequence into fixed-width words, tagging the final word as last.
///
/// Produces `ceil(bits.len() / WORD_WIDTH)` words; each word takes its bits
/// most-significant-first, mirroring
/// [`InputAssembler::drain_concatenated`](crate::InputAssembler::drain_concatenated), so that
/// chunking and concatenation are inverse operations up to the zero padding of the final word.
/// An empty sequence yields no words.
///
/// # Errors
///
/// Returns an error if any bit is [`Bit::Filler`], which cannot be put on the wire.
///
/// # Examples
///
/// ```
/// use ratematch::{chunk, Bit, WORD_WIDTH};
///
/// let words = chunk(&vec![Bit::One; WORD_WIDTH + 2])?;
/// assert_eq!(words.len(), 2);
/// assert!(!words[0].last);
/// assert!(words[1].last);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn chunk(bits: &[Bit]) -> Result<Vec<StreamWord>, Error> {
    let num_words = bits.len().div_ceil(WORD_WIDTH);
    let mut words = Vec::with_capacity(num_words);
    for (index, word_bits) in bits.chunks(WORD_WIDTH).enumerate() {
        words.push(StreamWord {
            data: DataWord::from_bits(word_bits)?,
            last: index + 1 == num_words,
        });
    }
    Ok(words)
}

#[cfg(test)]
mod tests_of_chunk {
    use super::*;
    use crate::utils;
    use Bit::{Filler, One, Zero};

    #[test]
    fn test_empty_sequence() {
        assert!(chunk(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_filler_is_rejected() {
        let mut bits = vec![Zero; 10];
        bits[3] = Filler;
        assert!(matches!(chunk(&bits).unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn test_final_word_padding_and_marker() {
        // 130 bits: one full word plus two bits zero-padded into a second, last-tagged word
        let mut bits = vec![Zero; WORD_WIDTH];
        bits.extend([One, One]);
        let words = chunk(&bits).unwrap();
        assert_eq!(words.len(), 2);
        assert!(!words[0].last);
        assert!(words[1].last);
        assert_eq!(words[0].data.value(), 0);
        assert_eq!(words[1].data.value(), 0b11 << 126);
    }

    #[test]
    fn test_single_exact_word() {
        let words = chunk(&[One; WORD_WIDTH]).unwrap();
        assert_eq!(words.len(), 1);
        assert!(words[0].last);
        assert_eq!(words[0].data.value(), u128::MAX);
    }

    #[test]
    fn test_chunk_inverts_concatenation() {
        // Concatenating the chunked words reproduces the sequence, up to final padding
        let bits = utils::random_bits(3 * WORD_WIDTH + 57);
        let words = chunk(&bits).unwrap();
        let concatenated: Vec<Bit> = words.iter().flat_map(|w| w.data.to_bits()).collect();
        assert_eq!(concatenated[.. bits.len()], bits[..]);
        assert!(concatenated[bits.len() ..].iter().all(|&b| b == Zero));
    }
}
