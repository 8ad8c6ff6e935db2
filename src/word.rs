//! Fixed-width data word for the streaming interfaces

use crate::{Bit, Error};

/// Width (in bits) of a data word on the input and output streams
pub const WORD_WIDTH: usize = 128;

/// A 128-bit data word, the unit of wire transfer
///
/// Bit index `0` is the first bit sent chronologically and maps to the most-significant bit of
/// the underlying integer. This MSB-first convention is part of the wire-format contract and is
/// shared by [`InputAssembler::drain_concatenated`](crate::InputAssembler::drain_concatenated)
/// and [`chunk`](crate::chunk); inverting it silently would break interoperability.
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct DataWord(u128);

impl DataWord {
    /// Returns a data word with the given integer value.
    #[must_use]
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the integer value of the word.
    #[must_use]
    pub fn value(self) -> u128 {
        self.0
    }

    /// Returns the bit at the given index, with index `0` being the first bit sent (MSB).
    ///
    /// # Panics
    ///
    /// Panics if `index >= WORD_WIDTH`.
    #[must_use]
    pub fn bit(self, index: usize) -> Bit {
        assert!(index < WORD_WIDTH, "bit index {index} out of range");
        if (self.0 >> (WORD_WIDTH - 1 - index)) & 1 == 1 {
            Bit::One
        } else {
            Bit::Zero
        }
    }

    /// Returns a data word packed from the given bits, first bit into the MSB position.
    ///
    /// Fewer than [`WORD_WIDTH`] bits are zero-padded at the trailing (least-significant) end.
    ///
    /// # Errors
    ///
    /// Returns an error if more than [`WORD_WIDTH`] bits are given, or if any bit is
    /// [`Bit::Filler`] (filler carries no data and cannot be put on the wire).
    ///
    /// # Examples
    ///
    /// ```
    /// use ratematch::{Bit, DataWord};
    /// use Bit::{One, Zero};
    ///
    /// let word = DataWord::from_bits(&[One, Zero, One])?;
    /// assert_eq!(word.value(), 0b101 << 125);
    /// assert_eq!(word.bit(0), One);
    /// assert_eq!(word.bit(2), One);
    /// assert_eq!(word.bit(3), Zero);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_bits(bits: &[Bit]) -> Result<Self, Error> {
        if bits.len() > WORD_WIDTH {
            return Err(Error::Decode(format!(
                "Cannot pack {} bits into a {WORD_WIDTH}-bit word",
                bits.len()
            )));
        }
        let mut value = 0u128;
        for (index, &bit) in bits.iter().enumerate() {
            match bit {
                Bit::Zero => {}
                Bit::One => value |= 1 << (WORD_WIDTH - 1 - index),
                Bit::Filler => {
                    return Err(Error::Decode(format!(
                        "Filler bit at position {index} cannot be packed into a data word"
                    )));
                }
            }
        }
        Ok(Self(value))
    }

    /// Returns all [`WORD_WIDTH`] bits of the word, first-sent (MSB) bit first.
    #[must_use]
    pub fn to_bits(self) -> Vec<Bit> {
        (0 .. WORD_WIDTH).map(|index| self.bit(index)).collect()
    }
}

#[cfg(test)]
mod tests_of_data_word {
    use super::*;
    use Bit::{Filler, One, Zero};

    #[test]
    fn test_bit() {
        let word = DataWord::new(1);
        assert_eq!(word.bit(WORD_WIDTH - 1), One);
        assert_eq!(word.bit(0), Zero);
        let word = DataWord::new(1 << 127);
        assert_eq!(word.bit(0), One);
        assert_eq!(word.bit(1), Zero);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bit_out_of_range() {
        let _ = DataWord::new(0).bit(WORD_WIDTH);
    }

    #[test]
    fn test_from_bits() {
        // Invalid input
        assert!(DataWord::from_bits(&[Zero; WORD_WIDTH + 1]).is_err());
        assert!(DataWord::from_bits(&[One, Filler, Zero]).is_err());
        // Valid input
        assert_eq!(DataWord::from_bits(&[]).unwrap(), DataWord::new(0));
        let word = DataWord::from_bits(&[One, Zero, One, One]).unwrap();
        assert_eq!(word.value(), 0b1011 << 124);
        let word = DataWord::from_bits(&[Zero; WORD_WIDTH]).unwrap();
        assert_eq!(word.value(), 0);
    }

    #[test]
    fn test_to_bits() {
        let mut bits = vec![Zero; WORD_WIDTH];
        bits[0] = One;
        bits[126] = One;
        let word = DataWord::from_bits(&bits).unwrap();
        assert_eq!(word.to_bits(), bits);
        assert_eq!(word.value(), (1 << 127) | 0b10);
    }
}
