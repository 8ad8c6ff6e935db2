//! Rate-matching configuration and its packed wire representation

use serde::{Deserialize, Serialize};

use crate::Error;

/// Width (in bits) of the packed configuration word
pub const CONFIG_WIDTH: usize = 47;

/// Bit offsets of the fields within the packed configuration word (low-to-high numbering)
const INLEN_OFFSET: u32 = 0;
const OUTLEN_OFFSET: u32 = 16;
const RV_OFFSET: u32 = 32;
const NLAYERS_OFFSET: u32 = 34;
const QM_OFFSET: u32 = 37;
const NREF_OFFSET: u32 = 41;

/// Parameters for one rate-matching pass (3GPP TS 38.212, Section 5.4.2.1)
///
/// A configuration is constructed once per pass, either directly with [`RateMatchConfig::new`]
/// or by decoding a packed word with [`RateMatchConfig::from_word`], and is never mutated
/// afterwards.
#[derive(Clone, Eq, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct RateMatchConfig {
    /// Number of input bits (16-bit field)
    pub inlen: u16,
    /// Requested number of output bits (16-bit field)
    pub outlen: u16,
    /// Redundancy version, `0` to `3` (2-bit field)
    pub rv: u8,
    /// Number of transmission layers (3-bit field)
    pub nlayers: u8,
    /// Number of bits per modulation symbol (4-bit field)
    pub qm: u8,
    /// Soft-buffer limiting reference, `0` meaning unlimited (6-bit field)
    pub nref: u8,
}

impl RateMatchConfig {
    /// Returns a rate-matching configuration with the given field values.
    ///
    /// # Errors
    ///
    /// Returns an error if any field value does not fit its declared bit width: `rv` in 2 bits,
    /// `nlayers` in 3 bits, `qm` in 4 bits, `nref` in 6 bits (`inlen` and `outlen` fit their
    /// 16-bit fields by construction).
    ///
    /// # Examples
    ///
    /// ```
    /// use ratematch::RateMatchConfig;
    ///
    /// let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0)?;
    /// assert_eq!(config.rv, 3);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        inlen: u16,
        outlen: u16,
        rv: u8,
        nlayers: u8,
        qm: u8,
        nref: u8,
    ) -> Result<Self, Error> {
        check_field_width("rv", u64::from(rv), 2)?;
        check_field_width("nlayers", u64::from(nlayers), 3)?;
        check_field_width("Qm", u64::from(qm), 4)?;
        check_field_width("Nref", u64::from(nref), 6)?;
        Ok(Self {
            inlen,
            outlen,
            rv,
            nlayers,
            qm,
            nref,
        })
    }

    /// Returns the configuration decoded from a packed 47-bit configuration word.
    ///
    /// The field layout, in low-to-high bit numbering, is `[0:16)` `inlen`, `[16:32)` `outlen`,
    /// `[32:34)` `rv`, `[34:37)` `nlayers`, `[37:41)` `Qm`, `[41:47)` `Nref`.
    ///
    /// # Errors
    ///
    /// Returns an error if any bit above position 46 is set in `word`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratematch::RateMatchConfig;
    ///
    /// let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0)?;
    /// assert_eq!(RateMatchConfig::from_word(config.to_word())?, config);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_word(word: u64) -> Result<Self, Error> {
        if word >> CONFIG_WIDTH != 0 {
            return Err(Error::InvalidConfig(format!(
                "Configuration word {word:#x} has bits set above position {}",
                CONFIG_WIDTH - 1
            )));
        }
        Self::new(
            (word >> INLEN_OFFSET) as u16,
            (word >> OUTLEN_OFFSET) as u16,
            ((word >> RV_OFFSET) & 0x3) as u8,
            ((word >> NLAYERS_OFFSET) & 0x7) as u8,
            ((word >> QM_OFFSET) & 0xF) as u8,
            ((word >> NREF_OFFSET) & 0x3F) as u8,
        )
    }

    /// Returns the packed 47-bit configuration word for this configuration.
    ///
    /// Inverse of [`RateMatchConfig::from_word`]: `from_word(to_word(c)) == c` for every valid
    /// configuration `c`.
    #[must_use]
    pub fn to_word(&self) -> u64 {
        u64::from(self.inlen) << INLEN_OFFSET
            | u64::from(self.outlen) << OUTLEN_OFFSET
            | u64::from(self.rv) << RV_OFFSET
            | u64::from(self.nlayers) << NLAYERS_OFFSET
            | u64::from(self.qm) << QM_OFFSET
            | u64::from(self.nref) << NREF_OFFSET
    }
}

/// Checks that a field value fits its declared bit width.
fn check_field_width(name: &str, value: u64, width: u32) -> Result<(), Error> {
    if value >> width == 0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "Field {name} value {value} does not fit in {width} bits"
        )))
    }
}

#[cfg(test)]
mod tests_of_config {
    use super::*;

    #[test]
    fn test_new() {
        // Invalid input
        assert!(RateMatchConfig::new(1320, 2000, 4, 4, 8, 0).is_err());
        assert!(RateMatchConfig::new(1320, 2000, 3, 8, 8, 0).is_err());
        assert!(RateMatchConfig::new(1320, 2000, 3, 4, 16, 0).is_err());
        assert!(RateMatchConfig::new(1320, 2000, 3, 4, 8, 64).is_err());
        // Valid input
        let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0).unwrap();
        assert_eq!(config.inlen, 1320);
        assert_eq!(config.outlen, 2000);
        assert_eq!(config.rv, 3);
        assert_eq!(config.nlayers, 4);
        assert_eq!(config.qm, 8);
        assert_eq!(config.nref, 0);
    }

    #[test]
    fn test_to_word() {
        let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0).unwrap();
        assert_eq!(config.to_word(), 0x0113_07D0_0528);
        let config = RateMatchConfig::new(0xFFFF, 0xFFFF, 3, 7, 15, 63).unwrap();
        assert_eq!(config.to_word(), (1 << CONFIG_WIDTH) - 1);
    }

    #[test]
    fn test_from_word() {
        // Bits above the configuration width
        assert!(RateMatchConfig::from_word(1 << CONFIG_WIDTH).is_err());
        assert!(RateMatchConfig::from_word(u64::MAX).is_err());
        // Known layout
        let config = RateMatchConfig::from_word(0x0113_07D0_0528).unwrap();
        assert_eq!(config, RateMatchConfig::new(1320, 2000, 3, 4, 8, 0).unwrap());
        assert_eq!(RateMatchConfig::from_word(0).unwrap().inlen, 0);
    }

    #[test]
    fn test_word_round_trip() {
        let configs = [
            RateMatchConfig::new(0, 0, 0, 0, 0, 0).unwrap(),
            RateMatchConfig::new(1320, 2000, 3, 4, 8, 0).unwrap(),
            RateMatchConfig::new(100, 64, 1, 1, 2, 50).unwrap(),
            RateMatchConfig::new(0xFFFF, 0xFFFF, 3, 7, 15, 63).unwrap(),
        ];
        for config in configs {
            assert_eq!(RateMatchConfig::from_word(config.to_word()).unwrap(), config);
        }
    }
}
