//! This crate implements the rate-matching stage of the 5G NR physical layer, as specified in
//! Section 5.4.2.1 of 3GPP TS 38.212. Rate matching takes `inlen` encoded bits, selects `E`
//! output bits from a circular buffer starting at a redundancy-version-dependent offset, and
//! permutes them with a modulation-order bit interleaver. Around that pure algorithm
//! ([`rate_match`]), the crate provides a streaming pipeline: an [`InputAssembler`] that
//! accumulates fixed-width data words into one bit sequence, an output chunker that re-packs the
//! result into end-tagged words ([`chunk`]), and a [`StreamController`] that sequences
//! configuration intake, data intake, processing, and emission under a clocked ready/valid
//! handshake with reset-at-any-time semantics.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use thiserror::Error;

mod assembler;
mod chunker;
mod config;
mod matcher;
mod stream;
pub mod utils;
mod word;

pub use crate::assembler::{InputAssembler, MAX_WORDS};
pub use crate::chunker::{chunk, StreamWord};
pub use crate::config::{RateMatchConfig, CONFIG_WIDTH};
pub use crate::matcher::rate_match;
pub use crate::stream::{Phase, PortsIn, PortsOut, StreamController};
pub use crate::word::{DataWord, WORD_WIDTH};

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-range configuration field
    #[error("{0}")]
    InvalidConfig(String),
    /// Derived rate-matching quantity is zero or non-integral
    #[error("{0}")]
    InvalidParameter(String),
    /// Fewer data bits available than the configuration requires
    #[error("{0}")]
    InsufficientData(String),
    /// A bit that cannot be interpreted as `0`/`1` at the word boundary
    #[error("{0}")]
    Decode(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWrite(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWrite(#[from] serde_json::Error),
}

/// Enumeration of circular-buffer symbol values
///
/// The wire carries only `Zero` and `One`. `Filler` marks a "no data" position in the
/// rate-matching circular buffer (the classical `-1` sentinel): bit selection skips over it, and
/// packing it into a [`DataWord`] fails with [`Error::Decode`].
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero,
    /// Binary symbol `1`
    One,
    /// Filler position holding no data
    Filler,
}
