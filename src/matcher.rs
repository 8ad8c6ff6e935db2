//! Circular-buffer bit selection and bit interleaving per 3GPP TS 38.212, Section 5.4.2.1

use itertools::iproduct;

use crate::{Bit, Error, RateMatchConfig};

/// Lifting sizes from Table 5.3.2-1 of 3GPP TS 38.212
const LIFTING_SIZES: [usize; 51] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 18, 20, 22, 24, 26, 28, 30, 32, 36, 40,
    44, 48, 52, 56, 60, 64, 72, 80, 88, 96, 104, 112, 120, 128, 144, 160, 176, 192, 208, 224, 240,
    256, 288, 320, 352, 384,
];

/// Number of codeword nodes for base graphs 1 and 2
const NCWNODES_BG1: usize = 66;
const NCWNODES_BG2: usize = 50;

/// Starting-offset numerators indexed by redundancy version, per base graph
const K0_NUMERATORS_BG1: [usize; 4] = [0, 17, 33, 56];
const K0_NUMERATORS_BG2: [usize; 4] = [0, 13, 25, 43];

/// Returns the rate-matched output bits for the given input bits and configuration.
///
/// The first `config.inlen` bits of `input` form the circular buffer. Output bits are selected
/// starting from the redundancy-version-dependent offset `k0`, skipping [`Bit::Filler`]
/// positions, until `E` bits have been collected; the selected bits are then permuted by the
/// modulation-order bit interleaver. This is a pure function: it holds no state across calls.
///
/// # Parameters
///
/// - `input`: Input bit sequence; must hold at least `config.inlen` bits, and any bits beyond
///   `config.inlen` are ignored.
///
/// - `config`: Rate-matching configuration for this pass.
///
/// # Returns
///
/// - `output`: Rate-matched output bits, of length `E = nlayers * Qm * floor(outlen / (nlayers *
///   Qm))`. The output never contains [`Bit::Filler`].
///
/// # Errors
///
/// Returns an error if `config.inlen` is zero, if the soft buffer size or `nlayers * Qm` is
/// zero, if `E` is not a multiple of `Qm`, if `input` holds fewer than `config.inlen` bits, or
/// if the circular buffer holds only filler positions.
///
/// # Examples
///
/// ```
/// use ratematch::{rate_match, utils, RateMatchConfig};
///
/// let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0)?;
/// let input = utils::random_bits(1320);
/// let output = rate_match(&input, &config)?;
/// assert_eq!(output.len(), 1984);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn rate_match(input: &[Bit], config: &RateMatchConfig) -> Result<Vec<Bit>, Error> {
    let inlen = usize::from(config.inlen);
    if inlen == 0 {
        return Err(Error::InvalidParameter(
            "Input length cannot be zero".to_string(),
        ));
    }
    if input.len() < inlen {
        return Err(Error::InsufficientData(format!(
            "Expected at least {inlen} input bits, found {}",
            input.len()
        )));
    }
    let input = &input[.. inlen];
    let ncb = soft_buffer_size(config);
    if ncb == 0 {
        return Err(Error::InvalidParameter(
            "Soft buffer size cannot be zero".to_string(),
        ));
    }
    let (bgn, ncwnodes) = base_graph(inlen);
    let zc = inlen / ncwnodes;
    let k0 = start_offset(bgn, config.rv, ncb, inlen, zc);
    let e_len = output_length(config)?;
    let qm = usize::from(config.qm);
    if e_len % qm != 0 {
        return Err(Error::InvalidParameter(format!(
            "Output length {e_len} is not a multiple of Qm = {qm}"
        )));
    }
    let selected = select_bits(input, ncb, k0, e_len)?;
    Ok(interleave(&selected, e_len / qm, qm))
}

/// Returns the soft buffer size `Ncb` (`inlen` when `Nref` is zero, i.e. unlimited).
fn soft_buffer_size(config: &RateMatchConfig) -> usize {
    let inlen = usize::from(config.inlen);
    let nref = usize::from(config.nref);
    if nref == 0 {
        inlen
    } else {
        inlen.min(nref)
    }
}

/// Returns the base graph number and its codeword-node count for the given input length.
///
/// Base graph 1 applies iff `inlen` is exactly 66 times one of the lifting sizes.
fn base_graph(inlen: usize) -> (usize, usize) {
    if LIFTING_SIZES.iter().any(|&zc| inlen == zc * NCWNODES_BG1) {
        (1, NCWNODES_BG1)
    } else {
        (2, NCWNODES_BG2)
    }
}

/// Returns the circular-buffer starting offset `k0` for the given base graph and redundancy
/// version.
///
/// The offset is `floor(num * Ncb / inlen) * Zc` with the division performed on real values;
/// truncating `Ncb / inlen` to an integer first would collapse the ratio to zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn start_offset(bgn: usize, rv: u8, ncb: usize, inlen: usize, zc: usize) -> usize {
    let numerators = if bgn == 1 {
        K0_NUMERATORS_BG1
    } else {
        K0_NUMERATORS_BG2
    };
    let numerator = numerators[usize::from(rv)];
    (numerator as f64 * ncb as f64 / inlen as f64).floor() as usize * zc
}

/// Returns the output length `E` for the given configuration.
///
/// `E` is `outlen` rounded down to a multiple of `nlayers * Qm`; an `outlen` below one group
/// gives `E = 0`, which is a valid, empty result rather than an error. Boundary behavior is
/// pinned by unit tests.
fn output_length(config: &RateMatchConfig) -> Result<usize, Error> {
    let group = usize::from(config.nlayers) * usize::from(config.qm);
    if group == 0 {
        return Err(Error::InvalidParameter(
            "Product of nlayers and Qm cannot be zero".to_string(),
        ));
    }
    Ok(group * (usize::from(config.outlen) / group))
}

/// Selects `e_len` bits from the circular buffer, skipping filler positions.
fn select_bits(input: &[Bit], ncb: usize, k0: usize, e_len: usize) -> Result<Vec<Bit>, Error> {
    let mut selected = Vec::with_capacity(e_len);
    let mut index = 0;
    let mut fillers_in_a_row = 0;
    while selected.len() < e_len {
        match input[(k0 + index) % ncb] {
            Bit::Filler => {
                fillers_in_a_row += 1;
                if fillers_in_a_row == ncb {
                    return Err(Error::InsufficientData(
                        "Circular buffer holds only filler positions".to_string(),
                    ));
                }
            }
            bit => {
                selected.push(bit);
                fillers_in_a_row = 0;
            }
        }
        index += 1;
    }
    Ok(selected)
}

/// Permutes the selected bits from column-major fill order to row-major read order.
///
/// The selected sequence fills a `rows x qm` matrix by column; the output reads it by row, so
/// output position `i * qm + j` takes selected bit `j * rows + i`.
fn interleave(selected: &[Bit], rows: usize, qm: usize) -> Vec<Bit> {
    let mut output = vec![Bit::Zero; selected.len()];
    for (i, j) in iproduct!(0 .. rows, 0 .. qm) {
        output[i * qm + j] = selected[j * rows + i];
    }
    output
}
