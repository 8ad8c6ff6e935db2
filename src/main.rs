//! This crate simulates the streaming 5G NR rate-matching pipeline: random input words are
//! driven into the [`StreamController`] under the ready/valid handshake, the streamed output is
//! cross-checked against the pure rate-matching algorithm, and per-batch results are saved to a
//! JSON file. Rate-matching parameters are specified on the command line.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/ratematch
//! -h` for help on the command-line interface.

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

use anyhow::{bail, Result};
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use ratematch::{
    chunk, rate_match, utils, Bit, DataWord, Phase, PortsIn, RateMatchConfig, StreamController,
    StreamWord, WORD_WIDTH,
};

/// Maximum number of clock ticks to drive per batch before declaring a stall
const MAX_TICKS_PER_BATCH: usize = 100_000;

/// Result of streaming one batch through the pipeline
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
struct BatchResult {
    /// Rate-matching configuration for the batch
    config: RateMatchConfig,
    /// Number of input words driven into the pipeline
    num_input_words: usize,
    /// Number of output words received from the pipeline
    num_output_words: usize,
    /// Number of output words differing from the pure-algorithm reference
    num_word_errors: usize,
    /// Error that discarded the batch, if any
    error: Option<String>,
}

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    let config = config_from_matches(&matches)?;
    let num_batches = num_batches_from_matches(&matches);
    let json_filename = json_filename_from_matches(&matches);
    let results = run_stream_sims(config, num_batches)?;
    save_results_to_file(&results, &json_filename)?;
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Drives the given number of batches through a streaming controller and cross-checks each
/// streamed output against the pure rate-matching algorithm.
fn run_stream_sims(config: RateMatchConfig, num_batches: u32) -> Result<Vec<BatchResult>> {
    let num_words = usize::from(config.inlen).div_ceil(WORD_WIDTH).max(1);
    let all_words: Vec<Vec<DataWord>> = (0 .. num_batches)
        .map(|_| utils::random_words(num_words))
        .collect();
    let references: Vec<Result<Vec<StreamWord>, ratematch::Error>> = all_words
        .par_iter()
        .map(|words| {
            let bits: Vec<Bit> = words.iter().flat_map(|w| w.to_bits()).collect();
            rate_match(&bits, &config).and_then(|output| chunk(&output))
        })
        .collect();
    let mut controller = StreamController::new(num_words);
    let mut results = Vec::with_capacity(all_words.len());
    for (words, reference) in all_words.iter().zip(&references) {
        let streamed = run_batch(&mut controller, config, words)?;
        let (num_word_errors, error) = match reference {
            Ok(reference) => (
                utils::error_count(&streamed, reference) + streamed.len().abs_diff(reference.len()),
                None,
            ),
            Err(_) => (0, controller.last_error().map(ToString::to_string)),
        };
        results.push(BatchResult {
            config,
            num_input_words: words.len(),
            num_output_words: streamed.len(),
            num_word_errors,
            error,
        });
    }
    Ok(results)
}

/// Drives one batch through the controller tick by tick with an always-ready sink, returning
/// the collected output words.
fn run_batch(
    controller: &mut StreamController,
    config: RateMatchConfig,
    words: &[DataWord],
) -> Result<Vec<StreamWord>> {
    let mut collected = Vec::new();
    let mut word_iter = words.iter().copied();
    let mut next_word = word_iter.next();
    let mut config_sent = false;
    for _ in 0 .. MAX_TICKS_PER_BATCH {
        let pins = PortsIn {
            cfg_valid: !config_sent,
            cfg_data: config.to_word(),
            din_valid: next_word.is_some(),
            din_data: next_word.unwrap_or_default(),
            dout_ready: true,
            ..PortsIn::default()
        };
        let out = controller.step(&pins);
        if pins.cfg_valid && out.cfg_ready {
            config_sent = true;
        }
        if pins.din_valid && out.din_ready {
            next_word = word_iter.next();
        }
        if out.dout_valid {
            collected.push(StreamWord {
                data: out.dout_data,
                last: out.dout_last,
            });
            if out.dout_last {
                return Ok(collected);
            }
        }
        // A discarded or empty batch ends without an end marker
        if config_sent && next_word.is_none() && controller.phase() == Phase::Idle {
            return Ok(collected);
        }
    }
    bail!("Pipeline stalled: no end of stream within {MAX_TICKS_PER_BATCH} ticks");
}

/// Saves batch results to a JSON file.
fn save_results_to_file(results: &[BatchResult], json_filename: &str) -> Result<()> {
    let file = std::fs::File::create(json_filename)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Drives the streaming 5G NR rate-matching pipeline and checks its output")
        .arg(inlen())
        .arg(outlen())
        .arg(rv())
        .arg(nlayers())
        .arg(qm())
        .arg(nref())
        .arg(num_batches())
        .arg(json_filename())
}

/// Returns argument for number of input bits.
fn inlen() -> Arg {
    Arg::new("inlen")
        .short('i')
        .value_parser(value_parser!(u16))
        .default_value("1320")
        .help("Number of input bits")
}

/// Returns argument for requested number of output bits.
fn outlen() -> Arg {
    Arg::new("outlen")
        .short('o')
        .value_parser(value_parser!(u16))
        .default_value("2000")
        .help("Requested number of output bits")
}

/// Returns argument for redundancy version.
fn rv() -> Arg {
    Arg::new("rv")
        .short('r')
        .value_parser(value_parser!(u8).range(0 ..= 3))
        .default_value("0")
        .help("Redundancy version")
}

/// Returns argument for number of transmission layers.
fn nlayers() -> Arg {
    Arg::new("nlayers")
        .short('l')
        .value_parser(value_parser!(u8))
        .default_value("4")
        .help("Number of transmission layers")
}

/// Returns argument for number of bits per modulation symbol.
fn qm() -> Arg {
    Arg::new("qm")
        .short('q')
        .value_parser(value_parser!(u8))
        .default_value("8")
        .help("Number of bits per modulation symbol")
}

/// Returns argument for soft-buffer limiting reference.
fn nref() -> Arg {
    Arg::new("nref")
        .short('n')
        .value_parser(value_parser!(u8))
        .default_value("0")
        .help("Soft-buffer limiting reference (0 for unlimited)")
}

/// Returns argument for number of batches to stream.
fn num_batches() -> Arg {
    Arg::new("num_batches")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("1")
        .help("Number of batches to stream")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns rate-matching configuration based on command-line arguments.
fn config_from_matches(matches: &ArgMatches) -> Result<RateMatchConfig> {
    // OK to unwrap: All arguments have default values and parsed types
    Ok(RateMatchConfig::new(
        *matches.get_one("inlen").unwrap(),
        *matches.get_one("outlen").unwrap(),
        *matches.get_one("rv").unwrap(),
        *matches.get_one("nlayers").unwrap(),
        *matches.get_one("qm").unwrap(),
        *matches.get_one("nref").unwrap(),
    )?)
}

/// Returns number of batches to stream.
fn num_batches_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_batches").unwrap()
}

/// Returns name of JSON file to which results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
