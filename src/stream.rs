//! Tick-driven controller for the streaming rate-matching pipeline

use crate::{chunk, rate_match, DataWord, Error, InputAssembler, RateMatchConfig, StreamWord};

/// Phase of the streaming controller
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Phase {
    /// Quiescent between batches; leaves for `AwaitConfig` once reset is deasserted
    Idle,
    /// Waiting for a configuration word on the configuration handshake
    AwaitConfig,
    /// Accepting data words into the input assembler
    Receiving,
    /// Running the rate-matching algorithm on the assembled batch
    Processing,
    /// Emitting one output word per tick under the output handshake
    Emitting,
}

/// Input port values sampled by the controller on one tick
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct PortsIn {
    /// Reset; while asserted, all outputs are deasserted and buffered state is discarded
    pub rst: bool,
    /// Configuration word valid
    pub cfg_valid: bool,
    /// Packed 47-bit configuration word
    pub cfg_data: u64,
    /// Data word valid
    pub din_valid: bool,
    /// Input data word
    pub din_data: DataWord,
    /// Optional end marker on the input stream; closes the batch before the capacity trigger
    pub din_last: bool,
    /// Consumer ready for an output word
    pub dout_ready: bool,
}

/// Output port values driven by the controller for one tick
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct PortsOut {
    /// Ready for a configuration word
    pub cfg_ready: bool,
    /// Ready for a data word
    pub din_ready: bool,
    /// Output data word valid
    pub dout_valid: bool,
    /// Output data word
    pub dout_data: DataWord,
    /// End-of-stream marker, asserted with the final output word of the batch
    pub dout_last: bool,
}

/// State machine sequencing configuration intake, data intake, processing, and emission
///
/// The controller is driven by an external clock: each [`StreamController::step`] call is one
/// tick, performing at most one state transition and one data transfer. A transfer on any of the
/// three handshakes completes when valid and ready coincide within a tick; a partner that is not
/// ready simply holds the controller in place until the next tick.
///
/// # Examples
///
/// ```
/// use ratematch::{Phase, PortsIn, RateMatchConfig, StreamController, MAX_WORDS};
///
/// let mut controller = StreamController::new(MAX_WORDS);
/// let config = RateMatchConfig::new(1320, 2000, 3, 4, 8, 0)?;
/// controller.step(&PortsIn::default());
/// let out = controller.step(&PortsIn {
///     cfg_valid: true,
///     cfg_data: config.to_word(),
///     ..PortsIn::default()
/// });
/// assert!(out.cfg_ready);
/// assert_eq!(controller.phase(), Phase::Receiving);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StreamController {
    /// Current phase
    phase: Phase,
    /// Word FIFO for the batch being received
    assembler: InputAssembler,
    /// Configuration decoded for the current batch
    config: Option<RateMatchConfig>,
    /// Chunked result awaiting emission
    pending: Vec<StreamWord>,
    /// Index of the next word to emit
    emit_index: usize,
    /// Error that discarded the most recent batch, for passive observation
    last_error: Option<Error>,
}

impl StreamController {
    /// Returns an idle controller whose assembler holds `capacity` words per batch.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            phase: Phase::Idle,
            assembler: InputAssembler::new(capacity),
            config: None,
            pending: Vec::new(),
            emit_index: 0,
            last_error: None,
        }
    }

    /// Returns the controller's current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the error that discarded the most recent batch, if any.
    ///
    /// Cleared when the next configuration word is accepted, or by reset.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Advances the controller by one clock tick.
    ///
    /// Reset is checked first: while `pins.rst` is asserted, every output is deasserted, all
    /// buffered state is discarded, and the controller is forced to [`Phase::Idle`]. A batch
    /// that fails to decode or process is discarded (observable via
    /// [`StreamController::last_error`]) and the controller returns to [`Phase::Idle`] to await
    /// the next configuration; no error is fatal to the stream.
    pub fn step(&mut self, pins: &PortsIn) -> PortsOut {
        if pins.rst {
            self.clear_batch();
            self.last_error = None;
            return PortsOut::default();
        }
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::AwaitConfig;
                PortsOut::default()
            }
            Phase::AwaitConfig => {
                let out = PortsOut {
                    cfg_ready: true,
                    ..PortsOut::default()
                };
                if pins.cfg_valid {
                    match RateMatchConfig::from_word(pins.cfg_data) {
                        Ok(config) => {
                            self.config = Some(config);
                            self.last_error = None;
                            self.phase = Phase::Receiving;
                        }
                        Err(error) => {
                            self.clear_batch();
                            self.last_error = Some(error);
                        }
                    }
                }
                out
            }
            Phase::Receiving => {
                let din_ready = !self.assembler.is_full();
                let out = PortsOut {
                    din_ready,
                    ..PortsOut::default()
                };
                if pins.din_valid && din_ready {
                    self.assembler.offer(pins.din_data);
                    if pins.din_last {
                        self.phase = Phase::Processing;
                    }
                }
                if self.assembler.is_ready() {
                    self.phase = Phase::Processing;
                }
                out
            }
            Phase::Processing => {
                // One tick, never overlapping with intake of the next batch
                let bits = self.assembler.drain_concatenated();
                let result = match self.config.take() {
                    Some(config) => rate_match(&bits, &config).and_then(|output| chunk(&output)),
                    None => Err(Error::InvalidParameter(
                        "No configuration decoded for this batch".to_string(),
                    )),
                };
                match result {
                    Ok(words) if words.is_empty() => self.clear_batch(),
                    Ok(words) => {
                        self.pending = words;
                        self.emit_index = 0;
                        self.phase = Phase::Emitting;
                    }
                    Err(error) => {
                        self.clear_batch();
                        self.last_error = Some(error);
                    }
                }
                PortsOut::default()
            }
            Phase::Emitting => {
                let Some(word) = self.pending.get(self.emit_index).copied() else {
                    self.clear_batch();
                    return PortsOut::default();
                };
                let out = PortsOut {
                    dout_valid: true,
                    dout_data: word.data,
                    dout_last: word.last,
                    ..PortsOut::default()
                };
                if pins.dout_ready {
                    self.emit_index += 1;
                    if self.emit_index == self.pending.len() {
                        self.pending.clear();
                        self.emit_index = 0;
                        self.phase = Phase::Idle;
                    }
                }
                out
            }
        }
    }

    /// Discards all buffered state for the current batch and returns to `Idle`.
    fn clear_batch(&mut self) {
        self.assembler.reset();
        self.config = None;
        self.pending.clear();
        self.emit_index = 0;
        self.phase = Phase::Idle;
    }
}
