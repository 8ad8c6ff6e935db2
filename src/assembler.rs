//! Accumulation of fixed-width data words into one logical bit sequence

use std::collections::VecDeque;

use crate::{Bit, DataWord};

/// Default capacity (in words) of the input assembler, matching the reference pipeline
pub const MAX_WORDS: usize = 11;

/// FIFO of accepted data words, drained as one concatenated bit sequence
///
/// Words are accepted in order under backpressure ([`InputAssembler::offer`] refuses once the
/// capacity is reached) and the assembler reports readiness once a full capacity batch has
/// arrived, even if fewer bits are ultimately consumed by the algorithm.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InputAssembler {
    /// Capacity of the queue, which is also the readiness trigger
    capacity: usize,
    /// Accepted words in arrival order
    queue: VecDeque<DataWord>,
}

impl InputAssembler {
    /// Returns an empty assembler with the given capacity (and readiness trigger).
    ///
    /// # Examples
    ///
    /// ```
    /// use ratematch::{DataWord, InputAssembler, MAX_WORDS};
    ///
    /// let mut assembler = InputAssembler::new(MAX_WORDS);
    /// assert!(assembler.offer(DataWord::new(0)));
    /// assert!(!assembler.is_ready());
    /// ```
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Offers a word to the assembler, returning whether it was accepted.
    ///
    /// An accepted word is appended after all previously accepted words; a refused word is not
    /// queued, and the caller is responsible for re-offering it if it must not be dropped.
    pub fn offer(&mut self, word: DataWord) -> bool {
        if self.queue.len() < self.capacity {
            self.queue.push_back(word);
            true
        } else {
            false
        }
    }

    /// Returns `true` once the accepted-word count has reached the capacity.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.queue.len() == self.capacity
    }

    /// Returns `true` if no further word can be accepted.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    /// Returns the number of currently queued words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no word is currently queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pops all queued words in arrival order and concatenates their bits into one sequence.
    ///
    /// Each word contributes its bits most-significant-first, so the first bit of the returned
    /// sequence is the MSB of the first accepted word. The queue is cleared as a side effect.
    pub fn drain_concatenated(&mut self) -> Vec<Bit> {
        self.queue
            .drain(..)
            .flat_map(DataWord::to_bits)
            .collect()
    }

    /// Clears the queue and any readiness, at any point of accumulation.
    pub fn reset(&mut self) {
        self.queue.clear();
    }
}
