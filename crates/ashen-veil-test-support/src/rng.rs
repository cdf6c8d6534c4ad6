//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use ashen_veil_core::rng::DeterministicRng;

/// An RNG that always picks the first candidate.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// An RNG that returns indices from a predetermined sequence, wrapped into
/// range. Panics if the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<usize>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn pick_index(&mut self, len: usize) -> usize {
        let val = self.values[self.index];
        self.index += 1;
        val % len
    }
}
