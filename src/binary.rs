//! Fixed-length byte-string genome.
//!
//! The simplest genome variant: a flat byte vector with random mask
//! crossover. Useful for text-matching targets and as the reference genome
//! for exercising the population engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::Genome;

/// Probability of replacing one random byte during mutation.
const MUTATION_RATE: f32 = 0.01;

/// A fixed-length byte-string genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Build a genesis closure producing random byte strings of `length`.
    pub fn genesis(length: usize) -> impl FnMut() -> Self {
        let mut rng = rand::rng();
        move || {
            let mut bytes = vec![0u8; length];
            rng.fill(&mut bytes[..]);
            Self(bytes)
        }
    }

    /// The raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Genome for Bytes {
    /// Random mask merge: for each byte, a fresh random mask picks which bits
    /// come from which parent.
    fn crossover<R: Rng>(&mut self, fitter: &Self, weaker: &Self, rng: &mut R) {
        debug_assert_eq!(fitter.0.len(), weaker.0.len());
        debug_assert_eq!(self.0.len(), fitter.0.len());

        for (i, slot) in self.0.iter_mut().enumerate() {
            let mask: u8 = rng.random();
            *slot = (fitter.0[i] & mask) ^ (weaker.0[i] & !mask);
        }
    }

    /// Replace one random byte with a fresh random value, with probability
    /// `MUTATION_RATE`.
    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        if rng.random::<f32>() >= MUTATION_RATE {
            return;
        }

        let index = rng.random_range(0..self.0.len());
        self.0[index] = rng.random();
    }
}
