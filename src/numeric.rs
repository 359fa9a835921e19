//! Fixed-length float-vector genome.
//!
//! Crossover blends each element halfway toward the weaker parent, with an
//! explicit substitution policy for NaN: a NaN element falls back to
//! whichever parent's value is finite, or a fresh random value when both are
//! NaN. Degenerate numeric input is never propagated as an error.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::Genome;

/// Probability of replacing one random element during mutation.
const MUTATION_RATE: f32 = 0.01;

/// Blend factor toward the weaker parent's value.
const DELTA: f32 = 0.5;

/// A fixed-length float-vector genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floats(pub Vec<f32>);

impl Floats {
    /// Build a genesis closure producing random vectors of `length` with
    /// elements in `[0, 1)`.
    pub fn genesis(length: usize) -> impl FnMut() -> Self {
        let mut rng = rand::rng();
        move || Self((0..length).map(|_| rng.random()).collect())
    }

    /// The raw elements.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl std::ops::Deref for Floats {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

/// Blend two parent values into one offspring value.
fn blend<R: Rng>(fitter: f32, weaker: f32, rng: &mut R) -> f32 {
    match (fitter.is_nan(), weaker.is_nan()) {
        (true, true) => rng.random(),
        (true, false) => weaker,
        (false, true) => fitter,
        (false, false) if fitter == weaker => fitter,
        (false, false) => fitter + (weaker - fitter) * DELTA,
    }
}

impl Genome for Floats {
    fn crossover<R: Rng>(&mut self, fitter: &Self, weaker: &Self, rng: &mut R) {
        debug_assert_eq!(fitter.0.len(), weaker.0.len());
        debug_assert_eq!(self.0.len(), fitter.0.len());

        for (i, slot) in self.0.iter_mut().enumerate() {
            *slot = blend(fitter.0[i], weaker.0[i], rng);
        }
    }

    /// Replace one random element with a fresh random value, with probability
    /// `MUTATION_RATE`.
    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        if rng.random::<f32>() >= MUTATION_RATE {
            return;
        }

        let index = rng.random_range(0..self.0.len());
        self.0[index] = rng.random();
    }
}
