//! Innovation numbering for structural genes.
//!
//! Every neuron receives a globally unique, monotonically increasing serial
//! at creation time. Two synapses in two different genomes that join the same
//! pair of serials represent the same gene, which is what structural
//! crossover aligns on. The counter is explicit shared state: a population's
//! genesis closure creates one [`Innovation`] and every genome cloned from
//! the prototype holds an `Arc` to it, so all topology-growing mutations in
//! that population draw from the same sequence.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// A shared, monotonically increasing serial number source.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Innovation {
    counter: AtomicU32,
}

impl Innovation {
    /// Create a counter starting at serial 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next serial. Never returns the same value twice.
    #[inline]
    pub fn next(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently issued serial, 0 if none was issued yet.
    #[inline]
    #[must_use]
    pub fn last(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}
