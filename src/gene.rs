//! Gene types for the graph genome.
//!
//! A [`Neuron`] and a [`Synapse`] are plain data: neurons reference nothing,
//! and synapses reference neurons by innovation serial rather than by index
//! or pointer. Serials are stable handles; the backing arrays can grow and
//! resort freely because every reference is re-resolved by serial lookup.

use serde::{Deserialize, Serialize};

/// The role of a neuron in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Fixed activation of 1.0, always at index 0 of the node arena.
    Bias,
    /// Receives an external value, never computed.
    Input,
    /// Produces final network output.
    Output,
    /// Interior node introduced by splitting a synapse.
    Hidden,
}

/// A neuron in the graph genome.
///
/// The incoming-connection subrange points into the genome's single sorted
/// synapse arena and is recomputed whenever that arena is resorted; it is
/// derived state, never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    /// Globally unique, monotonically increasing innovation serial.
    pub serial: u32,
    /// The role of this neuron.
    pub kind: NodeKind,
    /// `(start, len)` of this neuron's incoming synapses in the sorted arena.
    pub conns: (usize, usize),
    /// Cached activation value for the current prediction.
    ///
    /// A value of exactly 0.0 doubles as the "not yet computed" sentinel, so
    /// a neuron whose true activation is 0.0 is recomputed on every read.
    #[serde(skip)]
    pub value: f64,
}

impl Neuron {
    /// Create a neuron with no incoming connections and a cleared cache.
    #[must_use]
    pub fn new(serial: u32, kind: NodeKind) -> Self {
        Self {
            serial,
            kind,
            conns: (0, 0),
            value: 0.0,
        }
    }
}

/// A weighted, directed connection between two neurons.
///
/// Identity for cross-genome gene matching is the composite key
/// `(to.serial << 32) | from.serial`; a deactivated synapse keeps its key so
/// the gene stays matchable after a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    /// Connection weight.
    pub weight: f64,
    /// Serial of the source neuron.
    pub from: u32,
    /// Serial of the target neuron.
    pub to: u32,
    /// Whether this connection participates in activation.
    pub active: bool,
}

impl Synapse {
    /// The 64-bit composite key this synapse sorts and matches by.
    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        Self::key_of(self.from, self.to)
    }

    /// Compose the key for a `(from, to)` serial pair.
    #[inline]
    #[must_use]
    pub fn key_of(from: u32, to: u32) -> u64 {
        (u64::from(to) << 32) | u64::from(from)
    }
}
