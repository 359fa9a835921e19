//! # Evogen
//!
//! A generic, allocation-conscious evolutionary optimizer with a
//! dynamic-topology NEAT-style graph genome.
//!
//! ## Features
//!
//! - **Double-buffered population engine**: two preallocated generation
//!   buffers swap roles every [`Population::evolve`] call, so steady-state
//!   evolution allocates nothing per generation
//! - **Parallel evaluation**: fitness is computed across a fixed worker
//!   count over contiguous index chunks, joined before selection begins
//! - **Tournament selection**: k = 4 sampling that terminates after exactly
//!   k draws regardless of the fitness distribution
//! - **Graph genome**: sorted arena storage for neurons and synapses with
//!   serial-based handles, global innovation numbering and structural
//!   crossover that never invents topology
//! - **Pluggable genomes**: anything implementing [`Genome`] plugs into the
//!   same engine; byte-string and float-vector variants are included
//!
//! ## Quick start
//!
//! ```rust
//! use evogen::{Bytes, Population};
//!
//! let target = b"hi";
//! let fitness = |genome: &mut Bytes| {
//!     let hits = genome.iter().zip(target).filter(|(a, b)| a == b).count();
//!     hits as f32 / target.len() as f32
//! };
//!
//! let population = Population::with_seed(64, fitness, Bytes::genesis(target.len()), 42);
//! for _ in 0..10 {
//!     let champion = population.evolve();
//!     assert_eq!(champion.len(), target.len());
//! }
//!
//! population.each(|genome, score| {
//!     assert_eq!(genome.len(), target.len());
//!     assert!((0.0..=1.0).contains(&score));
//! });
//! ```
//!
//! ## Evolving network topologies
//!
//! ```rust
//! use evogen::{Network, Population};
//!
//! let fitness = |net: &mut Network| {
//!     let mut out = [0.0f64; 1];
//!     net.predict(&[1.0, 0.0], &mut out);
//!     out[0] as f32
//! };
//!
//! let population = Population::with_seed(32, fitness, Network::genesis(2, 1), 7);
//! let champion = population.evolve();
//! assert_eq!(champion.num_inputs(), 2);
//! ```
//!
//! ## Architecture
//!
//! ### Shared innovation numbering
//!
//! Every neuron draws a globally unique, monotonically increasing serial
//! from an [`Innovation`] counter shared by all genomes of a population.
//! Synapses match across genomes by the composite key
//! `(to.serial << 32) | from.serial`: same key, same gene.
//!
//! ### Sorted-arena graph model
//!
//! Neurons and synapses are flat `Vec` arenas. The synapse arena is kept
//! sorted by composite key after every structural change, so each neuron's
//! incoming connections are one contiguous subrange, found by binary search
//! and recorded as a `(start, len)` pair on the neuron. Synapses address
//! neurons by serial, so growth and resorting never invalidate a handle.

pub mod activation;
pub mod binary;
pub mod gene;
pub mod genome;
pub mod graph;
pub mod innovation;
pub mod numeric;
pub mod population;

// Re-exports for convenience
pub use binary::Bytes;
pub use gene::{NodeKind, Neuron, Synapse};
pub use genome::Genome;
pub use graph::Network;
pub use innovation::Innovation;
pub use numeric::Floats;
pub use population::{Population, TOURNAMENT_SIZE};
