//! Dynamic-topology graph genome.
//!
//! A [`Network`] is a NEAT-style evolvable neural network. Neurons live in a
//! single growable arena kept sorted by innovation serial; synapses live in a
//! second arena kept sorted by their composite `(to, from)` key, so every
//! neuron's incoming connections form one contiguous subrange of that arena.
//! Synapses reference neurons by serial, never by index or pointer, which
//! keeps every handle valid across growth and resorting.
//!
//! Structure only ever grows through [`split`](Network::split): crossover
//! clones the fitter parent's topology wholesale and merely blends weights of
//! matching genes from the weaker parent.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::{fast_exp, swish};
use crate::gene::{NodeKind, Neuron, Synapse};
use crate::genome::Genome;
use crate::innovation::Innovation;

/// Probability of jittering each synapse weight during mutation.
const WEIGHT_RATE: f64 = 0.02;
/// Probability of attempting to add a new connection during mutation.
const CONNECT_RATE: f64 = 0.05;
/// Probability of splitting an active synapse during mutation.
const SPLIT_RATE: f64 = 0.03;

/// A NEAT-style graph genome.
///
/// Node arena layout is fixed by construction: index 0 is the bias neuron,
/// followed by the input neurons, the output neurons, and finally any hidden
/// neurons in creation order. Serials are drawn from a shared [`Innovation`]
/// counter in that same order, so the arena is always sorted by serial and
/// new hidden neurons can simply be appended.
///
/// Serialization note: the innovation counter is shared state and is not
/// serialized; a deserialized network gets a fresh counter and is suitable
/// for inference, not for further topology-growing evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    /// Neuron arena, sorted by serial.
    pub nodes: Vec<Neuron>,
    /// Synapse arena, sorted by composite key.
    pub conns: Vec<Synapse>,
    input: usize,
    output: usize,
    #[serde(skip)]
    innovation: Arc<Innovation>,
}

impl Network {
    /// Create a minimal network: bias, input and output neurons, no hidden
    /// neurons and no synapses.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` or `outputs` is zero.
    #[must_use]
    pub fn new(inputs: usize, outputs: usize, innovation: Arc<Innovation>) -> Self {
        assert!(inputs > 0, "network must have at least one input");
        assert!(outputs > 0, "network must have at least one output");

        let mut nodes = Vec::with_capacity(1 + inputs + outputs);
        nodes.push(Neuron::new(innovation.next(), NodeKind::Bias));
        for _ in 0..inputs {
            nodes.push(Neuron::new(innovation.next(), NodeKind::Input));
        }
        for _ in 0..outputs {
            nodes.push(Neuron::new(innovation.next(), NodeKind::Output));
        }

        Self {
            nodes,
            conns: Vec::new(),
            input: inputs,
            output: outputs,
            innovation,
        }
    }

    /// Build a genesis closure for a population of networks.
    ///
    /// Creates one champion prototype and returns a factory that clones it
    /// for every population slot. Clones share nothing mutable except the
    /// innovation counter, so "same composite key" keeps meaning "same gene"
    /// across the whole population.
    pub fn genesis(inputs: usize, outputs: usize) -> impl FnMut() -> Self {
        let champion = Self::new(inputs, outputs, Arc::new(Innovation::new()));
        move || champion.clone()
    }

    /// Number of input neurons.
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.input
    }

    /// Number of output neurons.
    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.output
    }

    /// The shared innovation counter this genome draws serials from.
    #[must_use]
    pub fn innovation(&self) -> &Arc<Innovation> {
        &self.innovation
    }

    /// Deep-copy this genome into `dst`, replacing its prior contents.
    ///
    /// Copies every neuron by serial and kind (not the activation cache) and
    /// every synapse, then resorts and reindexes `dst`. The destination
    /// shares no storage with the source afterwards, only the innovation
    /// counter handle.
    pub fn clone_into(&self, dst: &mut Self) {
        dst.nodes.clear();
        dst.nodes
            .extend(self.nodes.iter().map(|n| Neuron::new(n.serial, n.kind)));
        dst.conns.clear();
        dst.conns.extend_from_slice(&self.conns);
        dst.input = self.input;
        dst.output = self.output;
        dst.innovation = Arc::clone(&self.innovation);
        dst.rebuild();
    }

    /// Look up a neuron's arena index by serial.
    #[inline]
    #[must_use]
    pub fn index_of(&self, serial: u32) -> Option<usize> {
        self.nodes.binary_search_by_key(&serial, |n| n.serial).ok()
    }

    /// Binary-search the synapse arena for the `(from, to)` gene.
    #[inline]
    fn search(&self, from: u32, to: u32) -> Result<usize, usize> {
        self.conns
            .binary_search_by_key(&Synapse::key_of(from, to), Synapse::key)
    }

    /// Whether two neurons are connected in either direction.
    #[must_use]
    pub fn connected(&self, a: u32, b: u32) -> bool {
        self.search(a, b).is_ok() || self.search(b, a).is_ok()
    }

    /// The incoming synapses of a neuron, as the contiguous subrange of the
    /// sorted arena recorded on the neuron.
    #[must_use]
    pub fn incoming(&self, serial: u32) -> &[Synapse] {
        match self.index_of(serial) {
            Some(index) => {
                let (start, len) = self.nodes[index].conns;
                &self.conns[start..start + len]
            }
            None => &[],
        }
    }

    /// Append a new active synapse between two existing neurons.
    ///
    /// Returns false without touching the genome when either serial is
    /// unknown, the pair is already connected in either direction, the target
    /// is a bias or input neuron, the source is an output neuron, or the edge
    /// would close a cycle (lazy evaluation requires an acyclic graph).
    pub fn connect(&mut self, from: u32, to: u32, weight: f64) -> bool {
        let (Some(src), Some(dst)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        if matches!(self.nodes[dst].kind, NodeKind::Bias | NodeKind::Input) {
            return false;
        }
        if self.nodes[src].kind == NodeKind::Output {
            return false;
        }
        if self.connected(from, to) || self.creates_cycle(from, to) {
            return false;
        }

        self.conns.push(Synapse {
            weight,
            from,
            to,
            active: true,
        });
        self.rebuild();
        true
    }

    /// Split an existing active synapse, inserting a hidden neuron.
    ///
    /// The original synapse is deactivated but kept, preserving its innovation
    /// identity for future gene matching. Two new synapses are created:
    /// `from -> hidden` with weight 1.0 (pass-through) and `hidden -> to`
    /// carrying the original weight. Returns the new hidden neuron's serial,
    /// or `None` if the synapse does not exist or is already inactive.
    pub fn split(&mut self, from: u32, to: u32) -> Option<u32> {
        let index = self.search(from, to).ok()?;
        if !self.conns[index].active {
            return None;
        }

        self.conns[index].active = false;
        let weight = self.conns[index].weight;

        // Fresh serials are globally maximal, so appending keeps the node
        // arena sorted.
        let hidden = self.innovation.next();
        self.nodes.push(Neuron::new(hidden, NodeKind::Hidden));
        self.conns.push(Synapse {
            weight: 1.0,
            from,
            to: hidden,
            active: true,
        });
        self.conns.push(Synapse {
            weight,
            from: hidden,
            to,
            active: true,
        });
        self.rebuild();
        Some(hidden)
    }

    /// Activate the network.
    ///
    /// Writes the input activations, clears the hidden and output caches,
    /// then resolves each output neuron by lazy memoized recursion over its
    /// incoming synapses and normalizes the outputs by their exponentials so
    /// they sum to 1.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `output` length does not match the network shape.
    pub fn predict(&mut self, input: &[f64], output: &mut [f64]) {
        assert_eq!(
            input.len(),
            self.input,
            "input length mismatch: expected {}, got {}",
            self.input,
            input.len()
        );
        assert_eq!(
            output.len(),
            self.output,
            "output length mismatch: expected {}, got {}",
            self.output,
            output.len()
        );

        self.nodes[0].value = 1.0;
        for (node, &value) in self.nodes[1..=self.input].iter_mut().zip(input) {
            node.value = value;
        }
        for node in &mut self.nodes[1 + self.input..] {
            node.value = 0.0;
        }

        let mut sum = 0.0;
        let outputs = 1 + self.input..1 + self.input + self.output;
        for (slot, index) in output.iter_mut().zip(outputs) {
            let value = fast_exp(self.value_of(index));
            *slot = value;
            sum += value;
        }
        for slot in output.iter_mut() {
            *slot /= sum;
        }
    }

    /// Lazily compute a neuron's activation, memoizing the result.
    ///
    /// A cached value of exactly 0.0 is indistinguishable from "not yet
    /// computed", so such neurons are recomputed on every read. This matches
    /// both an idle floating value and the unset sentinel; it is a documented
    /// approximation, not corrected here.
    fn value_of(&mut self, index: usize) -> f64 {
        let (start, len) = self.nodes[index].conns;
        if self.nodes[index].value != 0.0 || len == 0 {
            return self.nodes[index].value;
        }

        let mut sum = 0.0;
        for i in start..start + len {
            let synapse = self.conns[i];
            if !synapse.active {
                continue;
            }
            if let Some(source) = self.index_of(synapse.from) {
                sum += synapse.weight * self.value_of(source);
            }
        }

        let value = swish(sum);
        self.nodes[index].value = value;
        value
    }

    /// Whether adding `from -> to` would close a cycle: walk active synapses
    /// forward from `to` and see if `from` becomes reachable.
    fn creates_cycle(&self, from: u32, to: u32) -> bool {
        if from == to {
            return true;
        }

        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![to];
        while let Some(current) = stack.pop() {
            if current == from {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for synapse in &self.conns {
                if synapse.active && synapse.from == current {
                    stack.push(synapse.to);
                }
            }
        }
        false
    }

    /// Resort the synapse arena by composite key and recompute every
    /// neuron's incoming subrange. Invoked after every mutating operation.
    fn rebuild(&mut self) {
        self.conns.sort_unstable_by_key(Synapse::key);

        for node in &mut self.nodes {
            node.conns = (0, 0);
        }

        // Keys sort by target serial first, so each target's incoming
        // synapses are contiguous.
        let mut start = 0;
        while start < self.conns.len() {
            let to = self.conns[start].to;
            let mut end = start + 1;
            while end < self.conns.len() && self.conns[end].to == to {
                end += 1;
            }
            if let Ok(index) = self.nodes.binary_search_by_key(&to, |n| n.serial) {
                self.nodes[index].conns = (start, end - start);
            }
            start = end;
        }
    }

    /// Try to add a random eligible connection.
    fn mutate_connect<R: Rng>(&mut self, rng: &mut R) {
        let sources: Vec<u32> = self
            .nodes
            .iter()
            .filter(|n| n.kind != NodeKind::Output)
            .map(|n| n.serial)
            .collect();
        let targets: Vec<u32> = self
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Hidden | NodeKind::Output))
            .map(|n| n.serial)
            .collect();

        // Candidate pairs may already be connected or cyclic; retry a few
        // times rather than enumerating the whole graph.
        for _ in 0..10 {
            let from = sources[rng.random_range(0..sources.len())];
            let to = targets[rng.random_range(0..targets.len())];
            let weight = f64::from(rng.random::<f32>()) * 2.0 - 1.0;
            if self.connect(from, to, weight) {
                return;
            }
        }
    }

    /// Split a random active synapse.
    fn mutate_split<R: Rng>(&mut self, rng: &mut R) {
        let active: Vec<(u32, u32)> = self
            .conns
            .iter()
            .filter(|c| c.active)
            .map(|c| (c.from, c.to))
            .collect();
        if active.is_empty() {
            return;
        }

        let (from, to) = active[rng.random_range(0..active.len())];
        self.split(from, to);
    }
}

impl Genome for Network {
    /// Structural crossover: clone the fitter parent's full topology, then
    /// for every gene of the weaker parent that matches by composite key,
    /// coin-flip whether to take the weaker parent's weight. Disjoint and
    /// excess genes of the weaker parent are never introduced.
    fn crossover<R: Rng>(&mut self, fitter: &Self, weaker: &Self, rng: &mut R) {
        fitter.clone_into(self);

        for gene in &weaker.conns {
            if let Ok(index) = self.search(gene.from, gene.to) {
                if rng.random::<bool>() {
                    self.conns[index].weight = gene.weight;
                }
            }
        }

        // Weight blending cannot disturb key order, but the contract is that
        // the arena is resorted after every mutating operation.
        self.rebuild();
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) {
        for synapse in &mut self.conns {
            if rng.random::<f64>() < WEIGHT_RATE {
                synapse.weight += f64::from(rng.random::<f32>()) * 2.0 - 1.0;
            }
        }

        if rng.random::<f64>() < CONNECT_RATE {
            self.mutate_connect(rng);
        }
        if rng.random::<f64>() < SPLIT_RATE {
            self.mutate_split(rng);
        }
        self.rebuild();
    }

    /// Clear all activation caches; the bias neuron is pinned at 1.0.
    fn reset(&mut self) {
        self.nodes[0].value = 1.0;
        for node in &mut self.nodes[1..] {
            node.value = 0.0;
        }
    }
}
