//! Integration tests for evogen.

use evogen::{Bytes, Floats, Genome, Network, Population, Synapse};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Per-character exact-match fitness toward a byte target.
fn match_fitness(target: &'static [u8]) -> impl Fn(&mut Bytes) -> f32 + Sync {
    move |genome: &mut Bytes| {
        let hits = genome.iter().zip(target).filter(|(a, b)| a == b).count();
        hits as f32 / target.len() as f32
    }
}

#[test]
fn test_text_target_converges() {
    // A population of 200 genomes evolving toward "abc" under per-character
    // fitness reaches a perfect match well within this generation budget
    // (the median is around 125 generations).
    const TARGET: &[u8] = b"abc";
    let population = Population::with_seed(200, match_fitness(TARGET), Bytes::genesis(3), 42);

    let mut solved = None;
    for generation in 0..10_000 {
        let champion = population.evolve();
        if champion.as_bytes() == TARGET {
            solved = Some(generation);
            break;
        }
    }

    assert!(solved.is_some(), "population failed to converge to {TARGET:?}");
}

#[test]
fn test_float_target_converges() {
    const TARGET: [f32; 3] = [0.25, 0.5, 0.75];
    let fitness = |genome: &mut Floats| {
        let error: f32 = genome
            .iter()
            .zip(TARGET)
            .map(|(v, t)| (v - t).abs())
            .sum();
        1.0 / (1.0 + error)
    };

    let population = Population::with_seed(200, fitness, Floats::genesis(3), 7);
    let mut best_error = f32::INFINITY;
    for _ in 0..2_000 {
        let champion = population.evolve();
        let error: f32 = champion
            .iter()
            .zip(TARGET)
            .map(|(v, t)| (v - t).abs())
            .sum();
        best_error = best_error.min(error);
    }

    assert!(best_error < 0.15, "best error {best_error} did not shrink");
}

#[test]
fn test_evolution_terminates_on_all_zero_fitness() {
    // Tournament selection samples a fixed number of candidates, so a
    // population where every score is zero still breeds and terminates.
    let population = Population::with_seed(100, |_: &mut Bytes| 0.0, Bytes::genesis(8), 1);

    for _ in 0..50 {
        let champion = population.evolve();
        assert_eq!(champion.len(), 8);
    }
    population.each(|_, score| assert_eq!(score, 0.0));
}

#[test]
fn test_generations_share_no_storage() {
    let population = Population::with_seed(16, |_: &mut Bytes| 1.0, Bytes::genesis(4), 3);

    let mut previous: Vec<*const u8> = Vec::new();
    population.each(|genome, _| previous.push(genome.as_bytes().as_ptr()));

    for _ in 0..4 {
        population.evolve();

        let mut current: Vec<*const u8> = Vec::new();
        population.each(|genome, _| current.push(genome.as_bytes().as_ptr()));

        // Consecutive generations live in the two distinct buffers; no slot
        // of the new active pool aliases a slot of the previous one.
        for pointer in &current {
            assert!(!previous.contains(pointer), "generation buffers aliased");
        }
        previous = current;
    }
}

#[test]
fn test_nan_fitness_is_scored_as_zero() {
    let population = Population::with_seed(10, |_: &mut Bytes| f32::NAN, Bytes::genesis(2), 5);
    population.evolve();
    population.each(|_, score| assert_eq!(score, 0.0));
}

/// Assert the synapse arena is sorted and every neuron's subrange exactly
/// bounds its incoming synapses.
fn assert_graph_invariants(network: &Network) {
    for pair in network.conns.windows(2) {
        assert!(pair[0].key() < pair[1].key(), "synapse arena out of order");
    }

    let mut covered = 0;
    for node in &network.nodes {
        let incoming = network.incoming(node.serial);
        covered += incoming.len();
        assert!(incoming.iter().all(|c| c.to == node.serial), "subrange overlap");
        let expected = network.conns.iter().filter(|c| c.to == node.serial).count();
        assert_eq!(incoming.len(), expected, "subrange gap for {}", node.serial);
    }
    assert_eq!(covered, network.conns.len());
}

#[test]
fn test_graph_invariants_across_operation_sequences() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut genesis = Network::genesis(3, 2);
    let mut network = genesis();

    // Serials: bias=1, inputs=2..=4, outputs=5..=6.
    assert!(network.connect(2, 5, 0.5));
    assert_graph_invariants(&network);

    assert!(network.connect(3, 6, -0.25));
    assert!(network.connect(1, 5, 0.1));
    assert_graph_invariants(&network);

    let hidden = network.split(2, 5).expect("split");
    assert_graph_invariants(&network);
    assert!(network.connect(4, hidden, 0.75));
    assert_graph_invariants(&network);

    let mut partner = genesis();
    partner.connect(2, 5, -0.5);
    partner.split(2, 5);

    let mut child = genesis();
    child.crossover(&network, &partner, &mut rng);
    assert_graph_invariants(&child);

    for _ in 0..100 {
        child.mutate(&mut rng);
        assert_graph_invariants(&child);
    }
}

#[test]
fn test_structural_crossover_is_topology_loyal() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut genesis = Network::genesis(2, 1);

    let mut fitter = genesis();
    fitter.connect(2, 4, 0.4);
    fitter.split(2, 4);

    let mut weaker = genesis();
    weaker.connect(2, 4, -0.4);
    weaker.connect(3, 4, 0.9);
    weaker.split(3, 4);

    let mut child = genesis();
    child.crossover(&fitter, &weaker, &mut rng);

    // The child's neuron serials equal the fitter parent's set exactly.
    let fitter_serials: Vec<u32> = fitter.nodes.iter().map(|n| n.serial).collect();
    let child_serials: Vec<u32> = child.nodes.iter().map(|n| n.serial).collect();
    assert_eq!(child_serials, fitter_serials);

    // No synapse absent from the fitter parent appears in the child.
    for synapse in &child.conns {
        assert!(
            fitter.conns.iter().any(|c| c.key() == synapse.key()),
            "foreign gene {:?} introduced by crossover",
            (synapse.from, synapse.to)
        );
    }
}

#[test]
fn test_clone_round_trip() {
    let mut genesis = Network::genesis(2, 2);
    let mut source = genesis();
    source.connect(2, 4, 0.5);
    source.connect(3, 5, -1.5);
    source.split(2, 4);

    let mut copy = genesis();
    source.clone_into(&mut copy);

    // Structural equality by (serial, kind) and (from, to, weight, active).
    assert_eq!(source.nodes.len(), copy.nodes.len());
    for (a, b) in source.nodes.iter().zip(copy.nodes.iter()) {
        assert_eq!((a.serial, a.kind), (b.serial, b.kind));
    }
    let genes = |n: &Network| -> Vec<(u32, u32, f64, bool)> {
        n.conns
            .iter()
            .map(|c| (c.from, c.to, c.weight, c.active))
            .collect()
    };
    assert_eq!(genes(&source), genes(&copy));

    // Deep copy, not aliasing.
    assert!(!std::ptr::eq(source.conns.as_ptr(), copy.conns.as_ptr()));
    assert!(!std::ptr::eq(source.nodes.as_ptr(), copy.nodes.as_ptr()));
}

#[test]
fn test_graph_population_end_to_end() {
    // Drive output 0 high for a constant probe; exercises reset, parallel
    // evaluation, structural crossover and mutation together.
    let fitness = |net: &mut Network| {
        let mut out = [0.0f64; 2];
        net.predict(&[1.0, 0.0], &mut out);
        out[0] as f32
    };

    let population = Population::with_seed(128, fitness, Network::genesis(2, 2), 11);
    let mut champion = population.evolve();
    for _ in 0..30 {
        champion = population.evolve();
    }

    assert_graph_invariants(&champion);
    let mut out = [0.0f64; 2];
    champion.reset();
    champion.predict(&[1.0, 0.0], &mut out);
    assert!((out[0] + out[1] - 1.0).abs() < 1e-9);
}

#[test]
fn test_composite_keys_match_across_genomes() {
    let mut genesis = Network::genesis(2, 1);
    let mut first = genesis();
    let mut second = genesis();

    first.connect(2, 4, 0.1);
    second.connect(2, 4, 0.9);

    // Same structural gene in two genomes carries the same composite key.
    assert_eq!(first.conns[0].key(), second.conns[0].key());
    assert_eq!(first.conns[0].key(), Synapse::key_of(2, 4));
}
