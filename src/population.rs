//! Generational population engine.
//!
//! The [`Population`] owns two same-length genome pools used as alternating
//! generations. Every [`evolve`](Population::evolve) call evaluates the active
//! pool in parallel, selects parents by tournament, breeds offspring into the
//! inactive pool and flips the buffers. Genomes are never reallocated across
//! generations; the buffers swap roles instead.

use std::sync::RwLock;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::genome::Genome;

/// Number of candidates sampled per tournament.
///
/// Tournament selection terminates after exactly this many samples regardless
/// of the fitness distribution, which is why it is used instead of
/// fitness-proportional roulette: a population where every score is zero
/// would make roulette sampling loop forever.
pub const TOURNAMENT_SIZE: usize = 4;

/// The per-generation state guarded by the population lock.
struct Generation<T> {
    /// Double-buffered genome pools; `pools[active]` is the current generation.
    pools: [Vec<T>; 2],
    /// Index of the active pool (0 or 1).
    active: usize,
    /// Fitness cache, parallel to the active pool, overwritten each generation.
    fitness_of: Vec<f32>,
    /// RNG used for tournament sampling, crossover and mutation.
    rng: ChaCha8Rng,
}

/// A fixed-size population of genomes under evolution.
///
/// The whole structure is protected by a single lock: [`evolve`] holds it
/// exclusively for the duration of one generation, while [`each`] takes it
/// shared so concurrent observers never see a half-built generation.
///
/// The fitness function receives `&mut T` because evaluation is allowed to
/// mutate transient genome state (the graph genome memoizes activations
/// during prediction); the engine calls [`Genome::reset`] before every
/// evaluation so no state leaks between generations.
///
/// [`evolve`]: Population::evolve
/// [`each`]: Population::each
pub struct Population<T, F> {
    inner: RwLock<Generation<T>>,
    fitness: F,
    workers: usize,
}

impl<T, F> Population<T, F>
where
    T: Genome + Clone,
    F: Fn(&mut T) -> f32 + Sync,
{
    /// Create a population of `size` genomes.
    ///
    /// `genesis` is invoked `2 * size` times to fill both generation buffers.
    /// The RNG is seeded from entropy; use [`with_seed`](Self::with_seed) for
    /// reproducible runs.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn new(size: usize, fitness: F, genesis: impl FnMut() -> T) -> Self {
        Self::with_seed(size, fitness, genesis, rand::rng().random())
    }

    /// Create a population with a deterministic selection/breeding RNG.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn with_seed(size: usize, fitness: F, mut genesis: impl FnMut() -> T, seed: u64) -> Self {
        assert!(size > 0, "population size must be non-zero");

        let mut pools = [Vec::with_capacity(size), Vec::with_capacity(size)];
        for pool in &mut pools {
            pool.extend((0..size).map(|_| genesis()));
        }

        Self {
            inner: RwLock::new(Generation {
                pools,
                active: 0,
                fitness_of: vec![0.0; size],
                rng: ChaCha8Rng::seed_from_u64(seed),
            }),
            fitness,
            workers: std::thread::available_parallelism().map_or(1, usize::from),
        }
    }

    /// Number of genomes in each generation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("population lock poisoned").fitness_of.len()
    }

    /// Always false: a population cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance the population by one generation and return the fittest genome.
    ///
    /// The returned genome is the fittest of the generation evaluated by this
    /// call, i.e. the one the offspring were bred from, not a member of the
    /// freshly produced generation.
    pub fn evolve(&self) -> T {
        let generation = &mut *self.inner.write().expect("population lock poisoned");
        let active = generation.active;
        let size = generation.fitness_of.len();

        // 1. Evaluate every genome of the active pool in parallel. The index
        //    range is statically partitioned into contiguous chunks, one per
        //    worker; each worker writes disjoint fitness slots, so the only
        //    synchronization is the implicit join at the end.
        {
            let chunk = size.div_ceil(self.workers);
            let fitness = &self.fitness;
            generation.pools[active]
                .par_chunks_mut(chunk)
                .zip(generation.fitness_of.par_chunks_mut(chunk))
                .for_each(|(genomes, scores)| {
                    for (genome, slot) in genomes.iter_mut().zip(scores.iter_mut()) {
                        genome.reset();
                        *slot = sanitize(fitness(genome));
                    }
                });
        }

        // 2. Track the fittest. `>=` makes the last equal-max index win.
        let mut fittest = 0;
        for (i, &score) in generation.fitness_of.iter().enumerate() {
            if score >= generation.fitness_of[fittest] {
                fittest = i;
            }
        }

        // 3. Breed the next generation into the inactive buffer. Parents come
        //    from the active pool, offspring overwrite the inactive one; the
        //    two are disjoint arrays, so both can be borrowed at once.
        let inactive = 1 - active;
        let (lo, hi) = generation.pools.split_at_mut(1);
        let (parents, offspring) = if active == 0 {
            (&lo[0], &mut hi[0])
        } else {
            (&hi[0], &mut lo[0])
        };

        let scores = &generation.fitness_of;
        let rng = &mut generation.rng;
        for slot in offspring.iter_mut() {
            let (p1, f1) = tournament(scores, rng);
            let (p2, f2) = tournament(scores, rng);
            let (fit, weak) = if f2 > f1 { (p2, p1) } else { (p1, p2) };
            slot.crossover(&parents[fit], &parents[weak], rng);
            slot.mutate(rng);
        }

        // 4. Swap buffers; the freshly bred pool becomes canonical.
        let champion = parents[fittest].clone();
        generation.active = inactive;
        champion
    }

    /// Visit every genome of the active generation with its cached fitness.
    ///
    /// Takes the shared lock, so readers can overlap each other but never an
    /// in-progress [`evolve`](Population::evolve). The cached fitness is the
    /// score from the most recent evaluation; a freshly bred generation that
    /// has not been evaluated yet reports the previous generation's scores.
    pub fn each(&self, mut f: impl FnMut(&T, f32)) {
        let generation = self.inner.read().expect("population lock poisoned");
        let pool = &generation.pools[generation.active];
        for (genome, &score) in pool.iter().zip(generation.fitness_of.iter()) {
            f(genome, score);
        }
    }
}

/// Select a parent by tournament: sample `TOURNAMENT_SIZE` indices uniformly
/// with replacement and keep the highest-scoring one.
fn tournament<R: Rng>(scores: &[f32], rng: &mut R) -> (usize, f32) {
    let mut best = rng.random_range(0..scores.len());
    for _ in 1..TOURNAMENT_SIZE {
        let candidate = rng.random_range(0..scores.len());
        if scores[candidate] > scores[best] {
            best = candidate;
        }
    }
    (best, scores[best])
}

/// Substitution policy for degenerate scores: NaN and negative fitness both
/// count as zero, never as an error.
#[inline]
fn sanitize(score: f32) -> f32 {
    if score.is_nan() || score < 0.0 {
        0.0
    } else {
        score
    }
}
