//! The genome capability contract.
//!
//! A [`Genome`] is any unit of evolvable state the population engine can
//! breed: it must be able to rebuild itself from two parents, perturb itself
//! in place, and clear any transient state it accumulated during evaluation.
//! The engine never inspects genome internals beyond this contract.

use rand::Rng;

/// A unit of evolvable state.
///
/// Offspring are produced in place: the engine calls [`crossover`] on a
/// pre-allocated slot in the inactive generation buffer, passing the two
/// selected parents with the fitter one first. Several genome types use that
/// ordering asymmetrically: the graph genome clones the fitter parent's
/// entire topology and only blends weights from the weaker one.
///
/// [`crossover`]: Genome::crossover
pub trait Genome: Send {
    /// Rebuild this genome as the offspring of two parents.
    ///
    /// `fitter` scored at least as high as `weaker` in the evaluation that
    /// selected them. Prior contents of `self` are overwritten.
    fn crossover<R: Rng>(&mut self, fitter: &Self, weaker: &Self, rng: &mut R);

    /// Perturb this genome in place.
    fn mutate<R: Rng>(&mut self, rng: &mut R);

    /// Clear transient state (activation caches, recurrent state, captured
    /// resources) before the genome is evaluated again.
    ///
    /// Invoked once per genome at the start of every fitness evaluation. The
    /// default does nothing, which is correct for stateless genomes.
    fn reset(&mut self) {}
}
