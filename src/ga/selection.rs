//! Selection engines for multi-objective evolution.
//!
//! A [`SelectionEngine`] answers the two selection questions of every
//! generation: which individuals mate, and which of parents ∪ offspring
//! survive. The evolution loop only talks to this trait, so NSGA-II and
//! NSGA-III share one loop and further strategies plug in the same way.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Deb & Jain (2014), "An Evolutionary Many-Objective Optimization Algorithm
//!   Using Reference-Point-Based Nondominated Sorting Approach"

use rand::{Rng, RngCore};

use super::config::{Algorithm, EvolutionConfig};
use super::multi_objective::rank_and_crowding;
use super::nsga2::Nsga2;
use super::nsga3::Nsga3;
use crate::routing::Fitness;

/// Survivor and mating selection over evaluated fitness values.
///
/// Both methods receive fitness values in population order and return
/// indices into that slice.
pub trait SelectionEngine: Send + Sync {
    /// Human-readable strategy name.
    fn name(&self) -> &'static str;

    /// Picks `count` parent indices (with replacement) for variation.
    fn select_parents(&self, fitness: &[Fitness], count: usize, rng: &mut dyn RngCore)
        -> Vec<usize>;

    /// Chooses exactly `min(target, fitness.len())` distinct survivor indices.
    ///
    /// Deterministic: the same input always yields the same survivors.
    fn select_survivors(&self, fitness: &[Fitness], target: usize) -> Vec<usize>;
}

/// Builds the engine for `config.algorithm`.
pub fn engine_for(config: &EvolutionConfig) -> Box<dyn SelectionEngine> {
    match config.algorithm {
        Algorithm::Nsga2 => Box::new(Nsga2),
        Algorithm::Nsga3 => Box::new(Nsga3::new(config.reference_divisions)),
    }
}

/// Crowded binary tournament: draw two individuals uniformly, the lower
/// Pareto rank wins, equal ranks go to the larger crowding distance, and
/// a full tie keeps the first draw.
///
/// # Panics
/// Panics if `fitness` is empty and `count > 0`.
pub fn binary_tournament(fitness: &[Fitness], count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    assert!(!fitness.is_empty(), "cannot select from empty population");

    let (ranks, crowding) = rank_and_crowding(fitness);
    let n = fitness.len();

    (0..count)
        .map(|_| {
            let a = rng.random_range(0..n);
            let b = rng.random_range(0..n);
            if ranks[b] < ranks[a] || (ranks[b] == ranks[a] && crowding[b] > crowding[a]) {
                b
            } else {
                a
            }
        })
        .collect()
}

/// Uniform random mating selection with replacement.
///
/// # Panics
/// Panics if `fitness` is empty and `count > 0`.
pub fn random_selection(fitness: &[Fitness], count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    assert!(!fitness.is_empty(), "cannot select from empty population");
    (0..count).map(|_| rng.random_range(0..fitness.len())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn fits(pairs: &[(usize, f64)]) -> Vec<Fitness> {
        pairs.iter().map(|&(v, d)| Fitness::new(v, d)).collect()
    }

    #[test]
    fn test_tournament_favors_non_dominated() {
        // index 0 dominates everything else
        let fitness = fits(&[(1, 1.0), (2, 5.0), (3, 6.0), (4, 7.0)]);
        let mut rng = create_rng(42);

        let picks = binary_tournament(&fitness, 10_000, &mut rng);
        let mut counts = [0u32; 4];
        for i in picks {
            counts[i] += 1;
        }
        // P(best wins) = 1 - (3/4)^2 = 7/16
        assert!(counts[0] > 4000, "counts: {counts:?}");
        assert!(counts[3] < counts[0]);
    }

    #[test]
    fn test_tournament_prefers_less_crowded_on_equal_rank() {
        // all on one front: 0 and 3 are boundaries (infinite crowding)
        let fitness = fits(&[(1, 9.0), (2, 5.0), (3, 4.9), (9, 1.0)]);
        let mut rng = create_rng(11);
        let picks = binary_tournament(&fitness, 10_000, &mut rng);
        let boundary = picks.iter().filter(|&&i| i == 0 || i == 3).count();
        assert!(boundary > 6000, "boundary picks: {boundary}");
    }

    #[test]
    fn test_random_selection_in_range() {
        let fitness = fits(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let mut rng = create_rng(5);
        let picks = random_selection(&fitness, 300, &mut rng);
        assert_eq!(picks.len(), 300);
        assert!(picks.iter().all(|&i| i < 3));
        for idx in 0..3 {
            assert!(picks.contains(&idx));
        }
    }

    #[test]
    fn test_zero_count() {
        let mut rng = create_rng(1);
        assert!(binary_tournament(&[], 0, &mut rng).is_empty());
        assert!(random_selection(&[], 0, &mut rng).is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = create_rng(42);
        binary_tournament(&[], 3, &mut rng);
    }

    #[test]
    fn test_engine_for_algorithm() {
        let nsga2 = engine_for(&EvolutionConfig::default());
        assert_eq!(nsga2.name(), "NSGA-II");
        let nsga3 = engine_for(&EvolutionConfig::default().with_algorithm(Algorithm::Nsga3));
        assert_eq!(nsga3.name(), "NSGA-III");
    }
}
