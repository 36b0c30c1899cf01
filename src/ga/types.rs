//! Individual and population model.
//!
//! An [`Individual`] pairs a permutation chromosome with a cached
//! [`Fitness`]. The cache is cleared whenever the chromosome is touched
//! mutably, so a fitness value can never outlive the chromosome it was
//! computed for.

use rand::Rng;

use crate::random::shuffle;
use crate::routing::{evaluate, Fitness, ProblemInstance};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A candidate solution: customer visiting order plus cached fitness.
///
/// # Examples
///
/// ```
/// use nsga_vrp::ga::Individual;
/// use nsga_vrp::routing::Fitness;
///
/// let mut ind = Individual::new(vec![2, 1, 3]);
/// assert!(ind.fitness().is_none());
///
/// ind.set_fitness(Fitness::new(1, 10.0));
/// assert!(ind.is_evaluated());
///
/// ind.chromosome_mut().swap(0, 1);
/// assert!(ind.fitness().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    chromosome: Vec<usize>,
    fitness: Option<Fitness>,
}

impl Individual {
    /// Creates an unevaluated individual.
    pub fn new(chromosome: Vec<usize>) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    /// Creates an individual visiting all customers of `instance` in random order.
    pub fn random<R: Rng + ?Sized>(instance: &ProblemInstance, rng: &mut R) -> Self {
        let mut chromosome: Vec<usize> = instance.customer_ids().collect();
        shuffle(&mut chromosome, rng);
        Self::new(chromosome)
    }

    /// Customer visiting order.
    pub fn chromosome(&self) -> &[usize] {
        &self.chromosome
    }

    /// Mutable access to the chromosome. Invalidates the cached fitness.
    pub fn chromosome_mut(&mut self) -> &mut Vec<usize> {
        self.fitness = None;
        &mut self.chromosome
    }

    /// Cached fitness, if the current chromosome has been evaluated.
    pub fn fitness(&self) -> Option<Fitness> {
        self.fitness
    }

    /// Stores the fitness of the current chromosome.
    pub fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = Some(fitness);
    }

    /// Returns `true` if the cached fitness is valid.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Decodes and scores the chromosome unless already evaluated.
    ///
    /// Returns `true` if an evaluation was performed.
    pub fn evaluate(&mut self, instance: &ProblemInstance) -> bool {
        if self.fitness.is_some() {
            return false;
        }
        self.fitness = Some(evaluate(&self.chromosome, instance));
        true
    }
}

/// A fixed-size set of individuals at a given generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    individuals: Vec<Individual>,
    generation: usize,
}

impl Population {
    /// Wraps `individuals` as the population of `generation`.
    pub fn new(individuals: Vec<Individual>, generation: usize) -> Self {
        Self {
            individuals,
            generation,
        }
    }

    /// Builds `size` random permutations of the instance's customers (generation 0).
    pub fn random<R: Rng + ?Sized>(instance: &ProblemInstance, size: usize, rng: &mut R) -> Self {
        let individuals = (0..size).map(|_| Individual::random(instance, rng)).collect();
        Self::new(individuals, 0)
    }

    /// Generation index.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Returns `true` if the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Consumes the population, returning its individuals.
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Evaluates every individual lacking a fitness; returns how many were scored.
    pub fn evaluate(&mut self, instance: &ProblemInstance, parallel: bool) -> usize {
        evaluate_all(&mut self.individuals, instance, parallel)
    }

    /// Fitness of every individual, in population order.
    ///
    /// # Panics
    ///
    /// Panics if any individual is unevaluated.
    pub fn fitness_values(&self) -> Vec<Fitness> {
        fitness_values(&self.individuals)
    }

    /// The lexicographically best individual: fewest vehicles, then
    /// shortest distance. Ties keep the earliest individual.
    pub fn best(&self) -> Option<&Individual> {
        best_index(&self.individuals).map(|i| &self.individuals[i])
    }
}

/// Evaluates every individual lacking a fitness.
///
/// Evaluation is a pure function of chromosome and instance, so the
/// parallel and sequential paths give identical results.
pub(crate) fn evaluate_all(
    individuals: &mut [Individual],
    instance: &ProblemInstance,
    parallel: bool,
) -> usize {
    #[cfg(feature = "parallel")]
    if parallel {
        return individuals
            .par_iter_mut()
            .map(|ind| ind.evaluate(instance))
            .filter(|&done| done)
            .count();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    individuals
        .iter_mut()
        .map(|ind| ind.evaluate(instance))
        .filter(|&done| done)
        .count()
}

/// Collects cached fitness values.
pub(crate) fn fitness_values(individuals: &[Individual]) -> Vec<Fitness> {
    individuals
        .iter()
        .map(|ind| {
            ind.fitness()
                .expect("fitness is evaluated before selection")
        })
        .collect()
}

/// Index of the lexicographically best evaluated individual.
pub(crate) fn best_index(individuals: &[Individual]) -> Option<usize> {
    individuals
        .iter()
        .enumerate()
        .filter_map(|(i, ind)| ind.fitness().map(|f| (i, f)))
        .min_by(|(ia, a), (ib, b)| a.lexicographic_cmp(b).then(ia.cmp(ib)))
        .map(|(i, _)| i)
}
