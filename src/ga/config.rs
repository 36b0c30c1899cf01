//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the evolutionary loop.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Multi-objective selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Pareto rank + crowding distance (Deb et al., 2002).
    #[default]
    Nsga2,
    /// Pareto rank + reference-point niching (Deb & Jain, 2014).
    Nsga3,
}

impl Algorithm {
    /// Upper-case name used in run tags (`NSGA2` / `NSGA3`).
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Nsga2 => "NSGA2",
            Algorithm::Nsga3 => "NSGA3",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace(['-', '_'], "").as_str() {
            "NSGA2" | "NSGAII" => Ok(Algorithm::Nsga2),
            "NSGA3" | "NSGAIII" => Ok(Algorithm::Nsga3),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Configuration for a multi-objective evolution run.
///
/// # Defaults
///
/// ```
/// use nsga_vrp::ga::{Algorithm, EvolutionConfig};
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.algorithm, Algorithm::Nsga2);
/// assert_eq!(config.population_size, 400);
/// assert_eq!(config.generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use nsga_vrp::ga::{Algorithm, EvolutionConfig};
///
/// let config = EvolutionConfig::default()
///     .with_algorithm(Algorithm::Nsga3)
///     .with_population_size(100)
///     .with_reference_divisions(12)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Survivor selection strategy.
    pub algorithm: Algorithm,

    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Probability of recombining a mating pair (0.0–1.0).
    ///
    /// Pairs that are not recombined pass through as clones.
    pub crossover_prob: f64,

    /// Probability of applying swap mutation to an offspring (0.0–1.0).
    pub mutation_prob: f64,

    /// Number of generations to run. Zero returns the initial population.
    pub generations: usize,

    /// Divisions `p` of the reference-point simplex (NSGA-III only).
    ///
    /// Two objectives yield `p + 1` reference points.
    pub reference_divisions: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Nsga2,
            population_size: 400,
            crossover_prob: 0.85,
            mutation_prob: 0.02,
            generations: 200,
            reference_divisions: 99,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the selection strategy.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the NSGA-III reference-point divisions.
    pub fn with_reference_divisions(mut self, p: usize) -> Self {
        self.reference_divisions = p;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Out-of-range values are rejected rather than clamped, so a run
    /// never silently uses parameters other than the ones requested.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size == 0 {
            return Err(Error::InvalidPopulationSize);
        }
        check_probability("crossover_prob", self.crossover_prob)?;
        check_probability("mutation_prob", self.mutation_prob)?;
        if self.algorithm == Algorithm::Nsga3 && self.reference_divisions == 0 {
            return Err(Error::InvalidReferenceDivisions);
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvolutionConfig::default();
        assert_eq!(config.algorithm, Algorithm::Nsga2);
        assert_eq!(config.population_size, 400);
        assert!((config.crossover_prob - 0.85).abs() < 1e-10);
        assert!((config.mutation_prob - 0.02).abs() < 1e-10);
        assert_eq!(config.generations, 200);
        assert_eq!(config.reference_divisions, 99);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EvolutionConfig::default()
            .with_algorithm(Algorithm::Nsga3)
            .with_population_size(50)
            .with_crossover_prob(0.7)
            .with_mutation_prob(0.1)
            .with_generations(10)
            .with_reference_divisions(4)
            .with_parallel(false)
            .with_seed(7);

        assert_eq!(config.algorithm, Algorithm::Nsga3);
        assert_eq!(config.population_size, 50);
        assert!((config.crossover_prob - 0.7).abs() < 1e-10);
        assert!((config.mutation_prob - 0.1).abs() < 1e-10);
        assert_eq!(config.generations, 10);
        assert_eq!(config.reference_divisions, 4);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_zero_generations_is_valid() {
        assert!(EvolutionConfig::default().with_generations(0).validate().is_ok());
    }

    #[test]
    fn test_validate_population_zero() {
        let config = EvolutionConfig::default().with_population_size(0);
        assert_eq!(config.validate(), Err(Error::InvalidPopulationSize));
    }

    #[test]
    fn test_validate_probabilities() {
        let config = EvolutionConfig::default().with_crossover_prob(1.5);
        assert_eq!(
            config.validate(),
            Err(Error::InvalidProbability {
                name: "crossover_prob",
                value: 1.5
            })
        );

        let config = EvolutionConfig::default().with_mutation_prob(-0.1);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidProbability { name: "mutation_prob", .. })
        ));

        let config = EvolutionConfig::default().with_mutation_prob(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probability_bounds_inclusive() {
        let config = EvolutionConfig::default()
            .with_crossover_prob(0.0)
            .with_mutation_prob(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_divisions_only_checked_for_nsga3() {
        let config = EvolutionConfig::default().with_reference_divisions(0);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.with_algorithm(Algorithm::Nsga3).validate(),
            Err(Error::InvalidReferenceDivisions)
        );
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("NSGA2".parse::<Algorithm>(), Ok(Algorithm::Nsga2));
        assert_eq!("nsga3".parse::<Algorithm>(), Ok(Algorithm::Nsga3));
        assert_eq!("NSGA-III".parse::<Algorithm>(), Ok(Algorithm::Nsga3));
        assert_eq!(
            "SPEA2".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm("SPEA2".into()))
        );
        assert_eq!(Algorithm::Nsga3.to_string(), "NSGA3");
    }
}
