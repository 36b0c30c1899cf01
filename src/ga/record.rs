//! Per-generation output records.
//!
//! Every generation yields a [`GenerationRecord`] describing its best
//! individual. Records are handed to a [`ResultSink`]; the runner does not
//! know or care where they end up.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::{Algorithm, EvolutionConfig};
use crate::routing::{float_repr, Fitness};

/// Snapshot of one generation's best individual.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationRecord {
    /// Generation index, starting at 1.
    pub generation: usize,
    /// Chromosome of the lexicographically best individual.
    pub best_chromosome: Vec<usize>,
    /// Its fitness.
    pub best_fitness: Fitness,
    /// Size of the first Pareto front.
    pub front_size: usize,
    /// Cumulative number of fitness evaluations.
    pub evaluations: usize,
}

impl GenerationRecord {
    /// Chromosome rendered as `[1, 2, 3]`.
    ///
    /// ```
    /// use nsga_vrp::ga::GenerationRecord;
    /// use nsga_vrp::routing::Fitness;
    ///
    /// let record = GenerationRecord {
    ///     generation: 1,
    ///     best_chromosome: vec![3, 1, 2],
    ///     best_fitness: Fitness::new(2, 6.0),
    ///     front_size: 1,
    ///     evaluations: 10,
    /// };
    /// assert_eq!(record.chromosome_repr(), "[3, 1, 2]");
    /// assert_eq!(record.fitness_repr(), "(2, 6.0)");
    /// ```
    pub fn chromosome_repr(&self) -> String {
        format!("{:?}", self.best_chromosome)
    }

    /// Fitness rendered as `(vehicles, distance)`.
    pub fn fitness_repr(&self) -> String {
        self.best_fitness.to_string()
    }
}

/// Identifies a run in output names.
///
/// Renders as `{instance}_{ALGO}_pop{N}_crossProb{c}_mutProb{m}_numGen{g}`,
/// probabilities spelled like the result files the plotting tools read
/// (`0.85`, `1.0`, `1e-05`). The NSGA-III division count is carried for
/// consumers but not part of the rendered name.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTag {
    /// Instance name.
    pub instance: String,
    /// Selection strategy.
    pub algorithm: Algorithm,
    /// Individuals per generation.
    pub population_size: usize,
    /// Crossover probability.
    pub crossover_prob: f64,
    /// Mutation probability.
    pub mutation_prob: f64,
    /// Configured generation count.
    pub generations: usize,
    /// Reference-point divisions; `None` for NSGA-II.
    pub reference_divisions: Option<usize>,
}

impl RunTag {
    /// Tag for running `config` on the instance named `instance`.
    pub fn new(instance: impl Into<String>, config: &EvolutionConfig) -> Self {
        Self {
            instance: instance.into(),
            algorithm: config.algorithm,
            population_size: config.population_size,
            crossover_prob: config.crossover_prob,
            mutation_prob: config.mutation_prob,
            generations: config.generations,
            reference_divisions: match config.algorithm {
                Algorithm::Nsga2 => None,
                Algorithm::Nsga3 => Some(config.reference_divisions),
            },
        }
    }
}

impl fmt::Display for RunTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_pop{}_crossProb{}_mutProb{}_numGen{}",
            self.instance,
            self.algorithm,
            self.population_size,
            float_repr(self.crossover_prob),
            float_repr(self.mutation_prob),
            self.generations
        )
    }
}

/// Destination for generation records.
pub trait ResultSink {
    /// Consumes one record.
    fn record(&mut self, record: &GenerationRecord);
}

impl ResultSink for Vec<GenerationRecord> {
    fn record(&mut self, record: &GenerationRecord) {
        self.push(record.clone());
    }
}

/// Emits each record as an `info`-level `tracing` event.
#[derive(Debug, Clone)]
pub struct TracingSink {
    tag: String,
}

impl TracingSink {
    /// Creates a sink that labels every event with the rendered `tag`.
    pub fn new(tag: &RunTag) -> Self {
        Self {
            tag: tag.to_string(),
        }
    }

    /// The rendered run tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl ResultSink for TracingSink {
    fn record(&mut self, record: &GenerationRecord) {
        tracing::info!(
            run = %self.tag,
            generation = record.generation,
            best_fitness = %record.fitness_repr(),
            best_chromosome = %record.chromosome_repr(),
            front_size = record.front_size,
            evaluations = record.evaluations,
            "generation recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(generation: usize) -> GenerationRecord {
        GenerationRecord {
            generation,
            best_chromosome: vec![1, 2, 3],
            best_fitness: Fitness::new(1, 4.0),
            front_size: 2,
            evaluations: 40,
        }
    }

    #[test]
    fn test_reprs() {
        let record = sample(1);
        assert_eq!(record.chromosome_repr(), "[1, 2, 3]");
        assert_eq!(record.fitness_repr(), "(1, 4.0)");

        let empty = GenerationRecord {
            best_chromosome: Vec::new(),
            ..sample(1)
        };
        assert_eq!(empty.chromosome_repr(), "[]");
    }

    #[test]
    fn test_run_tag_display() {
        let config = EvolutionConfig::default();
        let tag = RunTag::new("Input_Data", &config);
        assert_eq!(
            tag.to_string(),
            "Input_Data_NSGA2_pop400_crossProb0.85_mutProb0.02_numGen200"
        );
        assert_eq!(tag.reference_divisions, None);
    }

    #[test]
    fn test_run_tag_nsga3() {
        let config = EvolutionConfig::default()
            .with_algorithm(Algorithm::Nsga3)
            .with_population_size(50)
            .with_crossover_prob(1.0)
            .with_mutation_prob(0.0)
            .with_generations(10)
            .with_reference_divisions(12);
        let tag = RunTag::new("c101", &config);
        assert_eq!(
            tag.to_string(),
            "c101_NSGA3_pop50_crossProb1.0_mutProb0.0_numGen10"
        );
        assert_eq!(tag.reference_divisions, Some(12));
    }

    #[test]
    fn test_run_tag_small_probability() {
        let config = EvolutionConfig::default().with_mutation_prob(1e-5);
        assert_eq!(
            RunTag::new("x", &config).to_string(),
            "x_NSGA2_pop400_crossProb0.85_mutProb1e-05_numGen200"
        );
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<GenerationRecord> = Vec::new();
        sink.record(&sample(1));
        sink.record(&sample(2));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].generation, 2);
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        let tag = RunTag::new("c101", &EvolutionConfig::default());
        let mut sink = TracingSink::new(&tag);
        sink.record(&sample(3));
        assert_eq!(sink.tag(), tag.to_string());
    }
}
