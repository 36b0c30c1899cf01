//! Multi-objective genetic algorithm over permutation chromosomes.
//!
//! One evolutionary loop, two survivor-selection strategies. The loop
//! talks to a [`SelectionEngine`]; [`Nsga2`] and [`Nsga3`] plug into it.
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Algorithm parameters (population size, probabilities, seed)
//! - [`EvolutionRunner`]: Executes the evolutionary loop
//! - [`EvolutionResult`]: Final population, best individual and Pareto front
//! - [`GenerationRecord`] / [`ResultSink`]: Per-generation output
//!
//! # Submodules
//!
//! - [`operators`]: Order crossover (OX) and swap mutation
//! - [`multi_objective`]: Pareto non-dominated sorting and crowding distance
//! - [`nsga3`]: Reference points and normalization for NSGA-III
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Deb & Jain (2014), *An Evolutionary Many-Objective Optimization Algorithm
//!   Using Reference-Point-Based Nondominated Sorting Approach*

mod config;
pub mod multi_objective;
mod nsga2;
pub mod nsga3;
pub mod operators;
mod record;
mod runner;
mod selection;
mod types;

pub use config::{Algorithm, EvolutionConfig};
pub use nsga2::Nsga2;
pub use nsga3::Nsga3;
pub use record::{GenerationRecord, ResultSink, RunTag, TracingSink};
pub use runner::{EvolutionContext, EvolutionResult, EvolutionRunner, Phase};
pub use selection::{binary_tournament, engine_for, random_selection, SelectionEngine};
pub use types::{Individual, Population};
