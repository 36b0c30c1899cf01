//! Multi-objective evolutionary loop.
//!
//! [`EvolutionRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → mating selection → crossover → mutation
//! → evaluation → survivor selection → record → repeat.
//!
//! All run state lives in an [`EvolutionContext`] that is passed through
//! each step explicitly, so a run can be inspected or resumed between
//! calls and two runs never share anything.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::Rng;

use super::config::EvolutionConfig;
use super::multi_objective::non_dominated_sort;
use super::operators::{order_crossover, swap_mutation};
use super::record::{GenerationRecord, ResultSink, RunTag};
use super::selection::{engine_for, SelectionEngine};
use super::types::{best_index, evaluate_all, fitness_values, Individual, Population};
use crate::error::Error;
use crate::random::rng_from_seed;
use crate::routing::{Fitness, ProblemInstance};

/// Step of the evolutionary loop currently being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Building the random generation-0 population.
    Initializing,
    /// Decoding and scoring individuals without a fitness.
    Evaluating,
    /// Mating or survivor selection.
    Selecting,
    /// Crossover and mutation.
    Varying,
    /// Emitting the generation record.
    Recording,
    /// The run is over.
    Terminated,
}

/// Mutable state of one run.
#[derive(Debug, Clone)]
pub struct EvolutionContext {
    rng: StdRng,
    population: Population,
    evaluations: usize,
    phase: Phase,
}

impl EvolutionContext {
    /// Current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Generation index of the current population.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Fitness evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Phase last entered.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!(generation = self.population.generation(), ?phase, "phase");
        self.phase = phase;
    }
}

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Final population.
    pub population: Population,

    /// Lexicographically best individual of the final population.
    pub best: Individual,

    /// First Pareto front of the final population, in population order.
    pub pareto_front: Vec<Individual>,

    /// Generations executed by this call.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Total fitness evaluations, including generation 0.
    pub evaluations: usize,
}

/// Executes NSGA-II or NSGA-III on a CVRP instance.
///
/// # Usage
///
/// ```
/// use nsga_vrp::ga::{Algorithm, EvolutionConfig, EvolutionRunner};
/// use nsga_vrp::routing::{Customer, Point, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     Point::new(0.0, 0.0),
///     vec![
///         Customer::new(0.0, 1.0, 1),
///         Customer::new(1.0, 1.0, 1),
///         Customer::new(1.0, 0.0, 1),
///     ],
///     2,
/// );
/// let config = EvolutionConfig::default()
///     .with_algorithm(Algorithm::Nsga3)
///     .with_population_size(10)
///     .with_generations(5)
///     .with_reference_divisions(4)
///     .with_seed(42);
///
/// let result = EvolutionRunner::new(&instance, config)?.run();
/// assert_eq!(result.population.len(), 10);
/// assert_eq!(result.best.fitness().map(|f| f.vehicle_count), Some(2));
/// # Ok::<(), nsga_vrp::Error>(())
/// ```
pub struct EvolutionRunner<'a> {
    instance: &'a ProblemInstance,
    config: EvolutionConfig,
    engine: Box<dyn SelectionEngine>,
}

impl<'a> EvolutionRunner<'a> {
    /// Validates `instance` and `config` and builds the selection engine.
    pub fn new(instance: &'a ProblemInstance, config: EvolutionConfig) -> Result<Self, Error> {
        instance.validate()?;
        config.validate()?;
        let engine = engine_for(&config);
        Ok(Self {
            instance,
            config,
            engine,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// The selection engine chosen by `config.algorithm`.
    pub fn engine(&self) -> &dyn SelectionEngine {
        self.engine.as_ref()
    }

    /// Output name of this run.
    pub fn tag(&self) -> RunTag {
        RunTag::new(self.instance.name(), &self.config)
    }

    /// Builds the evaluated generation-0 context.
    pub fn context(&self) -> EvolutionContext {
        let mut rng = rng_from_seed(self.config.seed);
        let population = Population::random(self.instance, self.config.population_size, &mut rng);
        let mut ctx = EvolutionContext {
            rng,
            population,
            evaluations: 0,
            phase: Phase::Initializing,
        };
        tracing::trace!(generation = 0, phase = ?Phase::Initializing, "phase");

        ctx.enter(Phase::Evaluating);
        ctx.evaluations += ctx.population.evaluate(self.instance, self.config.parallel);
        ctx
    }

    /// Runs the configured number of generations from a fresh context.
    pub fn run(&self) -> EvolutionResult {
        self.run_with(&mut Vec::<GenerationRecord>::new(), None)
    }

    /// Runs from a fresh context, sending records to `sink`.
    pub fn run_with(&self, sink: &mut dyn ResultSink, cancel: Option<&AtomicBool>) -> EvolutionResult {
        self.evolve(self.context(), sink, cancel)
    }

    /// Advances `ctx` by up to `config.generations` generations.
    ///
    /// `cancel` is checked before every generation; once set, the current
    /// population is returned as is.
    pub fn evolve(
        &self,
        mut ctx: EvolutionContext,
        sink: &mut dyn ResultSink,
        cancel: Option<&AtomicBool>,
    ) -> EvolutionResult {
        let tag = self.tag();
        tracing::info!(
            run = %tag,
            algorithm = self.engine.name(),
            customers = self.instance.num_customers(),
            population_size = self.config.population_size,
            generations = self.config.generations,
            "evolution started"
        );

        let mut executed = 0;
        let mut cancelled = false;

        for _ in 0..self.config.generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            let record = self.step(&mut ctx);
            executed += 1;

            tracing::debug!(
                generation = record.generation,
                best_fitness = %record.best_fitness,
                front_size = record.front_size,
                "generation complete"
            );
            sink.record(&record);
        }

        ctx.enter(Phase::Terminated);
        if cancelled {
            tracing::warn!(run = %tag, generations = executed, "evolution cancelled");
        }

        let result = self.finish(ctx, executed, cancelled);
        tracing::info!(
            run = %tag,
            generations = result.generations,
            evaluations = result.evaluations,
            best_fitness = %result.best.fitness().map(|f| f.to_string()).unwrap_or_default(),
            front_size = result.pareto_front.len(),
            "evolution finished"
        );
        result
    }

    /// One full generation.
    fn step(&self, ctx: &mut EvolutionContext) -> GenerationRecord {
        let pop_size = self.config.population_size;

        // 1. Mating selection
        ctx.enter(Phase::Selecting);
        let parent_fitness = ctx.population.fitness_values();
        let mating_pool = self
            .engine
            .select_parents(&parent_fitness, pop_size, &mut ctx.rng);

        // 2. Variation
        ctx.enter(Phase::Varying);
        let mut offspring = self.vary(ctx.population.individuals(), &mating_pool, &mut ctx.rng);

        ctx.enter(Phase::Evaluating);
        ctx.evaluations += evaluate_all(&mut offspring, self.instance, self.config.parallel);

        // 3. Elitist survivor selection over parents ∪ offspring
        ctx.enter(Phase::Selecting);
        let generation = ctx.population.generation() + 1;
        let mut combined = std::mem::take(&mut ctx.population).into_individuals();
        combined.extend(offspring);
        let combined_fitness = fitness_values(&combined);

        let mut slots: Vec<Option<Individual>> = combined.into_iter().map(Some).collect();
        let survivors: Vec<Individual> = self
            .engine
            .select_survivors(&combined_fitness, pop_size)
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        ctx.population = Population::new(survivors, generation);

        // 4. Record
        ctx.enter(Phase::Recording);
        let fitness = ctx.population.fitness_values();
        let front_size = non_dominated_sort(&fitness)
            .fronts
            .first()
            .map_or(0, Vec::len);
        let best = best_of(&ctx.population);

        GenerationRecord {
            generation,
            best_chromosome: best.chromosome().to_vec(),
            best_fitness: fitness_of(best),
            front_size,
            evaluations: ctx.evaluations,
        }
    }

    /// Pairs up the mating pool into offspring.
    ///
    /// Each pair is recombined with `crossover_prob`, otherwise copied;
    /// an odd last parent is copied. Every child is then mutated with
    /// `mutation_prob`. Copies that escape mutation keep their fitness.
    fn vary(&self, parents: &[Individual], mating_pool: &[usize], rng: &mut StdRng) -> Vec<Individual> {
        let mut offspring = Vec::with_capacity(mating_pool.len());

        for pair in mating_pool.chunks(2) {
            match *pair {
                [a, b] => {
                    if rng.random_bool(self.config.crossover_prob) {
                        let (c1, c2) =
                            order_crossover(parents[a].chromosome(), parents[b].chromosome(), rng);
                        offspring.push(Individual::new(c1));
                        offspring.push(Individual::new(c2));
                    } else {
                        offspring.push(parents[a].clone());
                        offspring.push(parents[b].clone());
                    }
                }
                [a] => offspring.push(parents[a].clone()),
                _ => unreachable!("chunks(2) yields one or two indices"),
            }
        }

        for child in &mut offspring {
            if rng.random_bool(self.config.mutation_prob) {
                swap_mutation(child.chromosome_mut(), rng);
            }
        }

        offspring
    }

    fn finish(&self, ctx: EvolutionContext, generations: usize, cancelled: bool) -> EvolutionResult {
        let best = best_of(&ctx.population).clone();
        let fitness = fitness_values(ctx.population.individuals());
        let pareto_front = non_dominated_sort(&fitness)
            .fronts
            .first()
            .map(|front| {
                let mut front = front.clone();
                front.sort_unstable();
                front
                    .into_iter()
                    .map(|i| ctx.population.individuals()[i].clone())
                    .collect()
            })
            .unwrap_or_default();

        EvolutionResult {
            population: ctx.population,
            best,
            pareto_front,
            generations,
            cancelled,
            evaluations: ctx.evaluations,
        }
    }
}

/// Lexicographically best individual of a validated, evaluated population.
fn best_of(population: &Population) -> &Individual {
    let index = best_index(population.individuals()).expect("population must not be empty");
    &population.individuals()[index]
}

fn fitness_of(individual: &Individual) -> Fitness {
    individual
        .fitness()
        .expect("survivors are evaluated before recording")
}

// ============================================================================
// Tests
// ============================================================================
