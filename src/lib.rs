//! Multi-objective optimization of the Capacitated Vehicle Routing Problem.
//!
//! Solutions are permutations of customers. A greedy capacity split turns
//! each permutation into routes, scored on two objectives to minimize:
//! the number of vehicles and the total travelled distance. Populations
//! evolve under NSGA-II (crowding distance) or NSGA-III (reference-point
//! niching).
//!
//! - [`routing`]: instance model, route decoding, fitness evaluation
//! - [`ga`]: selection engines, variation operators, evolutionary loop
//! - [`random`]: seedable random number generation
//!
//! # Example
//!
//! ```
//! use nsga_vrp::ga::{EvolutionConfig, EvolutionRunner};
//! use nsga_vrp::routing::{Customer, Point, ProblemInstance};
//!
//! let instance = ProblemInstance::new(
//!     Point::new(0.0, 0.0),
//!     vec![Customer::new(0.0, 1.0, 1), Customer::new(0.0, 2.0, 1)],
//!     2,
//! )
//! .with_name("line");
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(8)
//!     .with_generations(3)
//!     .with_seed(1);
//! let result = EvolutionRunner::new(&instance, config)?.run();
//! assert_eq!(result.best.fitness().map(|f| f.vehicle_count), Some(1));
//! # Ok::<(), nsga_vrp::Error>(())
//! ```

mod error;
pub mod ga;
pub mod random;
pub mod routing;

pub use error::Error;
