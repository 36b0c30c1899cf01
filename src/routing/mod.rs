//! CVRP domain: instance model, route decoding, and fitness evaluation.
//!
//! - [`ProblemInstance`]: depot, customers, capacity, distance matrix
//! - [`decode`]: greedy capacity split of a chromosome into [`Subroutes`]
//! - [`evaluate`]: `(vehicle_count, total_distance)` [`Fitness`] of a chromosome

mod decoder;
mod distance;
mod fitness;
mod instance;

pub use decoder::{decode, Subroutes};
pub use distance::DistanceMatrix;
pub use fitness::{evaluate, route_distance, Fitness};
pub(crate) use fitness::float_repr;
pub use instance::{Customer, Point, ProblemInstance};
