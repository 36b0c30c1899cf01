//! Crate-wide error type.
//!
//! Every failure the engine can report happens before the evolutionary
//! loop starts: either the problem instance cannot be served by any
//! vehicle, or the configuration is out of range. Once a runner has been
//! constructed, every operation is total.

/// Errors reported by instance and configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The instance contains no customers.
    #[error("instance has no customers")]
    EmptyInstance,

    /// Vehicle capacity is zero.
    #[error("vehicle capacity must be positive")]
    ZeroCapacity,

    /// A single customer demands more than one vehicle can carry.
    #[error("customer {customer} demand {demand} exceeds vehicle capacity {capacity}")]
    InfeasibleCustomer {
        customer: usize,
        demand: u32,
        capacity: u32,
    },

    /// Population size is zero.
    #[error("population_size must be at least 1")]
    InvalidPopulationSize,

    /// A probability lies outside `[0, 1]` or is not a number.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// NSGA-III needs at least one division to place reference points.
    #[error("reference_divisions must be at least 1")]
    InvalidReferenceDivisions,

    /// Algorithm name not recognized.
    #[error("unknown algorithm '{0}', expected NSGA2 or NSGA3")]
    UnknownAlgorithm(String),
}
