//! Two-objective fitness of a decoded chromosome.

use std::cmp::Ordering;
use std::fmt;

use super::decoder::{decode, Subroutes};
use super::instance::ProblemInstance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Objective pair `(vehicle_count, total_distance)`, both minimized.
///
/// Selection compares fitness values only by Pareto dominance; the
/// lexicographic order is used solely to report a generation's best.
///
/// # Examples
///
/// ```
/// use nsga_vrp::routing::Fitness;
///
/// let a = Fitness::new(1, 8.0);
/// let b = Fitness::new(1, 10.0);
/// assert!(a.dominates(&b));
/// assert!(!Fitness::new(2, 5.0).dominates(&a));
/// assert_eq!(Fitness::new(2, 6.0).to_string(), "(2, 6.0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fitness {
    pub vehicle_count: usize,
    pub total_distance: f64,
}

impl Fitness {
    /// Creates a fitness value.
    pub fn new(vehicle_count: usize, total_distance: f64) -> Self {
        Self {
            vehicle_count,
            total_distance,
        }
    }

    /// Computes the fitness of already decoded subroutes.
    pub fn from_subroutes(routes: &Subroutes<'_>, instance: &ProblemInstance) -> Self {
        let total_distance = routes
            .iter()
            .map(|route| route_distance(route, instance))
            .sum();
        Self::new(routes.len(), total_distance)
    }

    /// Objective vector used by sorting and niching.
    pub fn objectives(&self) -> [f64; 2] {
        [self.vehicle_count as f64, self.total_distance]
    }

    /// Pareto dominance: no worse in both objectives, strictly better in one.
    pub fn dominates(&self, other: &Fitness) -> bool {
        let no_worse = self.vehicle_count <= other.vehicle_count
            && self.total_distance <= other.total_distance;
        let better = self.vehicle_count < other.vehicle_count
            || self.total_distance < other.total_distance;
        no_worse && better
    }

    /// Orders by vehicle count, then by distance.
    pub fn lexicographic_cmp(&self, other: &Fitness) -> Ordering {
        self.vehicle_count
            .cmp(&other.vehicle_count)
            .then_with(|| self.total_distance.total_cmp(&other.total_distance))
    }
}

impl fmt::Display for Fitness {
    /// Renders as `(vehicles, distance)`, e.g. `(2, 6.0)` or `(4, 2e+16)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vehicle_count, float_repr(self.total_distance))
    }
}

/// Shortest round-trip rendering of a float as downstream result files spell it.
///
/// Plain notation always keeps a decimal point (`4.0`, `0.85`). Magnitudes
/// below `1e-4` or from `1e16` up switch to scientific notation with a
/// signed, two-digit exponent (`1e-05`, `2.5e+16`).
pub(crate) fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{value:?}");
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// Length of one closed tour: depot → customers in order → depot.
pub fn route_distance(route: &[usize], instance: &ProblemInstance) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let inner: f64 = route
        .windows(2)
        .map(|leg| instance.distance(leg[0], leg[1]))
        .sum();
    instance.distance(0, first) + inner + instance.distance(last, 0)
}

/// Decodes `chromosome` and scores the resulting subroutes.
///
/// Pure function of `(chromosome, instance)`; safe to call concurrently.
///
/// # Examples
///
/// ```
/// use nsga_vrp::routing::{evaluate, Customer, Fitness, Point, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     Point::new(0.0, 0.0),
///     vec![Customer::new(0.0, 1.0, 1), Customer::new(0.0, 2.0, 1)],
///     2,
/// );
/// assert_eq!(evaluate(&[1, 2], &instance), Fitness::new(1, 4.0));
/// ```
pub fn evaluate(chromosome: &[usize], instance: &ProblemInstance) -> Fitness {
    Fitness::from_subroutes(&decode(chromosome, instance), instance)
}
