//! Problem instance: depot, customers, and vehicle capacity.

use super::distance::DistanceMatrix;
use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A location in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A customer to be served from the depot.
///
/// Customers carry no identifier of their own: the instance numbers them
/// `1..=n` by their position in the customer list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Customer {
    location: Point,
    demand: u32,
}

impl Customer {
    /// Creates a customer at `(x, y)` with the given demand.
    pub fn new(x: f64, y: f64, demand: u32) -> Self {
        Self {
            location: Point::new(x, y),
            demand,
        }
    }

    /// Location of this customer.
    pub fn location(&self) -> Point {
        self.location
    }

    /// Units to deliver to this customer.
    pub fn demand(&self) -> u32 {
        self.demand
    }
}

/// A single-depot capacitated vehicle routing instance.
///
/// Customer identifiers are `1..=n`; identifier `0` is the depot. The
/// Euclidean distance matrix over all locations is computed once at
/// construction and indexed by those identifiers.
///
/// # Examples
///
/// ```
/// use nsga_vrp::routing::{Customer, Point, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     Point::new(0.0, 0.0),
///     vec![Customer::new(3.0, 4.0, 2), Customer::new(0.0, 8.0, 1)],
///     5,
/// );
/// assert_eq!(instance.num_customers(), 2);
/// assert_eq!(instance.demand(1), 2);
/// assert!((instance.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "InstanceData", into = "InstanceData"))]
pub struct ProblemInstance {
    name: String,
    depot: Point,
    customers: Vec<Customer>,
    capacity: u32,
    distances: DistanceMatrix,
}

impl ProblemInstance {
    /// Creates an instance and precomputes its distance matrix.
    ///
    /// No feasibility checks happen here; see [`validate`](Self::validate).
    pub fn new(depot: Point, customers: Vec<Customer>, capacity: u32) -> Self {
        let locations: Vec<Point> = std::iter::once(depot)
            .chain(customers.iter().map(Customer::location))
            .collect();
        let distances = DistanceMatrix::from_points(&locations);
        Self {
            name: String::from("instance"),
            depot,
            customers,
            capacity,
            distances,
        }
    }

    /// Sets the instance name used in run tags.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depot location.
    pub fn depot(&self) -> Point {
        self.depot
    }

    /// All customers, in identifier order (`customers()[i]` has id `i + 1`).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Number of customers (excluding the depot).
    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Identifiers of all customers, `1..=n`.
    pub fn customer_ids(&self) -> impl Iterator<Item = usize> {
        1..=self.customers.len()
    }

    /// Demand of customer `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in `1..=n`.
    pub fn demand(&self, id: usize) -> u32 {
        self.customers[id - 1].demand
    }

    /// Euclidean distance between two locations (`0` = depot).
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Precomputed distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Checks that every customer can be served by one vehicle.
    ///
    /// A customer whose demand exceeds capacity makes every chromosome
    /// infeasible, so runners refuse such instances up front.
    pub fn validate(&self) -> Result<(), Error> {
        if self.customers.is_empty() {
            return Err(Error::EmptyInstance);
        }
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        match self
            .customers
            .iter()
            .enumerate()
            .find(|(_, c)| c.demand > self.capacity)
        {
            Some((idx, c)) => Err(Error::InfeasibleCustomer {
                customer: idx + 1,
                demand: c.demand,
                capacity: self.capacity,
            }),
            None => Ok(()),
        }
    }
}

/// Serialized shape of an instance; the distance matrix is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct InstanceData {
    name: String,
    depot: Point,
    customers: Vec<Customer>,
    capacity: u32,
}

#[cfg(feature = "serde")]
impl From<InstanceData> for ProblemInstance {
    fn from(data: InstanceData) -> Self {
        ProblemInstance::new(data.depot, data.customers, data.capacity).with_name(data.name)
    }
}

#[cfg(feature = "serde")]
impl From<ProblemInstance> for InstanceData {
    fn from(instance: ProblemInstance) -> Self {
        InstanceData {
            name: instance.name,
            depot: instance.depot,
            customers: instance.customers,
            capacity: instance.capacity,
        }
    }
}
