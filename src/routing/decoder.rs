//! Greedy capacity split of a chromosome into vehicle subroutes.
//!
//! The chromosome is scanned left to right; customers join the current
//! vehicle until the next one would exceed capacity, at which point the
//! vehicle returns to the depot and a new one starts with that customer.
//! Decoding depends only on chromosome order, so the same chromosome
//! always yields the same subroutes. Downstream consumers that only keep
//! the serialized chromosome can rebuild the routes by decoding again.

use std::ops::Range;

use super::instance::ProblemInstance;

/// Subroutes of a decoded chromosome.
///
/// Stored as index ranges into the borrowed chromosome, so concatenating
/// the subroutes in order always reproduces the chromosome exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutes<'a> {
    chromosome: &'a [usize],
    ranges: Vec<Range<usize>>,
}

impl<'a> Subroutes<'a> {
    /// Number of subroutes, i.e. vehicles used.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if no vehicle is needed.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Index ranges of each subroute within the chromosome.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Returns subroute `i`.
    pub fn get(&self, i: usize) -> Option<&'a [usize]> {
        let chromosome = self.chromosome;
        self.ranges.get(i).map(|r| &chromosome[r.clone()])
    }

    /// Iterates over subroutes as customer-id slices.
    pub fn iter(&self) -> impl Iterator<Item = &'a [usize]> + '_ {
        let chromosome = self.chromosome;
        self.ranges.iter().map(move |r| &chromosome[r.clone()])
    }

    /// Copies the subroutes out as owned vectors.
    pub fn to_vecs(&self) -> Vec<Vec<usize>> {
        self.iter().map(<[usize]>::to_vec).collect()
    }
}

/// Splits `chromosome` into capacity-feasible subroutes.
///
/// Assumes every customer demand fits in one vehicle
/// ([`ProblemInstance::validate`]); a customer that would not fit still
/// gets a subroute of its own.
///
/// # Panics
/// Panics if `chromosome` contains the depot id `0` or an id greater
/// than [`ProblemInstance::num_customers`].
///
/// # Complexity
/// O(n)
///
/// # Examples
///
/// ```
/// use nsga_vrp::routing::{decode, Customer, Point, ProblemInstance};
///
/// let instance = ProblemInstance::new(
///     Point::new(0.0, 0.0),
///     vec![Customer::new(0.0, 1.0, 1), Customer::new(0.0, 2.0, 1)],
///     1,
/// );
/// let routes = decode(&[1, 2], &instance);
/// assert_eq!(routes.to_vecs(), vec![vec![1], vec![2]]);
/// ```
pub fn decode<'a>(chromosome: &'a [usize], instance: &ProblemInstance) -> Subroutes<'a> {
    let capacity = instance.capacity();
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut load = 0u32;

    for (pos, &customer) in chromosome.iter().enumerate() {
        let demand = instance.demand(customer);
        if pos > start && load.saturating_add(demand) > capacity {
            ranges.push(start..pos);
            start = pos;
            load = 0;
        }
        load = load.saturating_add(demand);
    }

    if start < chromosome.len() {
        ranges.push(start..chromosome.len());
    }

    Subroutes { chromosome, ranges }
}
