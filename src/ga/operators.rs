//! Permutation-preserving variation operators.
//!
//! Both operators work on chromosomes of customer identifiers (any
//! distinct `usize` values, typically `1..=n`) and are total over valid
//! permutations: they never fail and never drop or duplicate a customer.
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//! - [`swap_mutation`]: exchange two distinct random positions in O(1)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Order Crossover (OX) for permutations.
///
/// # Algorithm (Davis, 1985)
///
/// 1. Select a random segment `[start, end]`
/// 2. Each child copies the segment from one parent at the same positions
/// 3. The remaining positions, starting after the segment and wrapping
///    around, are filled with the other parent's customers in their order
///    (also read from after the segment), skipping customers already placed
///
/// # Complexity
/// O(n + max id) time and space
///
/// # Panics
/// Panics if parents have different lengths.
///
/// # Example
///
/// ```
/// use nsga_vrp::ga::operators::order_crossover;
/// use nsga_vrp::random::create_rng;
///
/// let mut rng = create_rng(7);
/// let (a, b) = order_crossover(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1], &mut rng);
///
/// let mut sorted = a.clone();
/// sorted.sort_unstable();
/// assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
/// assert_eq!(b.len(), 5);
/// ```
pub fn order_crossover<R: Rng + ?Sized>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);
    (
        ox_build_child(parent1, parent2, start, end),
        ox_build_child(parent2, parent1, start, end),
    )
}

/// Builds one OX child: segment from `template`, remainder in `donor` order.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let max_id = template.iter().copied().max().unwrap_or(0);
    let mut placed = vec![false; max_id + 1];
    let mut child = template.to_vec();

    for &customer in &template[start..=end] {
        placed[customer] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let customer = donor[(end + 1 + offset) % n];
        if !placed[customer] {
            child[pos] = customer;
            pos = (pos + 1) % n;
        }
    }

    debug_assert!(is_permutation_of(&child, template));
    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation: exchange the customers at two distinct random positions.
///
/// No-op for chromosomes shorter than two.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<R: Rng + ?Sized>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    perm.swap(i, j);
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns `true` if `candidate` holds exactly the customers of `reference`,
/// each once.
pub fn is_permutation_of(candidate: &[usize], reference: &[usize]) -> bool {
    if candidate.len() != reference.len() {
        return false;
    }
    let mut a = candidate.to_vec();
    let mut b = reference.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b && a.windows(2).all(|w| w[0] != w[1])
}

// ============================================================================
// Tests
// ============================================================================
