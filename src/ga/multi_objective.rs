//! Pareto ranking utilities shared by the NSGA-II and NSGA-III engines.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//!
//! Both objectives are **minimized**.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::routing::Fitness;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, PartialEq)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    /// Indices within a front are in ascending order.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(n²) for two objectives.
///
/// # Example
///
/// ```
/// use nsga_vrp::ga::multi_objective::non_dominated_sort;
/// use nsga_vrp::routing::Fitness;
///
/// let fitness = vec![
///     Fitness::new(1, 10.0), // dominated by (1, 8.0)
///     Fitness::new(1, 8.0),
///     Fitness::new(2, 5.0),
/// ];
///
/// let result = non_dominated_sort(&fitness);
/// assert_eq!(result.fronts[0], vec![1, 2]);
/// assert_eq!(result.ranks, vec![1, 0, 0]);
/// ```
pub fn non_dominated_sort(fitness: &[Fitness]) -> NondominatedSortResult {
    let n = fitness.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if fitness[i].dominates(&fitness[j]) {
                dominates[i].push(j);
                domination_count[j] += 1;
            } else if fitness[j].dominates(&fitness[i]) {
                dominates[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = Vec::new();

    while !current.is_empty() {
        let mut next_front = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next_front.push(j);
                }
            }
        }
        next_front.sort_unstable();
        fronts.push(current);
        current = next_front;
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each member of one front.
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`;
/// interior solutions accumulate the normalized gap between their
/// neighbors on each objective.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value (stable, so equal values keep input order)
/// 2. Assign infinity to boundary solutions
/// 3. For interior solutions, add normalized distance to neighbors
///
/// # Complexity
///
/// O(n log n)
///
/// # Example
///
/// ```
/// use nsga_vrp::ga::multi_objective::crowding_distance;
/// use nsga_vrp::routing::Fitness;
///
/// let front = vec![Fitness::new(1, 5.0), Fitness::new(3, 3.0), Fitness::new(5, 1.0)];
/// let distances = crowding_distance(&front);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance(front: &[Fitness]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let objectives: Vec<[f64; 2]> = front.iter().map(Fitness::objectives).collect();
    let mut distances = vec![0.0f64; n];

    for obj_idx in 0..2 {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| objectives[a][obj_idx].total_cmp(&objectives[b][obj_idx]));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Rank and crowding distance of every solution, each measured within its own front.
pub fn rank_and_crowding(fitness: &[Fitness]) -> (Vec<usize>, Vec<f64>) {
    let sorted = non_dominated_sort(fitness);
    let mut crowding = vec![0.0f64; fitness.len()];
    for front in &sorted.fronts {
        let members: Vec<Fitness> = front.iter().map(|&i| fitness[i]).collect();
        for (&idx, d) in front.iter().zip(crowding_distance(&members)) {
            crowding[idx] = d;
        }
    }
    (sorted.ranks, crowding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits(pairs: &[(usize, f64)]) -> Vec<Fitness> {
        pairs.iter().map(|&(v, d)| Fitness::new(v, d)).collect()
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_empty() {
        let result = non_dominated_sort(&[]);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
    }

    #[test]
    fn test_single_solution() {
        let result = non_dominated_sort(&fits(&[(1, 2.0)]));
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_rank_zero_excludes_dominated() {
        let result = non_dominated_sort(&fits(&[(1, 10.0), (1, 8.0), (2, 5.0)]));
        assert_eq!(result.fronts[0], vec![1, 2]);
        assert_eq!(result.fronts[1], vec![0]);
        assert_eq!(result.ranks, vec![1, 0, 0]);
    }

    #[test]
    fn test_clear_dominance_chain() {
        let result = non_dominated_sort(&fits(&[(3, 3.0), (1, 1.0), (2, 2.0)]));
        assert_eq!(result.ranks, vec![2, 0, 1]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let result = non_dominated_sort(&fits(&[
            (1, 5.0), // front 0
            (3, 3.0), // front 0
            (5, 1.0), // front 0
            (4, 4.0), // dominated by (3,3) → front 1
            (6, 6.0), // dominated by (4,4) → front 2
        ]));
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_identical_solutions_share_front() {
        let result = non_dominated_sort(&fits(&[(2, 2.0), (2, 2.0), (2, 2.0)]));
        assert!(result.ranks.iter().all(|&r| r == 0));
        assert_eq!(result.fronts, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_rank_zero_has_no_dominator() {
        let fitness = fits(&[
            (4, 12.0),
            (3, 15.0),
            (4, 11.0),
            (5, 9.0),
            (3, 20.0),
            (6, 9.5),
        ]);
        let result = non_dominated_sort(&fitness);
        for (i, f) in fitness.iter().enumerate() {
            let dominated = fitness.iter().any(|g| g.dominates(f));
            assert_eq!(result.ranks[i] == 0, !dominated, "index {i}");
        }
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_small_fronts() {
        assert!(crowding_distance(&fits(&[(1, 2.0)]))[0].is_infinite());
        let two = crowding_distance(&fits(&[(1, 3.0), (3, 1.0)]));
        assert!(two.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let dist = crowding_distance(&fits(&[
            (0, 4.0),
            (1, 3.0),
            (2, 2.0),
            (3, 1.0),
            (4, 0.0),
        ]));
        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        assert!((dist[1] - dist[2]).abs() < 1e-10);
        assert!((dist[2] - dist[3]).abs() < 1e-10);
        // each objective contributes 2/4
        assert!((dist[2] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let dist = crowding_distance(&fits(&[(5, 1.0), (5, 2.0), (5, 3.0)]));
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!(dist[1].is_finite());
    }

    #[test]
    fn test_rank_and_crowding_per_front() {
        let fitness = fits(&[(1, 5.0), (3, 3.0), (5, 1.0), (4, 4.0)]);
        let (ranks, crowding) = rank_and_crowding(&fitness);
        assert_eq!(ranks, vec![0, 0, 0, 1]);
        assert!(crowding[1].is_finite());
        assert!(crowding[3].is_infinite(), "single-member front is a boundary");
    }
}
