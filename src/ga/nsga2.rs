//! NSGA-II survivor selection: Pareto rank, then crowding distance.

use rand::RngCore;

use super::multi_objective::{crowding_distance, non_dominated_sort};
use super::selection::{binary_tournament, SelectionEngine};
use crate::routing::Fitness;

/// NSGA-II (Deb et al., 2002).
///
/// Survivors are taken front by front in rank order. The first front that
/// does not fit entirely is truncated by descending crowding distance;
/// equal distances fall back to lexicographic fitness, then to the lower
/// candidate index, so the outcome is reproducible. That fallback also
/// guarantees the lexicographically best candidate (a boundary of front 0)
/// always survives.
///
/// # Example
///
/// ```
/// use nsga_vrp::ga::{Nsga2, SelectionEngine};
/// use nsga_vrp::routing::Fitness;
///
/// let candidates = vec![
///     Fitness::new(1, 10.0),
///     Fitness::new(1, 8.0),
///     Fitness::new(2, 5.0),
/// ];
/// let mut survivors = Nsga2.select_survivors(&candidates, 2);
/// survivors.sort_unstable();
/// assert_eq!(survivors, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Nsga2;

impl SelectionEngine for Nsga2 {
    fn name(&self) -> &'static str {
        "NSGA-II"
    }

    fn select_parents(
        &self,
        fitness: &[Fitness],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        binary_tournament(fitness, count, rng)
    }

    fn select_survivors(&self, fitness: &[Fitness], target: usize) -> Vec<usize> {
        let target = target.min(fitness.len());
        let mut survivors = Vec::with_capacity(target);

        for front in non_dominated_sort(fitness).fronts {
            let remaining = target - survivors.len();
            if remaining == 0 {
                break;
            }
            if front.len() <= remaining {
                survivors.extend(front);
                continue;
            }
            survivors.extend(truncate_by_crowding(&front, fitness, remaining));
            break;
        }

        survivors
    }
}

/// Keeps the `keep` least crowded members of `front`.
fn truncate_by_crowding(front: &[usize], fitness: &[Fitness], keep: usize) -> Vec<usize> {
    let members: Vec<Fitness> = front.iter().map(|&i| fitness[i]).collect();
    let distances = crowding_distance(&members);

    let mut order: Vec<usize> = (0..front.len()).collect();
    order.sort_by(|&a, &b| {
        distances[b]
            .total_cmp(&distances[a])
            .then_with(|| members[a].lexicographic_cmp(&members[b]))
            .then_with(|| front[a].cmp(&front[b]))
    });

    order.into_iter().take(keep).map(|k| front[k]).collect()
}
