//! NSGA-III survivor selection: Pareto rank, then reference-point niching.
//!
//! # Algorithm (Deb & Jain, 2014)
//!
//! 1. Take whole fronts while they fit; the first front that does not fit
//!    is the boundary front
//! 2. Normalize objectives over the selected members and the boundary
//!    front (ideal point, extreme points, intercepts)
//! 3. Associate each member with the reference line at minimal
//!    perpendicular distance
//! 4. Fill the remaining slots from the boundary front, always serving a
//!    reference point with the fewest associated survivors
//!
//! # References
//!
//! - Deb & Jain (2014), "An Evolutionary Many-Objective Optimization Algorithm
//!   Using Reference-Point-Based Nondominated Sorting Approach, Part I",
//!   IEEE Transactions on Evolutionary Computation, 18(4), 577-601
//! - Das & Dennis (1998), "Normal-Boundary Intersection"

use std::cmp::Ordering;

use rand::RngCore;

use super::multi_objective::non_dominated_sort;
use super::selection::{random_selection, SelectionEngine};
use crate::routing::Fitness;

/// Weight given to the non-target axes by the achievement scalarizing function.
const ASF_EPSILON: f64 = 1e-6;

/// Intercepts below this are treated as degenerate.
const MIN_INTERCEPT: f64 = 1e-6;

/// Uniformly spaced points on the 2-objective unit simplex.
///
/// `p` divisions yield `p + 1` points `(i / p, 1 - i / p)`.
///
/// # Panics
/// Panics if `divisions` is zero.
///
/// # Example
///
/// ```
/// use nsga_vrp::ga::nsga3::reference_points;
///
/// let points = reference_points(4);
/// assert_eq!(points.len(), 5);
/// assert_eq!(points[0], [0.0, 1.0]);
/// assert_eq!(points[2], [0.5, 0.5]);
/// assert_eq!(points[4], [1.0, 0.0]);
/// ```
pub fn reference_points(divisions: usize) -> Vec<[f64; 2]> {
    assert!(divisions > 0, "reference point divisions must be positive");
    let p = divisions as f64;
    (0..=divisions)
        .map(|i| {
            let w = i as f64 / p;
            [w, 1.0 - w]
        })
        .collect()
}

/// NSGA-III engine with a fixed set of reference points.
///
/// Niching is deterministic: among reference points with the lowest niche
/// count, the boundary-front member with the smallest perpendicular
/// distance is taken next, with ties resolved by lexicographic fitness and
/// then by candidate index. The lexicographically best candidate always
/// lies on the first reference line at zero distance, so it is never lost.
///
/// Mating selection is uniform random, as in the reference algorithm.
#[derive(Debug, Clone)]
pub struct Nsga3 {
    reference_points: Vec<[f64; 2]>,
}

impl Nsga3 {
    /// Creates an engine with `divisions + 1` reference points.
    ///
    /// # Panics
    /// Panics if `divisions` is zero.
    pub fn new(divisions: usize) -> Self {
        Self {
            reference_points: reference_points(divisions),
        }
    }

    /// The precomputed reference points.
    pub fn reference_points(&self) -> &[[f64; 2]] {
        &self.reference_points
    }

    /// Reference index and perpendicular distance for a normalized point.
    ///
    /// Ties go to the lower reference index.
    fn associate(&self, point: [f64; 2]) -> (usize, f64) {
        self.reference_points
            .iter()
            .enumerate()
            .map(|(j, r)| (j, perpendicular_distance(point, *r)))
            .fold((0, f64::INFINITY), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            })
    }
}

impl SelectionEngine for Nsga3 {
    fn name(&self) -> &'static str {
        "NSGA-III"
    }

    fn select_parents(
        &self,
        fitness: &[Fitness],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        random_selection(fitness, count, rng)
    }

    fn select_survivors(&self, fitness: &[Fitness], target: usize) -> Vec<usize> {
        let target = target.min(fitness.len());
        let mut survivors = Vec::with_capacity(target);
        let mut boundary_front = Vec::new();

        for front in non_dominated_sort(fitness).fronts {
            if survivors.len() == target {
                break;
            }
            if survivors.len() + front.len() <= target {
                survivors.extend(front);
            } else {
                boundary_front = front;
                break;
            }
        }

        if survivors.len() == target {
            return survivors;
        }

        // Normalize over everything still in play.
        let pool: Vec<usize> = survivors.iter().chain(&boundary_front).copied().collect();
        let objectives: Vec<[f64; 2]> = pool.iter().map(|&i| fitness[i].objectives()).collect();
        let normalized = normalize(&objectives);

        let mut niche_count = vec![0usize; self.reference_points.len()];
        for point in &normalized[..survivors.len()] {
            niche_count[self.associate(*point).0] += 1;
        }

        let mut candidates: Vec<Candidate> = boundary_front
            .iter()
            .zip(&normalized[survivors.len()..])
            .map(|(&index, point)| {
                let (reference, distance) = self.associate(*point);
                Candidate {
                    index,
                    reference,
                    distance,
                }
            })
            .collect();

        while survivors.len() < target {
            let Some(min_count) = candidates.iter().map(|c| niche_count[c.reference]).min()
            else {
                break;
            };

            let Some(pos) = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| niche_count[c.reference] == min_count)
                .min_by(|(_, a), (_, b)| a.cmp_priority(b, fitness))
                .map(|(pos, _)| pos)
            else {
                break;
            };

            let chosen = candidates.swap_remove(pos);
            niche_count[chosen.reference] += 1;
            survivors.push(chosen.index);
        }

        survivors
    }
}

/// A boundary-front member awaiting niching.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    reference: usize,
    distance: f64,
}

impl Candidate {
    fn cmp_priority(&self, other: &Candidate, fitness: &[Fitness]) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| fitness[self.index].lexicographic_cmp(&fitness[other.index]))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Maps objective vectors into normalized space.
///
/// Translates by the ideal point, then divides by the hyperplane
/// intercepts found from the extreme points. A degenerate hyperplane
/// falls back to the translated nadir point, and a zero-width axis to 1.
pub fn normalize(objectives: &[[f64; 2]]) -> Vec<[f64; 2]> {
    if objectives.is_empty() {
        return Vec::new();
    }

    let mut ideal = [f64::INFINITY; 2];
    for obj in objectives {
        for k in 0..2 {
            ideal[k] = ideal[k].min(obj[k]);
        }
    }

    let translated: Vec<[f64; 2]> = objectives
        .iter()
        .map(|o| [o[0] - ideal[0], o[1] - ideal[1]])
        .collect();

    let intercepts = intercepts(&translated).unwrap_or_else(|| nadir(&translated));

    translated
        .iter()
        .map(|t| [t[0] / intercepts[0], t[1] / intercepts[1]])
        .collect()
}

/// Intercepts of the line through the two extreme points, if well defined.
fn intercepts(translated: &[[f64; 2]]) -> Option<[f64; 2]> {
    let e0 = extreme_point(translated, 0);
    let e1 = extreme_point(translated, 1);

    // Solve [e0; e1] · b = [1, 1]; intercept k is 1 / b[k].
    let det = e0[0] * e1[1] - e0[1] * e1[0];
    if det.abs() < f64::EPSILON {
        return None;
    }
    let b = [(e1[1] - e0[1]) / det, (e0[0] - e1[0]) / det];
    let a = [1.0 / b[0], 1.0 / b[1]];

    if a.iter().all(|&v| v.is_finite() && v > MIN_INTERCEPT) {
        Some(a)
    } else {
        None
    }
}

/// Member minimizing the achievement scalarizing function for `axis`.
fn extreme_point(translated: &[[f64; 2]], axis: usize) -> [f64; 2] {
    let asf = |t: &[f64; 2]| {
        (0..2)
            .map(|k| {
                let w = if k == axis { 1.0 } else { ASF_EPSILON };
                t[k] / w
            })
            .fold(f64::NEG_INFINITY, f64::max)
    };

    translated
        .iter()
        .fold(None::<(&[f64; 2], f64)>, |best, t| {
            let value = asf(t);
            match best {
                Some((_, v)) if v <= value => best,
                _ => Some((t, value)),
            }
        })
        .map(|(t, _)| *t)
        .unwrap_or([0.0; 2])
}

/// Component-wise maximum; zero-width axes become 1.
fn nadir(translated: &[[f64; 2]]) -> [f64; 2] {
    let mut worst = [0.0f64; 2];
    for t in translated {
        for k in 0..2 {
            worst[k] = worst[k].max(t[k]);
        }
    }
    worst.map(|w| if w > MIN_INTERCEPT { w } else { 1.0 })
}

/// Distance from `point` to the line through the origin and `reference`.
fn perpendicular_distance(point: [f64; 2], reference: [f64; 2]) -> f64 {
    let norm_sq = reference[0] * reference[0] + reference[1] * reference[1];
    let scale = (point[0] * reference[0] + point[1] * reference[1]) / norm_sq;
    let dx = point[0] - scale * reference[0];
    let dy = point[1] - scale * reference[1];
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits(pairs: &[(usize, f64)]) -> Vec<Fitness> {
        pairs.iter().map(|&(v, d)| Fitness::new(v, d)).collect()
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    // ---- Reference points ----

    #[test]
    fn test_reference_point_count() {
        for p in 1..=30 {
            let points = reference_points(p);
            assert_eq!(points.len(), p + 1);
            for r in &points {
                assert!((r[0] + r[1] - 1.0).abs() < 1e-12);
                assert!(r[0] >= 0.0 && r[1] >= 0.0);
            }
        }
    }

    #[test]
    fn test_reference_points_single_division() {
        assert_eq!(reference_points(1), vec![[0.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    #[should_panic(expected = "divisions must be positive")]
    fn test_reference_points_zero_divisions() {
        reference_points(0);
    }

    // ---- Geometry ----

    #[test]
    fn test_perpendicular_distance() {
        assert!(perpendicular_distance([0.0, 1.0], [0.0, 1.0]).abs() < 1e-12);
        assert!((perpendicular_distance([1.0, 0.0], [0.0, 1.0]) - 1.0).abs() < 1e-12);
        let d = perpendicular_distance([1.0, 0.0], [0.5, 0.5]);
        assert!((d - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_uses_extreme_intercepts() {
        let normalized = normalize(&[[1.0, 100.0], [10.0, 10.0], [4.0, 40.0]]);
        assert!((normalized[0][0]).abs() < 1e-12);
        assert!((normalized[0][1] - 1.0).abs() < 1e-12);
        assert!((normalized[1][0] - 1.0).abs() < 1e-12);
        assert!((normalized[1][1]).abs() < 1e-12);
        assert!((normalized[2][0] - 3.0 / 9.0).abs() < 1e-12);
        assert!((normalized[2][1] - 30.0 / 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_single_point_is_origin() {
        let normalized = normalize(&[[3.0, 7.0], [3.0, 7.0]]);
        assert_eq!(normalized, vec![[0.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_normalize_zero_width_axis() {
        // all share one vehicle count: axis 0 falls back to width 1
        let normalized = normalize(&[[2.0, 5.0], [2.0, 15.0]]);
        assert!(normalized.iter().all(|n| n[0] == 0.0));
        assert!((normalized[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_associate_picks_nearest_line() {
        let engine = Nsga3::new(2);
        assert_eq!(engine.associate([0.0, 0.8]).0, 0);
        assert_eq!(engine.associate([0.4, 0.45]).0, 1);
        assert_eq!(engine.associate([0.9, 0.05]).0, 2);
        // the ideal point is on every line: lowest index wins
        assert_eq!(engine.associate([0.0, 0.0]), (0, 0.0));
    }

    // ---- Survivor selection ----

    #[test]
    fn test_whole_fronts_fill_in_rank_order() {
        let fitness = fits(&[(1, 10.0), (1, 8.0), (2, 5.0)]);
        let survivors = Nsga3::new(4).select_survivors(&fitness, 2);
        assert_eq!(sorted(survivors), vec![1, 2]);
    }

    #[test]
    fn test_niching_spreads_over_reference_points() {
        // one front; after normalization A=(0,1), E=(1,0), D closest to (0.5,0.5)
        let fitness = fits(&[
            (1, 100.0), // A
            (2, 50.0),  // B
            (3, 49.0),  // C
            (4, 48.0),  // D
            (10, 10.0), // E
        ]);
        let survivors = Nsga3::new(2).select_survivors(&fitness, 3);
        assert_eq!(sorted(survivors), vec![0, 3, 4]);
    }

    #[test]
    fn test_niche_count_from_selected_fronts() {
        // front 0 = {(1,20)} sits on reference (0,1); the boundary front
        // member on the less crowded line is preferred.
        let fitness = fits(&[
            (1, 20.0), // front 0
            (2, 30.0), // front 1, on the (0,1) side
            (6, 10.0), // front 0
            (7, 15.0), // front 1, on the (1,0) side
        ]);
        let survivors = Nsga3::new(1).select_survivors(&fitness, 3);
        assert_eq!(survivors.len(), 3);
        assert!(survivors.contains(&0));
        assert!(survivors.contains(&2));
    }

    #[test]
    fn test_lexicographic_best_always_survives() {
        let fitness: Vec<Fitness> = (0..50)
            .map(|i| Fitness::new(3 + i % 4, 200.0 - (i as f64) * 1.5))
            .collect();
        let best = (0..fitness.len())
            .min_by(|&a, &b| fitness[a].lexicographic_cmp(&fitness[b]))
            .expect("non-empty");
        for target in [1, 2, 5, 20] {
            let survivors = Nsga3::new(8).select_survivors(&fitness, target);
            assert_eq!(survivors.len(), target);
            assert!(
                survivors.iter().any(|&i| fitness[i] == fitness[best]),
                "target {target} lost the best candidate"
            );
        }
    }

    #[test]
    fn test_identical_candidates() {
        let fitness = fits(&[(2, 4.0), (2, 4.0), (2, 4.0), (2, 4.0)]);
        let survivors = Nsga3::new(3).select_survivors(&fitness, 2);
        assert_eq!(survivors, vec![0, 1]);
    }

    #[test]
    fn test_survivors_are_distinct_and_sized() {
        let fitness: Vec<Fitness> = (0..60)
            .map(|i| Fitness::new(1 + i % 6, 50.0 + (i * 17 % 29) as f64))
            .collect();
        let survivors = Nsga3::new(5).select_survivors(&fitness, 30);
        assert_eq!(survivors.len(), 30);
        let unique: std::collections::HashSet<_> = survivors.iter().collect();
        assert_eq!(unique.len(), 30);
    }
}
