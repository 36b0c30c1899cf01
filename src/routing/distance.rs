//! Dense distance matrix.

use super::instance::Point;

/// A dense n×n Euclidean distance matrix stored in row-major order.
///
/// Index 0 is the depot; index `i` is customer `i`.
///
/// # Examples
///
/// ```
/// use nsga_vrp::routing::{DistanceMatrix, Point};
///
/// let dm = DistanceMatrix::from_points(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the pairwise Euclidean distances between `points`.
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { data, size: n }
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(0.0, 8.0),
        ]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(0, 0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_points(&sample_points());
        for i in 0..3 {
            for j in 0..3 {
                assert!((dm.get(i, j) - dm.get(j, i)).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_empty() {
        let dm = DistanceMatrix::from_points(&[]);
        assert_eq!(dm.size(), 0);
    }
}
