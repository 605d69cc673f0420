use std::iter::Sum;

use ndarray::{Array1, ScalarOperand};
use thiserror::Error;

pub use num_traits::{Float, One, Zero};

/// Smallest grid that still has an interior point between two boundaries.
pub const MIN_GRID_LEN: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("grid has {0} points, at least 3 are required")]
    TooSmall(usize),
    #[error("grid is not strictly increasing at index {0}")]
    NotIncreasing(usize),
    #[error("grid spacing is not uniform at index {0}")]
    NonUniform(usize),
}

/// Ordered set of candidate parameter values (the "pbins") over which a
/// distribution is tracked.
///
/// The spacing between neighbours is uniform; the diffusion step relies on
/// a single `step()` for the whole grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    bins: Array1<T>,
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> Grid<T> {
    /// Validate and wrap a list of grid values.
    pub fn new(bins: Array1<T>) -> Result<Self, GridError> {
        if bins.len() < MIN_GRID_LEN {
            return Err(GridError::TooSmall(bins.len()));
        }
        let step = bins[1] - bins[0];
        if !(step > T::zero()) {
            return Err(GridError::NotIncreasing(1));
        }
        // Float grids written out as decimals never line up exactly.
        let tolerance = step * T::from(1e-6).unwrap_or_else(T::epsilon);
        for i in 1..bins.len() {
            let d = bins[i] - bins[i - 1];
            if !(d > T::zero()) {
                return Err(GridError::NotIncreasing(i));
            }
            if (d - step).abs() > tolerance {
                return Err(GridError::NonUniform(i));
            }
        }
        Ok(Grid { bins })
    }

    /// `count` points starting at `start`, `step` apart.
    pub fn uniform(start: T, step: T, count: usize) -> Result<Self, GridError> {
        let bins = Array1::from_iter((0..count).map(|i| {
            let i = T::from(i).unwrap_or_else(T::nan);
            start + step * i
        }));
        Self::new(bins)
    }

    /// Grid spacing (dsigma).
    pub fn step(&self) -> T {
        self.bins[1] - self.bins[0]
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn values(&self) -> &Array1<T> {
        &self.bins
    }

    /// Index of the grid point closest to `value`. Ties go to the lower index.
    pub fn nearest(&self, value: T) -> usize {
        let mut best = 0;
        let mut best_distance = (self.bins[0] - value).abs();
        for (i, &v) in self.bins.iter().enumerate().skip(1) {
            let distance = (v - value).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }
}

impl<T: Float + Copy + Sum + One + Zero + ScalarOperand> TryFrom<Vec<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(value: Vec<T>) -> Result<Self, Self::Error> {
        Grid::new(Array1::from_vec(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_one() {
        let grid = Grid::new(array![0.5, 1.0, 1.5, 2.0, 2.5]).expect("works");
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.step(), 0.5);
    }

    #[test]
    fn decimal_grid_is_uniform() {
        Grid::try_from(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]).expect("works");
        Grid::uniform(0.01_f64, 0.01, 300).expect("works");
    }

    #[test]
    fn too_small() {
        assert_eq!(Grid::new(array![1.0, 2.0]), Err(GridError::TooSmall(2)));
        assert_eq!(
            Grid::<f64>::new(Array1::from_vec(vec![])),
            Err(GridError::TooSmall(0))
        );
    }

    #[test]
    fn not_increasing() {
        assert_eq!(
            Grid::new(array![3.0, 2.0, 1.0]),
            Err(GridError::NotIncreasing(1))
        );
        assert_eq!(
            Grid::new(array![1.0, 2.0, 2.0]),
            Err(GridError::NotIncreasing(2))
        );
    }

    #[test]
    fn non_uniform() {
        assert_eq!(
            Grid::new(array![1.0, 2.0, 3.0, 5.0]),
            Err(GridError::NonUniform(3))
        );
    }

    #[test]
    fn nearest_point() {
        let grid = Grid::uniform(1.0_f32, 1.0, 5).expect("works");
        assert_eq!(grid.nearest(-10.0), 0);
        assert_eq!(grid.nearest(2.9), 2);
        assert_eq!(grid.nearest(3.5), 2);
        assert_eq!(grid.nearest(100.0), 4);
    }
}
