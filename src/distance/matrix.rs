//! Dense travel-time matrix.

use crate::error::ConfigError;

/// A dense n×n travel-time matrix stored in row-major order.
///
/// Values are travel times in minutes from row location to column location.
/// The matrix may be asymmetric: `get(i, j)` need not equal `get(j, i)`.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
///
/// let tt = TravelTimeMatrix::from_rows(&[
///     vec![0.0, 5.0, 8.0],
///     vec![6.0, 0.0, 3.0],
///     vec![8.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(tt.get(0, 1), 5.0);
/// assert_eq!(tt.get(1, 0), 6.0);
/// assert_eq!(tt.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TravelTimeMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit row-major n×n grid.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        if data.len() != size * size {
            return Err(ConfigError::MatrixSizeMismatch {
                size,
                len: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Creates a matrix from nested rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(ConfigError::MatrixNotSquare {
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self { data, size })
    }

    /// Returns a copy with every entry multiplied by `factor`.
    ///
    /// Use `scaled(1.0 / 60.0)` to convert a seconds matrix to minutes.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            data: self.data.iter().map(|v| v * factor).collect(),
            size: self.size,
        }
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, time: f64) {
        self.data[from * self.size + to] = time;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `id` is a valid location index.
    pub fn contains(&self, id: usize) -> bool {
        id < self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Travel time along `depot → path[0] → … → path[n-1] → depot`.
    ///
    /// An empty path costs nothing: an empty route is never driven.
    pub fn closed_path_time(&self, depot: usize, path: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            return 0.0;
        };
        let mut time = self.get(depot, first);
        for w in path.windows(2) {
            time += self.get(w[0], w[1]);
        }
        time + self.get(last, depot)
    }
}
