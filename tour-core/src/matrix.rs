//! Dense square tables indexed by waypoint.
//!
//! [`Matrix`] is the generic row-major container. [`CostMatrix`] adds the
//! validation every solver relies on: costs are never negative or NaN and
//! `f64::INFINITY` marks an edge that is unknown or not allowed.

use geo::LineString;
use thiserror::Error;

use crate::oracle::{FetchError, RouteLeg};

/// Path geometry for each directed pair, parallel to a [`CostMatrix`].
pub type GeometryMatrix = Matrix<Option<LineString<f64>>>;

/// Raw oracle answers for each directed pair.
pub type LegMatrix = Matrix<Option<RouteLeg>>;

/// Errors raised while building or validating matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No waypoints were supplied.
    #[error("at least one waypoint is required")]
    EmptyInput,
    /// A row does not have one cell per row.
    #[error("row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows in the matrix.
        expected: usize,
        /// Number of cells found.
        actual: usize,
    },
    /// A cell holds a negative or NaN cost.
    #[error("cell ({from}, {to}) holds invalid cost {value}")]
    InvalidCost {
        /// Row of the cell.
        from: usize,
        /// Column of the cell.
        to: usize,
        /// Rejected value.
        value: f64,
    },
    /// Two matrices that must be parallel disagree in size.
    #[error("matrix has {actual} rows, expected {expected}")]
    SizeMismatch {
        /// Required size.
        expected: usize,
        /// Size found.
        actual: usize,
    },
    /// A leg could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The build was cancelled before every cell was filled.
    #[error("matrix build was cancelled")]
    Cancelled,
}

/// Row-major `size x size` table.
///
/// # Examples
///
/// ```
/// use tour_core::Matrix;
///
/// let mut m = Matrix::filled(2, 0_u8);
/// assert!(m.set(0, 1, 7));
/// assert_eq!(m.get(0, 1), Some(&7));
/// assert_eq!(m.get(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> Matrix<T> {
    /// Create a matrix with every cell set to `value`.
    #[must_use]
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }
}

impl<T> Matrix<T> {
    /// Build a matrix by evaluating `cell` for each `(from, to)` pair.
    #[must_use]
    pub fn from_fn(size: usize, mut cell: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                cells.push(cell(from, to));
            }
        }
        Self { size, cells }
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] when any row length differs from
    /// the number of rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    expected: size,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Borrow the cell at `(from, to)`.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<&T> {
        self.offset(from, to).and_then(|idx| self.cells.get(idx))
    }

    /// Mutably borrow the cell at `(from, to)`.
    pub fn get_mut(&mut self, from: usize, to: usize) -> Option<&mut T> {
        self.offset(from, to).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Overwrite the cell at `(from, to)`, returning `false` when out of
    /// range.
    pub fn set(&mut self, from: usize, to: usize, value: T) -> bool {
        self.get_mut(from, to).map(|cell| *cell = value).is_some()
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Apply `f` to every cell, keeping positions.
    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Matrix<U> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (from, row) in self.rows().enumerate() {
            for (to, value) in row.iter().enumerate() {
                cells.push(f(from, to, value));
            }
        }
        Matrix {
            size: self.size,
            cells,
        }
    }

    const fn offset(&self, from: usize, to: usize) -> Option<usize> {
        if from < self.size && to < self.size {
            Some(from * self.size + to)
        } else {
            None
        }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Matrix<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Matrix<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

/// Validated asymmetric travel costs.
///
/// Off-diagonal cells are non-negative and never NaN; `f64::INFINITY`
/// marks an edge that must not be used. The diagonal is ignored.
///
/// # Examples
///
/// ```
/// use tour_core::CostMatrix;
///
/// # fn main() -> Result<(), tour_core::MatrixError> {
/// let costs = CostMatrix::from_rows(vec![
///     vec![0.0, 4.0],
///     vec![f64::INFINITY, 0.0],
/// ])?;
/// assert_eq!(costs.cost(0, 1), 4.0);
/// assert!(costs.cost(1, 0).is_infinite());
/// assert!(costs.cost(0, 9).is_infinite());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    inner: Matrix<f64>,
}

impl CostMatrix {
    /// Validate an existing matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidCost`] for the first off-diagonal cell
    /// that is negative or NaN.
    pub fn new(inner: Matrix<f64>) -> Result<Self, MatrixError> {
        for (from, row) in inner.rows().enumerate() {
            for (to, &value) in row.iter().enumerate() {
                if from != to && !is_valid_cost(value) {
                    return Err(MatrixError::InvalidCost { from, to, value });
                }
            }
        }
        Ok(Self { inner })
    }

    /// Build from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] or [`MatrixError::InvalidCost`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        Self::new(Matrix::from_rows(rows)?)
    }

    /// A matrix where every off-diagonal edge is unknown.
    #[must_use]
    pub fn unreachable(size: usize) -> Self {
        Self {
            inner: Matrix::from_fn(size, |from, to| if from == to { 0.0 } else { f64::INFINITY }),
        }
    }

    /// Number of waypoints.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.inner.size()
    }

    /// Cost of travelling `from -> to`; infinite when out of range.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.inner.get(from, to).copied().unwrap_or(f64::INFINITY)
    }

    /// Record a cost, returning `false` when the value or position is
    /// invalid.
    pub fn set_cost(&mut self, from: usize, to: usize, value: f64) -> bool {
        (from == to || is_valid_cost(value)) && self.inner.set(from, to, value)
    }

    /// Borrow the underlying table.
    #[must_use]
    pub const fn as_matrix(&self) -> &Matrix<f64> {
        &self.inner
    }
}

fn is_valid_cost(value: f64) -> bool {
    !value.is_nan() && value >= 0.0
}
