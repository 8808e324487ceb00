//! Proptest strategies for solver property tests.

use proptest::prelude::*;
use tour_core::CostMatrix;

/// Strategy for fully connected asymmetric matrices of `size` waypoints.
///
/// Costs are whole numbers so sums compare exactly.
pub fn finite_matrix(size: usize) -> impl Strategy<Value = CostMatrix> {
    proptest::collection::vec(1_u16..=100, size * size).prop_map(move |cells| {
        let rows = cells
            .chunks(size)
            .map(|row| row.iter().copied().map(f64::from).collect())
            .collect();
        CostMatrix::from_rows(rows).unwrap_or_else(|_| CostMatrix::unreachable(size))
    })
}

/// Strategy for matrices where roughly a third of the cells are missing.
pub fn sparse_matrix(size: usize) -> impl Strategy<Value = CostMatrix> {
    proptest::collection::vec(prop::option::weighted(0.7, 1_u16..=100), size * size).prop_map(
        move |cells| {
            let rows = cells
                .chunks(size)
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.map_or(f64::INFINITY, f64::from))
                        .collect()
                })
                .collect();
            CostMatrix::from_rows(rows).unwrap_or_else(|_| CostMatrix::unreachable(size))
        },
    )
}

/// Strategy pairing a size in `sizes` with a finite matrix of that size.
pub fn sized_finite_matrix(
    sizes: std::ops::RangeInclusive<usize>,
) -> impl Strategy<Value = (usize, CostMatrix)> {
    sizes.prop_flat_map(|size| (Just(size), finite_matrix(size)))
}
