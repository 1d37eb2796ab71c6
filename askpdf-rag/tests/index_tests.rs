//! Property tests for flat-index search ordering.

use askpdf_rag::index::FlatIndex;
use proptest::prelude::*;

/// Generate an embedding with components in a bounded range.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
}

/// For any non-empty set of stored vectors and any query, search
/// returns at most `k` neighbors, ordered by ascending squared-L2
/// distance, with ties resolved toward the lower stored index.
mod prop_flat_search_ordering {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ascending_and_bounded_by_k(
            matrix in proptest::collection::vec(arb_embedding(DIM), 1..24),
            query in arb_embedding(DIM),
            k in 1usize..30,
        ) {
            let index = FlatIndex::build(&matrix).unwrap();
            let neighbors = index.search(&query, k).unwrap();

            prop_assert!(neighbors.len() <= k);
            prop_assert!(neighbors.len() <= matrix.len());
            prop_assert_eq!(neighbors.len(), k.min(matrix.len()));

            for window in neighbors.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "distances not ascending: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
                if window[0].distance == window[1].distance {
                    prop_assert!(window[0].index < window[1].index, "tie not stable");
                }
            }
        }

        #[test]
        fn every_neighbor_points_at_a_stored_vector(
            matrix in proptest::collection::vec(arb_embedding(DIM), 1..24),
            query in arb_embedding(DIM),
        ) {
            let index = FlatIndex::build(&matrix).unwrap();
            let neighbors = index.search(&query, matrix.len()).unwrap();

            for neighbor in &neighbors {
                prop_assert!(neighbor.index < matrix.len());
                prop_assert!(neighbor.distance >= 0.0);
            }
        }
    }
}

#[test]
fn identical_vector_has_distance_zero() {
    let matrix = vec![vec![0.5, -0.5, 0.25], vec![1.0, 1.0, 1.0]];
    let index = FlatIndex::build(&matrix).unwrap();
    let neighbors = index.search(&[0.5, -0.5, 0.25], 1).unwrap();

    assert_eq!(neighbors[0].index, 0);
    assert_eq!(neighbors[0].distance, 0.0);
}

#[test]
fn index_size_matches_input_rows() {
    let matrix: Vec<Vec<f32>> = (0..7).map(|i| vec![i as f32, 0.0]).collect();
    let index = FlatIndex::build(&matrix).unwrap();
    assert_eq!(index.len(), 7);
    assert_eq!(index.dimensions(), 2);
}
