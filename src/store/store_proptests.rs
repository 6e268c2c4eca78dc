use super::*;
use proptest::prelude::*;

proptest! {
    /// Any touch sequence leaves the store hole-free below the high-water
    /// mark: every lower row is materialized with the full width.
    #[test]
    fn touching_never_leaves_holes(
        touches in proptest::collection::vec(0usize..200, 1..40),
        block_size in 1usize..9,
    ) {
        let mut m = BlockMatrix::with_block_size(3, block_size).unwrap();
        let mut high = 0usize;
        for &t in &touches {
            m.row_mut(t);
            high = high.max(t);
        }

        prop_assert_eq!(m.n_rows(), high + 1);
        for k in 0..=high {
            let row = m.row(k).unwrap();
            prop_assert_eq!(row.len(), 3);
        }
        prop_assert!(m.row(high + 1).is_err());
    }

    /// Writes land where they were addressed regardless of block geometry.
    #[test]
    fn block_addressing_is_transparent(
        row in 0usize..150,
        col in 0usize..4,
        block_size in 1usize..9,
        value in -1e6f64..1e6,
    ) {
        let mut m = BlockMatrix::with_block_size(4, block_size).unwrap();
        m.set(row, col, value).unwrap();
        prop_assert_eq!(m.get(row, col).unwrap(), value);
        prop_assert_eq!(m.row(row).unwrap()[col], value);
    }
}
