use super::*;

#[test]
fn test_new_rejects_zero_cols() {
    assert!(BlockMatrix::new(0).is_err());
    assert!(BlockMatrix::with_block_size(3, 0).is_err());
}

#[test]
fn test_empty_store_shape() {
    let m = BlockMatrix::new(4).unwrap();
    assert_eq!(m.n_rows(), 0);
    assert_eq!(m.n_cols(), 4);
    assert_eq!(m.block_size(), DEFAULT_BLOCK_SIZE);
    assert!(m.row(0).is_err());
}

#[test]
fn test_lazy_growth_materializes_every_lower_row() {
    let mut m = BlockMatrix::with_block_size(4, 3).unwrap();
    m.row_mut(7)[2] = 1.5;

    assert_eq!(m.n_rows(), 8);
    for k in 0..8 {
        let row = m.row(k).unwrap();
        assert_eq!(row.len(), 4);
    }
    assert_eq!(m.get(7, 2).unwrap(), 1.5);
    // untouched rows stay zero-initialized
    assert_eq!(m.row(3).unwrap(), &[0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_extend_to_is_idempotent() {
    let mut m = BlockMatrix::with_block_size(2, 2).unwrap();
    m.extend_to(5);
    m.row_mut(5)[0] = 9.0;
    m.extend_to(5);
    m.extend_to(1);
    assert_eq!(m.n_rows(), 6);
    assert_eq!(m.get(5, 0).unwrap(), 9.0);
}

#[test]
fn test_rows_spanning_block_boundary() {
    let mut m = BlockMatrix::with_block_size(3, 2).unwrap();
    for i in 0..5 {
        m.row_mut(i)[0] = i as f64;
    }
    for i in 0..5 {
        assert_eq!(m.get(i, 0).unwrap(), i as f64);
    }
    assert_eq!(m.n_rows(), 5);
}

#[test]
fn test_row_mut_aliases_storage() {
    let mut m = BlockMatrix::new(3).unwrap();
    m.row_mut(2)[1] = 7.0;
    assert_eq!(m.get(2, 1).unwrap(), 7.0);
    assert_eq!(m.row(2).unwrap()[1], 7.0);
}

#[test]
fn test_get_set_checked() {
    let mut m = BlockMatrix::new(2).unwrap();
    m.set(4, 1, 3.0).unwrap();
    assert_eq!(m.n_rows(), 5);
    assert_eq!(m.get(4, 1).unwrap(), 3.0);

    assert!(m.set(0, 2, 1.0).is_err());
    assert!(m.get(0, 2).is_err());
    assert!(m.get(5, 0).is_err());
}

#[test]
fn test_quick_access_extends_rows() {
    let mut m = BlockMatrix::with_block_size(2, 1).unwrap();
    m.set_quick(3, 1, 2.0);
    assert_eq!(m.n_rows(), 4);
    assert_eq!(m.get_quick(3, 1), 2.0);
    // reading a fresh row through the quick path also extends
    assert_eq!(m.get_quick(9, 0), 0.0);
    assert_eq!(m.n_rows(), 10);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_set_quick_enforces_column_bound() {
    let mut m = BlockMatrix::new(2).unwrap();
    m.set_quick(0, 2, 1.0);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_get_quick_enforces_column_bound() {
    let mut m = BlockMatrix::new(2).unwrap();
    m.get_quick(0, 5);
}

#[test]
fn test_assign_row() {
    let mut m = BlockMatrix::new(3).unwrap();
    m.extend_to(1);
    m.assign_row(1, &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(m.row(1).unwrap(), &[1.0, 2.0, 3.0]);

    // width mismatch and unmaterialized rows are rejected
    assert!(m.assign_row(1, &[1.0]).is_err());
    assert!(m.assign_row(9, &[1.0, 2.0, 3.0]).is_err());
}

#[test]
fn test_column_view_reads_rows() {
    let mut m = BlockMatrix::with_block_size(2, 2).unwrap();
    m.row_mut(0)[1] = 1.0;
    m.row_mut(1)[1] = 2.0;
    m.row_mut(2)[1] = 3.0;

    let col = m.column(1).unwrap();
    assert_eq!(col.len(), 3);
    assert!(!col.is_empty());
    assert_eq!(col.get(1).unwrap(), 2.0);
    let values: Vec<f64> = col.iter().collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);

    assert!(m.column(2).is_err());
}

#[test]
fn test_column_mut_aliases_storage() {
    let mut m = BlockMatrix::with_block_size(2, 2).unwrap();
    m.row_mut(1)[0] = 5.0;
    {
        let mut col = m.column_mut(0).unwrap();
        assert_eq!(col.get(1).unwrap(), 5.0);
        col.set(1, 6.0);
        // writing past the high-water mark extends the store
        col.set(4, 8.0);
        assert_eq!(col.len(), 5);
    }
    assert_eq!(m.get(1, 0).unwrap(), 6.0);
    assert_eq!(m.get(4, 0).unwrap(), 8.0);
    assert_eq!(m.n_rows(), 5);
}

#[test]
fn test_like_copies_shape_not_values() {
    let mut m = BlockMatrix::with_block_size(3, 2).unwrap();
    m.row_mut(4)[1] = 1.0;

    let fresh = m.like();
    assert_eq!(fresh.n_rows(), m.n_rows());
    assert_eq!(fresh.n_cols(), 3);
    assert_eq!(fresh.block_size(), 2);
    for k in 0..fresh.n_rows() {
        assert!(fresh.row(k).unwrap().iter().all(|&v| v == 0.0));
    }
}

#[test]
fn test_like_with_shape() {
    let m = BlockMatrix::with_block_size(3, 4).unwrap();
    let fresh = m.like_with_shape(6, 2).unwrap();
    assert_eq!(fresh.n_rows(), 6);
    assert_eq!(fresh.n_cols(), 2);
    assert_eq!(fresh.block_size(), 4);

    let empty = m.like_with_shape(0, 5).unwrap();
    assert_eq!(empty.n_rows(), 0);
    assert!(m.like_with_shape(2, 0).is_err());
}

#[test]
fn test_serde_round_trip_preserves_shape() {
    let mut m = BlockMatrix::with_block_size(2, 2).unwrap();
    m.row_mut(3)[1] = 4.5;

    let json = serde_json::to_string(&m).unwrap();
    let back: BlockMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}
