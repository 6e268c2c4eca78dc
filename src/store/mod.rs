//! Growable block-dense storage for factor rows.
//!
//! [`BlockMatrix`] stores a matrix with a fixed column count and a lazily
//! growing row count. The goal is to store data nearly as densely as a plain
//! row-major matrix while still being able to add rows as new entity IDs
//! appear in a stream. Rows live in dense `block_size x cols` blocks keyed by
//! `row / block_size`, so memory is allocated in chunks rather than row by
//! row.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LatenteError, Result};

/// Default number of rows per allocated block.
pub const DEFAULT_BLOCK_SIZE: usize = 32;

/// A matrix with a fixed column count and a lazily growing row count.
///
/// Touching any row index materializes that row and every row below it
/// (blocks are allocated bottom-up, so there are never unallocated holes
/// under the high-water mark). Materialized rows are zero-initialized until
/// assigned.
///
/// # Examples
///
/// ```
/// use latente::store::BlockMatrix;
///
/// let mut m = BlockMatrix::new(3).expect("positive column count");
/// m.row_mut(5)[1] = 2.5;
/// assert_eq!(m.n_rows(), 6);
/// assert_eq!(m.row(2).expect("materialized").len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMatrix {
    blocks: HashMap<usize, Vec<f64>>,
    /// Number of allocated blocks; blocks `0..n_blocks` always exist.
    n_blocks: usize,
    rows: usize,
    cols: usize,
    block_size: usize,
}

impl BlockMatrix {
    /// Creates an empty store with the given row width and the default block
    /// size.
    ///
    /// # Errors
    ///
    /// Returns an error if `cols` is zero.
    pub fn new(cols: usize) -> Result<Self> {
        Self::with_block_size(cols, DEFAULT_BLOCK_SIZE)
    }

    /// Creates an empty store with an explicit block size.
    ///
    /// # Errors
    ///
    /// Returns an error if `cols` or `block_size` is zero.
    pub fn with_block_size(cols: usize, block_size: usize) -> Result<Self> {
        if cols == 0 {
            return Err(LatenteError::invalid_hyperparameter(
                "cols", 0.0, ">= 1",
            ));
        }
        if block_size == 0 {
            return Err(LatenteError::invalid_hyperparameter(
                "block_size", 0.0, ">= 1",
            ));
        }
        Ok(Self {
            blocks: HashMap::new(),
            n_blocks: 0,
            rows: 0,
            cols,
            block_size,
        })
    }

    /// Returns the number of materialized rows (high-water mark + 1).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the fixed row width.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Returns the configured rows-per-block chunk size.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Single choke point for growth: materializes every row up to and
    /// including `row`.
    ///
    /// Allocates every missing block at or below the owning block, each sized
    /// exactly `block_size * cols` and zero-initialized, then raises the row
    /// count to `max(rows, row + 1)`. Idempotent for already-covered rows.
    pub fn extend_to(&mut self, row: usize) {
        let last_block = row / self.block_size;
        while self.n_blocks <= last_block {
            self.blocks
                .insert(self.n_blocks, vec![0.0; self.block_size * self.cols]);
            self.n_blocks += 1;
        }
        if row >= self.rows {
            self.rows = row + 1;
        }
    }

    /// Returns a read view of a materialized row.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is past the high-water mark.
    pub fn row(&self, row: usize) -> Result<&[f64]> {
        if row >= self.rows {
            return Err(LatenteError::index_out_of_bounds(row, self.rows));
        }
        let offset = (row % self.block_size) * self.cols;
        let block = &self.blocks[&(row / self.block_size)];
        Ok(&block[offset..offset + self.cols])
    }

    /// Returns an aliased mutable view of a row, extending storage first so
    /// every index up to `row` becomes valid.
    ///
    /// This is the in-place update channel: mutations through the returned
    /// slice are visible through every other accessor.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        self.extend_to(row);
        let offset = (row % self.block_size) * self.cols;
        let cols = self.cols;
        let block = self
            .blocks
            .get_mut(&(row / self.block_size))
            .expect("extend_to allocates the owning block");
        &mut block[offset..offset + cols]
    }

    /// Bounds-checked element read.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is past the high-water mark or `col` is past
    /// the row width.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if col >= self.cols {
            return Err(LatenteError::index_out_of_bounds(col, self.cols));
        }
        if row >= self.rows {
            return Err(LatenteError::index_out_of_bounds(row, self.rows));
        }
        Ok(self.value_at(row, col))
    }

    /// Bounds-checked element write; the row index auto-extends.
    ///
    /// # Errors
    ///
    /// Returns an error if `col` is past the row width.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if col >= self.cols {
            return Err(LatenteError::index_out_of_bounds(col, self.cols));
        }
        self.row_mut(row)[col] = value;
        Ok(())
    }

    /// Element read after an implicit extend-to-row step.
    ///
    /// # Panics
    ///
    /// Panics if `col` is past the row width.
    pub fn get_quick(&mut self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "column {col} out of bounds (cols={})", self.cols);
        self.extend_to(row);
        self.value_at(row, col)
    }

    /// Element write after an implicit extend-to-row step.
    ///
    /// # Panics
    ///
    /// Panics if `col` is past the row width.
    pub fn set_quick(&mut self, row: usize, col: usize, value: f64) {
        assert!(col < self.cols, "column {col} out of bounds (cols={})", self.cols);
        self.row_mut(row)[col] = value;
    }

    /// Overwrites an existing row with the given values.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is past the high-water mark or the value
    /// width doesn't match the row width.
    pub fn assign_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        if row >= self.rows {
            return Err(LatenteError::index_out_of_bounds(row, self.rows));
        }
        if values.len() != self.cols {
            return Err(LatenteError::dimension_mismatch(
                "row width",
                self.cols,
                values.len(),
            ));
        }
        self.row_mut(row).copy_from_slice(values);
        Ok(())
    }

    /// Returns a read view of one column.
    ///
    /// # Errors
    ///
    /// Returns an error if `col` is past the row width.
    pub fn column(&self, col: usize) -> Result<Column<'_>> {
        if col >= self.cols {
            return Err(LatenteError::index_out_of_bounds(col, self.cols));
        }
        Ok(Column { store: self, col })
    }

    /// Returns an aliased mutable view of one column; writes through it are
    /// visible through the store and vice versa.
    ///
    /// # Errors
    ///
    /// Returns an error if `col` is past the row width.
    pub fn column_mut(&mut self, col: usize) -> Result<ColumnMut<'_>> {
        if col >= self.cols {
            return Err(LatenteError::index_out_of_bounds(col, self.cols));
        }
        Ok(ColumnMut { store: self, col })
    }

    /// Produces a fresh, empty store of the same kind and shape as the
    /// receiver (same width, block size, and materialized row count).
    #[must_use]
    pub fn like(&self) -> Self {
        let mut m = Self {
            blocks: HashMap::new(),
            n_blocks: 0,
            rows: 0,
            cols: self.cols,
            block_size: self.block_size,
        };
        if self.rows > 0 {
            m.extend_to(self.rows - 1);
        }
        m
    }

    /// Produces a fresh, empty store of the same kind and the given shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `cols` is zero.
    pub fn like_with_shape(&self, rows: usize, cols: usize) -> Result<Self> {
        let mut m = Self::with_block_size(cols, self.block_size)?;
        if rows > 0 {
            m.extend_to(rows - 1);
        }
        Ok(m)
    }

    fn value_at(&self, row: usize, col: usize) -> f64 {
        let offset = (row % self.block_size) * self.cols;
        self.blocks[&(row / self.block_size)][offset + col]
    }
}

/// Read-only aliased view of one column of a [`BlockMatrix`].
#[derive(Debug)]
pub struct Column<'a> {
    store: &'a BlockMatrix,
    col: usize,
}

impl Column<'_> {
    /// Number of materialized rows visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.rows
    }

    /// True when the store has no materialized rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.rows == 0
    }

    /// Bounds-checked read of the column entry at `row`.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is past the high-water mark.
    pub fn get(&self, row: usize) -> Result<f64> {
        self.store.get(row, self.col)
    }

    /// Iterates the column entries in row order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.store.rows).map(move |row| self.store.value_at(row, self.col))
    }
}

/// Mutable aliased view of one column of a [`BlockMatrix`].
#[derive(Debug)]
pub struct ColumnMut<'a> {
    store: &'a mut BlockMatrix,
    col: usize,
}

impl ColumnMut<'_> {
    /// Number of materialized rows visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.rows
    }

    /// True when the store has no materialized rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.rows == 0
    }

    /// Bounds-checked read of the column entry at `row`.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is past the high-water mark.
    pub fn get(&self, row: usize) -> Result<f64> {
        self.store.get(row, self.col)
    }

    /// Writes through to the store, extending it if `row` is new.
    pub fn set(&mut self, row: usize, value: f64) {
        self.store.set_quick(row, self.col, value);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "store_proptests.rs"]
mod proptests;
