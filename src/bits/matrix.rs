//! Occurrence bit matrix
//!
//! Rows are tree nodes, columns are partitions. A set cell means the
//! species at that node has data in that partition.

use bitvec::prelude::*;

use super::BitSet;

/// Dense row-major bit matrix.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    cells: BitVec,
}

impl BitMatrix {
    /// All-zero matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: bitvec![0; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Read a cell.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.offset(row, col)]
    }

    /// Write a cell.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let offset = self.offset(row, col);
        self.cells.set(offset, value);
    }

    /// `row(dst) = row(a) | row(b)`.
    pub fn row_or(&mut self, a: usize, b: usize, dst: usize) {
        for col in 0..self.cols {
            let value = self.get(a, col) || self.get(b, col);
            self.set(dst, col, value);
        }
    }

    /// Whether every column of `row` is set.
    pub fn row_full(&self, row: usize) -> bool {
        let start = row * self.cols;
        self.cells[start..start + self.cols].all()
    }

    /// Number of set cells in `col`.
    pub fn column_count(&self, col: usize) -> usize {
        (0..self.rows).filter(|&row| self.get(row, col)).count()
    }

    /// Rows set in `col`, as a bit set over row indices.
    pub fn column(&self, col: usize) -> BitSet {
        BitSet::from_indices(self.rows, (0..self.rows).filter(|&row| self.get(row, col)))
    }

    /// New matrix keeping only `cols`, in the given order.
    pub fn select_columns(&self, cols: &[usize]) -> BitMatrix {
        let mut result = BitMatrix::new(self.rows, cols.len());
        for row in 0..self.rows {
            for (new_col, &col) in cols.iter().enumerate() {
                if self.get(row, col) {
                    result.set(row, new_col, true);
                }
            }
        }
        result
    }
}

impl std::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BitMatrix {}x{}", self.rows, self.cols)?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}", u8::from(self.get(row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_cells() {
        let mut matrix = BitMatrix::new(3, 2);
        matrix.set(2, 1, true);
        assert!(matrix.get(2, 1));
        assert!(!matrix.get(2, 0));
        matrix.set(2, 1, false);
        assert!(!matrix.get(2, 1));
    }

    #[test]
    fn row_or_aggregates_children() {
        let mut matrix = BitMatrix::new(3, 3);
        matrix.set(1, 0, true);
        matrix.set(2, 2, true);
        matrix.row_or(1, 2, 0);
        assert!(matrix.get(0, 0));
        assert!(!matrix.get(0, 1));
        assert!(matrix.get(0, 2));
    }

    #[test]
    fn full_rows_and_column_counts() {
        let mut matrix = BitMatrix::new(2, 3);
        for col in 0..3 {
            matrix.set(1, col, true);
        }
        matrix.set(0, 2, true);
        assert!(matrix.row_full(1));
        assert!(!matrix.row_full(0));
        assert_eq!(matrix.column_count(2), 2);
        assert_eq!(matrix.column(0).iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn select_columns_keeps_order() {
        let mut matrix = BitMatrix::new(2, 3);
        matrix.set(0, 0, true);
        matrix.set(1, 2, true);
        let selected = matrix.select_columns(&[2, 0]);
        assert_eq!(selected.cols(), 2);
        assert!(selected.get(1, 0));
        assert!(selected.get(0, 1));
        assert!(!selected.get(0, 0));
    }
}
