// src/matrix/bit_matrix.rs

use std::fmt;

use crate::error::{QsError, QsResult};

// Bits per storage word.
const WORD_SIZE: usize = 32;
// Shift to turn a column index into a word index.
const WORD_SHIFT: usize = 5;
// Mask to turn a column index into a displacement within a word.
const DISPLACEMENT_MASK: usize = 31;

/// Dense matrix over GF(2), packed row-major into 32-bit words.
///
/// The bit at (r, c) lives in word c / 32 of row r, at bit position c % 32;
/// all access goes through `get`/`set`. The packing is not only a space
/// optimization: exponent parities must be solved exactly in base 2, since
/// an integer or floating-point matrix accumulates rounding that silently
/// corrupts the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    columns: usize,
    m: Vec<Vec<u32>>,
}

impl BitMatrix {
    /// A zeroed matrix. Both dimensions must be at least 1.
    pub fn new(rows: usize, columns: usize) -> QsResult<Self> {
        if rows < 1 || columns < 1 {
            return Err(QsError::InvalidArgument(format!(
                "matrix dimensions must be positive: {} x {}",
                rows, columns
            )));
        }
        Ok(Self::zeroed(rows, columns))
    }

    fn zeroed(rows: usize, columns: usize) -> Self {
        // Smallest word count w with 32 * w >= columns.
        let word_columns = columns.div_ceil(WORD_SIZE);
        BitMatrix {
            rows,
            columns,
            m: vec![vec![0u32; word_columns]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn word_columns(&self) -> usize {
        self.m[0].len()
    }

    /// The bit at (row, column), as 0 or 1.
    pub fn get(&self, row: usize, column: usize) -> u32 {
        debug_assert!(row < self.rows && column < self.columns);
        let word = self.m[row][column >> WORD_SHIFT];
        (word >> (column & DISPLACEMENT_MASK)) & 1
    }

    /// Sets the bit at (row, column) to value & 1.
    pub fn set(&mut self, row: usize, column: usize, value: u32) {
        debug_assert!(row < self.rows && column < self.columns);
        let mask = 1u32 << (column & DISPLACEMENT_MASK);
        let word = &mut self.m[row][column >> WORD_SHIFT];
        if value & 1 == 0 {
            *word &= !mask;
        } else {
            *word |= mask;
        }
    }

    /// Returns a new matrix which is the transpose of this one.
    pub fn transpose(&self) -> BitMatrix {
        let mut result = Self::zeroed(self.columns, self.rows);
        for i in 0..self.rows {
            for j in 0..self.columns {
                result.set(j, i, self.get(i, j));
            }
        }
        result
    }

    /// Exchanges the bits of two rows in columns [first_column, columns).
    /// Word-wise, with a mask for the partially-touched leading word.
    pub fn exchange_rows(&mut self, first_row: usize, second_row: usize, first_column: usize) {
        if first_row == second_row {
            return;
        }

        let word_column = first_column >> WORD_SHIFT;
        let mask = u32::MAX << (first_column & DISPLACEMENT_MASK);

        let first_word = self.m[first_row][word_column];
        let second_word = self.m[second_row][word_column];
        self.m[first_row][word_column] = (first_word & !mask) | (second_word & mask);
        self.m[second_row][word_column] = (second_word & !mask) | (first_word & mask);

        for i in word_column + 1..self.word_columns() {
            let temp = self.m[first_row][i];
            self.m[first_row][i] = self.m[second_row][i];
            self.m[second_row][i] = temp;
        }
    }

    /// Adds the pivot row into `row_to_reduce` (XOR word-wise) if and only if
    /// the bit at (row_to_reduce, first_column) is 1. All columns before
    /// `first_column` must already be 0 in both rows.
    pub fn reduce_row(&mut self, pivot_row: usize, row_to_reduce: usize, first_column: usize) {
        if self.get(row_to_reduce, first_column) != 1 {
            return;
        }

        let word_column = first_column >> WORD_SHIFT;
        for i in word_column..self.word_columns() {
            let pivot_word = self.m[pivot_row][i];
            self.m[row_to_reduce][i] ^= pivot_word;
        }
    }

    /// Reduces the system to upper triangular form with full pivoting on the
    /// coefficient columns. The last column holds the independent terms and
    /// is never permuted. Returns the column permutation that was applied, as
    /// a map from current position to original variable position.
    fn reduce_to_upper_triangular(&mut self) -> Vec<usize> {
        let rows = self.rows;
        let max_column = self.columns - 1;

        let mut permutations: Vec<usize> = (0..max_column).collect();

        let mut current_row = 0;
        let mut current_column = 0;
        while current_row < rows && current_column < max_column {
            // Find a pivot: the first (row, column) pair holding a 1.
            let mut pivot = None;
            'search: for i in current_row..rows {
                for j in current_column..max_column {
                    if self.get(i, j) == 1 {
                        pivot = Some((i, j));
                        break 'search;
                    }
                }
            }

            // No pivot means the rest of the system is all zero.
            let (pivot_row, pivot_column) = match pivot {
                Some(pivot) => pivot,
                None => break,
            };

            if pivot_row != current_row {
                self.exchange_rows(pivot_row, current_row, current_column);
            }

            if pivot_column != current_column {
                for k in 0..rows {
                    let temp = self.get(k, current_column);
                    self.set(k, current_column, self.get(k, pivot_column));
                    self.set(k, pivot_column, temp);
                }
                permutations.swap(current_column, pivot_column);
            }

            for i in current_row + 1..rows {
                self.reduce_row(current_row, i, current_column);
            }

            current_row += 1;
            current_column += 1;
        }

        permutations
    }

    /// Solves the linear system modulo 2, destructively.
    ///
    /// The matrix is the augmented system: coefficient columns [0, columns-1)
    /// and the independent terms in the last column. Variables left free by
    /// the reduction take their values from `indeterminates` (a column
    /// vector; missing entries default to 0), which makes it possible to walk
    /// different solutions of the same system. The returned (columns - 1) x 1
    /// vector is reported in the original variable order.
    pub fn solve(&mut self, indeterminates: &BitMatrix) -> QsResult<BitMatrix> {
        if self.columns < 2 {
            return Err(QsError::InvalidArgument(
                "augmented system needs at least one coefficient column".to_string(),
            ));
        }

        let mut permutations = self.reduce_to_upper_triangular();

        let rows = self.rows;
        let columns = self.columns;

        // The rank of the augmented system must not exceed the rank of the
        // coefficient system. For the homogeneous systems built from parity
        // data the last column is zero and this can never fire.
        let mut range = 0;
        for i in 0..rows.min(columns - 1) {
            if self.get(i, i) != 0 {
                range += 1;
            }
        }
        for i in range..rows {
            if self.get(i, columns - 1) == 1 {
                return Err(QsError::Inconsistent);
            }
        }

        // Initialize the free variables from the indeterminates parameter.
        let mut result = Self::zeroed(columns - 1, 1);
        for i in range..columns - 1 {
            let value = if i - range < indeterminates.rows() {
                indeterminates.get(i - range, 0)
            } else {
                0
            };
            result.set(i, 0, value);
        }

        // Back-substitution through the triangular part. With a pivot of 1,
        // each equation solves as x = c ^ (sum of the later terms).
        for i in (0..range).rev() {
            let mut other_factors = 0u32;
            for j in i + 1..columns - 1 {
                other_factors ^= self.get(i, j) & result.get(j, 0);
            }
            result.set(i, 0, self.get(i, columns - 1) ^ other_factors);
        }

        // Undo the column permutation to report variables in their original
        // indexing.
        for new_position in 0..columns - 1 {
            let old_position = match permutations.iter().position(|&k| k == new_position) {
                Some(position) => position,
                None => continue,
            };

            if new_position != old_position {
                let temp = result.get(old_position, 0);
                result.set(old_position, 0, result.get(new_position, 0));
                result.set(new_position, 0, temp);
                permutations.swap(old_position, new_position);
            }
        }

        Ok(result)
    }

    /// Parses the representation produced by `Display`. Empty splits are
    /// ignored; every row must have the same width and contain only the
    /// characters 0 and 1.
    pub fn from_string(s: &str) -> QsResult<Self> {
        let splits: Vec<&str> = s
            .split(|c: char| c == '[' || c == ']' || c.is_whitespace())
            .filter(|split| !split.is_empty())
            .collect();

        if splits.is_empty() {
            return Err(QsError::parse("the number of rows is 0"));
        }

        let rows = splits.len();
        let columns = splits[0].len();
        for (i, split) in splits.iter().enumerate() {
            if split.len() != columns {
                return Err(QsError::parse(format!(
                    "row {} does not have the same length",
                    i
                )));
            }
        }

        let mut result = BitMatrix::new(rows, columns)?;
        for (i, split) in splits.iter().enumerate() {
            for (j, c) in split.chars().enumerate() {
                match c {
                    '0' => result.set(i, j, 0),
                    '1' => result.set(i, j, 1),
                    _ => {
                        return Err(QsError::parse_at(
                            format!("row {} contains an invalid character: {:?}", i, c),
                            j as i64,
                        ));
                    }
                }
            }
        }

        Ok(result)
    }
}

impl fmt::Display for BitMatrix {
    /// A 3 x 4 matrix renders as `[0010]\n[1100]\n[0011]\n`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.rows {
            write!(f, "[")?;
            for j in 0..self.columns {
                write!(f, "{}", self.get(i, j))?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
