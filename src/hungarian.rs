//! Kuhn-Munkres labeling method for maximum weight bipartite matching.
//!
//! Rows of the weight matrix are existing tracks and columns are the
//! detections of the current frame. The solver always runs with the smaller
//! side on the left and maps the result back, so callers only ever see the
//! assignment in their own row/column orientation.

use log::debug;
use pathfinding::matrix::Matrix;

use crate::error::AssignmentError;

/// Largest supported number of rows or columns.
pub const MAX_SIZE: usize = 8192;

const INF: i64 = i64::MAX;

/// Outcome of a successful solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    row_to_column: Vec<Option<usize>>,
    columns: usize,
    matched: usize,
}

impl Assignment {
    /// Column matched to `row`, `None` when the row is unmatched or out of range.
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.row_to_column.get(row).copied().flatten()
    }

    /// Row matched to `column`, derived from the row mapping.
    pub fn row_for(&self, column: usize) -> Option<usize> {
        self.row_to_column
            .iter()
            .position(|&matched| matched == Some(column))
    }

    /// Per row matched column, in row order.
    pub fn row_to_column(&self) -> &[Option<usize>] {
        &self.row_to_column
    }

    /// Per column matched row, in column order.
    pub fn column_to_row(&self) -> Vec<Option<usize>> {
        let mut column_to_row = vec![None; self.columns];
        for (row, column) in self.pairs() {
            column_to_row[column] = Some(row);
        }
        column_to_row
    }

    /// Matched `(row, column)` pairs in ascending row order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_to_column
            .iter()
            .enumerate()
            .filter_map(|(row, &column)| column.map(|column| (row, column)))
    }

    /// Number of matched rows.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn rows(&self) -> usize {
        self.row_to_column.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Sum of the weights of all matched pairs.
    pub fn total_weight(&self, weights: &Matrix<i64>) -> i64 {
        self.pairs().map(|(row, column)| weights[(row, column)]).sum()
    }
}

/// Reusable solver. The workspace keeps its allocations between calls and
/// is fully reset at the start of every solve.
#[derive(Debug, Default)]
pub struct HungarianSolver {
    left_price: Vec<i64>,
    right_price: Vec<i64>,
    left_match: Vec<Option<usize>>,
    right_match: Vec<Option<usize>>,
    left_visited: Vec<bool>,
    right_visited: Vec<bool>,
    slack: Vec<i64>,
}

impl HungarianSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solves a weight matrix given as `rows` rows of `cols` entries each.
    pub fn solve(
        &mut self,
        cost: &[Vec<i64>],
        rows: usize,
        cols: usize,
    ) -> Result<Assignment, AssignmentError> {
        check_dimensions(rows, cols)?;
        if cost.len() != rows || cost.iter().any(|row| row.len() != cols) {
            return Err(AssignmentError::InvalidDimensions {
                rows: cost.len(),
                cols: cost.first().map_or(0, Vec::len),
                max: MAX_SIZE,
            });
        }

        let mut weights = Matrix::new(rows, cols, 0);
        for (i, row) in cost.iter().enumerate() {
            for (j, &weight) in row.iter().enumerate() {
                weights[(i, j)] = weight;
            }
        }
        self.solve_matrix(&weights)
    }

    /// Solves a weight matrix, maximizing the total weight of the matching.
    pub fn solve_matrix(&mut self, weights: &Matrix<i64>) -> Result<Assignment, AssignmentError> {
        check_dimensions(weights.rows, weights.columns)?;

        let transpose = weights.rows > weights.columns;
        let transposed;
        let left_major = if transpose {
            transposed = weights.transposed();
            &transposed
        } else {
            weights
        };

        self.reset(left_major);
        for left in 0..left_major.rows {
            self.associate(left_major, left)?;
        }

        let mut row_to_column = vec![None; weights.rows];
        if transpose {
            // left nodes are the original columns
            for (column, &row) in self.left_match.iter().enumerate() {
                if let Some(row) = row {
                    row_to_column[row] = Some(column);
                }
            }
        } else {
            row_to_column.copy_from_slice(&self.left_match);
        }
        let matched = row_to_column.iter().flatten().count();

        Ok(Assignment {
            row_to_column,
            columns: weights.columns,
            matched,
        })
    }

    fn reset(&mut self, weights: &Matrix<i64>) {
        let (rows, cols) = (weights.rows, weights.columns);

        self.left_price.clear();
        self.left_price.extend((0..rows).map(|i| {
            (0..cols)
                .map(|j| weights[(i, j)])
                .max()
                .unwrap_or_default()
        }));
        self.right_price.clear();
        self.right_price.resize(cols, 0);

        self.left_match.clear();
        self.left_match.resize(rows, None);
        self.right_match.clear();
        self.right_match.resize(cols, None);

        self.left_visited.clear();
        self.left_visited.resize(rows, false);
        self.right_visited.clear();
        self.right_visited.resize(cols, false);

        self.slack.clear();
        self.slack.resize(cols, INF);
    }

    /// Grows the matching by `left`, lowering prices until a tight
    /// augmenting path shows up.
    fn associate(&mut self, weights: &Matrix<i64>, left: usize) -> Result<(), AssignmentError> {
        loop {
            self.left_visited.fill(false);
            self.right_visited.fill(false);
            self.slack.fill(INF);

            if self.augment(weights, left) {
                return Ok(());
            }

            let mut delta = INF;
            for (right, &slack) in self.slack.iter().enumerate() {
                if !self.right_visited[right] && slack < delta {
                    delta = slack;
                }
            }
            if delta == INF {
                debug!("kuhn-munkres found no price reduction for row {left}");
                return Err(AssignmentError::Infeasible { row: left });
            }

            for (price, _) in self
                .left_price
                .iter_mut()
                .zip(&self.left_visited)
                .filter(|(_, visited)| **visited)
            {
                *price -= delta;
            }
            for (price, _) in self
                .right_price
                .iter_mut()
                .zip(&self.right_visited)
                .filter(|(_, visited)| **visited)
            {
                *price += delta;
            }
        }
    }

    fn augment(&mut self, weights: &Matrix<i64>, left: usize) -> bool {
        self.left_visited[left] = true;
        for right in 0..weights.columns {
            if self.right_visited[right] {
                continue;
            }
            let gap = self.left_price[left] + self.right_price[right] - weights[(left, right)];
            if gap == 0 {
                self.right_visited[right] = true;
                let free = match self.right_match[right] {
                    None => true,
                    Some(other) => self.augment(weights, other),
                };
                if free {
                    self.right_match[right] = Some(left);
                    self.left_match[left] = Some(right);
                    return true;
                }
            } else if gap < self.slack[right] {
                self.slack[right] = gap;
            }
        }
        false
    }
}

/// Solves with a call scoped workspace.
pub fn solve(cost: &[Vec<i64>], rows: usize, cols: usize) -> Result<Assignment, AssignmentError> {
    HungarianSolver::new().solve(cost, rows, cols)
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), AssignmentError> {
    if !(1..=MAX_SIZE).contains(&rows) || !(1..=MAX_SIZE).contains(&cols) {
        return Err(AssignmentError::InvalidDimensions {
            rows,
            cols,
            max: MAX_SIZE,
        });
    }
    Ok(())
}
