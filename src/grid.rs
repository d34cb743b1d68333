use crate::error::{EngineError, Result};
use crate::utils::get_wrapping_index;
use itertools::Itertools;
use rand::Rng;
use std::ops::Range;

/// Square `size`×`size` field of concentrations, stored row-major in one flat buffer.
///
/// Adjacency is toroidal: row `-1` is row `size - 1`, and likewise for columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<f64>,
}

/// Min, max and mean over every cell of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Grid {
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    /// Every cell drawn independently and uniformly from `range`.
    pub fn random<R: Rng>(size: usize, range: Range<f64>, rng: &mut R) -> Self {
        let cells = (0..size * size)
            .map(|_| rng.gen_range(range.clone()))
            .collect();
        Self { size, cells }
    }

    /// Builds a grid from nested rows. Rows must be non-empty, equally long
    /// and as many as there are columns.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::config("grid has no rows"));
        }

        if let Some((row, len)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != size)
        {
            return Err(EngineError::config(format!(
                "grid is not square: row {} has {} cells, expected {}",
                row, len, size
            )));
        }

        Ok(Self {
            size,
            cells: rows.concat(),
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells
            .chunks_exact(self.size.max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.size + col] = value;
    }

    pub fn get_wrapping(&self, row: isize, col: isize) -> f64 {
        self.cells[get_wrapping_index(col, row, self.size, self.size)]
    }

    /// Four-neighbour discrete Laplacian at one cell, with wrap-around on both axes.
    pub fn laplacian_at(&self, row: usize, col: usize) -> f64 {
        let (r, c) = (row as isize, col as isize);

        self.get_wrapping(r - 1, c)
            + self.get_wrapping(r + 1, c)
            + self.get_wrapping(r, c - 1)
            + self.get_wrapping(r, c + 1)
            - 4.0 * self.get(row, col)
    }

    /// Laplacian of the whole grid. `self` is only read, so every cell sees the
    /// same pre-pass values.
    pub fn laplacian(&self) -> Grid {
        let mut out = Grid::filled(self.size, 0.0);
        for (row, col) in (0..self.size).cartesian_product(0..self.size) {
            out.set(row, col, self.laplacian_at(row, col));
        }
        out
    }

    /// Overwrites the square `[row - half_width, row + half_width)` ×
    /// `[col - half_width, col + half_width)` with `value`. The footprint is
    /// clipped to the grid rather than wrapped.
    pub fn fill_patch(&mut self, row: usize, col: usize, half_width: usize, value: f64) {
        let rows = row.saturating_sub(half_width)..(row + half_width).min(self.size);
        let cols = col.saturating_sub(half_width)..(col + half_width).min(self.size);

        for (r, c) in rows.cartesian_product(cols) {
            self.set(r, c, value);
        }
    }

    pub fn stats(&self) -> GridStats {
        let (min, max, sum) = self.cells.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &value| (min.min(value), max.max(value), sum + value),
        );
        let mean = if self.cells.is_empty() {
            0.0
        } else {
            sum / self.cells.len() as f64
        };

        GridStats { min, max, mean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_laplacian_of_constant_grid_is_zero() {
        for c in [0.0, 0.25, 0.5, 0.731, 1.0] {
            let grid = Grid::filled(7, c);
            let laplacian = grid.laplacian();
            assert_eq!(laplacian.size(), 7);
            assert!(laplacian.as_slice().iter().all(|v| v.abs() < 1e-12));
        }
    }

    #[test]
    fn test_laplacian_wraps_rows() {
        let n = 5;
        let mut grid = Grid::filled(n, 0.0);
        for col in 0..n {
            grid.set(n - 1, col, 1.0);
        }
        let laplacian = grid.laplacian();

        // the top row sees the bottom row as its upper neighbour
        for col in 0..n {
            assert_eq!(laplacian.get(0, col), 1.0);
        }

        let mut grid = Grid::filled(n, 0.0);
        for col in 0..n {
            grid.set(0, col, 1.0);
        }
        let laplacian = grid.laplacian();
        for col in 0..n {
            assert_eq!(laplacian.get(n - 1, col), 1.0);
        }
    }

    #[test]
    fn test_laplacian_wraps_columns() {
        let mut grid = Grid::filled(4, 0.0);
        grid.set(2, 3, 2.0);

        assert_eq!(grid.laplacian_at(2, 0), 2.0);
        assert_eq!(grid.laplacian_at(2, 3), -8.0);
        assert_eq!(grid.laplacian_at(2, 2), 2.0);
        assert_eq!(grid.laplacian_at(1, 3), 2.0);
        assert_eq!(grid.laplacian_at(3, 3), 2.0);
        assert_eq!(grid.laplacian_at(0, 0), 0.0);
    }

    #[test]
    fn test_fill_patch_is_clipped_at_edges() {
        let mut grid = Grid::filled(10, 0.0);
        grid.fill_patch(1, 8, 3, 0.5);

        for (row, col) in (0..10).cartesian_product(0..10) {
            let inside = row < 4 && col >= 5;
            let expected = if inside { 0.5 } else { 0.0 };
            assert_eq!(grid.get(row, col), expected, "cell ({}, {})", row, col);
        }
    }

    #[test]
    fn test_fill_patch_footprint() {
        let mut grid = Grid::filled(20, 0.0);
        grid.fill_patch(10, 10, 3, 1.0);

        let filled = grid.as_slice().iter().filter(|v| **v == 1.0).count();
        assert_eq!(filled, 36);
        assert_eq!(grid.get(7, 7), 1.0);
        assert_eq!(grid.get(12, 12), 1.0);
        assert_eq!(grid.get(13, 10), 0.0);
        assert_eq!(grid.get(6, 10), 0.0);
    }

    #[test]
    fn test_random_grid_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = Grid::random(16, 0.5..1.0, &mut rng);

        let stats = grid.stats();
        assert!(stats.min >= 0.5);
        assert!(stats.max <= 1.0);
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6], vec![0.7, 0.8, 0.9]];
        let grid = Grid::from_rows(&rows).unwrap();

        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(1, 2), 0.6);
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert!(matches!(
            Grid::from_rows(&[]),
            Err(EngineError::Configuration(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![0.0, 0.0], vec![0.0]]),
            Err(EngineError::Configuration(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]]),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_stats() {
        let grid = Grid::from_rows(&[vec![0.0, 0.5], vec![1.0, 0.5]]).unwrap();
        let stats = grid.stats();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.mean, 0.5);
    }
}
