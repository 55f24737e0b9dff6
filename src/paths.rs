use serde::Serialize;

use crate::error::{LabError, Result};

pub const FREE: u8 = 0;
pub const OBSTACLE: u8 = 1;

/// Rectangular grid of free (0) and obstacle (1) cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<u8>>,
}

impl Grid {
    pub fn new(cells: Vec<Vec<u8>>) -> Result<Self> {
        let cols = match cells.first() {
            None => return Err(LabError::InvalidGrid("grid has no rows".into())),
            Some(row) if row.is_empty() => return Err(LabError::InvalidGrid("grid has an empty row".into())),
            Some(row) => row.len(),
        };
        for (i, row) in cells.iter().enumerate() {
            if row.len() != cols {
                return Err(LabError::InvalidGrid(format!(
                    "row {i} has {} cells, expected {cols}", row.len()
                )));
            }
            if let Some(j) = row.iter().position(|&c| c != FREE && c != OBSTACLE) {
                return Err(LabError::InvalidGrid(format!("cell ({i}, {j}) is {}", row[j])));
            }
        }
        Ok(Grid { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    pub fn is_blocked(&self, i: usize, j: usize) -> bool {
        self.cells[i][j] == OBSTACLE
    }
}

/// Paths moving only down or right, counted by plain recursion.
pub fn unique_paths_recursive(grid: &Grid) -> u64 {
    fn walk(grid: &Grid, i: usize, j: usize) -> u64 {
        let (m, n) = (grid.rows(), grid.cols());
        if i >= m || j >= n || grid.is_blocked(i, j) {
            return 0;
        }
        if i == m - 1 && j == n - 1 {
            return 1;
        }
        walk(grid, i + 1, j) + walk(grid, i, j + 1)
    }
    walk(grid, 0, 0)
}

/// Same count, tabulated one row at a time.
pub fn unique_paths_dp(grid: &Grid) -> u64 {
    let n = grid.cols();
    let mut row = vec![0u64; n];
    row[0] = 1;
    for i in 0..grid.rows() {
        for j in 0..n {
            if grid.is_blocked(i, j) {
                row[j] = 0;
            } else if j > 0 {
                row[j] = row[j].saturating_add(row[j - 1]);
            }
        }
    }
    row[n - 1]
}

pub fn sample_grids() -> Result<Vec<Grid>> {
    let raw: Vec<Vec<Vec<u8>>> = vec![
        vec![
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 0],
        ],
        vec![
            vec![0, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 1, 1, 0],
        ],
        vec![
            vec![0, 1],
            vec![1, 0],
        ],
        vec![
            vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            vec![0, 1, 1, 0, 0, 0, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 1, 0, 0, 0, 1, 0],
            vec![0, 1, 0, 1, 1, 0, 1, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 1, 0, 1, 0],
            vec![0, 1, 0, 1, 0, 1, 0, 0, 1, 0],
            vec![0, 0, 0, 1, 0, 0, 0, 1, 0, 0],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![0, 0, 0, 0, 1, 0, 1, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 0, 0, 0, 1, 0],
        ],
    ];
    build_grids(raw)
}

/// Fails on the first malformed grid instead of skipping it.
fn build_grids(raw: Vec<Vec<Vec<u8>>>) -> Result<Vec<Grid>> {
    raw.into_iter().map(Grid::new).collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct PathsReport {
    pub grid: usize,
    pub rows: usize,
    pub cols: usize,
    pub unique_paths: u64,
}

pub fn run_sample_grids() -> Result<Vec<PathsReport>> {
    Ok(sample_grids()?
        .iter()
        .enumerate()
        .map(|(idx, grid)| PathsReport {
            grid: idx + 1,
            rows: grid.rows(),
            cols: grid.cols(),
            unique_paths: unique_paths_recursive(grid),
        })
        .collect())
}
