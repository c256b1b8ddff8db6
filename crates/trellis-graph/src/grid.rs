//! A* pathfinding on a 2-D grid lattice.
//!
//! Cells connect to their four orthogonal neighbours at cost 1 unless the
//! neighbour is an obstacle. The search is the same best-first core used by
//! [`GraphStore::astar`](crate::GraphStore::astar), with the Manhattan
//! distance to the goal as heuristic.

use crate::error::{GraphError, Result};
use crate::pathfinding::{best_first, SearchSpace};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Neighbour offsets: up, down, left, right.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(&self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A route through the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPath {
    pub cells: Vec<Cell>,
    pub cost: usize,
}

/// A dense `rows x cols` lattice with an obstacle overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    obstacles: Vec<bool>,
}

impl GridMap {
    /// Creates an open grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            obstacles: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Blocks a cell.
    pub fn mark_obstacle(&mut self, cell: impl Into<Cell>) -> Result<()> {
        let cell = cell.into();
        let index = self.index_of(cell)?;
        self.obstacles[index] = true;
        Ok(())
    }

    /// Returns true if the cell is blocked. Cells outside the grid are
    /// reported as blocked.
    pub fn is_obstacle(&self, cell: impl Into<Cell>) -> bool {
        self.index_of(cell.into())
            .map(|index| self.obstacles[index])
            .unwrap_or(true)
    }

    /// Open orthogonal neighbours in up, down, left, right order.
    pub fn neighbors(&self, cell: impl Into<Cell>) -> Result<Vec<Cell>> {
        let cell = cell.into();
        self.index_of(cell)?;
        Ok(self.open_neighbors(cell).collect())
    }

    /// Finds a shortest route from `start` to `goal`.
    ///
    /// `Ok(None)` when the goal cannot be reached, including when either end
    /// is an obstacle.
    pub fn find_path(
        &self,
        start: impl Into<Cell>,
        goal: impl Into<Cell>,
    ) -> Result<Option<GridPath>> {
        let (start, goal) = (start.into(), goal.into());
        let start_index = self.index_of(start)?;
        let goal_index = self.index_of(goal)?;
        if self.obstacles[start_index] || self.obstacles[goal_index] {
            return Ok(None);
        }

        let state = best_first(self, start_index, Some(goal_index), |index| {
            self.cell_at(index).manhattan(goal) as f64
        });
        debug!(%start, %goal, settled = state.settled, "grid search finished");

        Ok(state.trace(goal_index).map(|indexes| GridPath {
            cells: indexes.into_iter().map(|i| self.cell_at(i)).collect(),
            cost: state.dist[goal_index] as usize,
        }))
    }

    /// Text rendering: `#` for obstacles, `.` for open cells.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols * 2 + 1));
        for row in 0..self.rows {
            let line: Vec<&str> = (0..self.cols)
                .map(|col| if self.obstacles[row * self.cols + col] { "#" } else { "." })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    fn index_of(&self, cell: Cell) -> Result<usize> {
        if cell.row < self.rows && cell.col < self.cols {
            Ok(cell.row * self.cols + cell.col)
        } else {
            Err(GraphError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;
            let next = Cell::new(row, col);
            let index = self.index_of(next).ok()?;
            (!self.obstacles[index]).then_some(next)
        })
    }
}

impl SearchSpace for GridMap {
    fn node_count(&self) -> usize {
        self.rows * self.cols
    }

    fn for_each_successor<F: FnMut(usize, f64)>(&self, node: usize, mut visit: F) {
        for next in self.open_neighbors(self.cell_at(node)) {
            visit(next.row * self.cols + next.col, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc_grid() -> GridMap {
        let mut grid = GridMap::new(5, 5);
        for col in 1..=3 {
            grid.mark_obstacle((1, col)).unwrap();
        }
        grid
    }

    #[test]
    fn test_find_path_around_wall() {
        let grid = npc_grid();
        let path = grid.find_path((0, 0), (4, 4)).unwrap().unwrap();
        assert_eq!(path.cost, 8);
        assert_eq!(path.cells.len(), 9);
        assert_eq!(path.cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(path.cells.last(), Some(&Cell::new(4, 4)));
        for pair in path.cells.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(!grid.is_obstacle(pair[1]));
        }
    }

    #[test]
    fn test_neighbors_order_and_filter() {
        let grid = npc_grid();
        assert_eq!(
            grid.neighbors((0, 1)).unwrap(),
            vec![Cell::new(0, 0), Cell::new(0, 2)]
        );
        assert_eq!(
            grid.neighbors((2, 2)).unwrap(),
            vec![Cell::new(3, 2), Cell::new(2, 1), Cell::new(2, 3)]
        );
    }

    #[test]
    fn test_blocked_goal_has_no_path() {
        let mut grid = GridMap::new(3, 3);
        grid.mark_obstacle((0, 1)).unwrap();
        grid.mark_obstacle((1, 0)).unwrap();
        assert_eq!(grid.find_path((0, 0), (2, 2)).unwrap(), None);
        assert_eq!(grid.find_path((1, 1), (0, 1)).unwrap(), None);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = GridMap::new(2, 2);
        let path = grid.find_path((1, 1), (1, 1)).unwrap().unwrap();
        assert_eq!(path.cells, vec![Cell::new(1, 1)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = GridMap::new(2, 3);
        assert_eq!(
            grid.mark_obstacle((2, 0)).unwrap_err(),
            GraphError::CellOutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            }
        );
        assert!(grid.find_path((0, 0), (0, 3)).is_err());
        assert!(grid.is_obstacle((5, 5)));
    }

    #[test]
    fn test_render() {
        let mut grid = GridMap::new(2, 3);
        grid.mark_obstacle((0, 2)).unwrap();
        assert_eq!(grid.render(), ". . #\n. . .\n");
    }
}
