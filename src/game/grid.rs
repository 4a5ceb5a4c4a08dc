//! # Grid
//!
//! The tile grid shared by the generator and the turn engine.

use crate::game::Position;
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What occupies a single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Floor,
    /// Closed door; opens for good once the player stands next to it
    Door,
    Chest,
    Exit,
}

impl CellKind {
    /// Whether players and monsters may stand on this cell.
    pub fn is_passable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }

    /// Single character used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Floor => '.',
            CellKind::Door => '+',
            CellKind::Chest => '$',
            CellKind::Exit => '>',
        }
    }
}

/// A `rows × cols` array of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{CellKind, Grid, Position};
    ///
    /// let grid = Grid::new(4, 6, CellKind::Wall);
    /// assert_eq!(grid.rows(), 4);
    /// assert_eq!(grid.cols(), 6);
    /// assert_eq!(grid.get(Position::new(5, 3)), Some(CellKind::Wall));
    /// assert_eq!(grid.get(Position::new(6, 3)), None);
    /// ```
    pub fn new(rows: usize, cols: usize, fill: CellKind) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Checks whether a position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.cols + pos.x as usize)
        } else {
            None
        }
    }

    /// Gets the cell at a position, or None when out of bounds.
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        self.index(pos).map(|index| self.cells[index])
    }

    /// Sets the cell at a position.
    pub fn set(&mut self, pos: Position, kind: CellKind) -> DelveResult<()> {
        let index = self.index(pos).ok_or_else(|| {
            DelveError::InvalidState(format!(
                "Position {} is outside the {}x{} grid",
                pos, self.cols, self.rows
            ))
        })?;
        self.cells[index] = kind;
        Ok(())
    }

    /// Replaces the cell at `pos` with `to` if it currently holds `from`.
    ///
    /// Returns whether a replacement happened; out-of-bounds positions are a no-op.
    pub fn replace_if(&mut self, pos: Position, from: CellKind, to: CellKind) -> bool {
        match self.index(pos) {
            Some(index) if self.cells[index] == from => {
                self.cells[index] = to;
                true
            }
            _ => false,
        }
    }

    /// In bounds and not a wall.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(CellKind::is_passable)
    }

    /// Whether the position sits on the outermost ring of cells.
    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.cols - 1
                || pos.y as usize == self.rows - 1)
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Position::new(x as i32, y as i32)))
    }

    /// Gets all positions holding the given kind, in row-major order.
    pub fn positions_of(&self, kind: CellKind) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.get(pos) == Some(kind))
            .collect()
    }

    /// Counts cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Copies a `rows × cols` window whose top-left corner is `origin`.
    ///
    /// Cells of the window falling outside this grid are filled with walls.
    pub fn sub_grid(&self, origin: Position, rows: usize, cols: usize) -> Grid {
        let mut window = Grid::new(rows, cols, CellKind::Wall);
        for local in window.positions().collect::<Vec<_>>() {
            if let Some(kind) = self.get(origin + local) {
                window.cells[local.y as usize * cols + local.x as usize] = kind;
            }
        }
        window
    }

    /// Writes `window` back with its top-left corner at `origin`, clipping to bounds.
    pub fn paste(&mut self, window: &Grid, origin: Position) {
        for local in window.positions() {
            let target = origin + local;
            if let (Some(index), Some(kind)) = (self.index(target), window.get(local)) {
                self.cells[index] = kind;
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            let line: String = self.cells[y * self.cols..(y + 1) * self.cols]
                .iter()
                .map(|cell| cell.glyph())
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
