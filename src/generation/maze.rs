//! # Maze Carving
//!
//! Randomized depth-first backtracking over one rectangular window of the level.
//!
//! Each carver works on a window it owns outright, so several carvers can run on
//! different threads without touching each other's cells. The caller copies the
//! finished windows back into the level.

use crate::game::{CellKind, Direction, Grid, Position};
use crate::generation::{GenerationConfig, Generator};
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Carves a spanning tree of floor cells with step-2 randomized DFS.
#[derive(Debug, Clone)]
pub struct MazeCarver {
    rows: usize,
    cols: usize,
    anchor: Position,
    cancel: Arc<AtomicBool>,
}

impl MazeCarver {
    /// Creates a carver for a `rows` x `cols` window, anchored at local (1, 1).
    ///
    /// Raising `cancel` from another thread stops the carver at its next step.
    pub fn new(rows: usize, cols: usize, cancel: Arc<AtomicBool>) -> Self {
        Self {
            rows,
            cols,
            anchor: Position::new(1, 1),
            cancel,
        }
    }

    /// True when `pos` lies strictly inside the window, off its outer ring.
    fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.y > 0 && (pos.x as usize) < self.cols - 1 && (pos.y as usize) < self.rows - 1
    }

    /// Carves a fresh wall-filled window.
    ///
    /// Fails only when cancelled; a window too small to hold the anchor comes
    /// back uncarved.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{CellKind, MazeCarver, Position};
    /// use rand::SeedableRng;
    /// use std::sync::Arc;
    /// use std::sync::atomic::AtomicBool;
    ///
    /// let carver = MazeCarver::new(9, 9, Arc::new(AtomicBool::new(false)));
    /// let window = carver.carve(&mut rand::rngs::StdRng::seed_from_u64(7)).unwrap();
    /// assert_eq!(window.get(Position::new(1, 1)), Some(CellKind::Floor));
    /// assert_eq!(window.count(CellKind::Floor), 31);
    /// ```
    pub fn carve(&self, rng: &mut StdRng) -> DelveResult<Grid> {
        let mut window = Grid::new(self.rows, self.cols, CellKind::Wall);
        if self.rows < 3 || self.cols < 3 {
            return Ok(window);
        }

        window.set(self.anchor, CellKind::Floor)?;
        let mut stack = vec![self.anchor];
        let mut directions = Direction::cardinal();

        while let Some(&current) = stack.last() {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(DelveError::GenerationFailed(
                    "Maze carving cancelled".to_string(),
                ));
            }

            directions.shuffle(rng);
            let next = directions.iter().find_map(|direction| {
                let delta = direction.to_delta();
                let far = current.stepped(delta, 2);
                (self.is_interior(far) && window.get(far) == Some(CellKind::Wall))
                    .then_some((current + delta, far))
            });

            match next {
                Some((between, far)) => {
                    window.set(between, CellKind::Floor)?;
                    window.set(far, CellKind::Floor)?;
                    stack.push(far);
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(window)
    }
}

impl Generator<Grid> for MazeCarver {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Grid> {
        self.carve(rng)
    }

    fn validate(&self, content: &Grid, _config: &GenerationConfig) -> DelveResult<()> {
        if content.rows() != self.rows || content.cols() != self.cols {
            return Err(DelveError::GenerationFailed(
                "Carved window has the wrong size".to_string(),
            ));
        }
        let ring_carved = content
            .positions()
            .any(|pos| !self.is_interior(pos) && content.get(pos) != Some(CellKind::Wall));
        if ring_carved {
            return Err(DelveError::GenerationFailed(
                "Carving escaped the window interior".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "MazeCarver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::flood_fill;
    use rand::SeedableRng;

    fn carver(rows: usize, cols: usize) -> MazeCarver {
        MazeCarver::new(rows, cols, Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_carve_spans_all_odd_cells() {
        let window = carver(11, 15).carve(&mut StdRng::seed_from_u64(3)).unwrap();

        // Every odd/odd interior cell is a maze node and must be carved
        for y in (1..10).step_by(2) {
            for x in (1..14).step_by(2) {
                assert_eq!(window.get(Position::new(x, y)), Some(CellKind::Floor));
            }
        }
        // A spanning tree over 5x7 nodes has 35 nodes and 34 edges
        assert_eq!(window.count(CellKind::Floor), 35 + 34);
    }

    #[test]
    fn test_carve_is_connected_and_bounded() {
        let carver = carver(10, 10);
        let window = carver.carve(&mut StdRng::seed_from_u64(11)).unwrap();

        let reached = flood_fill(&window, Position::new(1, 1));
        assert_eq!(reached.len(), window.count(CellKind::Floor));
        assert!(carver.validate(&window, &GenerationConfig::default()).is_ok());
    }

    #[test]
    fn test_carve_is_reproducible_per_seed() {
        let a = carver(12, 12).carve(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = carver(12, 12).carve(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cancelled_carver_stops() {
        let cancel = Arc::new(AtomicBool::new(true));
        let carver = MazeCarver::new(50, 50, cancel);
        let result = carver.carve(&mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(DelveError::GenerationFailed(_))));
    }

    #[test]
    fn test_tiny_window_is_left_solid() {
        let window = carver(2, 5).carve(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(window.count(CellKind::Floor), 0);
    }
}
