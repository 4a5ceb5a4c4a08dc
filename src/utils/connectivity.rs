//! # Connectivity
//!
//! Breadth-first reachability over walkable cells, built on the `pathfinding`
//! crate. Movement is four-way, matching the turn engine.

use crate::game::{Grid, Position};
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

fn walkable_neighbours(grid: &Grid, pos: Position) -> impl Iterator<Item = Position> + '_ {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(move |&next| grid.is_walkable(next))
}

/// Returns every walkable cell reachable from `start`, including `start`.
///
/// Empty when `start` itself is not walkable.
pub fn flood_fill(grid: &Grid, start: Position) -> HashSet<Position> {
    if !grid.is_walkable(start) {
        return HashSet::new();
    }
    bfs_reach(start, |&pos| walkable_neighbours(grid, pos)).collect()
}

/// Splits the walkable cells into connected regions.
///
/// Regions are discovered in row-major order of their first cell.
pub fn walkable_regions(grid: &Grid) -> Vec<Vec<Position>> {
    let mut seen = HashSet::new();
    let mut regions = Vec::new();

    for pos in grid.positions() {
        if seen.contains(&pos) || !grid.is_walkable(pos) {
            continue;
        }
        let region: Vec<Position> = bfs_reach(pos, |&p| walkable_neighbours(grid, p)).collect();
        seen.extend(region.iter().copied());
        regions.push(region);
    }

    regions
}

/// True when all walkable cells form a single region.
pub fn is_connected(grid: &Grid) -> bool {
    walkable_regions(grid).len() <= 1
}

/// Number of steps on the shortest walkable path, if there is one.
pub fn path_length(grid: &Grid, from: Position, to: Position) -> Option<usize> {
    bfs(&from, |&pos| walkable_neighbours(grid, pos), |&pos| pos == to)
        .map(|path| path.len() - 1)
}

/// Shortest tunnel from `region` to the nearest walkable cell outside it.
///
/// The search starts from every cell of `region` at once and may pass through
/// interior walls, never through border cells. The returned path begins on a
/// cell of `region` and ends on the foreign cell. `None` when nothing else is
/// walkable or `cancel` was raised during the search.
pub fn tunnel_to_nearest_region(
    grid: &Grid,
    region: &HashSet<Position>,
    cancel: &AtomicBool,
) -> Option<Vec<Position>> {
    let mut sources: Vec<Position> = region.iter().copied().collect();
    sources.sort_by_key(|pos| (pos.y, pos.x));

    let path = bfs(
        &None,
        |node: &Option<Position>| -> Vec<Option<Position>> {
            if cancel.load(Ordering::Relaxed) {
                return Vec::new();
            }
            match node {
                None => sources.iter().copied().map(Some).collect(),
                Some(pos) => pos
                    .cardinal_adjacent_positions()
                    .into_iter()
                    .filter(|next| {
                        grid.in_bounds(*next) && !grid.is_border(*next) && !region.contains(next)
                    })
                    .map(Some)
                    .collect(),
            }
        },
        |node| matches!(node, Some(pos) if grid.is_walkable(*pos) && !region.contains(pos)),
    )?;

    Some(path.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CellKind;

    fn two_rooms() -> Grid {
        let mut grid = Grid::new(7, 9, CellKind::Wall);
        for pos in [(1, 1), (2, 1), (1, 2), (6, 4), (7, 4), (7, 5)] {
            grid.set(Position::new(pos.0, pos.1), CellKind::Floor).unwrap();
        }
        grid
    }

    #[test]
    fn test_flood_fill_stays_in_region() {
        let grid = two_rooms();
        let reached = flood_fill(&grid, Position::new(1, 1));
        assert_eq!(reached.len(), 3);
        assert!(!reached.contains(&Position::new(6, 4)));
        assert!(flood_fill(&grid, Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_regions_and_tunnel() {
        let grid = two_rooms();
        let regions = walkable_regions(&grid);
        assert_eq!(regions.len(), 2);
        assert!(!is_connected(&grid));

        let region: HashSet<Position> = regions[0].iter().copied().collect();
        let tunnel = tunnel_to_nearest_region(&grid, &region, &AtomicBool::new(false)).unwrap();

        assert!(region.contains(&tunnel[0]));
        assert_eq!(tunnel.last(), Some(&Position::new(6, 4)));
        assert_eq!(tunnel.len(), 8);
        assert!(tunnel.iter().all(|&pos| !grid.is_border(pos)));
    }

    #[test]
    fn test_tunnel_gives_up_when_cancelled_or_alone() {
        let grid = two_rooms();
        let region: HashSet<Position> = walkable_regions(&grid)[0].iter().copied().collect();
        assert!(tunnel_to_nearest_region(&grid, &region, &AtomicBool::new(true)).is_none());

        let mut single = Grid::new(5, 5, CellKind::Wall);
        single.set(Position::new(2, 2), CellKind::Floor).unwrap();
        let alone = HashSet::from([Position::new(2, 2)]);
        assert!(tunnel_to_nearest_region(&single, &alone, &AtomicBool::new(false)).is_none());
    }

    #[test]
    fn test_doors_and_exit_count_as_walkable() {
        let mut grid = Grid::new(3, 5, CellKind::Wall);
        grid.set(Position::new(1, 1), CellKind::Floor).unwrap();
        grid.set(Position::new(2, 1), CellKind::Door).unwrap();
        grid.set(Position::new(3, 1), CellKind::Exit).unwrap();
        assert_eq!(path_length(&grid, Position::new(1, 1), Position::new(3, 1)), Some(2));
    }
}
