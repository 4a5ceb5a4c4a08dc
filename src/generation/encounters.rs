//! # Encounter Placement
//!
//! Decorates a bare floor plan with doors, the player start, the exit, chests and
//! monsters.
//!
//! Every placement is rejection sampling over the grid with a bounded number of
//! draws. The fallback layout additionally allows a row-major scan when sampling
//! runs dry, so it always finds a cell if one exists.

use crate::game::{CellKind, Chest, Grid, MonsterKind, Position};
use crate::generation::{loot, GenerationConfig};
use crate::{DelveError, DelveResult};
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Where features ended up on a decorated grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub player_start: Position,
    pub exit: Position,
    pub chests: Vec<Chest>,
    pub monster_spawns: Vec<(MonsterKind, Position)>,
}

/// How cells are searched when placing features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Random draws only; running out is a failure
    Strict,
    /// Random draws, then a row-major scan
    ScanOnExhaustion,
}

/// Turns each floor cell into a door with probability `chance`, skipping `reserved`.
///
/// Returns the number of doors stamped.
pub fn stamp_doors(grid: &mut Grid, chance: f64, reserved: &[Position], rng: &mut StdRng) -> usize {
    let candidates = grid.positions_of(CellKind::Floor);
    let mut stamped = 0;
    for pos in candidates {
        if rng.gen_bool(chance)
            && !reserved.contains(&pos)
            && grid.replace_if(pos, CellKind::Floor, CellKind::Door)
        {
            stamped += 1;
        }
    }
    stamped
}

/// Picks a cell accepted by `accept`, or None when the search gives up.
pub fn sample_cell(
    grid: &Grid,
    rng: &mut StdRng,
    max_draws: u32,
    mode: SamplingMode,
    accept: impl Fn(Position) -> bool,
) -> Option<Position> {
    for _ in 0..max_draws {
        let pos = Position::new(
            rng.gen_range(0..grid.cols()) as i32,
            rng.gen_range(0..grid.rows()) as i32,
        );
        if accept(pos) {
            return Some(pos);
        }
    }

    match mode {
        SamplingMode::Strict => None,
        SamplingMode::ScanOnExhaustion => grid.positions().find(|&pos| accept(pos)),
    }
}

/// Places every feature on `grid`.
///
/// With `anchors` the start and exit are fixed and only checked; otherwise they
/// are sampled, keeping the exit at least `min_exit_distance` away from the start.
/// Chest and exit cells are stamped onto the grid; the start stays floor.
pub fn populate(
    grid: &mut Grid,
    anchors: Option<(Position, Position)>,
    config: &GenerationConfig,
    door_chance: f64,
    mode: SamplingMode,
    rng: &mut StdRng,
) -> DelveResult<Placement> {
    let reserved: Vec<Position> = anchors.map(|(start, exit)| vec![start, exit]).unwrap_or_default();
    let doors = stamp_doors(grid, door_chance, &reserved, rng);
    trace!("Stamped {} doors", doors);

    let draws = config.max_placement_draws;
    let is_floor = |grid: &Grid, pos: Position| grid.get(pos) == Some(CellKind::Floor);

    let (player_start, exit) = match anchors {
        Some((start, exit)) => {
            if !is_floor(grid, start) || !is_floor(grid, exit) {
                return Err(placement_failed("fixed start or exit"));
            }
            (start, exit)
        }
        None => {
            let start = sample_cell(grid, rng, draws, mode, |pos| is_floor(grid, pos))
                .ok_or_else(|| placement_failed("player start"))?;
            let exit = sample_cell(grid, rng, draws, mode, |pos| {
                is_floor(grid, pos)
                    && pos != start
                    && pos.manhattan_distance(start) >= config.min_exit_distance
            })
            .ok_or_else(|| placement_failed("exit"))?;
            (start, exit)
        }
    };
    grid.set(exit, CellKind::Exit)?;

    let mut chests = Vec::with_capacity(config.chest_count);
    for _ in 0..config.chest_count {
        let pos = sample_cell(grid, rng, draws, mode, |pos| is_floor(grid, pos) && pos != player_start)
            .ok_or_else(|| placement_failed("chest"))?;
        grid.set(pos, CellKind::Chest)?;
        chests.push(loot::roll_chest(pos, rng));
    }

    let mut occupied: HashSet<Position> = HashSet::from([player_start]);
    let kinds = std::iter::repeat(MonsterKind::Normal)
        .take(config.normal_monsters)
        .chain(std::iter::repeat(MonsterKind::Fast).take(config.fast_monsters));
    let mut monster_spawns = Vec::new();
    for kind in kinds {
        let pos = sample_cell(grid, rng, draws, mode, |pos| {
            is_floor(grid, pos) && !occupied.contains(&pos)
        })
        .ok_or_else(|| placement_failed("monster"))?;
        occupied.insert(pos);
        monster_spawns.push((kind, pos));
    }

    Ok(Placement {
        player_start,
        exit,
        chests,
        monster_spawns,
    })
}

fn placement_failed(what: &str) -> DelveError {
    DelveError::GenerationFailed(format!("Could not place {}", what))
}
