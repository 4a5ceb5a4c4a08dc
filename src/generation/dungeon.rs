//! # Level Generation
//!
//! Concurrent maze carving with a time budget, bounded retries and a fixed
//! fallback layout.
//!
//! [`LevelGenerator`] works in three stages:
//! 1. Split the grid at `rows / 2` and `cols / 2` and carve every quadrant on its
//!    own blocking task, each carver owning a private window of the grid
//! 2. Tunnel between any disconnected regions, still inside the budget
//! 3. Place doors, the start, the exit, chests and monsters
//!
//! A carving attempt that overruns its budget or fails placement is discarded
//! and retried. Once the attempts run out the [`FallbackGenerator`] produces an
//! open room with fixed start and exit corners, which never fails.

use crate::game::{CellKind, Grid, Position};
use crate::generation::{
    populate, utils, GeneratedLevel, GenerationConfig, GenerationPath, Generator, MazeCarver,
    Placement, SamplingMode,
};
use crate::utils::{flood_fill, tunnel_to_nearest_region, walkable_regions};
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One carving window of the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrant {
    /// Top-left corner in level coordinates
    pub origin: Position,
    pub rows: usize,
    pub cols: usize,
}

/// Splits a `rows` x `cols` grid into four quadrants at the midlines.
///
/// # Examples
///
/// ```
/// use delve::{quadrants, Position};
///
/// let parts = quadrants(9, 7);
/// assert_eq!(parts[3].origin, Position::new(3, 4));
/// assert_eq!((parts[3].rows, parts[3].cols), (5, 4));
/// ```
pub fn quadrants(rows: usize, cols: usize) -> [Quadrant; 4] {
    let (top, left) = (rows / 2, cols / 2);
    let quadrant = |x: usize, y: usize, rows: usize, cols: usize| Quadrant {
        origin: Position::new(x as i32, y as i32),
        rows,
        cols,
    };
    [
        quadrant(0, 0, top, left),
        quadrant(left, 0, top, cols - left),
        quadrant(0, top, rows - top, left),
        quadrant(left, top, rows - top, cols - left),
    ]
}

/// The fallback floor plan: solid border walls around an open interior.
pub fn fallback_grid(rows: usize, cols: usize) -> Grid {
    let mut grid = Grid::new(rows, cols, CellKind::Floor);
    let border: Vec<Position> = grid.positions().filter(|&pos| grid.is_border(pos)).collect();
    for pos in border {
        grid.replace_if(pos, CellKind::Floor, CellKind::Wall);
    }
    grid
}

/// Fixed player start and exit of the fallback layout: opposite inner corners.
pub fn fallback_anchors(rows: usize, cols: usize) -> (Position, Position) {
    (
        Position::new(1, 1),
        Position::new(cols as i32 - 2, rows as i32 - 2),
    )
}

/// Joins every walkable region to the largest one, returning how many tunnels were cut.
///
/// Each round tunnels from the joined area to its nearest foreign region in one
/// breadth-first search, so a round costs time linear in the grid size. Raising
/// `cancel` aborts the repair with an error.
pub fn repair_connectivity(grid: &mut Grid, cancel: &AtomicBool) -> DelveResult<usize> {
    let Some(largest) = walkable_regions(grid)
        .into_iter()
        .rev()
        .max_by_key(|region| region.len())
    else {
        return Ok(0);
    };
    let mut joined: HashSet<Position> = largest.into_iter().collect();
    let mut tunnels = 0;

    loop {
        let Some(path) = tunnel_to_nearest_region(grid, &joined, cancel) else {
            if cancel.load(Ordering::Relaxed) {
                return Err(DelveError::GenerationFailed(
                    "Connectivity repair was cancelled".to_string(),
                ));
            }
            return Ok(tunnels);
        };
        for &pos in &path {
            grid.replace_if(pos, CellKind::Wall, CellKind::Floor);
        }
        if let Some(&reached) = path.last() {
            joined.extend(flood_fill(grid, reached));
        }
        tunnels += 1;
    }
}

fn assemble(grid: Grid, placement: Placement, path: GenerationPath) -> GeneratedLevel {
    GeneratedLevel {
        grid,
        player_start: placement.player_start,
        exit: placement.exit,
        chests: placement.chests,
        monster_spawns: placement.monster_spawns,
        path,
    }
}

/// Builds the fallback level. Used once every carving attempt has failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    fn decorate(
        config: &GenerationConfig,
        door_chance: f64,
        rng: &mut StdRng,
    ) -> DelveResult<(Grid, Placement)> {
        let mut grid = fallback_grid(config.rows, config.cols);
        let anchors = fallback_anchors(config.rows, config.cols);
        let placement = populate(
            &mut grid,
            Some(anchors),
            config,
            door_chance,
            SamplingMode::ScanOnExhaustion,
            rng,
        )?;
        Ok((grid, placement))
    }
}

impl Generator<GeneratedLevel> for FallbackGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<GeneratedLevel> {
        let (grid, placement) = match Self::decorate(config, config.door_chance, rng) {
            Ok(decorated) => decorated,
            Err(err) => {
                warn!("Fallback placement failed ({}), retrying without doors", err);
                Self::decorate(config, 0.0, rng)?
            }
        };
        Ok(assemble(grid, placement, GenerationPath::Fallback))
    }

    fn validate(&self, level: &GeneratedLevel, config: &GenerationConfig) -> DelveResult<()> {
        utils::validate_level(level, config)
    }

    fn generator_type(&self) -> &'static str {
        "FallbackGenerator"
    }
}

/// Produces complete levels from a [`GenerationConfig`].
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    config: GenerationConfig,
}

impl LevelGenerator {
    /// Creates a generator after validating the configuration.
    pub fn new(config: GenerationConfig) -> DelveResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a level, falling back to the fixed layout when carving keeps failing.
    ///
    /// Carvers run on tokio's blocking pool, so this must be awaited inside a
    /// tokio runtime.
    pub async fn generate(&self) -> DelveResult<GeneratedLevel> {
        let mut rng = utils::create_rng(&self.config);
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            match self.carved_attempt(attempt, &mut rng).await {
                Ok(level) => {
                    info!(
                        "Generated {}x{} level on attempt {}",
                        self.config.rows,
                        self.config.cols,
                        attempt
                    );
                    return Ok(level);
                }
                Err(err) => {
                    warn!("Generation attempt {}/{} failed: {}", attempt, max_attempts, err)
                }
            }
        }

        warn!(
            "All {} carving attempts failed, using the fallback layout",
            max_attempts
        );
        let fallback = FallbackGenerator;
        let level = fallback.generate(&self.config, &mut rng)?;
        fallback.validate(&level, &self.config)?;
        Ok(level)
    }

    /// Runs [`generate`](Self::generate) on a private current-thread runtime.
    ///
    /// Must not be called from inside another tokio runtime.
    pub fn generate_blocking(&self) -> DelveResult<GeneratedLevel> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.generate())
    }

    async fn carved_attempt(&self, attempt: u32, rng: &mut StdRng) -> DelveResult<GeneratedLevel> {
        let mut grid = self.carve_concurrently(rng).await?;

        let placement = populate(
            &mut grid,
            None,
            &self.config,
            self.config.door_chance,
            SamplingMode::Strict,
            rng,
        )?;
        let level = assemble(grid, placement, GenerationPath::Carved { attempt });
        utils::validate_level(&level, &self.config)?;
        Ok(level)
    }

    /// Carves all quadrants in parallel, stitches the windows together and
    /// repairs connectivity, all within the time budget.
    async fn carve_concurrently(&self, rng: &mut StdRng) -> DelveResult<Grid> {
        let (rows, cols) = (self.config.rows, self.config.cols);
        let cancel = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = quadrants(rows, cols)
            .into_iter()
            .map(|quadrant| {
                let carver = MazeCarver::new(quadrant.rows, quadrant.cols, Arc::clone(&cancel));
                let seed: u64 = rng.gen();
                tokio::task::spawn_blocking(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    carver
                        .carve(&mut rng)
                        .map(|window| (quadrant.origin, window))
                })
            })
            .collect();

        let ensure_connectivity = self.config.ensure_connectivity;
        let repair_cancel = Arc::clone(&cancel);
        let build = async move {
            let mut grid = Grid::new(rows, cols, CellKind::Wall);
            for handle in handles {
                let (origin, window) = handle.await.map_err(task_failed)??;
                grid.paste(&window, origin);
            }
            if !ensure_connectivity {
                return Ok(grid);
            }

            let repaired = tokio::task::spawn_blocking(move || {
                let tunnels = repair_connectivity(&mut grid, &repair_cancel)?;
                debug!("Joined carved regions with {} tunnels", tunnels);
                Ok::<_, DelveError>(grid)
            })
            .await
            .map_err(task_failed)??;
            Ok::<_, DelveError>(repaired)
        };

        let outcome = tokio::time::timeout(self.config.time_budget, build).await;
        if !matches!(outcome, Ok(Ok(_))) {
            cancel.store(true, Ordering::Relaxed);
        }
        outcome.map_err(|_| {
            DelveError::GenerationFailed(format!(
                "Carving exceeded the {:?} budget",
                self.config.time_budget
            ))
        })?
    }
}

fn task_failed(err: tokio::task::JoinError) -> DelveError {
    DelveError::GenerationFailed(format!("Generation task failed: {}", err))
}
