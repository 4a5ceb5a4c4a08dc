//! # Generation Module
//!
//! Procedural level generation: maze carving, the fallback layout, and placement
//! of doors, chests and monsters.
//!
//! A level is produced by [`LevelGenerator`], which carves the four quadrants of
//! the grid concurrently under a time budget, retries a bounded number of times,
//! and falls back to a fixed open layout when every attempt fails. Either way the
//! resulting floor is then decorated by the placement pass in [`encounters`].

pub mod dungeon;
pub mod encounters;
pub mod loot;
pub mod maze;

pub use dungeon::*;
pub use encounters::*;
pub use loot::*;
pub use maze::*;

use crate::config;
use crate::game::{CellKind, Chest, Grid, MonsterKind, Position};
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for level generation.
///
/// Controls map size, the concurrency budget, and how many features are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map height in tiles
    pub rows: usize,
    /// Map width in tiles
    pub cols: usize,
    /// Random seed for reproducible generation; entropy when None
    pub seed: Option<u64>,
    /// Wall-clock budget for one concurrent carving attempt
    pub time_budget: Duration,
    /// Carving attempts before the fallback layout is used
    pub max_attempts: u32,
    /// Probability of a floor cell becoming a door (0.0 to 1.0)
    pub door_chance: f64,
    /// Minimum Manhattan distance between player start and exit
    pub min_exit_distance: u32,
    /// Chests placed per level
    pub chest_count: usize,
    /// Normal monsters placed per level
    pub normal_monsters: usize,
    /// Fast monsters placed per level
    pub fast_monsters: usize,
    /// Random draws allowed per rejection-sampled placement
    pub max_placement_draws: u32,
    /// Whether disconnected regions of a carved maze are joined afterwards
    pub ensure_connectivity: bool,
}

impl GenerationConfig {
    /// Creates a seeded configuration with the standard level parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.seed, Some(42));
    /// assert_eq!((config.rows, config.cols), (20, 20));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Creates a seeded configuration for tests with a generous time budget.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            time_budget: Duration::from_secs(30),
            ..Self::default()
        }
    }

    /// Returns the same configuration with different map dimensions.
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> DelveResult<()> {
        if self.rows < config::MIN_MAP_SIDE || self.cols < config::MIN_MAP_SIDE {
            return Err(DelveError::InvalidConfig(format!(
                "Map must be at least {0}x{0}, got {1}x{2}",
                config::MIN_MAP_SIDE,
                self.rows,
                self.cols
            )));
        }
        if self.max_attempts == 0 {
            return Err(DelveError::InvalidConfig(
                "At least one generation attempt is required".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.door_chance) {
            return Err(DelveError::InvalidConfig(format!(
                "Door chance {} is not a probability",
                self.door_chance
            )));
        }
        if self.max_placement_draws == 0 {
            return Err(DelveError::InvalidConfig(
                "Placement needs at least one draw".to_string(),
            ));
        }

        // Start, exit, chests and monsters must all fit the fallback interior.
        let interior = (self.rows - 2) * (self.cols - 2);
        let needed = [self.chest_count, self.normal_monsters, self.fast_monsters]
            .into_iter()
            .try_fold(2usize, |total, count| total.checked_add(count));
        if needed.map_or(true, |needed| needed > interior) {
            return Err(DelveError::InvalidConfig(format!(
                "{} chests and {} monsters do not fit a {}x{} map",
                self.chest_count,
                self.normal_monsters.saturating_add(self.fast_monsters),
                self.rows,
                self.cols
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rows: config::DEFAULT_ROWS,
            cols: config::DEFAULT_COLS,
            seed: None,
            time_budget: config::GENERATION_TIME_BUDGET,
            max_attempts: config::MAX_GENERATION_ATTEMPTS,
            door_chance: config::DOOR_CHANCE,
            min_exit_distance: config::MIN_EXIT_DISTANCE,
            chest_count: config::CHESTS_PER_LEVEL,
            normal_monsters: config::NORMAL_MONSTERS_PER_LEVEL,
            fast_monsters: config::FAST_MONSTERS_PER_LEVEL,
            max_placement_draws: config::MAX_PLACEMENT_DRAWS,
            ensure_connectivity: true,
        }
    }
}

/// Which route produced a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationPath {
    /// Concurrent carving succeeded on the given attempt (1-based)
    Carved { attempt: u32 },
    /// Every carving attempt failed and the fixed layout was used
    Fallback,
}

/// A fully decorated level, ready to be handed to the turn engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub grid: Grid,
    pub player_start: Position,
    pub exit: Position,
    pub chests: Vec<Chest>,
    pub monster_spawns: Vec<(MonsterKind, Position)>,
    pub path: GenerationPath,
}

/// Trait for procedural generators.
///
/// Synchronous building blocks of level generation implement this trait so they
/// can be driven and checked the same way.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates the master random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Validates that a decorated level meets the structural requirements.
    pub fn validate_level(level: &GeneratedLevel, config: &GenerationConfig) -> DelveResult<()> {
        let fail = |reason: String| Err(DelveError::GenerationFailed(reason));
        let grid = &level.grid;

        if grid.rows() != config.rows || grid.cols() != config.cols {
            return fail(format!(
                "Level is {}x{}, expected {}x{}",
                grid.rows(),
                grid.cols(),
                config.rows,
                config.cols
            ));
        }
        if grid.get(level.player_start) != Some(CellKind::Floor) {
            return fail(format!("Player start {} is not floor", level.player_start));
        }
        if grid.positions_of(CellKind::Exit) != vec![level.exit] {
            return fail("Level must have exactly one exit".to_string());
        }
        if level.chests.len() != config.chest_count
            || level
                .chests
                .iter()
                .any(|chest| grid.get(chest.position) != Some(CellKind::Chest))
        {
            return fail("Chest cells do not match the chest list".to_string());
        }
        if level
            .chests
            .iter()
            .any(|chest| !(config::CHEST_GOLD_MIN..=config::CHEST_GOLD_MAX).contains(&chest.gold))
        {
            return fail("Chest gold out of range".to_string());
        }
        if level.monster_spawns.len() != config.normal_monsters + config.fast_monsters {
            return fail("Wrong number of monsters".to_string());
        }
        if level
            .monster_spawns
            .iter()
            .any(|&(_, pos)| pos == level.player_start || !grid.is_walkable(pos))
        {
            return fail("Monster placed on an unusable cell".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.chest_count, 2);
        assert_eq!(config.normal_monsters, 3);
        assert_eq!(config.fast_monsters, 2);
        assert!(config.ensure_connectivity);
        assert_eq!(GenerationConfig::default().seed, None);
    }

    #[test]
    fn test_generation_config_validation() {
        assert!(GenerationConfig::new(1).with_size(7, 7).validate().is_ok());
        assert!(GenerationConfig::new(1).with_size(6, 20).validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.door_chance = 1.5;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.max_attempts = 0;
        assert!(matches!(config.validate(), Err(DelveError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_rejects_features_beyond_fallback_interior() {
        // A 7x7 map has a 5x5 interior: start, exit, 2 chests and 5 monsters leave 16 spare.
        let mut config = GenerationConfig::new(1).with_size(7, 7);
        config.chest_count = 18;
        assert!(config.validate().is_ok());

        config.chest_count = 19;
        assert!(matches!(config.validate(), Err(DelveError::InvalidConfig(_))));

        let mut config = GenerationConfig::new(1);
        config.fast_monsters = usize::MAX;
        assert!(matches!(config.validate(), Err(DelveError::InvalidConfig(_))));
    }

    #[test]
    fn test_utils_rng_is_reproducible() {
        use rand::Rng;

        let config = GenerationConfig::new(12345);
        let a: u64 = utils::create_rng(&config).gen();
        let b: u64 = utils::create_rng(&config).gen();
        assert_eq!(a, b);
    }
}
