//! # Delve
//!
//! A turn-based maze crawler: one player, a handful of monsters, a few chests and
//! an exit, on a freshly carved grid every level.
//!
//! ## Architecture Overview
//!
//! The crate is split along the two pieces of real machinery:
//!
//! - **Generation**: concurrent maze carving over grid quadrants, bounded by a time
//!   budget and an attempt limit, with a deterministic fallback layout and random
//!   placement of doors, chests and monsters
//! - **Game**: the turn engine that resolves one player action, lets every monster
//!   respond, and reports whether the level was cleared or the player died
//!
//! Around those sit a multi-level [`Run`], an in-memory [`Leaderboard`], and thin
//! text rendering and command parsing used by the terminal binary. Drawing,
//! windowing and raw key handling are left to whoever embeds the crate.

pub mod game;
pub mod generation;
pub mod input;
pub mod leaderboard;
pub mod rendering;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use leaderboard::*;
pub use rendering::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid for the requested operation
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generation attempt failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    use std::time::Duration;

    /// Default map height in tiles
    pub const DEFAULT_ROWS: usize = 20;

    /// Default map width in tiles
    pub const DEFAULT_COLS: usize = 20;

    /// Smallest map side the generator accepts
    pub const MIN_MAP_SIDE: usize = 7;

    /// Wall-clock budget for one concurrent carving attempt
    pub const GENERATION_TIME_BUDGET: Duration = Duration::from_millis(5000);

    /// Carving attempts before the fallback layout is used
    pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

    /// Random draws allowed per rejection-sampled placement
    pub const MAX_PLACEMENT_DRAWS: u32 = 10_000;

    /// Chance for each floor cell to become a door
    pub const DOOR_CHANCE: f64 = 0.05;

    /// Minimum Manhattan distance between player start and exit
    pub const MIN_EXIT_DISTANCE: u32 = 5;

    /// Chests placed per level
    pub const CHESTS_PER_LEVEL: usize = 2;

    /// Inclusive range of gold found in a chest
    pub const CHEST_GOLD_MIN: u32 = 1;
    pub const CHEST_GOLD_MAX: u32 = 50;

    /// Chance that a chest holds a rare item (wall breaker or lightning)
    pub const RARE_ITEM_CHANCE: f64 = 0.05;

    /// Chance, drawn only when the rare roll fails, of a healing vial
    pub const HEAL_ITEM_CHANCE: f64 = 0.10;

    /// Monsters placed per level
    pub const NORMAL_MONSTERS_PER_LEVEL: usize = 3;
    pub const FAST_MONSTERS_PER_LEVEL: usize = 2;

    /// Player starting stats
    pub const PLAYER_START_HEALTH: i32 = 170;
    pub const PLAYER_ATTACK: i32 = 10;

    /// Monster stats
    pub const MONSTER_HEALTH: i32 = 10;
    pub const MONSTER_ATTACK: i32 = 5;
    pub const FAST_MONSTER_HEALTH: i32 = 20;
    pub const FAST_MONSTER_ATTACK: i32 = 20;

    /// Longest combined step a fast monster attempts
    pub const FAST_MONSTER_MAX_STRIDE: i32 = 3;

    /// Gold credited per monster killed, by melee or by lightning
    pub const KILL_REWARD: u32 = 10;

    /// Health restored by a healing vial
    pub const HEAL_AMOUNT: i32 = 100;

    /// Health bonus carried into the next level
    pub const LEVEL_HEALTH_BONUS: i32 = 10;

    /// Levels in a full run
    pub const MAX_LEVELS: u32 = 10;
}
