//! # Input Module
//!
//! Turns typed commands into game actions.

pub mod commands;

pub use commands::*;

use crate::game::{Action, Direction};

/// Player input recognised by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move one tile in a direction
    Move(Direction),
    /// Melee attack on all four sides
    Attack,
    /// Loot the chest underfoot
    Loot,
    /// Use the special item
    UseItem,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

impl PlayerInput {
    /// Converts the input to a game action; None for inputs the front end handles itself.
    pub fn to_action(self) -> Option<Action> {
        match self {
            PlayerInput::Move(direction) => Some(Action::Move(direction)),
            PlayerInput::Attack => Some(Action::MeleeAttack),
            PlayerInput::Loot => Some(Action::LootHere),
            PlayerInput::UseItem => Some(Action::UseSpecialItem),
            PlayerInput::Help | PlayerInput::Quit => None,
        }
    }
}

/// Parses one line of typed input, ignoring case and surrounding whitespace.
///
/// # Examples
///
/// ```
/// use delve::{parse_command, Direction, PlayerInput};
///
/// assert_eq!(parse_command(" W "), Some(PlayerInput::Move(Direction::North)));
/// assert_eq!(parse_command("loot"), Some(PlayerInput::Loot));
/// assert_eq!(parse_command("dance"), None);
/// ```
pub fn parse_command(line: &str) -> Option<PlayerInput> {
    let word = line.trim().to_ascii_lowercase();
    find_command(&word).map(|command| command.input)
}
