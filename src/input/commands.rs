//! # Command Definitions
//!
//! The text commands understood by the terminal front end.

use crate::game::Direction;
use crate::input::PlayerInput;

/// One command with every spelling that triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub aliases: &'static [&'static str],
    pub input: PlayerInput,
    pub description: &'static str,
}

/// Every command, in the order the help screen lists them.
pub const COMMANDS: &[Command] = &[
    Command {
        aliases: &["w", "north"],
        input: PlayerInput::Move(Direction::North),
        description: "Move north",
    },
    Command {
        aliases: &["s", "south"],
        input: PlayerInput::Move(Direction::South),
        description: "Move south",
    },
    Command {
        aliases: &["a", "west"],
        input: PlayerInput::Move(Direction::West),
        description: "Move west",
    },
    Command {
        aliases: &["d", "east"],
        input: PlayerInput::Move(Direction::East),
        description: "Move east",
    },
    Command {
        aliases: &["b", "attack"],
        input: PlayerInput::Attack,
        description: "Hit every adjacent monster",
    },
    Command {
        aliases: &["o", "loot"],
        input: PlayerInput::Loot,
        description: "Open the chest you stand on (free action)",
    },
    Command {
        aliases: &["u", "use"],
        input: PlayerInput::UseItem,
        description: "Use your special item",
    },
    Command {
        aliases: &["h", "help"],
        input: PlayerInput::Help,
        description: "Show this help",
    },
    Command {
        aliases: &["q", "quit"],
        input: PlayerInput::Quit,
        description: "Give up the run",
    },
];

/// Looks up a command by one of its aliases.
pub fn find_command(word: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|command| command.aliases.iter().any(|alias| *alias == word))
}

/// Renders the command table for the help screen.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|command| format!("  {:<12} {}\n", command.aliases.join(", "), command.description))
        .collect()
}
