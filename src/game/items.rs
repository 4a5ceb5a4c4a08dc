//! # Items
//!
//! One-shot items found in chests. Each variant carries its own effect; the
//! descriptor (name, description, special flag) is fixed per variant.

use crate::config;
use crate::game::{CellKind, GameEvent, LevelState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A consumable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    /// Healing vial: restores a fixed amount of health
    Heal,
    /// Breaks the walls on the four sides of the player
    WallBreak,
    /// Lightning that kills every monster on the level, paying gold for each
    MassKill,
}

impl Item {
    pub fn name(self) -> &'static str {
        match self {
            Item::Heal => "Vial of Life",
            Item::WallBreak => "Wall Breaker",
            Item::MassKill => "Zeus Lightning",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Item::Heal => "Restores 100 health",
            Item::WallBreak => "Breaks the walls around the player",
            Item::MassKill => "Kills every monster on the map and pays for each",
        }
    }

    /// Whether the item goes into the player's special slot.
    pub fn is_special(self) -> bool {
        true
    }

    /// Applies the effect to the level and its player.
    ///
    /// The caller is responsible for removing the item from the inventory first;
    /// effects never fail.
    pub fn apply(self, level: &mut LevelState) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::ItemUsed { item: self }];

        match self {
            Item::Heal => {
                let player = level.player_mut();
                player.health += config::HEAL_AMOUNT;
                events.push(GameEvent::PlayerHealed {
                    amount: config::HEAL_AMOUNT,
                    health: player.health,
                });
            }
            Item::WallBreak => {
                let origin = level.player().position;
                let grid = level.grid_mut();
                let count = origin
                    .cardinal_adjacent_positions()
                    .into_iter()
                    .filter(|&pos| grid.replace_if(pos, CellKind::Wall, CellKind::Floor))
                    .count();
                events.push(GameEvent::WallsBroken { count });
            }
            Item::MassKill => {
                let count = level.remove_all_monsters();
                let reward = count as u32 * config::KILL_REWARD;
                level.player_mut().inventory.add_gold(reward);
                events.push(GameEvent::MonstersSmitten { count, reward });
            }
        }

        events
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.description())
    }
}
