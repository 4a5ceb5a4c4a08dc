//! # Game Events
//!
//! Facts emitted by the turn engine so a presentation layer can narrate a turn
//! without diffing state.

use crate::game::{EntityId, Item, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something that happened while resolving a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerMoved {
        from: Position,
        to: Position,
    },
    /// The player tried to walk into a wall, off the map or into a monster
    MoveBlocked {
        target: Position,
    },
    MonsterDamaged {
        monster: EntityId,
        damage: i32,
        remaining: i32,
    },
    MonsterKilled {
        monster: EntityId,
        reward: u32,
    },
    MonsterMoved {
        monster: EntityId,
        from: Position,
        to: Position,
    },
    PlayerDamaged {
        attacker: EntityId,
        damage: i32,
        remaining: i32,
    },
    ChestLooted {
        position: Position,
        gold: u32,
        item: Option<Item>,
    },
    ItemUsed {
        item: Item,
    },
    PlayerHealed {
        amount: i32,
        health: i32,
    },
    WallsBroken {
        count: usize,
    },
    MonstersSmitten {
        count: usize,
        reward: u32,
    },
    DoorOpened {
        position: Position,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PlayerMoved { to, .. } => write!(f, "You move to {}", to),
            GameEvent::MoveBlocked { .. } => write!(f, "Something blocks your way"),
            GameEvent::MonsterDamaged { damage, remaining, .. } => {
                write!(f, "You hit a monster for {} ({} left)", damage, remaining)
            }
            GameEvent::MonsterKilled { reward, .. } => {
                write!(f, "The monster dies. +{} gold", reward)
            }
            GameEvent::MonsterMoved { .. } => write!(f, "You hear something move"),
            GameEvent::PlayerDamaged { damage, remaining, .. } => {
                write!(f, "A monster hits you for {} ({} health left)", damage, remaining)
            }
            GameEvent::ChestLooted { gold, item, .. } => match item {
                Some(item) => write!(f, "You open the chest: {} gold and {}", gold, item.name()),
                None => write!(f, "You open the chest: {} gold", gold),
            },
            GameEvent::ItemUsed { item } => write!(f, "You use {}", item.name()),
            GameEvent::PlayerHealed { amount, health } => {
                write!(f, "You recover {} health ({})", amount, health)
            }
            GameEvent::WallsBroken { count } => write!(f, "{} walls crumble", count),
            GameEvent::MonstersSmitten { count, reward } => {
                write!(f, "Lightning strikes {} monsters. +{} gold", count, reward)
            }
            GameEvent::DoorOpened { position } => write!(f, "A door at {} swings open", position),
        }
    }
}
