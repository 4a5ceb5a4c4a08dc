//! # Entities
//!
//! The player, monsters and chests that live on a level.

use crate::config;
use crate::game::{new_entity_id, EntityId, Item, Position};
use log::debug;
use serde::{Deserialize, Serialize};

/// Gold and the single special item slot carried by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    gold: u32,
    special_item: Option<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn special_item(&self) -> Option<&Item> {
        self.special_item.as_ref()
    }

    /// Stores a special item, replacing whatever was held before.
    ///
    /// An unused item already in the slot is dropped without notice. Items that
    /// are not special never enter the slot.
    pub fn add_item(&mut self, item: Item) {
        if item.is_special() {
            if let Some(previous) = self.special_item.replace(item) {
                debug!("{} discarded unused from the item slot", previous.name());
            }
        }
    }

    /// Empties the slot, handing back its item.
    pub fn take_special_item(&mut self) -> Option<Item> {
        self.special_item.take()
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub health: i32,
    pub attack: i32,
    pub inventory: Inventory,
}

impl Player {
    /// Creates a player with starting stats and an empty inventory.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Player, Position};
    ///
    /// let player = Player::new("Hero", Position::new(1, 1));
    /// assert_eq!(player.health, 170);
    /// assert_eq!(player.inventory.gold(), 0);
    /// ```
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self::with_stats(name, position, config::PLAYER_START_HEALTH, 0)
    }

    /// Creates a player with the given health and gold, as done when a level starts.
    pub fn with_stats(name: impl Into<String>, position: Position, health: i32, gold: u32) -> Self {
        let mut inventory = Inventory::new();
        inventory.add_gold(gold);
        Self {
            name: name.into(),
            position,
            health,
            attack: config::PLAYER_ATTACK,
            inventory,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn gold(&self) -> u32 {
        self.inventory.gold()
    }

    /// Builds the player for the next level: name and gold kept, health plus the
    /// level bonus, everything else back to starting values.
    pub fn carry_over(&self, position: Position) -> Player {
        Player::with_stats(
            self.name.clone(),
            position,
            self.health + config::LEVEL_HEALTH_BONUS,
            self.gold(),
        )
    }
}

/// Monster variants. Fast monsters stride up to three tiles per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Normal,
    Fast,
}

impl MonsterKind {
    /// Whether this kind may cover several tiles in one step.
    pub fn strides(self) -> bool {
        matches!(self, MonsterKind::Fast)
    }
}

/// A hostile creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: EntityId,
    pub kind: MonsterKind,
    pub position: Position,
    pub health: i32,
    pub attack: i32,
}

impl Monster {
    /// Creates a monster with the stats of its kind.
    pub fn new(kind: MonsterKind, position: Position) -> Self {
        let (health, attack) = match kind {
            MonsterKind::Normal => (config::MONSTER_HEALTH, config::MONSTER_ATTACK),
            MonsterKind::Fast => (config::FAST_MONSTER_HEALTH, config::FAST_MONSTER_ATTACK),
        };
        Self {
            id: new_entity_id(),
            kind,
            position,
            health,
            attack,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A treasure chest: some gold and at most one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub position: Position,
    pub gold: u32,
    pub item: Option<Item>,
}

impl Chest {
    pub fn new(position: Position, gold: u32) -> Self {
        Self {
            position,
            gold,
            item: None,
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }
}
