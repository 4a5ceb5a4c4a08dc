//! # Chest Loot
//!
//! Gold and item rolls for chests.
//!
//! The item roll is two sequential independent draws: a rare draw that grants a
//! wall breaker or lightning, and only when it misses, a second draw for a healing
//! vial.

use crate::config;
use crate::game::{Chest, Item, Position};
use rand::rngs::StdRng;
use rand::Rng;

/// Rolls gold and an optional item for a new chest.
pub fn roll_chest(position: Position, rng: &mut StdRng) -> Chest {
    let gold = rng.gen_range(config::CHEST_GOLD_MIN..=config::CHEST_GOLD_MAX);
    let chest = Chest::new(position, gold);
    match roll_item(rng) {
        Some(item) => chest.with_item(item),
        None => chest,
    }
}

/// Rolls the item content of a chest.
pub fn roll_item(rng: &mut StdRng) -> Option<Item> {
    if rng.gen_bool(config::RARE_ITEM_CHANCE) {
        let item = if rng.gen_bool(0.5) {
            Item::WallBreak
        } else {
            Item::MassKill
        };
        return Some(item);
    }
    rng.gen_bool(config::HEAL_ITEM_CHANCE).then_some(Item::Heal)
}
