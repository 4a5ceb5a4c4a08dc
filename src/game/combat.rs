//! # Combat
//!
//! Damage resolution between the player and monsters. Attacks always land; the
//! target loses exactly the attacker's attack power.

use crate::config;
use crate::game::{EntityId, GameEvent, Monster, Player, Position};
use log::debug;

/// Result of a single blow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub target: EntityId,
    pub damage: i32,
    pub remaining: i32,
    pub killed: bool,
    /// Gold credited to the player for the kill
    pub reward: u32,
}

impl AttackOutcome {
    /// Events describing this blow when the player struck it.
    pub fn player_events(&self) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::MonsterDamaged {
            monster: self.target,
            damage: self.damage,
            remaining: self.remaining,
        }];
        if self.killed {
            events.push(GameEvent::MonsterKilled {
                monster: self.target,
                reward: self.reward,
            });
        }
        events
    }
}

/// The player strikes the first monster standing on `target`, if any.
///
/// A monster brought to zero health or below is removed from `monsters` and the
/// kill reward goes straight into the player's inventory.
pub fn player_attack(
    player: &mut Player,
    monsters: &mut Vec<Monster>,
    target: Position,
) -> Option<AttackOutcome> {
    let index = monsters.iter().position(|monster| monster.position == target)?;

    let monster = &mut monsters[index];
    monster.health -= player.attack;
    let outcome = AttackOutcome {
        target: monster.id,
        damage: player.attack,
        remaining: monster.health,
        killed: !monster.is_alive(),
        reward: if monster.is_alive() { 0 } else { config::KILL_REWARD },
    };

    if outcome.killed {
        monsters.remove(index);
        player.inventory.add_gold(outcome.reward);
        debug!("Monster {} killed at {}", outcome.target, target);
    }

    Some(outcome)
}

/// A monster strikes the player. Death is left for the caller to notice.
pub fn monster_attack(monster: &Monster, player: &mut Player) -> AttackOutcome {
    player.health -= monster.attack;
    AttackOutcome {
        target: monster.id,
        damage: monster.attack,
        remaining: player.health,
        killed: false,
        reward: 0,
    }
}

/// Number of landed blows needed to bring `health` to zero with `attack` per blow.
///
/// # Examples
///
/// ```
/// use delve::attacks_to_kill;
///
/// assert_eq!(attacks_to_kill(20, 10), 2);
/// assert_eq!(attacks_to_kill(25, 10), 3);
/// ```
pub fn attacks_to_kill(health: i32, attack: i32) -> u32 {
    if health <= 0 {
        return 0;
    }
    if attack <= 0 {
        return u32::MAX;
    }
    ((health + attack - 1) / attack) as u32
}
