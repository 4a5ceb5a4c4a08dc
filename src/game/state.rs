//! # Level State
//!
//! The turn engine for a single level.
//!
//! A [`LevelState`] exclusively owns the grid, the monsters, the chests and, for
//! as long as the level lasts, the player. Each call to
//! [`LevelState::apply_action`] resolves one player action, lets every monster
//! respond once, opens any door next to the player and reports whether the level
//! is still in progress. Everything runs synchronously on the caller's thread.

use crate::config;
use crate::game::{
    combat, CellKind, Chest, Direction, EntityId, GameEvent, Grid, Monster, Player, Position,
};
use crate::generation::GeneratedLevel;
use crate::{DelveError, DelveResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A discrete player command. One action is one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step one tile along an axis
    Move(Direction),
    /// Hit whatever stands on the four sides of the player
    MeleeAttack,
    /// Open the chest under the player
    LootHere,
    /// Consume the item in the special slot
    UseSpecialItem,
}

impl Action {
    /// Builds a move from a unit axis delta; None for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Action, Direction};
    ///
    /// assert_eq!(Action::move_by(0, 1), Some(Action::Move(Direction::South)));
    /// assert_eq!(Action::move_by(1, 1), None);
    /// ```
    pub fn move_by(dx: i32, dy: i32) -> Option<Action> {
        Direction::from_delta(Position::new(dx, dy)).map(Action::Move)
    }

    /// Whether resolving this action hands the turn to the monsters.
    pub fn consumes_turn(self) -> bool {
        !matches!(self, Action::LootHere)
    }
}

/// Where a level stands after the latest action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelStatus {
    InProgress,
    /// The player stands on the exit and no monster is left
    Cleared,
    PlayerDied,
}

/// What a single call to [`LevelState::apply_action`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// True when the monsters got to respond
    pub turn_consumed: bool,
    pub status: LevelStatus,
    pub events: Vec<GameEvent>,
}

/// One playable level.
#[derive(Debug, Clone)]
pub struct LevelState {
    grid: Grid,
    player: Player,
    monsters: Vec<Monster>,
    chests: Vec<Chest>,
    exit: Position,
    status: LevelStatus,
    turn_number: u64,
    /// Monsters that already acted during the turn being resolved
    acted: HashSet<EntityId>,
}

impl LevelState {
    /// Builds a level from generator output, re-anchoring the player on the start cell.
    pub fn from_generated(level: GeneratedLevel, mut player: Player) -> Self {
        player.position = level.player_start;
        let monsters = level
            .monster_spawns
            .iter()
            .map(|&(kind, position)| Monster::new(kind, position))
            .collect();

        Self {
            grid: level.grid,
            player,
            monsters,
            chests: level.chests,
            exit: level.exit,
            status: LevelStatus::InProgress,
            turn_number: 0,
            acted: HashSet::new(),
        }
        .with_start_doors_open()
    }

    /// Builds a level from parts.
    ///
    /// The exit cell and every chest cell are stamped onto the grid, and doors
    /// next to the player are opened. The player must stand on a walkable cell
    /// and the exit must be on the grid.
    pub fn new(
        mut grid: Grid,
        player: Player,
        monsters: Vec<Monster>,
        chests: Vec<Chest>,
        exit: Position,
    ) -> DelveResult<Self> {
        if !grid.is_walkable(player.position) {
            return Err(DelveError::InvalidState(format!(
                "Player start {} is not walkable",
                player.position
            )));
        }
        grid.set(exit, CellKind::Exit)?;
        for chest in &chests {
            grid.set(chest.position, CellKind::Chest)?;
        }

        Ok(Self {
            grid,
            player,
            monsters,
            chests,
            exit,
            status: LevelStatus::InProgress,
            turn_number: 0,
            acted: HashSet::new(),
        }
        .with_start_doors_open())
    }

    fn with_start_doors_open(mut self) -> Self {
        let opened = self.open_adjacent_doors();
        if !opened.is_empty() {
            debug!("{} doors opened around the start", opened.len());
        }
        self
    }

    /// Places an additional chest and stamps its cell.
    pub fn add_chest(&mut self, chest: Chest) -> DelveResult<()> {
        self.grid.set(chest.position, CellKind::Chest)?;
        self.chests.push(chest);
        Ok(())
    }

    /// Places an additional monster.
    pub fn add_monster(&mut self, monster: Monster) -> DelveResult<()> {
        if !self.grid.in_bounds(monster.position) {
            return Err(DelveError::InvalidState(format!(
                "Monster position {} is off the grid",
                monster.position
            )));
        }
        self.monsters.push(monster);
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn chests(&self) -> &[Chest] {
        &self.chests
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    /// Number of turns that were handed to the monsters so far.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn is_finished(&self) -> bool {
        self.status != LevelStatus::InProgress
    }

    /// Gets the first monster standing on a position.
    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.position == pos)
    }

    pub fn chest_at(&self, pos: Position) -> Option<&Chest> {
        self.chests.iter().find(|chest| chest.position == pos)
    }

    /// Hands the player back, consuming the level.
    pub fn into_player(self) -> Player {
        self.player
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Removes every monster, returning how many there were.
    pub(crate) fn remove_all_monsters(&mut self) -> usize {
        let count = self.monsters.len();
        self.monsters.clear();
        count
    }

    /// Resolves one player action and the monster phase that follows it.
    ///
    /// Illegal moves are not errors: the player stays put and the turn still
    /// passes. Acting on a level that already ended is a caller bug.
    pub fn apply_action(&mut self, action: Action) -> DelveResult<TurnOutcome> {
        if self.is_finished() {
            return Err(DelveError::InvalidState(format!(
                "Level already ended with {:?}",
                self.status
            )));
        }

        self.acted.clear();
        let mut events = Vec::new();

        match action {
            Action::Move(direction) => self.move_player(direction, &mut events),
            Action::MeleeAttack => self.player_melee(&mut events),
            Action::LootHere => self.loot_here(&mut events)?,
            Action::UseSpecialItem => self.use_special_item(&mut events),
        }

        let turn_consumed = action.consumes_turn();
        if turn_consumed {
            self.turn_number += 1;
            self.monsters_act(&mut events);
        }

        events.extend(self.open_adjacent_doors());
        self.status = self.evaluate_status();

        if self.status != LevelStatus::InProgress {
            info!(
                "Level ended with {:?} after {} turns",
                self.status,
                self.turn_number
            );
        }

        Ok(TurnOutcome {
            turn_consumed,
            status: self.status,
            events,
        })
    }

    fn move_player(&mut self, direction: Direction, events: &mut Vec<GameEvent>) {
        let from = self.player.position;
        let target = from + direction.to_delta();

        if self.grid.is_walkable(target) && self.monster_at(target).is_none() {
            self.player.position = target;
            events.push(GameEvent::PlayerMoved { from, to: target });
        } else {
            events.push(GameEvent::MoveBlocked { target });
        }
    }

    fn player_melee(&mut self, events: &mut Vec<GameEvent>) {
        for target in self.player.position.cardinal_adjacent_positions() {
            if !self.grid.in_bounds(target) {
                continue;
            }
            if let Some(outcome) = combat::player_attack(&mut self.player, &mut self.monsters, target)
            {
                events.extend(outcome.player_events());
            }
        }
    }

    fn loot_here(&mut self, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        let position = self.player.position;
        let Some(index) = self.chests.iter().position(|chest| chest.position == position) else {
            return Ok(());
        };

        let chest = self.chests.remove(index);
        self.player.inventory.add_gold(chest.gold);
        if let Some(item) = chest.item {
            self.player.inventory.add_item(item);
        }
        self.grid.set(position, CellKind::Floor)?;

        events.push(GameEvent::ChestLooted {
            position,
            gold: chest.gold,
            item: chest.item,
        });
        Ok(())
    }

    fn use_special_item(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(item) = self.player.inventory.take_special_item() {
            debug!("{} used at {}", item.name(), self.player.position);
            events.extend(item.apply(self));
        }
    }

    /// Every monster that has not acted yet attacks or steps toward the player.
    fn monsters_act(&mut self, events: &mut Vec<GameEvent>) {
        for index in 0..self.monsters.len() {
            let monster = &self.monsters[index];
            if self.acted.contains(&monster.id) {
                continue;
            }

            if monster.position.is_adjacent_to(self.player.position) {
                let outcome = combat::monster_attack(monster, &mut self.player);
                events.push(GameEvent::PlayerDamaged {
                    attacker: outcome.target,
                    damage: outcome.damage,
                    remaining: outcome.remaining,
                });
                self.acted.insert(outcome.target);
                continue;
            }

            if let Some(to) = self.monster_step(monster) {
                let monster = &mut self.monsters[index];
                events.push(GameEvent::MonsterMoved {
                    monster: monster.id,
                    from: monster.position,
                    to,
                });
                monster.position = to;
                self.acted.insert(monster.id);
            }
        }
    }

    /// Picks the destination for a monster that cannot attack, if it can move at all.
    ///
    /// The horizontal gap is closed before the vertical one. Striding monsters try
    /// the longest stride first; only the destination cell is checked.
    fn monster_step(&self, monster: &Monster) -> Option<Position> {
        let delta = greedy_delta(monster.position, self.player.position)?;

        if monster.kind.strides() {
            for stride in (1..=config::FAST_MONSTER_MAX_STRIDE).rev() {
                let target = monster.position.stepped(delta, stride);
                if self.monster_can_enter(target) {
                    return Some(target);
                }
            }
        }

        let target = monster.position + delta;
        self.monster_can_enter(target).then_some(target)
    }

    fn monster_can_enter(&self, pos: Position) -> bool {
        self.grid.is_walkable(pos) && pos != self.player.position
    }

    /// Turns every door next to the player into floor.
    fn open_adjacent_doors(&mut self) -> Vec<GameEvent> {
        self.player
            .position
            .cardinal_adjacent_positions()
            .into_iter()
            .filter(|&pos| self.grid.replace_if(pos, CellKind::Door, CellKind::Floor))
            .map(|position| GameEvent::DoorOpened { position })
            .collect()
    }

    fn evaluate_status(&self) -> LevelStatus {
        if !self.player.is_alive() {
            LevelStatus::PlayerDied
        } else if self.player.position == self.exit && self.monsters.is_empty() {
            LevelStatus::Cleared
        } else {
            LevelStatus::InProgress
        }
    }
}

/// Unit step from `from` toward `to`, x axis first. None when they coincide.
fn greedy_delta(from: Position, to: Position) -> Option<Position> {
    let delta = if to.x != from.x {
        Position::new((to.x - from.x).signum(), 0)
    } else if to.y != from.y {
        Position::new(0, (to.y - from.y).signum())
    } else {
        return None;
    };
    Some(delta)
}
